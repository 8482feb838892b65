/*
[INPUT]:  Contract invocations and authorization entries
[OUTPUT]: Base64 XDR envelopes for simulation and relay submission
[POS]:    Soroban layer - transaction and operation construction
[UPDATE]: When envelope building or simulation source handling changes
*/

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use stellar_xdr::curr::{
    HostFunction, InvokeContractArgs, InvokeHostFunctionOp, Limits, Memo, MuxedAccount, Operation,
    OperationBody, Preconditions, SequenceNumber, SorobanAuthorizationEntry, TimeBounds,
    TimePoint, Transaction, TransactionEnvelope, TransactionExt, TransactionV1Envelope, Uint256,
    VecM, WriteXdr,
};

use crate::http::{Result, SdpWalletError};

/// Base fee in stroops for simulation envelopes
const BASE_FEE: u32 = 100;

/// Validity window for simulation envelopes, in seconds
const SIMULATION_TIMEOUT_SECS: u64 = 300;

/// Time source injected into the flows so envelope validity windows are
/// testable without wall-clock dependence
pub trait Clock: Send + Sync {
    fn unix_timestamp(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Build an invoke-host-function operation from a contract invocation and
/// its authorization entries
pub fn build_invoke_operation(
    invoke_args: InvokeContractArgs,
    auth_entries: Vec<SorobanAuthorizationEntry>,
) -> Result<Operation> {
    let auth: VecM<SorobanAuthorizationEntry> = auth_entries
        .try_into()
        .map_err(|_| SdpWalletError::Xdr("Too many authorization entries".to_string()))?;

    Ok(Operation {
        source_account: None,
        body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
            host_function: HostFunction::InvokeContract(invoke_args),
            auth,
        }),
    })
}

/// Encode an operation to base64 XDR for relay submission
pub fn operation_to_base64(operation: &Operation) -> Result<String> {
    Ok(operation.to_xdr_base64(Limits::none())?)
}

/// Build an unsigned transaction envelope around one operation, sourced from
/// a disposable random keypair at sequence 0.
///
/// The source never signs or submits anything; it only gives the simulator a
/// well-formed transaction. Each call draws a fresh keypair, so concurrent
/// simulations cannot collide.
pub fn build_simulation_envelope(operation: Operation, clock: &dyn Clock) -> Result<String> {
    let throwaway = SigningKey::generate(&mut OsRng);
    let source_bytes = throwaway.verifying_key().to_bytes();

    let operations: VecM<Operation, 100> = vec![operation]
        .try_into()
        .map_err(|_| SdpWalletError::Xdr("Failed to build operations vector".to_string()))?;

    let transaction = Transaction {
        source_account: MuxedAccount::Ed25519(Uint256(source_bytes)),
        fee: BASE_FEE,
        seq_num: SequenceNumber(0),
        cond: Preconditions::Time(TimeBounds {
            min_time: TimePoint(0),
            max_time: TimePoint(clock.unix_timestamp() + SIMULATION_TIMEOUT_SECS),
        }),
        memo: Memo::None,
        operations,
        ext: TransactionExt::V0,
    };

    let envelope = TransactionEnvelope::Tx(TransactionV1Envelope {
        tx: transaction,
        signatures: VecM::default(),
    });

    Ok(envelope.to_xdr_base64(Limits::none())?)
}
