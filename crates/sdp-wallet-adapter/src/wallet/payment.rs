/*
[INPUT]:  Payment parameters and the wallet's balance context
[OUTPUT]: A relay-confirmed payment receipt, or a typed flow error
[POS]:    Wallet layer - validate / simulate / sign / relay / poll pipeline
[UPDATE]: When payment validation or the relay protocol changes
*/

use std::sync::Arc;

use stellar_xdr::curr::{Int128Parts, InvokeContractArgs, ScSymbol, ScVal};

use crate::auth::entry_signer::SorobanAuthEntrySigner;
use crate::auth::passkey::ChallengeSigner;
use crate::http::error::SIMULATION_FAILED;
use crate::http::{Result, SdpClient, SdpWalletError};
use crate::soroban::address::{contract_address, parse_destination};
use crate::soroban::amount::validate_amount;
use crate::soroban::asset::{asset_contract_address, resolve_asset};
use crate::soroban::transaction::{
    build_invoke_operation, build_simulation_envelope, operation_to_base64,
};
use crate::soroban::{Clock, SystemClock};
use crate::types::{AuthType, SigningRequest};

const TRANSFER_FUNCTION: &str = "transfer";

/// What to pay, as entered by the user
#[derive(Debug, Clone)]
pub struct PaymentParams {
    /// Destination strkey: Ed25519 account (G...) or contract (C...)
    pub destination: String,
    /// Decimal amount string, at most 7 fractional digits
    pub amount: String,
}

/// Wallet-side context for one payment
#[derive(Debug, Clone)]
pub struct PaymentContext {
    /// The wallet's own contract address; absent until onboarding completed
    pub contract_address: Option<String>,
    /// Passkey credential bound to the wallet contract
    pub credential_id: Option<String>,
    /// Available balance, decimal string in asset units
    pub balance: String,
    pub asset_code: String,
    pub asset_issuer: Option<String>,
}

/// Terminal result of a relayed payment
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// Relay tracking id
    pub transaction_id: String,
    /// On-chain transaction hash, when the relay reported one
    pub transaction_hash: Option<String>,
}

/// Sequential payment pipeline: validate, simulate, sign with the passkey,
/// submit to the sponsored-transaction relay, poll to a terminal status.
///
/// Every invocation is independent; nothing is cached between sends.
pub struct WalletPaymentFlow {
    client: SdpClient,
    signer: SorobanAuthEntrySigner,
    clock: Arc<dyn Clock>,
}

impl WalletPaymentFlow {
    pub fn new(client: SdpClient, challenge_signer: Arc<dyn ChallengeSigner>) -> Self {
        Self::with_clock(client, challenge_signer, Arc::new(SystemClock))
    }

    pub fn with_clock(
        client: SdpClient,
        challenge_signer: Arc<dyn ChallengeSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            signer: SorobanAuthEntrySigner::new(challenge_signer),
            clock,
        }
    }

    /// Send a payment from the wallet contract.
    ///
    /// `on_signed` fires after a successful local signature and before any
    /// network submission, so callers can flip UI state at the right moment.
    pub async fn send(
        &self,
        params: PaymentParams,
        context: PaymentContext,
        on_signed: Option<Box<dyn FnOnce() + Send>>,
    ) -> Result<PaymentReceipt> {
        // Step 1: preconditions that no amount of retrying will fix
        let wallet_address = context.contract_address.as_deref().ok_or_else(|| {
            SdpWalletError::Validation("Wallet contract address is not set".to_string())
        })?;
        let credential_id = context.credential_id.as_deref().ok_or_else(|| {
            SdpWalletError::Validation("Wallet credential id is not set".to_string())
        })?;

        // Steps 2-3: destination and amount
        let destination = parse_destination(&params.destination)?;
        let stroops = validate_amount(&params.amount, &context.balance)?;

        // Step 4: resolve the asset contract under the live network
        let rpc = self.client.rpc_channel(AuthType::Wallet, None)?;
        let network_passphrase = rpc.get_network_passphrase().await?;
        let asset = resolve_asset(&context.asset_code, context.asset_issuer.as_deref())?;
        let asset_contract = asset_contract_address(&asset, &network_passphrase)?;

        // Step 5: build and simulate transfer(from, to, amount)
        let invoke_args = InvokeContractArgs {
            contract_address: asset_contract,
            function_name: ScSymbol::try_from(TRANSFER_FUNCTION.as_bytes().to_vec())?,
            args: vec![
                ScVal::Address(contract_address(wallet_address)?),
                ScVal::Address(destination),
                ScVal::I128(Int128Parts {
                    hi: (stroops >> 64) as i64,
                    lo: stroops as u64,
                }),
            ]
            .try_into()?,
        };

        let envelope = build_simulation_envelope(
            build_invoke_operation(invoke_args.clone(), Vec::new())?,
            self.clock.as_ref(),
        )?;
        let simulation = rpc.simulate_transaction(&envelope).await?;

        // Step 6: a transfer that needs no authorization never happens
        if simulation.auth_entries.is_empty() {
            return Err(SdpWalletError::Simulation {
                code: SIMULATION_FAILED,
                message: "Simulation did not return any authorization entries".to_string(),
            });
        }

        tracing::debug!(
            destination = %params.destination,
            amount = %params.amount,
            auth_entries = simulation.auth_entries.len(),
            "Payment simulation completed"
        );

        // Step 7: passkey signature over every wallet-owned entry
        let signed = self
            .signer
            .sign(&SigningRequest {
                auth_entries: simulation.auth_entries,
                contract_address: wallet_address.to_string(),
                credential_id: Some(credential_id.to_string()),
                network_passphrase,
                relying_party_id: self.client.relying_party_id()?,
                signature_expiration_ledger: simulation.latest_ledger
                    + self.client.config().payment_expiration_ledgers,
            })
            .await?;

        // Step 8: local signature succeeded; nothing submitted yet
        if let Some(callback) = on_signed {
            callback();
        }

        // Steps 9-10: serialize the signed operation and hand it to the relay
        let operation = build_invoke_operation(invoke_args, signed)?;
        let operation_xdr = operation_to_base64(&operation)?;
        let transaction_id = self
            .client
            .submit_sponsored_transaction(&operation_xdr)
            .await?;

        tracing::info!(transaction_id = %transaction_id, "Payment submitted to relay");

        // Steps 11-12: block until the relay reports a terminal status
        let record = self
            .client
            .poll_sponsored_transaction(&transaction_id)
            .await?;

        Ok(PaymentReceipt {
            transaction_id: record.id,
            transaction_hash: record.transaction_hash,
        })
    }
}
