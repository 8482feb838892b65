/*
[INPUT]:  Mock server handles and fixture parameters
[OUTPUT]: Shared clients, passkey assertions, and XDR fixtures
[POS]:    Integration tests - common fixtures
[UPDATE]: When flow tests need new fixture shapes
*/
#![allow(dead_code)]

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use sdp_wallet_adapter::soroban::Clock;
use sdp_wallet_adapter::{AuthType, PasskeyAssertion, SdpClient, SdpConfig};
use stellar_strkey::Strkey;
use stellar_xdr::curr::{
    ContractDataDurability, ContractId, Hash, InvokeContractArgs, LedgerFootprint, LedgerKey,
    LedgerKeyContractData, Limits, ScAddress, ScNonceKey, ScVal, SorobanAddressCredentials,
    SorobanAuthorizationEntry, SorobanAuthorizedFunction, SorobanAuthorizedInvocation,
    SorobanCredentials, SorobanResources, SorobanTransactionData, SorobanTransactionDataExt, VecM,
    WriteXdr,
};
use wiremock::MockServer;

pub const TESTNET: &str = "Test SDF Network ; September 2015";
pub const WALLET_BYTES: [u8; 32] = [7; 32];
pub const WEB_AUTH_BYTES: [u8; 32] = [3; 32];
pub const SERVER_KEY_BYTES: [u8; 32] = [9; 32];

/// Fixed time source for deterministic envelope validity windows
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> u64 {
        self.0
    }
}

pub fn wallet_strkey() -> String {
    Strkey::Contract(stellar_strkey::Contract(WALLET_BYTES)).to_string()
}

pub fn web_auth_strkey() -> String {
    Strkey::Contract(stellar_strkey::Contract(WEB_AUTH_BYTES)).to_string()
}

pub fn server_signing_strkey() -> String {
    Strkey::PublicKeyEd25519(stellar_strkey::ed25519::PublicKey(SERVER_KEY_BYTES)).to_string()
}

/// Dev-mode client pointed at the mock server, with short poll cadence
pub fn dev_client(server: &MockServer) -> SdpClient {
    let mut config = SdpConfig::new(server.uri());
    config.dev_mode = true;
    config.tenant_name = Some("bluecorp".to_string());
    config.relay_poll_interval = Duration::from_millis(10);
    config.relay_poll_attempts = 3;
    SdpClient::new(config).unwrap()
}

/// `host:port` of the mock server, as flows derive the home domain
pub fn home_domain(server: &MockServer) -> String {
    server
        .uri()
        .strip_prefix("http://")
        .expect("mock server uri")
        .to_string()
}

pub fn wallet_client(server: &MockServer) -> SdpClient {
    let client = dev_client(server);
    client.session_tokens().set_token(AuthType::Wallet, "wallet-jwt");
    client
}

/// Assertion backed by a real P-256 key so DER conversion sees a valid
/// signature
pub fn passkey_assertion() -> PasskeyAssertion {
    let key = SigningKey::from_bytes(&[21u8; 32].into()).unwrap();
    let signature: Signature = key.sign(b"assertion payload");

    PasskeyAssertion {
        credential_id: URL_SAFE_NO_PAD.encode(b"cred-1"),
        client_data_json: URL_SAFE_NO_PAD.encode(b"{\"type\":\"webauthn.get\"}"),
        authenticator_data: URL_SAFE_NO_PAD.encode([4u8; 37]),
        signature: URL_SAFE_NO_PAD.encode(signature.to_der().as_bytes()),
    }
}

/// Authorization entry whose address credentials name the wallet contract
pub fn wallet_auth_entry(invocation: SorobanAuthorizedInvocation, nonce: i64) -> SorobanAuthorizationEntry {
    SorobanAuthorizationEntry {
        credentials: SorobanCredentials::Address(SorobanAddressCredentials {
            address: ScAddress::Contract(ContractId(Hash(WALLET_BYTES))),
            nonce,
            signature_expiration_ledger: 0,
            signature: ScVal::Void,
        }),
        root_invocation: invocation,
    }
}

pub fn contract_invocation(
    contract: [u8; 32],
    function_name: &str,
    args: Vec<ScVal>,
) -> SorobanAuthorizedInvocation {
    SorobanAuthorizedInvocation {
        function: SorobanAuthorizedFunction::ContractFn(InvokeContractArgs {
            contract_address: ScAddress::Contract(ContractId(Hash(contract))),
            function_name: function_name.as_bytes().to_vec().try_into().unwrap(),
            args: args.try_into().unwrap(),
        }),
        sub_invocations: VecM::default(),
    }
}

pub fn entries_to_base64(entries: &[SorobanAuthorizationEntry]) -> String {
    VecM::<SorobanAuthorizationEntry>::try_from(entries.to_vec())
        .unwrap()
        .to_xdr_base64(Limits::none())
        .unwrap()
}

pub fn entry_to_base64(entry: &SorobanAuthorizationEntry) -> String {
    entry.to_xdr_base64(Limits::none()).unwrap()
}

/// Transaction data whose footprint only touches the given contract's nonce
pub fn nonce_footprint_xdr(owner: [u8; 32]) -> String {
    let key = LedgerKey::ContractData(LedgerKeyContractData {
        contract: ScAddress::Contract(ContractId(Hash(owner))),
        key: ScVal::LedgerKeyNonce(ScNonceKey { nonce: 42 }),
        durability: ContractDataDurability::Temporary,
    });
    transaction_data_xdr(vec![key], vec![])
}

pub fn transaction_data_xdr(read_only: Vec<LedgerKey>, read_write: Vec<LedgerKey>) -> String {
    SorobanTransactionData {
        ext: SorobanTransactionDataExt::V0,
        resources: SorobanResources {
            footprint: LedgerFootprint {
                read_only: read_only.try_into().unwrap(),
                read_write: read_write.try_into().unwrap(),
            },
            instructions: 0,
            disk_read_bytes: 0,
            write_bytes: 0,
        },
        resource_fee: 0,
    }
    .to_xdr_base64(Limits::none())
    .unwrap()
}
