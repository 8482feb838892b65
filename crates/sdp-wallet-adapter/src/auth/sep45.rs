/*
[INPUT]:  Wallet contract address and an optional passkey credential id
[OUTPUT]: A wallet session token issued by the SEP-45 web-auth server
[POS]:    Auth layer - SEP-45 contract-account authentication flow
[UPDATE]: When the challenge validation rules or token exchange change
*/

use std::sync::Arc;

use reqwest::{Method, Url};
use serde::Deserialize;
use stellar_xdr::curr::{
    InvokeContractArgs, Limits, ReadXdr, ScAddress, ScVal, SorobanAuthorizationEntry,
    SorobanAuthorizedFunction, VecM, WriteXdr,
};

use crate::auth::entry_signer::SorobanAuthEntrySigner;
use crate::auth::passkey::ChallengeSigner;
use crate::http::toml::{SIGNING_KEY, WEB_AUTH_CONTRACT_ID, WEB_AUTH_FOR_CONTRACTS_ENDPOINT};
use crate::http::{Result, SdpClient, SdpWalletError};
use crate::soroban::address::contract_address;
use crate::soroban::transaction::{build_invoke_operation, build_simulation_envelope};
use crate::soroban::{Clock, SystemClock};
use crate::soroban::footprint::verify_footprint;
use crate::types::{AuthType, SigningRequest};

const WEB_AUTH_FUNCTION: &str = "web_auth_verify";

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    authorization_entries: Option<String>,
    network_passphrase: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// SEP-45 authentication for contract accounts.
///
/// Single-shot pipeline: fetch a challenge, validate it, simulate, sign the
/// authorization entries with the passkey, exchange them for a session
/// token. Every step failure is terminal; the caller restarts the whole flow.
pub struct Sep45AuthenticationFlow {
    client: SdpClient,
    signer: SorobanAuthEntrySigner,
    clock: Arc<dyn Clock>,
}

impl Sep45AuthenticationFlow {
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

    /// Authenticate the wallet contract and store the issued token in the
    /// wallet session slot.
    pub async fn authenticate(
        &self,
        contract_addr: &str,
        credential_id: Option<&str>,
    ) -> Result<String> {
        // Step 1: resolve web-auth configuration from stellar.toml
        let fields = self
            .client
            .resolve_toml_fields(&[SIGNING_KEY, WEB_AUTH_CONTRACT_ID, WEB_AUTH_FOR_CONTRACTS_ENDPOINT])
            .await?;
        let signing_key = &fields[SIGNING_KEY];
        let web_auth_contract_id = &fields[WEB_AUTH_CONTRACT_ID];
        let endpoint = &fields[WEB_AUTH_FOR_CONTRACTS_ENDPOINT];

        let home_domain = self.client.home_domain()?;
        let web_auth_domain = domain_of(endpoint)?;
        let web_auth_contract = contract_address(web_auth_contract_id)?;

        // Step 2: request the challenge
        tracing::debug!(account = contract_addr, endpoint = %endpoint, "Requesting SEP-45 challenge");
        let builder = self
            .client
            .external_request(Method::GET, endpoint)?
            .query(&[
                ("account", contract_addr),
                ("home_domain", home_domain.as_str()),
            ]);
        let challenge: ChallengeResponse = self.client.send_json(builder).await?;

        let entries_xdr = challenge.authorization_entries.ok_or_else(|| {
            SdpWalletError::InvalidResponse(
                "SEP-45 challenge lacks authorization_entries".to_string(),
            )
        })?;
        let challenge_passphrase = challenge.network_passphrase.ok_or_else(|| {
            SdpWalletError::InvalidResponse("SEP-45 challenge lacks network_passphrase".to_string())
        })?;

        // Step 3: decode and validate every challenge entry
        let entries: Vec<SorobanAuthorizationEntry> =
            VecM::<SorobanAuthorizationEntry>::from_xdr_base64(&entries_xdr, Limits::none())?
                .into();
        if entries.is_empty() {
            return Err(SdpWalletError::InvalidResponse(
                "SEP-45 challenge contains no authorization entries".to_string(),
            ));
        }

        let expected = expected_bindings(contract_addr, &home_domain, &web_auth_domain, signing_key);
        for entry in &entries {
            validate_challenge_entry(entry, &web_auth_contract, &expected)?;
        }

        // Step 4: simulate the web_auth_verify invocation as received
        let invoke_args = entry_invoke_args(&entries[0])?;
        let rpc = self.client.rpc_channel(AuthType::User, None)?;

        let envelope =
            build_simulation_envelope(build_invoke_operation(invoke_args.clone(), entries.clone())?, self.clock.as_ref())?;
        let simulation = rpc.simulate_transaction(&envelope).await?;

        // Step 5: the footprint may only touch the wallet and the server key
        let allowed = [contract_addr, signing_key.as_str()];
        if let Some(data) = &simulation.transaction_data {
            verify_footprint(data, &allowed)?;
        }

        // Step 6: sign with a fresh expiration ledger
        let network_passphrase = rpc.get_network_passphrase().await?;
        if network_passphrase != challenge_passphrase {
            tracing::warn!(
                challenge = %challenge_passphrase,
                rpc = %network_passphrase,
                "Challenge and RPC network passphrases differ"
            );
        }
        let latest_ledger = rpc.get_latest_ledger().await?;
        let expiration = latest_ledger + self.client.config().sep45_expiration_ledgers;

        let signed = self
            .signer
            .sign(&SigningRequest {
                auth_entries: entries,
                contract_address: contract_addr.to_string(),
                credential_id: credential_id.map(str::to_string),
                network_passphrase,
                relying_party_id: self.client.relying_party_id()?,
                signature_expiration_ledger: expiration,
            })
            .await?;

        // Step 7: re-simulate with signed entries and re-check the footprint
        let envelope =
            build_simulation_envelope(build_invoke_operation(invoke_args, signed.clone())?, self.clock.as_ref())?;
        let simulation = rpc.simulate_transaction(&envelope).await?;
        if let Some(data) = &simulation.transaction_data {
            verify_footprint(data, &allowed)?;
        }

        // Step 8: exchange the signed entries for a session token
        let signed_xdr = VecM::<SorobanAuthorizationEntry>::try_from(signed)
            .map_err(|_| SdpWalletError::Xdr("Too many authorization entries".to_string()))?
            .to_xdr_base64(Limits::none())?;

        let builder = self
            .client
            .external_request(Method::POST, endpoint)?
            .form(&[("authorization_entries", signed_xdr.as_str())]);
        let response: TokenResponse = self.client.send_json(builder).await?;

        let token = response.token.ok_or_else(|| {
            SdpWalletError::InvalidResponse("SEP-45 token response lacks a token".to_string())
        })?;

        // Step 9: the wallet session is now live
        self.client
            .session_tokens()
            .set_token(AuthType::Wallet, token.clone());
        tracing::info!(account = contract_addr, "SEP-45 authentication completed");

        Ok(token)
    }
}

/// `host[:port]` of an absolute URL
fn domain_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed.host_str().ok_or_else(|| {
        SdpWalletError::Config(format!("Web-auth endpoint {url} has no host"))
    })?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// The key/value pairs the challenge's first argument must bind
fn expected_bindings(
    account: &str,
    home_domain: &str,
    web_auth_domain: &str,
    server_signing_key: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("account", account.to_string()),
        ("home_domain", home_domain.to_string()),
        ("web_auth_domain", web_auth_domain.to_string()),
        ("web_auth_domain_account", server_signing_key.to_string()),
    ]
}

/// Reject any challenge entry that does not invoke exactly
/// `web_auth_verify` on the expected contract with the expected bindings.
fn validate_challenge_entry(
    entry: &SorobanAuthorizationEntry,
    web_auth_contract: &ScAddress,
    expected: &[(&'static str, String)],
) -> Result<()> {
    if !entry.root_invocation.sub_invocations.is_empty() {
        return Err(SdpWalletError::ProtocolValidation(
            "SEP-45 challenge entry carries sub-invocations".to_string(),
        ));
    }

    let args = match &entry.root_invocation.function {
        SorobanAuthorizedFunction::ContractFn(args) => args,
        other => {
            return Err(SdpWalletError::ProtocolValidation(format!(
                "SEP-45 challenge entry invokes a non-contract function: {other:?}"
            )));
        }
    };

    if &args.contract_address != web_auth_contract {
        return Err(SdpWalletError::ProtocolValidation(format!(
            "SEP-45 challenge entry targets unexpected contract {:?}",
            args.contract_address
        )));
    }

    if args.function_name.to_utf8_string_lossy() != WEB_AUTH_FUNCTION {
        return Err(SdpWalletError::ProtocolValidation(format!(
            "SEP-45 challenge entry invokes {} instead of {WEB_AUTH_FUNCTION}",
            args.function_name.to_utf8_string_lossy()
        )));
    }

    let bindings = match args.args.first() {
        Some(ScVal::Map(Some(map))) => map,
        _ => {
            return Err(SdpWalletError::ProtocolValidation(
                "SEP-45 challenge entry's first argument is not a map".to_string(),
            ));
        }
    };

    for (key, value) in expected {
        let bound = bindings.iter().find_map(|pair| match (&pair.key, &pair.val) {
            (ScVal::Symbol(symbol), ScVal::String(string))
                if symbol.to_utf8_string_lossy() == *key =>
            {
                Some(string.to_utf8_string_lossy())
            }
            _ => None,
        });

        match bound {
            Some(bound) if bound == *value => {}
            Some(bound) => {
                return Err(SdpWalletError::ProtocolValidation(format!(
                    "SEP-45 challenge binds {key} to {bound:?}, expected {value:?}"
                )));
            }
            None => {
                return Err(SdpWalletError::ProtocolValidation(format!(
                    "SEP-45 challenge is missing the {key} binding"
                )));
            }
        }
    }

    Ok(())
}

/// Original invocation arguments of a challenge entry, for rebuilding the
/// simulation operation
fn entry_invoke_args(entry: &SorobanAuthorizationEntry) -> Result<InvokeContractArgs> {
    match &entry.root_invocation.function {
        SorobanAuthorizedFunction::ContractFn(args) => Ok(args.clone()),
        other => Err(SdpWalletError::ProtocolValidation(format!(
            "SEP-45 challenge entry invokes a non-contract function: {other:?}"
        ))),
    }
}
