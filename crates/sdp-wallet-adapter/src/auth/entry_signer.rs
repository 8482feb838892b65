/*
[INPUT]:  Authorization entries from simulation and a passkey ceremony
[OUTPUT]: Entries with embedded WebAuthn credentials, in input order
[POS]:    Auth layer - Soroban authorization-entry signing
[UPDATE]: When the credential encoding or signing preimage changes
*/

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    ContractId, Hash, HashIdPreimage, HashIdPreimageSorobanAuthorization, Limits, ScAddress,
    ScBytes, ScMap,
    ScMapEntry, ScSymbol, ScVal, SorobanAddressCredentials, SorobanAuthorizationEntry,
    SorobanAuthorizedInvocation, SorobanCredentials, WriteXdr,
};

use crate::auth::passkey::{AssertionRequest, ChallengeSigner, PasskeyAssertion, decode_base64url};
use crate::http::Result;
use crate::soroban::address::contract_id_bytes;
use crate::soroban::network_id;
use crate::soroban::signature::der_to_compact;
use crate::types::{SigningRequest, UserVerification};

/// Signs Soroban authorization entries with a passkey.
///
/// Only entries whose address credentials name the wallet's own contract are
/// signed; everything else passes through as an untouched clone. Input
/// entries are never mutated.
#[derive(Clone)]
pub struct SorobanAuthEntrySigner {
    challenge_signer: Arc<dyn ChallengeSigner>,
}

impl SorobanAuthEntrySigner {
    pub fn new(challenge_signer: Arc<dyn ChallengeSigner>) -> Self {
        Self { challenge_signer }
    }

    /// Sign every entry addressed to the wallet contract, one ceremony per
    /// entry, returning the full list in original order.
    pub async fn sign(&self, request: &SigningRequest) -> Result<Vec<SorobanAuthorizationEntry>> {
        let wallet_contract = contract_id_bytes(&request.contract_address)?;
        let network = network_id(&request.network_passphrase);

        let mut signed = Vec::with_capacity(request.auth_entries.len());
        for entry in &request.auth_entries {
            signed.push(
                self.sign_entry(entry, &wallet_contract, &network, request)
                    .await?,
            );
        }

        Ok(signed)
    }

    async fn sign_entry(
        &self,
        entry: &SorobanAuthorizationEntry,
        wallet_contract: &[u8; 32],
        network: &Hash,
        request: &SigningRequest,
    ) -> Result<SorobanAuthorizationEntry> {
        let mut entry = entry.clone();

        let credentials = match &entry.credentials {
            SorobanCredentials::Address(credentials)
                if is_wallet_contract(&credentials.address, wallet_contract) =>
            {
                credentials.clone()
            }
            // Not ours to sign; pass the clone through untouched
            _ => return Ok(entry),
        };

        let challenge = signing_challenge(
            network,
            credentials.nonce,
            request.signature_expiration_ledger,
            &entry.root_invocation,
        )?;

        tracing::debug!(
            nonce = credentials.nonce,
            expiration_ledger = request.signature_expiration_ledger,
            "Requesting passkey assertion for authorization entry"
        );

        let assertion = self
            .challenge_signer
            .get_assertion(AssertionRequest {
                challenge,
                relying_party_id: request.relying_party_id.clone(),
                allowed_credential: request.credential_id.clone(),
                user_verification: UserVerification::Required,
            })
            .await?;

        entry.credentials = SorobanCredentials::Address(SorobanAddressCredentials {
            address: credentials.address.clone(),
            nonce: credentials.nonce,
            signature_expiration_ledger: request.signature_expiration_ledger,
            signature: credential_sc_val(&assertion)?,
        });

        Ok(entry)
    }
}

fn is_wallet_contract(address: &ScAddress, wallet_contract: &[u8; 32]) -> bool {
    matches!(address, ScAddress::Contract(ContractId(Hash(bytes))) if bytes == wallet_contract)
}

/// WebAuthn challenge for one entry: base64url (no padding) of the SHA-256
/// hash of the Soroban authorization preimage
fn signing_challenge(
    network: &Hash,
    nonce: i64,
    signature_expiration_ledger: u32,
    invocation: &SorobanAuthorizedInvocation,
) -> Result<String> {
    let preimage = HashIdPreimage::SorobanAuthorization(HashIdPreimageSorobanAuthorization {
        network_id: network.clone(),
        nonce,
        signature_expiration_ledger,
        invocation: invocation.clone(),
    });

    let preimage_xdr = preimage.to_xdr(Limits::none())?;
    Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(&preimage_xdr)))
}

/// Credential map the wallet contract's `__check_auth` consumes.
/// Keys must stay in this (sorted) order.
fn credential_sc_val(assertion: &PasskeyAssertion) -> Result<ScVal> {
    let authenticator_data = decode_base64url(&assertion.authenticator_data)?;
    let client_data_json = decode_base64url(&assertion.client_data_json)?;
    let signature_der = decode_base64url(&assertion.signature)?;
    let compact_signature = der_to_compact(&signature_der)?;

    let map = ScMap::try_from(vec![
        credential_entry("authenticator_data", authenticator_data)?,
        credential_entry("client_data_json", client_data_json)?,
        credential_entry("signature", compact_signature.to_vec())?,
    ])?;

    Ok(ScVal::Map(Some(map)))
}

fn credential_entry(key: &str, value: Vec<u8>) -> Result<ScMapEntry> {
    Ok(ScMapEntry {
        key: ScVal::Symbol(ScSymbol::try_from(key.as_bytes().to_vec())?),
        val: ScVal::Bytes(ScBytes::try_from(value)?),
    })
}
