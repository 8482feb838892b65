/*
[INPUT]:  API schema definitions and pipeline state
[OUTPUT]: Typed models for signing and relay tracking
[POS]:    Data layer - type definitions shared across flows
[UPDATE]: When API schema changes or new types added
*/

use serde::Deserialize;
use stellar_xdr::curr::SorobanAuthorizationEntry;

use crate::types::SponsoredTransactionStatus;

/// One signing operation over a batch of authorization entries.
///
/// Created transiently per call; never persisted. The entries are owned
/// values - the signer clones per entry and leaves the request intact.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// Entries produced by simulation, in submission order
    pub auth_entries: Vec<SorobanAuthorizationEntry>,
    /// The wallet's own contract address (C...)
    pub contract_address: String,
    /// Restrict the ceremony to this credential when present
    pub credential_id: Option<String>,
    /// Passphrase of the network the signature is valid on
    pub network_passphrase: String,
    /// WebAuthn relying-party identifier (registrable domain)
    pub relying_party_id: String,
    /// Ledger sequence after which the signatures expire
    pub signature_expiration_ledger: u32,
}

/// Record owned by the sponsored-transaction relay; the adapter only reads it
#[derive(Debug, Clone, Deserialize)]
pub struct SponsoredTransactionRecord {
    pub id: String,
    pub status: SponsoredTransactionStatus,
    #[serde(rename = "transaction_hash")]
    pub transaction_hash: Option<String>,
}
