/*
[INPUT]:  Strkeys, decimal amounts, XDR structures from simulation
[OUTPUT]: Validated addresses, stroop amounts, envelopes, footprint checks
[POS]:    Soroban layer - XDR-level building blocks for the flows
[UPDATE]: When protocol-level encoding or validation rules change
*/

pub mod address;
pub mod amount;
pub mod asset;
pub mod footprint;
pub mod signature;
pub mod transaction;

use sha2::{Digest, Sha256};
use stellar_xdr::curr::Hash;

pub use transaction::{Clock, SystemClock};

/// Network identifier: SHA-256 of the network passphrase
pub fn network_id(network_passphrase: &str) -> Hash {
    let digest: [u8; 32] = Sha256::digest(network_passphrase.as_bytes()).into();
    Hash(digest)
}
