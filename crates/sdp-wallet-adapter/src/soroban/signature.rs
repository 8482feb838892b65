/*
[INPUT]:  DER-encoded ECDSA P-256 signatures from the authenticator
[OUTPUT]: 64-byte compact signatures with normalized (low) S
[POS]:    Soroban layer - WebAuthn signature conversion
[UPDATE]: When the contract's signature verification format changes
*/

use p256::ecdsa::Signature;

use crate::http::{Result, SdpWalletError};

/// Convert a DER-encoded P-256 signature to the 64-byte compact form the
/// wallet contract verifies against.
///
/// S is normalized to the low half of the curve order. Authenticators are
/// free to emit high-S signatures, but the contract rejects them, so the
/// normalization is mandatory.
pub fn der_to_compact(der: &[u8]) -> Result<[u8; 64]> {
    let signature = Signature::from_der(der).map_err(|e| {
        SdpWalletError::SigningCeremony(format!("Invalid DER signature from authenticator: {e}"))
    })?;

    let normalized = signature.normalize_s().unwrap_or(signature);

    let mut compact = [0u8; 64];
    compact.copy_from_slice(&normalized.to_bytes());
    Ok(compact)
}
