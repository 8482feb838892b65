/*
[INPUT]:  Strkey-encoded account and contract addresses
[OUTPUT]: Validated ScAddress values and canonical strkey strings
[POS]:    Soroban layer - address parsing and validation
[UPDATE]: When supported address kinds change
*/

use stellar_strkey::Strkey;
use stellar_xdr::curr::{AccountId, ContractId, Hash, PublicKey, ScAddress, Uint256};

use crate::http::{Result, SdpWalletError};

/// Parse a payment destination: an Ed25519 public key (G...) or a contract
/// address (C...). Anything else - wrong length, bad checksum, other strkey
/// kinds - is rejected.
pub fn parse_destination(destination: &str) -> Result<ScAddress> {
    match Strkey::from_string(destination) {
        Ok(Strkey::PublicKeyEd25519(key)) => Ok(ScAddress::Account(AccountId(
            PublicKey::PublicKeyTypeEd25519(Uint256(key.0)),
        ))),
        Ok(Strkey::Contract(contract)) => Ok(ScAddress::Contract(ContractId(Hash(contract.0)))),
        _ => Err(SdpWalletError::Validation(format!(
            "Invalid destination address: {destination}"
        ))),
    }
}

/// Parse a contract address (C...) into its 32 raw bytes
pub fn contract_id_bytes(contract_address: &str) -> Result<[u8; 32]> {
    match Strkey::from_string(contract_address) {
        Ok(Strkey::Contract(contract)) => Ok(contract.0),
        _ => Err(SdpWalletError::Validation(format!(
            "Invalid contract address: {contract_address}"
        ))),
    }
}

/// Parse a contract address (C...) into an ScAddress
pub fn contract_address(contract_address: &str) -> Result<ScAddress> {
    Ok(ScAddress::Contract(ContractId(Hash(contract_id_bytes(
        contract_address,
    )?))))
}

/// Canonical strkey string for an ScAddress
pub fn sc_address_to_string(address: &ScAddress) -> String {
    match address {
        ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(bytes)))) => {
            Strkey::PublicKeyEd25519(stellar_strkey::ed25519::PublicKey(*bytes)).to_string()
        }
        ScAddress::Contract(ContractId(Hash(bytes))) => {
            Strkey::Contract(stellar_strkey::Contract(*bytes)).to_string()
        }
        other => other.to_string(),
    }
}
