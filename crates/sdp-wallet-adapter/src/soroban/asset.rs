/*
[INPUT]:  Asset code and optional issuer from the wallet balance context
[OUTPUT]: Classic asset descriptors and deterministic asset-contract ids
[POS]:    Soroban layer - asset resolution
[UPDATE]: When asset identification rules change
*/

use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    AccountId, AlphaNum4, AlphaNum12, Asset, AssetCode4, AssetCode12, ContractId,
    ContractIdPreimage, Hash,
    HashIdPreimage, HashIdPreimageContractId, Limits, PublicKey, ScAddress, Uint256, WriteXdr,
};
use stellar_strkey::Strkey;

use crate::http::{Result, SdpWalletError};
use crate::soroban::network_id;

/// Asset code of the network's native asset
const NATIVE_ASSET_CODE: &str = "XLM";

/// Resolve an asset code/issuer pair to a classic asset descriptor.
///
/// `XLM` maps to the native asset and ignores any supplied issuer. Every
/// other code requires an issuer account.
pub fn resolve_asset(asset_code: &str, asset_issuer: Option<&str>) -> Result<Asset> {
    if asset_code == NATIVE_ASSET_CODE {
        return Ok(Asset::Native);
    }

    let issuer = asset_issuer.ok_or_else(|| {
        SdpWalletError::Validation(format!("Asset {asset_code} requires an issuer"))
    })?;

    let issuer_bytes = match Strkey::from_string(issuer) {
        Ok(Strkey::PublicKeyEd25519(key)) => key.0,
        _ => {
            return Err(SdpWalletError::Validation(format!(
                "Invalid asset issuer: {issuer}"
            )));
        }
    };
    let issuer = AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(issuer_bytes)));

    match asset_code.len() {
        1..=4 => {
            let mut code = [0u8; 4];
            code[..asset_code.len()].copy_from_slice(asset_code.as_bytes());
            Ok(Asset::CreditAlphanum4(AlphaNum4 {
                asset_code: AssetCode4(code),
                issuer,
            }))
        }
        5..=12 => {
            let mut code = [0u8; 12];
            code[..asset_code.len()].copy_from_slice(asset_code.as_bytes());
            Ok(Asset::CreditAlphanum12(AlphaNum12 {
                asset_code: AssetCode12(code),
                issuer,
            }))
        }
        _ => Err(SdpWalletError::Validation(format!(
            "Invalid asset code: {asset_code}"
        ))),
    }
}

/// Deterministic Stellar Asset Contract id for an asset under a network.
///
/// SHA-256 of the `HashIdPreimage::ContractId` XDR with an asset preimage,
/// which is how the protocol itself derives SAC addresses.
pub fn asset_contract_id(asset: &Asset, network_passphrase: &str) -> Result<[u8; 32]> {
    let preimage = HashIdPreimage::ContractId(HashIdPreimageContractId {
        network_id: network_id(network_passphrase),
        contract_id_preimage: ContractIdPreimage::Asset(asset.clone()),
    });

    let preimage_xdr = preimage.to_xdr(Limits::none())?;
    Ok(Sha256::digest(&preimage_xdr).into())
}

/// Asset contract address ready to use as a `transfer` invocation target
pub fn asset_contract_address(asset: &Asset, network_passphrase: &str) -> Result<ScAddress> {
    Ok(ScAddress::Contract(ContractId(Hash(asset_contract_id(
        asset,
        network_passphrase,
    )?))))
}
