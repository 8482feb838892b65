/*
[INPUT]:  Simulated transaction data and the addresses a flow may touch
[OUTPUT]: Acceptance of the ledger footprint, or a protocol violation
[POS]:    Soroban layer - footprint allow-list verification
[UPDATE]: When the set of permitted ledger entry kinds changes
*/

use stellar_xdr::curr::{LedgerKey, ScVal, SorobanTransactionData};

use crate::http::{Result, SdpWalletError};
use crate::soroban::address::sc_address_to_string;

/// Verify every ledger key a simulation wants to read or write.
///
/// Contract-code keys pass unconditionally (restoration and TTL extension
/// touch them). Contract-data keys must belong to an allowed address and be
/// keyed by either a nonce or the contract-instance key. Everything else is
/// an unauthorized-access attempt and aborts the flow.
pub fn verify_footprint(
    transaction_data: &SorobanTransactionData,
    allowed_addresses: &[&str],
) -> Result<()> {
    let footprint = &transaction_data.resources.footprint;

    for key in footprint
        .read_only
        .iter()
        .chain(footprint.read_write.iter())
    {
        verify_ledger_key(key, allowed_addresses)?;
    }

    Ok(())
}

fn verify_ledger_key(key: &LedgerKey, allowed_addresses: &[&str]) -> Result<()> {
    match key {
        LedgerKey::ContractCode(_) => Ok(()),
        LedgerKey::ContractData(data) => {
            let owner = sc_address_to_string(&data.contract);
            if !allowed_addresses.contains(&owner.as_str()) {
                return Err(SdpWalletError::ProtocolValidation(format!(
                    "Footprint touches contract data of unexpected address {owner}"
                )));
            }

            match &data.key {
                ScVal::LedgerKeyNonce(_) | ScVal::LedgerKeyContractInstance => Ok(()),
                other => Err(SdpWalletError::ProtocolValidation(format!(
                    "Footprint touches unexpected contract-data key {other:?} of {owner}"
                ))),
            }
        }
        other => Err(SdpWalletError::ProtocolValidation(format!(
            "Footprint touches unexpected ledger entry kind {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_strkey::Strkey;
    use stellar_xdr::curr::{
        ContractDataDurability, ContractId, Hash, LedgerFootprint, LedgerKeyAccount,
        LedgerKeyContractCode, LedgerKeyContractData, ScAddress, ScNonceKey, SorobanResources,
        SorobanTransactionData, SorobanTransactionDataExt, AccountId, PublicKey, Uint256,
    };

    const WALLET_BYTES: [u8; 32] = [7; 32];
    const SERVER_BYTES: [u8; 32] = [9; 32];

    fn wallet_address() -> String {
        Strkey::Contract(stellar_strkey::Contract(WALLET_BYTES)).to_string()
    }

    fn server_address() -> String {
        Strkey::PublicKeyEd25519(stellar_strkey::ed25519::PublicKey(SERVER_BYTES)).to_string()
    }

    fn nonce_key(contract: ScAddress) -> LedgerKey {
        LedgerKey::ContractData(LedgerKeyContractData {
            contract,
            key: ScVal::LedgerKeyNonce(ScNonceKey { nonce: 42 }),
            durability: ContractDataDurability::Temporary,
        })
    }

    fn instance_key(contract: ScAddress) -> LedgerKey {
        LedgerKey::ContractData(LedgerKeyContractData {
            contract,
            key: ScVal::LedgerKeyContractInstance,
            durability: ContractDataDurability::Persistent,
        })
    }

    fn transaction_data(read_only: Vec<LedgerKey>, read_write: Vec<LedgerKey>) -> SorobanTransactionData {
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
    }

    #[test]
    fn test_accepts_allowed_footprint() {
        let wallet = wallet_address();
        let server = server_address();
        let data = transaction_data(
            vec![
                LedgerKey::ContractCode(LedgerKeyContractCode { hash: Hash([1; 32]) }),
                instance_key(ScAddress::Contract(ContractId(Hash(WALLET_BYTES)))),
            ],
            vec![nonce_key(ScAddress::Contract(ContractId(Hash(WALLET_BYTES))))],
        );

        verify_footprint(&data, &[&wallet, &server]).unwrap();
    }

    #[test]
    fn test_accepts_server_signing_key_entries() {
        let wallet = wallet_address();
        let server = server_address();
        let data = transaction_data(
            vec![nonce_key(ScAddress::Account(AccountId(
                PublicKey::PublicKeyTypeEd25519(Uint256(SERVER_BYTES)),
            )))],
            vec![],
        );

        verify_footprint(&data, &[&wallet, &server]).unwrap();
    }

    #[test]
    fn test_rejects_foreign_contract_data() {
        let wallet = wallet_address();
        let data = transaction_data(
            vec![nonce_key(ScAddress::Contract(ContractId(Hash([13; 32]))))],
            vec![],
        );

        let err = verify_footprint(&data, &[&wallet]).unwrap_err();
        assert!(matches!(err, SdpWalletError::ProtocolValidation(_)));
    }

    #[test]
    fn test_rejects_arbitrary_storage_key_of_allowed_address() {
        let wallet = wallet_address();
        let data = transaction_data(
            vec![LedgerKey::ContractData(LedgerKeyContractData {
                contract: ScAddress::Contract(ContractId(Hash(WALLET_BYTES))),
                key: ScVal::Symbol("Admin".as_bytes().to_vec().try_into().unwrap()),
                durability: ContractDataDurability::Persistent,
            })],
            vec![],
        );

        let err = verify_footprint(&data, &[&wallet]).unwrap_err();
        assert!(matches!(err, SdpWalletError::ProtocolValidation(_)));
    }

    #[test]
    fn test_rejects_account_ledger_entries() {
        let wallet = wallet_address();
        let data = transaction_data(
            vec![],
            vec![LedgerKey::Account(LedgerKeyAccount {
                account_id: AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(SERVER_BYTES))),
            })],
        );

        let err = verify_footprint(&data, &[&wallet]).unwrap_err();
        assert!(matches!(err, SdpWalletError::ProtocolValidation(_)));
    }
}
