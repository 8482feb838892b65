/*
[INPUT]:  Session-scoped bearer token and Soroban JSON-RPC method calls
[OUTPUT]: Ledger state, network parameters, and simulation outcomes
[POS]:    HTTP layer - authenticated RPC proxy channel
[UPDATE]: When adding RPC methods or changing proxy headers
*/

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use stellar_xdr::curr::{Limits, ReadXdr, SorobanAuthorizationEntry, SorobanTransactionData};

use crate::http::error::SIMULATION_FAILED;
use crate::http::{Result, SdpClient, SdpWalletError};
use crate::types::AuthType;

/// JSON-RPC request wrapper. `params` is omitted entirely when `None`;
/// some methods (getLatestLedger) reject empty params objects.
#[derive(Debug, Serialize)]
struct RpcRequest<T: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<T>,
}

/// JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetLatestLedgerResult {
    sequence: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetNetworkResult {
    passphrase: String,
}

#[derive(Debug, Serialize)]
struct SimulateTransactionParams {
    transaction: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateTransactionResult {
    latest_ledger: u32,
    /// SorobanTransactionData XDR (base64) carrying the ledger footprint
    transaction_data: Option<String>,
    error: Option<String>,
    #[serde(default)]
    results: Vec<SimulateHostFunctionResult>,
}

#[derive(Debug, Deserialize)]
struct SimulateHostFunctionResult {
    auth: Option<Vec<String>>,
}

/// Decoded result of a successful `simulateTransaction` call
#[derive(Debug)]
pub struct SimulationOutcome {
    pub latest_ledger: u32,
    /// Authorization entries required by the simulated invocation
    pub auth_entries: Vec<SorobanAuthorizationEntry>,
    /// Resource footprint produced by simulation, when present
    pub transaction_data: Option<SorobanTransactionData>,
}

/// Authenticated channel to the Soroban RPC proxy.
///
/// The token is captured at construction; a channel is as short-lived as the
/// flow invocation that created it.
#[derive(Debug, Clone)]
pub struct RpcChannel {
    http_client: Client,
    endpoint: Url,
    token: String,
    tenant_name: Option<String>,
}

impl SdpClient {
    /// Build an RPC channel for the given auth type.
    ///
    /// POST `<api_base>/rpc/{user|wallet}` with `Authorization: Bearer` and
    /// `SDP-Tenant-Name` headers. Fails fast when no session token exists.
    pub fn rpc_channel(
        &self,
        auth_type: AuthType,
        tenant_override: Option<&str>,
    ) -> Result<RpcChannel> {
        let token = self.require_token(auth_type)?;
        let endpoint = self.api_base().join(&format!("rpc/{}", auth_type.as_str()))?;

        Ok(RpcChannel {
            http_client: self.http().clone(),
            endpoint,
            token,
            tenant_name: self.tenant_name(tenant_override),
        })
    }
}

impl RpcChannel {
    async fn rpc_request<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Option<P>,
    ) -> Result<R> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let mut builder = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&request);
        if let Some(tenant) = &self.tenant_name {
            builder = builder.header("SDP-Tenant-Name", tenant);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SdpWalletError::api_error(status, message));
        }

        let rpc_response: RpcResponse<R> = response.json().await?;

        if let Some(error) = rpc_response.error {
            return Err(SdpWalletError::Api {
                code: error.code as i32,
                message: format!("RPC {method} failed: {}", error.message),
            });
        }

        rpc_response.result.ok_or_else(|| {
            SdpWalletError::InvalidResponse(format!("RPC {method} returned an empty result"))
        })
    }

    /// Current ledger sequence number
    pub async fn get_latest_ledger(&self) -> Result<u32> {
        let result: GetLatestLedgerResult = self
            .rpc_request::<(), _>("getLatestLedger", None)
            .await?;
        Ok(result.sequence)
    }

    /// Passphrase of the network behind the RPC node
    pub async fn get_network_passphrase(&self) -> Result<String> {
        let result: GetNetworkResult = self.rpc_request::<(), _>("getNetwork", None).await?;
        Ok(result.passphrase)
    }

    /// Simulate a transaction envelope and decode the outcome.
    ///
    /// A simulation-level error is surfaced as a code-tagged simulation
    /// failure so callers can re-prompt instead of showing a generic error.
    pub async fn simulate_transaction(&self, envelope_xdr: &str) -> Result<SimulationOutcome> {
        let result: SimulateTransactionResult = self
            .rpc_request(
                "simulateTransaction",
                Some(SimulateTransactionParams {
                    transaction: envelope_xdr.to_string(),
                }),
            )
            .await?;

        if let Some(error) = result.error {
            return Err(SdpWalletError::Simulation {
                code: SIMULATION_FAILED,
                message: error,
            });
        }

        let mut auth_entries = Vec::new();
        if let Some(auth) = result.results.first().and_then(|r| r.auth.as_ref()) {
            for entry_xdr in auth {
                let entry =
                    SorobanAuthorizationEntry::from_xdr_base64(entry_xdr, Limits::none())?;
                auth_entries.push(entry);
            }
        }

        let transaction_data = match result.transaction_data {
            Some(data_xdr) => Some(SorobanTransactionData::from_xdr_base64(
                &data_xdr,
                Limits::none(),
            )?),
            None => None,
        };

        tracing::debug!(
            latest_ledger = result.latest_ledger,
            auth_entries = auth_entries.len(),
            has_transaction_data = transaction_data.is_some(),
            "Simulation completed"
        );

        Ok(SimulationOutcome {
            latest_ledger: result.latest_ledger,
            auth_entries,
            transaction_data,
        })
    }
}
