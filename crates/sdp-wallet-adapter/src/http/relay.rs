/*
[INPUT]:  Serialized operations and relay tracking ids
[OUTPUT]: Sponsored-transaction submission and terminal status records
[POS]:    HTTP layer - sponsored-transaction relay endpoints
[UPDATE]: When relay endpoints or status polling cadence change
*/

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::error::TRANSACTION_FAILED;
use crate::http::{Result, SdpClient, SdpWalletError};
use crate::types::{SponsoredTransactionRecord, SponsoredTransactionStatus};

#[derive(Debug, Serialize)]
struct SubmitSponsoredTransactionRequest<'a> {
    operation_xdr: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitSponsoredTransactionResponse {
    id: String,
}

impl SdpClient {
    /// Submit a serialized operation to the sponsored-transaction relay.
    ///
    /// POST /sponsored-transactions
    pub async fn submit_sponsored_transaction(&self, operation_xdr: &str) -> Result<String> {
        let builder = self
            .wallet_request(Method::POST, "sponsored-transactions")?
            .json(&SubmitSponsoredTransactionRequest { operation_xdr });

        let response: SubmitSponsoredTransactionResponse = self.send_json(builder).await?;

        tracing::info!(id = %response.id, "Submitted sponsored transaction");
        Ok(response.id)
    }

    /// Fetch the current relay record for a submitted transaction.
    ///
    /// GET /sponsored-transactions/{id}
    pub async fn get_sponsored_transaction(&self, id: &str) -> Result<SponsoredTransactionRecord> {
        let builder = self.wallet_request(Method::GET, &format!("sponsored-transactions/{id}"))?;
        self.send_json(builder).await
    }

    /// Poll the relay until a terminal status or the attempt budget runs out.
    ///
    /// A FAILED record becomes a code-tagged error carrying the transaction
    /// hash so callers can link to a block explorer.
    pub async fn poll_sponsored_transaction(
        &self,
        id: &str,
    ) -> Result<SponsoredTransactionRecord> {
        let attempts = self.config().relay_poll_attempts;
        let interval = self.config().relay_poll_interval;

        for attempt in 1..=attempts {
            let record = self.get_sponsored_transaction(id).await?;

            tracing::debug!(
                id = %id,
                attempt = attempt,
                status = ?record.status,
                "Polled sponsored transaction"
            );

            match record.status {
                SponsoredTransactionStatus::Success => return Ok(record),
                SponsoredTransactionStatus::Failed => {
                    return Err(SdpWalletError::TransactionFailed {
                        code: TRANSACTION_FAILED,
                        transaction_hash: record.transaction_hash,
                    });
                }
                _ => {}
            }

            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(SdpWalletError::Timeout { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::SdpConfig;
    use crate::types::AuthType;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn wallet_client(server: &MockServer) -> SdpClient {
        let mut config = SdpConfig::new(server.uri());
        config.dev_mode = true;
        config.relay_poll_interval = Duration::from_millis(10);
        config.relay_poll_attempts = 3;
        let client = SdpClient::new(config).unwrap();
        client.session_tokens().set_token(AuthType::Wallet, "wallet-jwt");
        client
    }

    #[tokio::test]
    async fn test_submit_posts_operation_xdr() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sponsored-transactions"))
            .and(header("Authorization", "Bearer wallet-jwt"))
            .and(body_json(serde_json::json!({ "operation_xdr": "AAAA" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "tx-1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = wallet_client(&server).await;
        assert_eq!(client.submit_sponsored_transaction("AAAA").await.unwrap(), "tx-1");
    }

    #[tokio::test]
    async fn test_poll_resolves_after_pending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sponsored-transactions/tx-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "tx-1",
                "status": "PENDING",
                "transaction_hash": null,
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sponsored-transactions/tx-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "tx-1",
                "status": "SUCCESS",
                "transaction_hash": "deadbeef",
            })))
            .mount(&server)
            .await;

        let client = wallet_client(&server).await;
        let record = client.poll_sponsored_transaction("tx-1").await.unwrap();
        assert_eq!(record.status, SponsoredTransactionStatus::Success);
        assert_eq!(record.transaction_hash.as_deref(), Some("deadbeef"));
    }

    #[tokio::test]
    async fn test_poll_surfaces_failure_with_hash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sponsored-transactions/tx-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "tx-2",
                "status": "FAILED",
                "transaction_hash": "abc123",
            })))
            .mount(&server)
            .await;

        let client = wallet_client(&server).await;
        let err = client.poll_sponsored_transaction("tx-2").await.unwrap_err();
        assert_eq!(err.extras_code(), Some("TRANSACTION_FAILED"));
        assert_eq!(err.transaction_hash(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_poll_times_out_after_attempt_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sponsored-transactions/tx-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "tx-3",
                "status": "PROCESSING",
                "transaction_hash": null,
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = wallet_client(&server).await;
        let err = client.poll_sponsored_transaction("tx-3").await.unwrap_err();
        assert!(matches!(err, SdpWalletError::Timeout { attempts: 3 }));
    }
}
