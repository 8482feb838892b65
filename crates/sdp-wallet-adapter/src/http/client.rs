/*
[INPUT]:  HTTP configuration (API base URL, tenant, timeouts, dev mode)
[OUTPUT]: Configured reqwest client ready for API and relay calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::auth::SessionTokenStore;
use crate::http::{Result, SdpWalletError};
use crate::types::AuthType;

/// Default ledger buffer added to the latest ledger when signing SEP-45
/// challenge entries
pub const DEFAULT_SEP45_EXPIRATION_LEDGERS: u32 = 60;

/// Default ledger buffer added to the simulation ledger when signing payment
/// authorization entries
pub const DEFAULT_PAYMENT_EXPIRATION_LEDGERS: u32 = 10;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct SdpConfig {
    /// Base URL of the SDP API gateway (RPC proxy and relay live under it)
    pub api_base_url: String,
    /// Tenant name attached to every authenticated request
    pub tenant_name: Option<String>,
    /// Allow plaintext HTTP endpoints (local development only)
    pub dev_mode: bool,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Interval between sponsored-transaction status polls
    pub relay_poll_interval: Duration,
    /// Attempt budget before polling gives up with a timeout error
    pub relay_poll_attempts: u32,
    /// Signature-expiration buffer for the SEP-45 flow, in ledgers
    pub sep45_expiration_ledgers: u32,
    /// Signature-expiration buffer for the payment flow, in ledgers
    pub payment_expiration_ledgers: u32,
}

impl SdpConfig {
    /// Create a configuration with default timeouts and ledger buffers
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            tenant_name: None,
            dev_mode: false,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            relay_poll_interval: Duration::from_secs(2),
            relay_poll_attempts: 30,
            sep45_expiration_ledgers: DEFAULT_SEP45_EXPIRATION_LEDGERS,
            payment_expiration_ledgers: DEFAULT_PAYMENT_EXPIRATION_LEDGERS,
        }
    }
}

/// Main HTTP client for the SDP API gateway
#[derive(Debug, Clone)]
pub struct SdpClient {
    http_client: Client,
    api_base_url: Url,
    config: SdpConfig,
    tokens: SessionTokenStore,
}

impl SdpClient {
    /// Create a new client from a configuration.
    ///
    /// Rejects plaintext HTTP base URLs unless `dev_mode` is set.
    pub fn new(config: SdpConfig) -> Result<Self> {
        let api_base_url = Url::parse(&config.api_base_url)?;

        if api_base_url.scheme() != "https" && !config.dev_mode {
            return Err(SdpWalletError::Config(format!(
                "Insecure API base URL {} requires dev mode",
                config.api_base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_base_url,
            config,
            tokens: SessionTokenStore::new(),
        })
    }

    /// Get the active configuration
    pub fn config(&self) -> &SdpConfig {
        &self.config
    }

    /// Underlying reqwest client, shared with derived channels
    pub(crate) fn http(&self) -> &Client {
        &self.http_client
    }

    /// API base URL as parsed at construction
    pub(crate) fn api_base(&self) -> &Url {
        &self.api_base_url
    }

    /// Session token store shared across clones of this client
    pub fn session_tokens(&self) -> &SessionTokenStore {
        &self.tokens
    }

    /// Home domain (`host[:port]`) derived from the API base URL
    pub fn home_domain(&self) -> Result<String> {
        host_with_port(&self.api_base_url).ok_or_else(|| {
            SdpWalletError::Config(format!(
                "API base URL {} has no host to derive a home domain from",
                self.api_base_url
            ))
        })
    }

    /// WebAuthn relying-party identifier: the registrable host, without port
    pub fn relying_party_id(&self) -> Result<String> {
        self.api_base_url
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| {
                SdpWalletError::Config(format!(
                    "API base URL {} has no host to use as a relying party",
                    self.api_base_url
                ))
            })
    }

    /// Scheme of the API base URL (https, or http in dev mode)
    pub(crate) fn api_scheme(&self) -> &str {
        self.api_base_url.scheme()
    }

    /// Bearer token for the given auth type, failing fast when absent
    pub(crate) fn require_token(&self, auth_type: AuthType) -> Result<String> {
        self.tokens
            .token(auth_type)
            .ok_or(SdpWalletError::AuthenticationRequired { auth_type })
    }

    /// Tenant name to attach, honoring a per-call override
    pub(crate) fn tenant_name(&self, tenant_override: Option<&str>) -> Option<String> {
        tenant_override
            .map(str::to_string)
            .or_else(|| self.config.tenant_name.clone())
    }

    /// Build full URL for API gateway endpoints
    fn api_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.api_base_url.join(endpoint)?)
    }

    /// Build request builder for unauthenticated API endpoints
    pub(crate) fn api_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.api_url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder for wallet-session endpoints (relay).
    ///
    /// Attaches the wallet bearer token and the tenant header.
    pub(crate) fn wallet_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let token = self.require_token(AuthType::Wallet)?;
        let mut builder = self.api_request(method, endpoint)?.bearer_auth(token);
        if let Some(tenant) = self.tenant_name(None) {
            builder = builder.header("SDP-Tenant-Name", tenant);
        }
        Ok(builder)
    }

    /// Build request builder for an absolute URL outside the API base
    /// (stellar.toml, SEP-45 auth endpoint)
    pub(crate) fn external_request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let url = Url::parse(url)?;
        if url.scheme() != "https" && !self.config.dev_mode {
            return Err(SdpWalletError::Config(format!(
                "Insecure endpoint {url} requires dev mode"
            )));
        }
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and deserialize a JSON body, mapping non-2xx statuses
    /// to an API error carrying the response text
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SdpWalletError::api_error(status, message));
        }

        Ok(response.json().await?)
    }

    /// Send a request and return the raw body text, mapping non-2xx statuses
    /// to an API error
    pub(crate) async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SdpWalletError::api_error(status, message));
        }

        Ok(response.text().await?)
    }
}

/// Host plus explicit port when one is present in the URL
fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_plaintext_base_url_outside_dev_mode() {
        let err = SdpClient::new(SdpConfig::new("http://localhost:8000")).unwrap_err();
        match err {
            SdpWalletError::Config(msg) => assert!(msg.contains("dev mode")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_allows_plaintext_base_url_in_dev_mode() {
        let mut config = SdpConfig::new("http://localhost:8000");
        config.dev_mode = true;
        assert!(SdpClient::new(config).is_ok());
    }

    #[test]
    fn test_home_domain_keeps_port() {
        let mut config = SdpConfig::new("http://localhost:8000");
        config.dev_mode = true;
        let client = SdpClient::new(config).unwrap();
        assert_eq!(client.home_domain().unwrap(), "localhost:8000");
        assert_eq!(client.relying_party_id().unwrap(), "localhost");
    }

    #[test]
    fn test_tenant_override_wins() {
        let mut config = SdpConfig::new("https://api.example.org");
        config.tenant_name = Some("default-org".to_string());
        let client = SdpClient::new(config).unwrap();

        assert_eq!(
            client.tenant_name(Some("other-org")),
            Some("other-org".to_string())
        );
        assert_eq!(client.tenant_name(None), Some("default-org".to_string()));
    }

    #[test]
    fn test_missing_wallet_token_fails_fast() {
        let client = SdpClient::new(SdpConfig::new("https://api.example.org")).unwrap();
        let err = client.require_token(AuthType::Wallet).unwrap_err();
        match err {
            SdpWalletError::AuthenticationRequired { auth_type } => {
                assert_eq!(auth_type, AuthType::Wallet);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
