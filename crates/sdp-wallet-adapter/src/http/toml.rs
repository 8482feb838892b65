/*
[INPUT]:  Required field names and the home domain's stellar.toml
[OUTPUT]: Resolved field values, or one error naming every missing field
[POS]:    HTTP layer - well-known configuration resolution
[UPDATE]: When flows require new stellar.toml fields
*/

use std::collections::HashMap;

use reqwest::Method;

use crate::http::{Result, SdpClient, SdpWalletError};

/// SEP-10/45 signing key of the anchor
pub const SIGNING_KEY: &str = "SIGNING_KEY";
/// Contract implementing `web_auth_verify`
pub const WEB_AUTH_CONTRACT_ID: &str = "WEB_AUTH_CONTRACT_ID";
/// SEP-45 challenge/token endpoint for contract accounts
pub const WEB_AUTH_FOR_CONTRACTS_ENDPOINT: &str = "WEB_AUTH_FOR_CONTRACTS_ENDPOINT";
/// SEP-24 transfer server URL
pub const TRANSFER_SERVER_SEP0024: &str = "TRANSFER_SERVER_SEP0024";

impl SdpClient {
    /// Resolve required fields from the home domain's stellar.toml.
    ///
    /// GET `<scheme>://<home_domain>/.well-known/stellar.toml`
    ///
    /// Fetched once per call, never cached here. All missing fields are
    /// reported together rather than failing on the first. String values get
    /// a single trailing slash trimmed; other values are stringified.
    pub async fn resolve_toml_fields(
        &self,
        required_fields: &[&str],
    ) -> Result<HashMap<String, String>> {
        let home_domain = self.home_domain()?;
        let url = format!(
            "{}://{}/.well-known/stellar.toml",
            self.api_scheme(),
            home_domain
        );

        tracing::debug!(url = %url, "Resolving stellar.toml");

        let builder = self.external_request(Method::GET, &url)?;
        let body = self.send_text(builder).await?;

        let document: toml::Value = toml::from_str(&body).map_err(|e| {
            SdpWalletError::InvalidResponse(format!("Invalid stellar.toml at {url}: {e}"))
        })?;

        let mut resolved = HashMap::new();
        let mut missing = Vec::new();

        for &field in required_fields {
            match document.get(field) {
                Some(value) => {
                    resolved.insert(field.to_string(), stringify_field(value));
                }
                None => missing.push(field),
            }
        }

        if !missing.is_empty() {
            return Err(SdpWalletError::Config(format!(
                "stellar.toml at {} is missing required fields: {}",
                home_domain,
                missing.join(", ")
            )));
        }

        Ok(resolved)
    }
}

fn stringify_field(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.strip_suffix('/').unwrap_or(s).to_string(),
        other => other.to_string(),
    }
}
