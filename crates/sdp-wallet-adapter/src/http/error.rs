/*
[INPUT]:  Error sources (HTTP, RPC, XDR, validation, signing ceremony)
[OUTPUT]: Structured error types with stage context and machine-readable codes
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::AuthType;

/// Main error type for the SDP wallet adapter
#[derive(Error, Debug)]
pub enum SdpWalletError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Required configuration is missing (e.g. stellar.toml fields)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No session token is available for the requested auth type
    #[error("No {auth_type} session token available, please authenticate")]
    AuthenticationRequired { auth_type: AuthType },

    /// Caller-supplied input failed validation (destination, amount, asset)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transaction simulation failed or returned an unusable result
    #[error("Simulation error ({code}): {message}")]
    Simulation { code: &'static str, message: String },

    /// SEP-45 challenge arguments or ledger footprint failed verification.
    /// Indicates a compromised or misconfigured server; never proceed.
    #[error("Protocol validation failed: {0}")]
    ProtocolValidation(String),

    /// The WebAuthn ceremony was cancelled, timed out, or found no credential
    #[error("Signing ceremony failed: {0}")]
    SigningCeremony(String),

    /// The relay reported a terminal FAILED status for this submission
    #[error("Transaction failed ({code}){}", .transaction_hash.as_deref().map(|h| format!(", hash {h}")).unwrap_or_default())]
    TransactionFailed {
        code: &'static str,
        transaction_hash: Option<String>,
    },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// XDR encoding or decoding failed
    #[error("XDR error: {0}")]
    Xdr(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Relay polling exhausted its attempt budget without a terminal status
    #[error("Timed out waiting for sponsored transaction after {attempts} attempts")]
    Timeout { attempts: u32 },
}

impl SdpWalletError {
    /// Machine-readable code for code-tagged variants.
    ///
    /// Callers distinguish simulation and relay failures through this tag
    /// rather than matching variants directly.
    pub fn extras_code(&self) -> Option<&'static str> {
        match self {
            SdpWalletError::Simulation { code, .. } => Some(code),
            SdpWalletError::TransactionFailed { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Transaction hash carried by a relay failure, for block-explorer links
    pub fn transaction_hash(&self) -> Option<&str> {
        match self {
            SdpWalletError::TransactionFailed {
                transaction_hash, ..
            } => transaction_hash.as_deref(),
            _ => None,
        }
    }

    /// Whether the caller may usefully retry with a fresh flow invocation.
    ///
    /// Nothing inside this crate retries; the distinction only tells the
    /// caller whether to re-prompt (validation, simulation, ceremony) or to
    /// stop outright (missing config, missing session, protocol mismatch).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SdpWalletError::Validation(_)
                | SdpWalletError::Simulation { .. }
                | SdpWalletError::SigningCeremony(_)
                | SdpWalletError::TransactionFailed { .. }
        )
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        SdpWalletError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

impl From<stellar_xdr::curr::Error> for SdpWalletError {
    fn from(e: stellar_xdr::curr::Error) -> Self {
        SdpWalletError::Xdr(e.to_string())
    }
}

/// Result type alias for wallet adapter operations
pub type Result<T> = std::result::Result<T, SdpWalletError>;

/// Code tag for simulation failures, pre-signature
pub const SIMULATION_FAILED: &str = "SIMULATION_FAILED";

/// Code tag for relay failures, post-submission
pub const TRANSACTION_FAILED: &str = "TRANSACTION_FAILED";
