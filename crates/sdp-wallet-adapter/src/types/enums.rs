/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Which session token backs an authenticated request.
///
/// The platform keeps two distinct sessions: the dashboard user session and
/// the embedded wallet session. They are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    User,
    Wallet,
}

impl AuthType {
    /// Path segment used to namespace the RPC proxy endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::User => "user",
            AuthType::Wallet => "wallet",
        }
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle states reported by the sponsored-transaction relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SponsoredTransactionStatus {
    Pending,
    Processing,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl SponsoredTransactionStatus {
    /// Terminal statuses stop the polling loop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SponsoredTransactionStatus::Success | SponsoredTransactionStatus::Failed
        )
    }
}

/// WebAuthn user-verification requirement passed to the ceremony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    Required,
    Preferred,
    Discouraged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_type_path_segment() {
        assert_eq!(AuthType::User.as_str(), "user");
        assert_eq!(AuthType::Wallet.as_str(), "wallet");
    }

    #[test]
    fn test_status_terminal() {
        assert!(SponsoredTransactionStatus::Success.is_terminal());
        assert!(SponsoredTransactionStatus::Failed.is_terminal());
        assert!(!SponsoredTransactionStatus::Pending.is_terminal());
        assert!(!SponsoredTransactionStatus::Processing.is_terminal());
    }

    #[test]
    fn test_status_deserialization() {
        let status: SponsoredTransactionStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(status, SponsoredTransactionStatus::Pending);

        let status: SponsoredTransactionStatus = serde_json::from_str("\"REVIEWING\"").unwrap();
        assert_eq!(status, SponsoredTransactionStatus::Unknown);
    }
}
