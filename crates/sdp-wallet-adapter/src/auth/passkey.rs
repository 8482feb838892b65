/*
[INPUT]:  Signing challenges and relying-party context
[OUTPUT]: WebAuthn assertions from the platform authenticator
[POS]:    Auth layer - passkey ceremony abstraction
[UPDATE]: When the assertion contract with the host platform changes
*/

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};

use crate::http::{Result, SdpWalletError};
use crate::types::UserVerification;

/// One WebAuthn "get assertion" request.
///
/// Mirrors the browser `navigator.credentials.get` options the host platform
/// ultimately receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRequest {
    /// base64url (no padding) challenge the authenticator signs over
    pub challenge: String,
    /// Relying-party identifier (registrable domain)
    pub relying_party_id: String,
    /// When set, restricts the ceremony to exactly this credential
    pub allowed_credential: Option<String>,
    pub user_verification: UserVerification,
}

/// Assertion produced by the authenticator; all fields base64url-encoded
#[derive(Debug, Clone)]
pub struct PasskeyAssertion {
    pub credential_id: String,
    pub client_data_json: String,
    pub authenticator_data: String,
    /// DER-encoded ECDSA P-256 signature
    pub signature: String,
}

/// Capability trait for the platform passkey ceremony.
///
/// The real implementation lives in the embedding host (a browser bridge or
/// OS authenticator). The trait is async because the ceremony suspends on
/// user interaction; a user cancellation surfaces as a signing-ceremony
/// error and is never retried here.
#[async_trait]
pub trait ChallengeSigner: Send + Sync {
    async fn get_assertion(&self, request: AssertionRequest) -> Result<PasskeyAssertion>;
}

/// Mock challenge signer for testing.
///
/// Replays a scripted assertion and records every request it receives.
#[derive(Debug, Clone)]
pub struct MockChallengeSigner {
    assertion: Option<PasskeyAssertion>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<AssertionRequest>>>,
}

impl MockChallengeSigner {
    /// Create a mock that answers every ceremony with the given assertion
    pub fn new(assertion: PasskeyAssertion) -> Self {
        Self {
            assertion: Some(assertion),
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that rejects every ceremony (user cancellation)
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            assertion: None,
            failure: Some(message.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far, in ceremony order
    pub fn requests(&self) -> Vec<AssertionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChallengeSigner for MockChallengeSigner {
    async fn get_assertion(&self, request: AssertionRequest) -> Result<PasskeyAssertion> {
        self.requests.lock().unwrap().push(request);

        if let Some(message) = &self.failure {
            return Err(SdpWalletError::SigningCeremony(message.clone()));
        }

        Ok(self.assertion.clone().expect("mock assertion configured"))
    }
}

/// Decode base64url with or without padding; authenticators differ
pub(crate) fn decode_base64url(value: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(value)
        .or_else(|_| URL_SAFE.decode(value))
        .map_err(|e| {
            SdpWalletError::SigningCeremony(format!("Invalid base64url in assertion: {e}"))
        })
}
