/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public SDP wallet adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod soroban;
pub mod types;
pub mod wallet;

// Re-export commonly used types from auth
pub use auth::{
    AssertionRequest,
    ChallengeSigner,
    MockChallengeSigner,
    PasskeyAssertion,
    Sep45AuthenticationFlow,
    SessionTokenStore,
    SorobanAuthEntrySigner,
};

// Re-export commonly used types from http
pub use http::{
    Result,
    RpcChannel,
    SdpClient,
    SdpConfig,
    SdpWalletError,
    SimulationOutcome,
};

// Re-export all shared types
pub use types::*;

// Re-export the payment flow
pub use wallet::{PaymentContext, PaymentParams, PaymentReceipt, WalletPaymentFlow};
