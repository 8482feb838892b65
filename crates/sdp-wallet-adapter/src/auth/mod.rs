/*
[INPUT]:  Session tokens, passkey ceremonies, and challenge entries
[OUTPUT]: Authenticated wallet sessions and signed authorization entries
[POS]:    Auth layer - module wiring
[UPDATE]: When adding authentication mechanisms
*/

pub mod entry_signer;
pub mod passkey;
pub mod sep45;
pub mod token;

pub use entry_signer::SorobanAuthEntrySigner;
pub use passkey::{AssertionRequest, ChallengeSigner, MockChallengeSigner, PasskeyAssertion};
pub use sep45::Sep45AuthenticationFlow;
pub use token::SessionTokenStore;
