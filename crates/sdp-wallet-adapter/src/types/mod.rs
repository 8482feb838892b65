/*
[INPUT]:  Shared data definitions used across modules
[OUTPUT]: Typed models and enums for the wallet pipeline
[POS]:    Data layer - module wiring
[UPDATE]: When adding new shared types
*/

pub mod enums;
pub mod models;

pub use enums::{AuthType, SponsoredTransactionStatus, UserVerification};
pub use models::{SigningRequest, SponsoredTransactionRecord};
