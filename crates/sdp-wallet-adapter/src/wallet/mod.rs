/*
[INPUT]:  Wallet-facing operations
[OUTPUT]: Payment pipeline entry points
[POS]:    Wallet layer - module wiring
[UPDATE]: When adding wallet flows
*/

pub mod payment;

pub use payment::{PaymentContext, PaymentParams, PaymentReceipt, WalletPaymentFlow};
