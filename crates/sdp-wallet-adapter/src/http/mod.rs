/*
[INPUT]:  HTTP client configuration and gateway endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - API gateway, RPC proxy, relay, stellar.toml
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod relay;
pub mod rpc;
pub mod toml;

pub use client::{SdpClient, SdpConfig};
pub use error::{Result, SdpWalletError};
pub use rpc::{RpcChannel, SimulationOutcome};
