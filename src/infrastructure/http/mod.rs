//! Task store API adapters
//!
//! - `ApiClient`: shared reqwest client with per-request credential
//!   injection and the authorization-denied hook
//! - `HttpTaskRetrieval`: schedule and vocabulary endpoints
//! - `HttpIdentityGateway`: identity exchange, validation and refresh

pub mod client;
pub mod errors;
pub mod identity_api;
pub mod schedule_api;

pub use client::ApiClient;
pub use errors::ApiError;
pub use identity_api::HttpIdentityGateway;
pub use schedule_api::HttpTaskRetrieval;
