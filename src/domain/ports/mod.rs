//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters must implement:
//! - TaskRetrieval: read access to the scheduled-task store
//! - IdentityGateway: identity exchange, validation and refresh
//! - CredentialStore: local persistence of the signed-in session
//!
//! Services depend on these traits, never on concrete adapters.

pub mod credential_store;
pub mod identity_gateway;
pub mod task_retrieval;

pub use credential_store::CredentialStore;
pub use identity_gateway::IdentityGateway;
pub use task_retrieval::TaskRetrieval;
