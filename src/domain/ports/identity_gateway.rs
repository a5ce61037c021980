//! Identity exchange and credential verification port.

use async_trait::async_trait;

use crate::domain::errors::DashboardResult;
use crate::domain::models::{BearerToken, Session};

/// Remote capability that issues and checks bearer credentials.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Exchange an external identity credential for a local session.
    ///
    /// # Errors
    /// `AuthExchangeFailed` with the server's explanation when rejected.
    async fn exchange(&self, external_token: &str) -> DashboardResult<Session>;

    /// Whether the server still honours `credential`.
    ///
    /// A rejection is `Ok(false)`; only transport trouble is an error.
    async fn validate(&self, credential: &BearerToken) -> DashboardResult<bool>;

    /// Trade the current credential for a fresh one, picking up role or
    /// status changes made since it was issued.
    async fn refresh(&self, credential: &BearerToken) -> DashboardResult<Session>;
}
