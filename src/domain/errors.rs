//! Domain errors for the taskboard dashboard.

use thiserror::Error;

/// Domain-level errors surfaced by the query and session boundaries.
///
/// The period resolver and the aggregation engine are pure and never
/// produce these for well-formed input; anchor parsing is the one place a
/// pure component rejects input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Invalid date: {0} (expected yyyy-MM-dd)")]
    InvalidDate(String),

    #[error("Invalid view kind: {0} (expected day, week, month, quarter, half-year or year)")]
    InvalidViewKind(String),

    #[error("Failed to fetch schedule: {0}")]
    FetchFailed(String),

    #[error("{0}")]
    AuthExchangeFailed(String),

    #[error("Authorization denied: {0}")]
    AuthDenied(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("No period selected")]
    NoPeriodSelected,

    #[error("Session persistence error: {0}")]
    Persistence(String),
}

impl DashboardError {
    /// True when the error means the current credential is no longer honoured.
    pub fn is_auth_denied(&self) -> bool {
        matches!(self, Self::AuthDenied(_))
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_exchange_message_is_verbatim() {
        let err = DashboardError::AuthExchangeFailed("User account is disabled".to_string());
        assert_eq!(err.to_string(), "User account is disabled");
    }

    #[test]
    fn test_is_auth_denied() {
        assert!(DashboardError::AuthDenied("401".to_string()).is_auth_denied());
        assert!(!DashboardError::FetchFailed("boom".to_string()).is_auth_denied());
        assert!(!DashboardError::NotAuthenticated.is_auth_denied());
    }
}
