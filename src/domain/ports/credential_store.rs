//! Local persistence port for the signed-in session.

use crate::domain::errors::DashboardResult;
use crate::domain::models::PersistedSession;

/// Key/value style local storage for the credential and profile.
///
/// `save` and `clear` always act on both halves at once.
pub trait CredentialStore: Send + Sync {
    /// Read whatever is persisted; an empty record when nothing is.
    fn load(&self) -> DashboardResult<PersistedSession>;

    fn save(&self, record: &PersistedSession) -> DashboardResult<()>;

    /// Remove both halves. Succeeds when nothing is stored.
    fn clear(&self) -> DashboardResult<()>;
}
