//! Credentials management infrastructure
//!
//! Local storage of the signed-in session:
//! - `FileCredentialStore`: one JSON document in the state directory
//! - `InMemoryCredentialStore`: process-local, for tests and one-shot runs
//!
//! Both keep the credential and the profile in a single record so they are
//! always written and removed together.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::errors::DashboardResult;
use crate::domain::models::PersistedSession;
use crate::domain::ports::CredentialStore;

const SESSION_FILE: &str = "session.json";

/// Session record stored as `<state_dir>/session.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> DashboardResult<PersistedSession> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(PersistedSession::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, record: &PersistedSession) -> DashboardResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        // Write-then-rename so a crash never leaves half a record behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    fn clear(&self) -> DashboardResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    record: Mutex<PersistedSession>,
}

impl InMemoryCredentialStore {
    /// Copy of what is currently stored.
    pub fn snapshot(&self) -> PersistedSession {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> DashboardResult<PersistedSession> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &PersistedSession) -> DashboardResult<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = record.clone();
        Ok(())
    }

    fn clear(&self) -> DashboardResult<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = PersistedSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DashboardError;
    use crate::domain::models::{AccountStatus, BearerToken, Identity, Profile, Role};
    use tempfile::TempDir;

    fn record() -> PersistedSession {
        PersistedSession {
            credential: Some(BearerToken::new("jwt-abc")),
            profile: Some(Profile {
                identity: Identity {
                    email: "lena@example.com".to_string(),
                    name: "Lena".to_string(),
                    picture: None,
                },
                role: Role::Admin,
                status: AccountStatus::Enabled,
            }),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested"));

        store.save(&record()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), record());

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(DashboardError::Persistence(_))));
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryCredentialStore::default();
        store.save(&record()).unwrap();
        assert_eq!(store.load().unwrap(), record());
        store.clear().unwrap();
        assert!(store.snapshot().is_empty());
    }
}
