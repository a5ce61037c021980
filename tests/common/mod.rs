//! Common test utilities for integration tests
//!
//! Provides a mock task store server wired to a real HTTP client and a
//! session persisted in a temporary directory.

#![allow(dead_code)]

use std::sync::Arc;

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;

use taskboard::domain::models::{ApiConfig, PersistedSession, Session};
use taskboard::domain::ports::CredentialStore;
use taskboard::infrastructure::credentials::FileCredentialStore;
use taskboard::infrastructure::http::{ApiClient, HttpIdentityGateway, HttpTaskRetrieval};
use taskboard::services::{SessionContext, SessionStore};

pub const ID_TOKEN: &str = "google-id-token";
pub const BEARER: &str = "bearer-abc123";

/// A mock server, a client pointed at it and a session persisted on disk.
pub struct Harness {
    pub server: ServerGuard,
    pub state_dir: TempDir,
    pub store: Arc<FileCredentialStore>,
    pub context: Arc<SessionContext>,
    pub client: ApiClient,
}

impl Harness {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let state_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Arc::new(FileCredentialStore::new(state_dir.path()));
        let context = SessionContext::new(store.clone());
        let config = ApiConfig {
            base_url: server.url(),
            timeout_secs: 5,
        };
        let client = ApiClient::new(&config, Arc::clone(&context)).expect("client builds");

        Self {
            server,
            state_dir,
            store,
            context,
            client,
        }
    }

    pub fn sessions(&self) -> SessionStore<HttpIdentityGateway> {
        SessionStore::new(
            Arc::clone(&self.context),
            Arc::new(HttpIdentityGateway::new(self.client.clone())),
        )
    }

    /// A session store over the same state directory and server, as a
    /// second run of the binary would build it.
    pub fn second_process(&self) -> SessionStore<HttpIdentityGateway> {
        let store = Arc::new(FileCredentialStore::new(self.state_dir.path()));
        let context = SessionContext::new(store);
        let config = ApiConfig {
            base_url: self.server.url(),
            timeout_secs: 5,
        };
        let client = ApiClient::new(&config, Arc::clone(&context)).expect("client builds");
        SessionStore::new(context, Arc::new(HttpIdentityGateway::new(client)))
    }

    pub fn retrieval(&self) -> Arc<HttpTaskRetrieval> {
        Arc::new(HttpTaskRetrieval::new(self.client.clone()))
    }

    /// What the session file currently holds.
    pub fn persisted(&self) -> PersistedSession {
        self.store.load().expect("session file readable")
    }

    /// Mock a successful identity exchange for `role`.
    pub async fn mock_exchange(&mut self, role: &str, status: &str) -> Mock {
        self.server
            .mock("POST", "/auth/google")
            .match_body(Matcher::Json(json!({ "token": ID_TOKEN })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token": BEARER,
                    "email": "ravi@example.com",
                    "name": "Ravi Kumar",
                    "picture": "https://example.com/ravi.png",
                    "role": role,
                    "status": status,
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    /// Sign in through the mocked exchange.
    pub async fn sign_in(&mut self, role: &str) -> Session {
        let mock = self.mock_exchange(role, "Enabled").await;
        let session = self.sessions().login(ID_TOKEN).await.expect("login succeeds");
        mock.assert_async().await;
        session
    }
}

/// One task row as the store returns it.
pub fn task_json(row: u32, activity: &str, department: &str, frequency: &str) -> serde_json::Value {
    json!({
        "rowNumber": row,
        "activity": activity,
        "department": department,
        "frequency": frequency,
        "noOfTimes": 1,
    })
}
