//! Wiring of the HTTP adapters, the session store and the query client.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Utc};

use crate::domain::errors::DashboardError;
use crate::domain::models::{self, Config, Session, SessionState};
use crate::infrastructure::credentials::FileCredentialStore;
use crate::infrastructure::http::{ApiClient, HttpIdentityGateway, HttpTaskRetrieval};
use crate::services::{ScheduleBoard, ScheduleQueryClient, SessionContext, SessionStore};

/// Long-lived services a command runs against.
pub struct App {
    pub sessions: SessionStore<HttpIdentityGateway>,
    pub query: ScheduleQueryClient<HttpTaskRetrieval>,
    utc_offset: FixedOffset,
}

impl App {
    pub fn build(config: &Config) -> Result<Self> {
        let utc_offset = config
            .calendar
            .utc_offset()
            .context("calendar.utc_offset_minutes is out of range")?;

        let store = Arc::new(FileCredentialStore::new(&config.session.state_dir));
        let context = SessionContext::new(store);
        let client = ApiClient::new(&config.api, Arc::clone(&context))?;

        let gateway = Arc::new(HttpIdentityGateway::new(client.clone()));
        let retrieval = Arc::new(HttpTaskRetrieval::new(client));

        Ok(Self {
            sessions: SessionStore::new(context, gateway),
            query: ScheduleQueryClient::new(retrieval),
            utc_offset,
        })
    }

    /// A fresh board over the shared query client.
    pub fn board(&self) -> ScheduleBoard<HttpTaskRetrieval> {
        ScheduleBoard::new(self.query.clone())
    }

    /// Today's date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        models::today(self.utc_offset, Utc::now())
    }

    /// Restore the stored session and check it may open `route`.
    pub async fn require_access(&self, route: &str) -> Result<Session> {
        if self.sessions.initialize().await != SessionState::Authenticated {
            return Err(DashboardError::NotAuthenticated.into());
        }
        let session = self
            .sessions
            .current()
            .ok_or(DashboardError::NotAuthenticated)?;
        if !self.sessions.can_access(route) {
            return Err(DashboardError::AuthDenied(format!(
                "{} may not open {route}",
                session.role()
            ))
            .into());
        }
        Ok(session)
    }
}
