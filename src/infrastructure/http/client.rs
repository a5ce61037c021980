//! HTTP client for the task store API.
//!
//! Every request goes through [`ApiClient::execute`], which
//! 1. reads the current credential from the session context at send time
//!    and attaches it to that request only,
//! 2. classifies non-success statuses, and
//! 3. on 401/403 runs the session's logout transition.
//!
//! Call sites never attach headers or handle denial themselves.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::errors::ApiError;
use crate::domain::models::{ApiConfig, BearerToken};
use crate::services::session_store::SessionContext;

#[derive(Clone)]
pub struct ApiClient {
    /// Reusable HTTP client with connection pooling
    http: ReqwestClient,

    /// Base URL, without trailing slash
    base_url: String,

    /// Source of the credential and target of the denial hook
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Build a client for `config.base_url` bound to `session`.
    pub fn new(config: &ApiConfig, session: Arc<SessionContext>) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// GET `path` with the session credential.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path).query(query);
        self.execute(request, None).await
    }

    /// POST a JSON body to `path` with the session credential.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request, None).await
    }

    /// Send to `path` with an explicit credential instead of the session's.
    pub async fn send_with<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        credential: &BearerToken,
    ) -> Result<T, ApiError> {
        let request = self.request(method, path);
        self.execute(request, Some(credential.clone())).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: Option<BearerToken>,
    ) -> Result<T, ApiError> {
        let credential = credential.or_else(|| self.session.credential());
        let request = match &credential {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };

        let request = request.build()?;
        debug!(
            method = %request.method(),
            url = %request.url(),
            authorized = credential.is_some(),
            "sending request"
        );

        let response = self.http.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            let error = ApiError::from_status(status, body);
            if error.is_denial() {
                warn!(%status, "request denied, clearing session");
                self.session.revoke("authorization denied");
            }
            return Err(error);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
