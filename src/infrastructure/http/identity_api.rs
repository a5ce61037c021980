//! Identity exchange, validation and refresh over the `/auth` endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::client::ApiClient;
use super::errors::ApiError;
use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{AccountStatus, BearerToken, Identity, Profile, Role, Session};
use crate::domain::ports::IdentityGateway;
use crate::services::session_store::LOGIN_FAILED_MESSAGE;

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    token: &'a str,
}

/// Body of a successful exchange or refresh.
#[derive(Debug, Deserialize)]
struct IssuedCredential {
    token: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    role: Role,
    status: AccountStatus,
}

impl From<IssuedCredential> for Session {
    fn from(issued: IssuedCredential) -> Self {
        Self::new(
            Profile {
                identity: Identity {
                    email: issued.email,
                    name: issued.name.unwrap_or_default(),
                    picture: issued.picture.filter(|p| !p.is_empty()),
                },
                role: issued.role,
                status: issued.status,
            },
            BearerToken::new(issued.token),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    #[serde(default)]
    valid: bool,
}

/// [`IdentityGateway`] backed by the store's REST API.
#[derive(Debug, Clone)]
pub struct HttpIdentityGateway {
    client: ApiClient,
}

impl HttpIdentityGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    #[instrument(skip_all)]
    async fn exchange(&self, external_token: &str) -> DashboardResult<Session> {
        let request = ExchangeRequest {
            token: external_token,
        };
        match self
            .client
            .post_json::<_, IssuedCredential>("/auth/google", &request)
            .await
        {
            Ok(issued) => Ok(issued.into()),
            Err(ApiError::NetworkError(err)) => Err(DashboardError::FetchFailed(err.to_string())),
            Err(err) => Err(DashboardError::AuthExchangeFailed(
                err.server_message()
                    .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
            )),
        }
    }

    #[instrument(skip_all)]
    async fn validate(&self, credential: &BearerToken) -> DashboardResult<bool> {
        match self
            .client
            .send_with::<ValidationResponse>(Method::GET, "/auth/validate", credential)
            .await
        {
            Ok(response) => Ok(response.valid),
            Err(err) if err.is_denial() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip_all)]
    async fn refresh(&self, credential: &BearerToken) -> DashboardResult<Session> {
        let issued = self
            .client
            .send_with::<IssuedCredential>(Method::POST, "/auth/refresh", credential)
            .await?;
        Ok(issued.into())
    }
}
