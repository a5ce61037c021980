//! Domain models for the signed-in session.
//!
//! A session pairs the identity profile returned by the identity exchange
//! with the bearer credential that authorizes outbound requests.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Coarse permission class.
///
/// Roles the dashboard does not know are kept in [`Role::Other`] and are
/// denied everything by the access policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
    Other(String),
}

impl Role {
    /// Parse case-insensitively, as the store's role column is free text.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "staff" => Self::Staff,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Account status from the user roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    Enabled,
    Disabled,
}

impl AccountStatus {
    /// Anything other than "enabled" counts as disabled.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("enabled") {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccountStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccountStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Identity plus the role and status it was granted. This is the profile
/// persisted next to the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub identity: Identity,
    pub role: Role,
    pub status: AccountStatus,
}

/// Opaque bearer credential. Its `Debug` output never shows the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for an `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub profile: Profile,
    pub credential: BearerToken,
}

impl Session {
    pub fn new(profile: Profile, credential: BearerToken) -> Self {
        Self {
            profile,
            credential,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.profile.identity
    }

    pub fn role(&self) -> &Role {
        &self.profile.role
    }

    pub fn status(&self) -> AccountStatus {
        self.profile.status
    }
}

/// Lifecycle state of the session context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
        };
        f.write_str(s)
    }
}

/// What the local store holds. The two halves are written and cleared
/// together; a record with only one half is stale and gets discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<BearerToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl PersistedSession {
    pub fn from_session(session: &Session) -> Self {
        Self {
            credential: Some(session.credential.clone()),
            profile: Some(session.profile.clone()),
        }
    }

    /// Both halves present, in session form.
    pub fn into_session(self) -> Option<Session> {
        match (self.credential, self.profile) {
            (Some(credential), Some(profile)) if !credential.is_empty() => {
                Some(Session::new(profile, credential))
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.credential.is_none() && self.profile.is_none()
    }
}
