//! Session commands: login, logout, whoami, refresh and route checks.

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::cli::app::App;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Session, SessionState};
use crate::services::{visible_routes, NavItem};

#[derive(Debug, Serialize)]
pub struct SessionOutput {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub role: String,
    pub status: String,
    pub routes: Vec<NavItem>,
}

impl From<&Session> for SessionOutput {
    fn from(session: &Session) -> Self {
        let identity = session.identity();
        Self {
            email: identity.email.clone(),
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            role: session.role().to_string(),
            status: session.status().to_string(),
            routes: visible_routes(Some(session)),
        }
    }
}

impl CommandOutput for SessionOutput {
    fn to_human(&self) -> String {
        let who = if self.name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        };
        let mut lines = vec![
            format!("Signed in as {}", style(who).bold()),
            format!("Role: {}", self.role),
            format!("Status: {}", self.status),
        ];
        if !self.routes.is_empty() {
            lines.push(String::new());
            lines.push("Pages:".to_string());
            for item in &self.routes {
                lines.push(format!("  {:<10} {}", item.path, item.label));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct WhoamiOutput {
    pub state: SessionState,
    pub session: Option<SessionOutput>,
}

impl CommandOutput for WhoamiOutput {
    fn to_human(&self) -> String {
        match self.session {
            Some(ref session) => session.to_human(),
            None => "Not signed in. Run 'taskboard login' first.".to_string(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ActionOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for ActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct AccessOutput {
    pub route: String,
    pub allowed: bool,
    pub role: Option<String>,
}

impl CommandOutput for AccessOutput {
    fn to_human(&self) -> String {
        let verdict = if self.allowed {
            style("allowed").green().to_string()
        } else {
            style("denied").red().to_string()
        };
        match self.role {
            Some(ref role) => format!("{} is {verdict} for {role}", self.route),
            None => format!("{} is {verdict} (not signed in)", self.route),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn login(app: &App, token: &str, json_mode: bool) -> Result<()> {
    let session = app.sessions.login(token).await?;
    output(&SessionOutput::from(&session), json_mode);
    Ok(())
}

pub fn logout(app: &App, json_mode: bool) {
    app.sessions.logout();
    let out = ActionOutput {
        success: true,
        message: "Signed out.".to_string(),
    };
    output(&out, json_mode);
}

pub async fn whoami(app: &App, json_mode: bool) {
    let state = app.sessions.initialize().await;
    let out = WhoamiOutput {
        state,
        session: app.sessions.current().as_ref().map(SessionOutput::from),
    };
    output(&out, json_mode);
}

pub async fn refresh(app: &App, json_mode: bool) -> Result<()> {
    app.sessions.initialize().await;
    let session = app.sessions.refresh().await?;
    output(&SessionOutput::from(&session), json_mode);
    Ok(())
}

pub async fn access(app: &App, route: String, json_mode: bool) {
    app.sessions.initialize().await;
    let out = AccessOutput {
        allowed: app.sessions.can_access(&route),
        role: app.sessions.current().map(|s| s.role().to_string()),
        route,
    };
    output(&out, json_mode);
}
