//! Task-master vocabulary: departments and frequencies.

use anyhow::Result;
use serde::Serialize;

use crate::cli::app::App;
use crate::cli::output::{output, CommandOutput};

#[derive(Debug, Serialize)]
pub struct VocabularyOutput {
    pub kind: &'static str,
    pub values: Vec<String>,
}

impl CommandOutput for VocabularyOutput {
    fn to_human(&self) -> String {
        if self.values.is_empty() {
            return format!("No {} found.", self.kind);
        }
        let mut lines = vec![format!("{} {}:", self.values.len(), self.kind)];
        lines.extend(self.values.iter().map(|v| format!("  {v}")));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn departments(app: &App, json_mode: bool) -> Result<()> {
    app.require_access("/").await?;
    let out = VocabularyOutput {
        kind: "departments",
        values: app.query.departments().await?,
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn frequencies(app: &App, json_mode: bool) -> Result<()> {
    app.require_access("/").await?;
    let out = VocabularyOutput {
        kind: "frequencies",
        values: app.query.frequencies().await?,
    };
    output(&out, json_mode);
    Ok(())
}
