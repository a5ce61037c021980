//! Recurring-task records as delivered by the task store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// How often a task recurs.
///
/// The store owns this vocabulary. Values outside the known set are kept
/// verbatim in [`Frequency::Other`] so new entries never break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
    Other(String),
}

impl Frequency {
    /// Canonical label, as the store spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::HalfYearly => "Half-Yearly",
            Self::Yearly => "Yearly",
            Self::Other(s) => s,
        }
    }

    /// Parse a label case-insensitively. Never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            "half-yearly" => Self::HalfYearly,
            "yearly" => Self::Yearly,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A recurring task row. Read-only from the dashboard's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Row number in the backing sheet; the record's external identity.
    /// Zero when the store leaves it blank.
    #[serde(default, deserialize_with = "row_or_zero")]
    pub row_number: u32,

    /// What has to be done
    pub activity: String,

    /// Owning department, compared case-sensitively
    pub department: String,

    pub frequency: Frequency,

    /// Times per occurrence (at least 1)
    #[serde(default = "default_no_of_times", deserialize_with = "times_or_one")]
    pub no_of_times: u32,

    /// Fixed calendar dates such as "October 1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_dates: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

const fn default_no_of_times() -> u32 {
    1
}

// Blank sheet cells arrive as explicit nulls.
fn row_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

fn times_or_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?
        .filter(|n| *n >= 1)
        .unwrap_or_else(default_no_of_times))
}

impl Task {
    /// Build a task with the required fields; optional fields start empty.
    pub fn new(
        row_number: u32,
        activity: impl Into<String>,
        department: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            row_number,
            activity: activity.into(),
            department: department.into(),
            frequency,
            no_of_times: 1,
            specific_dates: None,
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}
