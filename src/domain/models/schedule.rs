//! Schedule maps and their department-grouped views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::task::Task;

/// Tasks keyed by date, in chronological order.
///
/// Dates with no tasks are absent rather than mapped to an empty list.
pub type ScheduleMap = BTreeMap<NaiveDate, Vec<Task>>;

/// Department restriction applied before grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentFilter {
    #[default]
    All,
    /// Exact, case-sensitive department name
    Only(String),
}

impl DepartmentFilter {
    /// Parse user input. The keyword "all" (any casing) or an empty string
    /// selects everything; anything else is taken verbatim.
    pub fn parse(input: &str) -> Self {
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(input.to_string())
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(department) => task.department == *department,
        }
    }
}

impl fmt::Display for DepartmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(department) => f.write_str(department),
        }
    }
}

/// Tasks of a single department on a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentGroup {
    pub department: String,
    pub tasks: Vec<Task>,
}

/// All department groups of one date, in first-seen department order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub departments: Vec<DepartmentGroup>,
}

impl DateGroup {
    pub fn task_count(&self) -> usize {
        self.departments.iter().map(|g| g.tasks.len()).sum()
    }

    pub fn department(&self, name: &str) -> Option<&DepartmentGroup> {
        self.departments.iter().find(|g| g.department == name)
    }

    /// Department names in display order.
    pub fn department_names(&self) -> Vec<&str> {
        self.departments.iter().map(|g| g.department.as_str()).collect()
    }
}

/// A schedule map partitioned by department within each date.
///
/// Never persisted; rebuilt whenever the data or the filter changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupedView {
    pub dates: Vec<DateGroup>,
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DateGroup> {
        self.dates.iter().find(|g| g.date == date)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateGroup> {
        self.dates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::task::Frequency;

    #[test]
    fn test_filter_parse() {
        assert_eq!(DepartmentFilter::parse("all"), DepartmentFilter::All);
        assert_eq!(DepartmentFilter::parse("ALL"), DepartmentFilter::All);
        assert_eq!(DepartmentFilter::parse(""), DepartmentFilter::All);
        assert_eq!(
            DepartmentFilter::parse("MEP"),
            DepartmentFilter::Only("MEP".to_string())
        );
    }

    #[test]
    fn test_filter_match_is_case_sensitive() {
        let task = Task::new(2, "Pump check", "MEP", Frequency::Daily);
        assert!(DepartmentFilter::All.matches(&task));
        assert!(DepartmentFilter::parse("MEP").matches(&task));
        assert!(!DepartmentFilter::parse("mep").matches(&task));
    }
}
