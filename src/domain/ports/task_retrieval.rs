//! Task retrieval port (trait) for dependency injection.
//!
//! One method per store endpoint. The schedule query client picks which one
//! to call; implementations only move data.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::errors::DashboardResult;
use crate::domain::models::{ScheduleMap, Task};

/// Read-only access to the scheduled-task store.
///
/// Implementations fail with `FetchFailed` on transport, status or decoding
/// problems and with `AuthDenied` when the store rejects the credential.
/// Multi-day methods return only dates that have tasks.
#[async_trait]
pub trait TaskRetrieval: Send + Sync {
    /// Tasks scheduled on a single date
    async fn tasks_on(&self, date: NaiveDate) -> DashboardResult<Vec<Task>>;

    /// Tasks for the Sunday-to-Saturday week containing `date`
    async fn tasks_for_week(&self, date: NaiveDate) -> DashboardResult<ScheduleMap>;

    /// Tasks for a calendar month (1-12)
    async fn tasks_for_month(&self, year: i32, month: u32) -> DashboardResult<ScheduleMap>;

    /// Tasks for a quarter (1-4)
    async fn tasks_for_quarter(&self, year: i32, quarter: u32) -> DashboardResult<ScheduleMap>;

    /// Tasks for a half-year (1 or 2)
    async fn tasks_for_half_year(&self, year: i32, half: u32) -> DashboardResult<ScheduleMap>;

    /// Tasks for a whole year
    async fn tasks_for_year(&self, year: i32) -> DashboardResult<ScheduleMap>;

    /// Tasks for an explicit inclusive range
    async fn tasks_between(&self, start: NaiveDate, end: NaiveDate)
        -> DashboardResult<ScheduleMap>;

    /// Department vocabulary
    async fn departments(&self) -> DashboardResult<Vec<String>>;

    /// Frequency vocabulary
    async fn frequencies(&self) -> DashboardResult<Vec<String>>;
}
