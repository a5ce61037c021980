//! View state of the schedule dashboard.
//!
//! The board owns the current selection, the last fetched schedule and the
//! grouped view derived from it. Every selection change bumps a generation
//! counter; when a fetch completes, its result is applied only if no newer
//! selection has been made in the meantime. Older answers are dropped even
//! when they arrive last.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{DepartmentFilter, GroupedView, Period, PeriodKind, ScheduleMap};
use crate::domain::ports::TaskRetrieval;
use crate::services::aggregation;
use crate::services::schedule_query::ScheduleQueryClient;

/// The period the user has picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub kind: PeriodKind,
    pub anchor: NaiveDate,
}

/// Everything a view needs to render the board.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardSnapshot {
    pub selection: Option<Selection>,
    pub department: DepartmentFilter,
    pub period: Option<Period>,
    pub schedule: ScheduleMap,
    pub view: GroupedView,
    pub total: usize,
    pub loading: bool,
    pub error: Option<String>,
}

/// Result of a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetch result is now on the board.
    Applied { total: usize },
    /// A newer selection was made before this fetch finished.
    Superseded,
}

pub struct ScheduleBoard<R: TaskRetrieval + ?Sized> {
    query: ScheduleQueryClient<R>,
    generation: AtomicU64,
    state: Mutex<BoardSnapshot>,
}

impl<R: TaskRetrieval + ?Sized> ScheduleBoard<R> {
    pub fn new(query: ScheduleQueryClient<R>) -> Self {
        Self {
            query,
            generation: AtomicU64::new(0),
            state: Mutex::new(BoardSnapshot::default()),
        }
    }

    /// Show the `kind` period containing `anchor`, keeping the department filter.
    pub async fn select(
        &self,
        kind: PeriodKind,
        anchor: NaiveDate,
    ) -> DashboardResult<FetchOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let period = Period::resolve(kind, anchor);

        {
            let mut state = self.lock();
            state.selection = Some(Selection { kind, anchor });
            state.loading = true;
        }

        debug!(generation, period = %period, "fetching schedule");
        let result = self.query.fetch(&period).await;

        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded schedule response");
            return Ok(FetchOutcome::Superseded);
        }

        state.loading = false;
        match result {
            Ok(schedule) => {
                state.view = aggregation::aggregate(&schedule, &state.department);
                state.total = aggregation::count(&state.view);
                state.schedule = schedule;
                state.period = Some(period);
                state.error = None;
                info!(total = state.total, "schedule applied");
                Ok(FetchOutcome::Applied { total: state.total })
            }
            Err(err) => {
                // No stale rows under a new period label.
                state.schedule = ScheduleMap::new();
                state.view = GroupedView::default();
                state.total = 0;
                state.period = Some(period);
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Step the current period by `steps` units of its kind.
    pub async fn shift(&self, steps: i32) -> DashboardResult<FetchOutcome> {
        let period = self
            .lock()
            .period
            .clone()
            .ok_or(DashboardError::NoPeriodSelected)?;
        let next = step(&period, steps)?;
        self.select(next.kind, next.start).await
    }

    /// Show the `kind` period `steps` units away from the one containing
    /// `anchor`. Only the target period is fetched.
    pub async fn select_shifted(
        &self,
        kind: PeriodKind,
        anchor: NaiveDate,
        steps: i32,
    ) -> DashboardResult<FetchOutcome> {
        let next = step(&Period::resolve(kind, anchor), steps)?;
        self.select(next.kind, next.start).await
    }

    /// Change the department filter and regroup the data already on the board.
    pub fn set_department(&self, filter: DepartmentFilter) -> usize {
        let mut state = self.lock();
        state.view = aggregation::aggregate(&state.schedule, &filter);
        state.total = aggregation::count(&state.view);
        state.department = filter;
        state.total
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BoardSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn step(period: &Period, steps: i32) -> DashboardResult<Period> {
    period.shift(steps).ok_or_else(|| {
        DashboardError::InvalidDate(format!("cannot move {steps} from {}", period.label))
    })
}
