//! Schedule query client.
//!
//! Turns a resolved [`Period`] into exactly one call against the task store,
//! choosing the coarsest endpoint that covers the period, and checks the
//! answer before handing it on. A fetch either yields a complete
//! [`ScheduleMap`] or an error; there are no partial results.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{CalendarKey, Period, ScheduleMap};
use crate::domain::ports::TaskRetrieval;

pub struct ScheduleQueryClient<R: TaskRetrieval + ?Sized> {
    retrieval: Arc<R>,
}

impl<R: TaskRetrieval + ?Sized> Clone for ScheduleQueryClient<R> {
    fn clone(&self) -> Self {
        Self {
            retrieval: Arc::clone(&self.retrieval),
        }
    }
}

impl<R: TaskRetrieval + ?Sized> ScheduleQueryClient<R> {
    pub fn new(retrieval: Arc<R>) -> Self {
        Self { retrieval }
    }

    /// Fetch every task scheduled within `period`.
    #[instrument(skip(self), fields(kind = %period.kind, label = %period.label))]
    pub async fn fetch(&self, period: &Period) -> DashboardResult<ScheduleMap> {
        let raw = match period.calendar_key() {
            CalendarKey::Date(date) => {
                let tasks = self.retrieval.tasks_on(date).await?;
                let mut map = ScheduleMap::new();
                map.insert(date, tasks);
                map
            }
            CalendarKey::Week(date) => self.retrieval.tasks_for_week(date).await?,
            CalendarKey::Month { year, month } => {
                self.retrieval.tasks_for_month(year, month).await?
            }
            CalendarKey::Quarter { year, quarter } => {
                self.retrieval.tasks_for_quarter(year, quarter).await?
            }
            CalendarKey::HalfYear { year, half } => {
                self.retrieval.tasks_for_half_year(year, half).await?
            }
            CalendarKey::Year(year) => self.retrieval.tasks_for_year(year).await?,
        };

        let map = confine(raw, period.start, period.end)?;
        debug!(dates = map.len(), "schedule fetched");
        Ok(map)
    }

    /// Fetch an explicit inclusive date range in one call.
    #[instrument(skip(self))]
    pub async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DashboardResult<ScheduleMap> {
        if start > end {
            return Err(DashboardError::InvalidDate(format!(
                "range start {start} is after end {end}"
            )));
        }
        let raw = self.retrieval.tasks_between(start, end).await?;
        confine(raw, start, end)
    }

    pub async fn departments(&self) -> DashboardResult<Vec<String>> {
        self.retrieval.departments().await
    }

    pub async fn frequencies(&self) -> DashboardResult<Vec<String>> {
        self.retrieval.frequencies().await
    }
}

/// Drop empty lists and reject dates outside `[start, end]`.
fn confine(raw: ScheduleMap, start: NaiveDate, end: NaiveDate) -> DashboardResult<ScheduleMap> {
    if let Some(stray) = raw.keys().find(|d| **d < start || **d > end) {
        warn!(%stray, %start, %end, "store returned a date outside the requested period");
        return Err(DashboardError::FetchFailed(format!(
            "store returned {stray}, outside {start} to {end}"
        )));
    }
    Ok(raw.into_iter().filter(|(_, tasks)| !tasks.is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Frequency, PeriodKind, Task};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Records which endpoint was hit and replays a canned map.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        canned: ScheduleMap,
        fail: bool,
    }

    impl RecordingStore {
        fn record(&self, call: String) -> DashboardResult<ScheduleMap> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(DashboardError::FetchFailed("connection refused".to_string()))
            } else {
                Ok(self.canned.clone())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskRetrieval for RecordingStore {
        async fn tasks_on(&self, date: NaiveDate) -> DashboardResult<Vec<Task>> {
            let map = self.record(format!("date/{date}"))?;
            Ok(map.get(&date).cloned().unwrap_or_default())
        }

        async fn tasks_for_week(&self, date: NaiveDate) -> DashboardResult<ScheduleMap> {
            self.record(format!("week/{date}"))
        }

        async fn tasks_for_month(&self, year: i32, month: u32) -> DashboardResult<ScheduleMap> {
            self.record(format!("month/{year}/{month}"))
        }

        async fn tasks_for_quarter(&self, year: i32, quarter: u32) -> DashboardResult<ScheduleMap> {
            self.record(format!("quarter/{year}/{quarter}"))
        }

        async fn tasks_for_half_year(&self, year: i32, half: u32) -> DashboardResult<ScheduleMap> {
            self.record(format!("half-year/{year}/{half}"))
        }

        async fn tasks_for_year(&self, year: i32) -> DashboardResult<ScheduleMap> {
            self.record(format!("year/{year}"))
        }

        async fn tasks_between(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> DashboardResult<ScheduleMap> {
            self.record(format!("range/{start}/{end}"))
        }

        async fn departments(&self) -> DashboardResult<Vec<String>> {
            Ok(vec!["MEP".to_string()])
        }

        async fn frequencies(&self) -> DashboardResult<Vec<String>> {
            Ok(vec!["Daily".to_string()])
        }
    }

    fn task(row: u32) -> Task {
        Task::new(row, "Water tank check", "MEP", Frequency::Weekly)
    }

    #[tokio::test]
    async fn test_each_kind_uses_one_matching_endpoint() {
        let anchor = date(2024, 8, 10);
        let cases = [
            (PeriodKind::Day, "date/2024-08-10"),
            (PeriodKind::Week, "week/2024-08-04"),
            (PeriodKind::Month, "month/2024/8"),
            (PeriodKind::Quarter, "quarter/2024/3"),
            (PeriodKind::HalfYear, "half-year/2024/2"),
            (PeriodKind::Year, "year/2024"),
        ];

        for (kind, expected) in cases {
            let store = Arc::new(RecordingStore::default());
            let client = ScheduleQueryClient::new(Arc::clone(&store));
            client
                .fetch(&Period::resolve(kind, anchor))
                .await
                .expect("fetch should succeed");
            assert_eq!(store.calls(), vec![expected.to_string()], "kind {kind}");
        }
    }

    #[tokio::test]
    async fn test_day_fetch_keys_the_list_by_date() {
        let mut canned = ScheduleMap::new();
        canned.insert(date(2024, 8, 10), vec![task(1), task(2)]);
        let store = Arc::new(RecordingStore {
            canned,
            ..Default::default()
        });
        let client = ScheduleQueryClient::new(store);

        let map = client
            .fetch(&Period::resolve(PeriodKind::Day, date(2024, 8, 10)))
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&date(2024, 8, 10)].len(), 2);
    }

    #[tokio::test]
    async fn test_empty_day_yields_empty_map() {
        let client = ScheduleQueryClient::new(Arc::new(RecordingStore::default()));
        let map = client
            .fetch(&Period::resolve(PeriodKind::Day, date(2024, 8, 10)))
            .await
            .unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_empty_lists_are_dropped() {
        let mut canned = ScheduleMap::new();
        canned.insert(date(2024, 8, 5), vec![task(1)]);
        canned.insert(date(2024, 8, 6), vec![]);
        let client = ScheduleQueryClient::new(Arc::new(RecordingStore {
            canned,
            ..Default::default()
        }));

        let map = client
            .fetch(&Period::resolve(PeriodKind::Week, date(2024, 8, 10)))
            .await
            .unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![date(2024, 8, 5)]);
    }

    #[tokio::test]
    async fn test_date_outside_period_fails_whole_fetch() {
        let mut canned = ScheduleMap::new();
        canned.insert(date(2024, 8, 5), vec![task(1)]);
        canned.insert(date(2024, 9, 1), vec![task(2)]);
        let client = ScheduleQueryClient::new(Arc::new(RecordingStore {
            canned,
            ..Default::default()
        }));

        let result = client
            .fetch(&Period::resolve(PeriodKind::Month, date(2024, 8, 10)))
            .await;
        assert!(matches!(result, Err(DashboardError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = ScheduleQueryClient::new(Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        }));
        let result = client
            .fetch(&Period::resolve(PeriodKind::Year, date(2024, 8, 10)))
            .await;
        assert!(matches!(result, Err(DashboardError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_range_rejects_inverted_bounds() {
        let store = Arc::new(RecordingStore::default());
        let client = ScheduleQueryClient::new(Arc::clone(&store));
        let result = client.fetch_range(date(2024, 8, 10), date(2024, 8, 1)).await;
        assert!(matches!(result, Err(DashboardError::InvalidDate(_))));
        assert!(store.calls().is_empty());

        client
            .fetch_range(date(2024, 8, 1), date(2024, 8, 10))
            .await
            .unwrap();
        assert_eq!(store.calls(), vec!["range/2024-08-01/2024-08-10".to_string()]);
    }
}
