//! Task retrieval over the store's `/schedule` and `/master` endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::instrument;

use super::client::ApiClient;
use crate::domain::errors::DashboardResult;
use crate::domain::models::{ScheduleMap, Task};
use crate::domain::ports::TaskRetrieval;

/// [`TaskRetrieval`] backed by the store's REST API.
#[derive(Debug, Clone)]
pub struct HttpTaskRetrieval {
    client: ApiClient,
}

impl HttpTaskRetrieval {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn schedule(&self, path: String) -> DashboardResult<ScheduleMap> {
        Ok(self.client.get_json(&path, &[]).await?)
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl TaskRetrieval for HttpTaskRetrieval {
    #[instrument(skip(self))]
    async fn tasks_on(&self, date: NaiveDate) -> DashboardResult<Vec<Task>> {
        Ok(self
            .client
            .get_json(&format!("/schedule/date/{}", iso(date)), &[])
            .await?)
    }

    #[instrument(skip(self))]
    async fn tasks_for_week(&self, date: NaiveDate) -> DashboardResult<ScheduleMap> {
        self.schedule(format!("/schedule/week/{}", iso(date))).await
    }

    #[instrument(skip(self))]
    async fn tasks_for_month(&self, year: i32, month: u32) -> DashboardResult<ScheduleMap> {
        self.schedule(format!("/schedule/month/{year}/{month}")).await
    }

    #[instrument(skip(self))]
    async fn tasks_for_quarter(&self, year: i32, quarter: u32) -> DashboardResult<ScheduleMap> {
        self.schedule(format!("/schedule/quarter/{year}/{quarter}"))
            .await
    }

    #[instrument(skip(self))]
    async fn tasks_for_half_year(&self, year: i32, half: u32) -> DashboardResult<ScheduleMap> {
        self.schedule(format!("/schedule/half-year/{year}/{half}"))
            .await
    }

    #[instrument(skip(self))]
    async fn tasks_for_year(&self, year: i32) -> DashboardResult<ScheduleMap> {
        self.schedule(format!("/schedule/year/{year}")).await
    }

    #[instrument(skip(self))]
    async fn tasks_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DashboardResult<ScheduleMap> {
        Ok(self
            .client
            .get_json(
                "/schedule/range",
                &[("start", iso(start)), ("end", iso(end))],
            )
            .await?)
    }

    async fn departments(&self) -> DashboardResult<Vec<String>> {
        Ok(self.client.get_json("/master/departments", &[]).await?)
    }

    async fn frequencies(&self) -> DashboardResult<Vec<String>> {
        Ok(self.client.get_json("/master/frequencies", &[]).await?)
    }
}
