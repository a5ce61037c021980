//! Taskboard - residency schedule dashboard
//!
//! Taskboard shows the recurring tasks of a hospital residency programme,
//! fetched from a task store over HTTP, for a chosen calendar period and
//! grouped by date and department. Access is gated by a bearer session
//! obtained from an identity-provider token.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): periods, schedules, sessions and port traits
//! - **Service Layer** (`services`): query client, aggregation, session store,
//!   access policy and the schedule board
//! - **Infrastructure Layer** (`infrastructure`): HTTP adapters, local session
//!   file, configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, DepartmentFilter, GroupedView, Period, PeriodKind, ScheduleMap, Session,
    SessionState, Task,
};
pub use domain::{DashboardError, DashboardResult};
pub use services::{ScheduleBoard, ScheduleQueryClient, SessionContext, SessionStore};
