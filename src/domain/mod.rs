//! Domain layer for the taskboard dashboard
//!
//! This module contains the calendar and schedule models, the session
//! models, and the port traits the infrastructure implements.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DashboardError, DashboardResult};
