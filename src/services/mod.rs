//! Service layer: the dashboard's behaviour on top of the domain ports.

pub mod access_policy;
pub mod aggregation;
pub mod schedule_board;
pub mod schedule_query;
pub mod session_store;

pub use access_policy::{can_access, visible_routes, NavItem, RoutePolicy};
pub use schedule_board::{BoardSnapshot, FetchOutcome, ScheduleBoard, Selection};
pub use schedule_query::ScheduleQueryClient;
pub use session_store::{SessionContext, SessionStore};
