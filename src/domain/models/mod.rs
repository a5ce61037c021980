pub mod config;
pub mod period;
pub mod schedule;
pub mod session;
pub mod task;

pub use config::{ApiConfig, CalendarConfig, Config, LoggingConfig, SessionConfig};
pub use period::{parse_anchor, today, CalendarKey, Period, PeriodKind};
pub use schedule::{DateGroup, DepartmentFilter, DepartmentGroup, GroupedView, ScheduleMap};
pub use session::{
    AccountStatus, BearerToken, Identity, PersistedSession, Profile, Role, Session, SessionState,
};
pub use task::{Frequency, Task};
