//! Route authorization.
//!
//! The whole policy lives in [`route_policy`]: one exhaustive match over
//! [`Role`]. Adding a role variant fails to compile until it is given a
//! policy, and unknown roles coming from the store land in `Role::Other`,
//! which is denied everything.

use serde::Serialize;

use crate::domain::models::{Role, Session};

/// Routes a staff member may open.
pub const STAFF_ROUTES: &[&str] = &["/", "/home"];

/// Which routes a role may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePolicy {
    Everything,
    Only(&'static [&'static str]),
    Nothing,
}

impl RoutePolicy {
    fn permits(self, route: &str) -> bool {
        match self {
            Self::Everything => true,
            Self::Only(allowed) => allowed.contains(&route),
            Self::Nothing => false,
        }
    }
}

pub const fn route_policy(role: &Role) -> RoutePolicy {
    match role {
        Role::Admin => RoutePolicy::Everything,
        Role::Staff => RoutePolicy::Only(STAFF_ROUTES),
        Role::Other(_) => RoutePolicy::Nothing,
    }
}

/// Whether `session` may open `route`. No session means no access.
pub fn can_access(session: Option<&Session>, route: &str) -> bool {
    session.is_some_and(|s| route_policy(s.role()).permits(&normalize(route)))
}

/// A navigation entry of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
}

/// Every navigation entry, in menu order.
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        path: "/",
        label: "Home",
    },
    NavItem {
        path: "/batch",
        label: "Batch Control",
    },
    NavItem {
        path: "/master",
        label: "Manage Task Master",
    },
    NavItem {
        path: "/users",
        label: "Manage Users",
    },
    NavItem {
        path: "/api-test",
        label: "Test API",
    },
];

/// The navigation entries `session` may see.
pub fn visible_routes(session: Option<&Session>) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .copied()
        .filter(|item| can_access(session, item.path))
        .collect()
}

/// Strip query/fragment and trailing slashes; "" becomes "/".
fn normalize(route: &str) -> String {
    let path = route
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AccountStatus, BearerToken, Identity, Profile};

    fn session(role: &str) -> Session {
        Session::new(
            Profile {
                identity: Identity {
                    email: "meera@example.com".to_string(),
                    name: "Meera".to_string(),
                    picture: None,
                },
                role: Role::parse(role),
                status: AccountStatus::Enabled,
            },
            BearerToken::new("jwt"),
        )
    }

    #[test]
    fn test_no_session_is_denied_everywhere() {
        for route in ["/", "/home", "/users", "/master", ""] {
            assert!(!can_access(None, route), "route {route}");
        }
    }

    #[test]
    fn test_admin_may_open_anything() {
        let admin = session("Admin");
        assert!(can_access(Some(&admin), "/users"));
        assert!(can_access(Some(&admin), "/batch"));
        assert!(can_access(Some(&admin), "/some/future/page"));
    }

    #[test]
    fn test_staff_only_sees_home() {
        let staff = session("Staff");
        assert!(can_access(Some(&staff), "/"));
        assert!(can_access(Some(&staff), "/home"));
        assert!(!can_access(Some(&staff), "/users"));
        assert!(!can_access(Some(&staff), "/master"));
        assert!(!can_access(Some(&staff), "/api-test"));
    }

    #[test]
    fn test_unknown_role_is_denied() {
        let auditor = session("Auditor");
        assert_eq!(route_policy(auditor.role()), RoutePolicy::Nothing);
        assert!(!can_access(Some(&auditor), "/"));
        assert!(!can_access(Some(&auditor), "/home"));
    }

    #[test]
    fn test_route_normalization() {
        let staff = session("staff");
        assert!(can_access(Some(&staff), "/home/"));
        assert!(can_access(Some(&staff), "/?view=week"));
        assert!(can_access(Some(&staff), "home"));
        assert!(can_access(Some(&staff), ""));
        assert!(!can_access(Some(&staff), "/users/"));
    }

    #[test]
    fn test_visible_routes_per_role() {
        let staff = session("Staff");
        let paths: Vec<_> = visible_routes(Some(&staff)).iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["/"]);

        let admin = session("Admin");
        assert_eq!(visible_routes(Some(&admin)).len(), NAV_ITEMS.len());
        assert!(visible_routes(None).is_empty());
    }
}
