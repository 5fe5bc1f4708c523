//! Role Routes
//!
//! Declarative role -> navigation table and the guard that decides what a
//! browser path renders for the signed-in role.

use wastewise_client::models::Role;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const APP_PATH: &str = "/app";
pub const PAYMENT_SUCCESS_PATH: &str = "/payment/success";
pub const PAYMENT_PENDING_PATH: &str = "/payment/pending";
pub const PAYMENT_FAILED_PATH: &str = "/payment/failed";

/// Every page reachable from the navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    AdminDashboard,
    AdminUsers,
    AdminZones,
    AdminHouseholds,
    AdminBins,
    AdminVirtualBins,
    AdminVehicles,
    AdminBillingPlans,
    AdminMembershipPlans,
    AdminRewardRates,

    OpsDashboard,
    OpsCases,
    OpsTasks,
    OpsRoutes,
    OpsDigitalTwin,
    OpsRewardClaims,
    OpsBilling,
    OpsVehicles,

    CrewRoute,
    CrewTasks,
    CrewRecyclables,
    CrewExceptions,

    CitizenDashboard,
    CitizenReports,
    CitizenBulky,
    CitizenCases,
    CitizenRewards,
    CitizenWallet,
    CitizenInvoices,
    CitizenPlans,
    CitizenRecyclables,
    CitizenNotifications,
}

impl Page {
    pub const ALL: [Page; 32] = [
        Page::AdminDashboard,
        Page::AdminUsers,
        Page::AdminZones,
        Page::AdminHouseholds,
        Page::AdminBins,
        Page::AdminVirtualBins,
        Page::AdminVehicles,
        Page::AdminBillingPlans,
        Page::AdminMembershipPlans,
        Page::AdminRewardRates,
        Page::OpsDashboard,
        Page::OpsCases,
        Page::OpsTasks,
        Page::OpsRoutes,
        Page::OpsDigitalTwin,
        Page::OpsRewardClaims,
        Page::OpsBilling,
        Page::OpsVehicles,
        Page::CrewRoute,
        Page::CrewTasks,
        Page::CrewRecyclables,
        Page::CrewExceptions,
        Page::CitizenDashboard,
        Page::CitizenReports,
        Page::CitizenBulky,
        Page::CitizenCases,
        Page::CitizenRewards,
        Page::CitizenWallet,
        Page::CitizenInvoices,
        Page::CitizenPlans,
        Page::CitizenRecyclables,
        Page::CitizenNotifications,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub label: &'static str,
    pub page: Page,
}

/// One role's navigation; the first route is the role's home
#[derive(Clone, Copy, Debug)]
pub struct NavSection {
    pub role: Role,
    pub routes: &'static [RouteDescriptor],
}

const fn route(path: &'static str, label: &'static str, page: Page) -> RouteDescriptor {
    RouteDescriptor { path, label, page }
}

pub static NAV_TABLE: &[NavSection] = &[
    NavSection {
        role: Role::Admin,
        routes: &[
            route("/app/admin", "Dashboard", Page::AdminDashboard),
            route("/app/admin/users", "Users", Page::AdminUsers),
            route("/app/admin/zones", "Zones", Page::AdminZones),
            route("/app/admin/households", "Households", Page::AdminHouseholds),
            route("/app/admin/bins", "Bins", Page::AdminBins),
            route("/app/admin/virtual-bins", "Virtual Bins", Page::AdminVirtualBins),
            route("/app/admin/vehicles", "Vehicles", Page::AdminVehicles),
            route("/app/admin/billing-plans", "Billing Plans", Page::AdminBillingPlans),
            route("/app/admin/membership-plans", "Membership Plans", Page::AdminMembershipPlans),
            route("/app/admin/reward-rates", "Reward Rates", Page::AdminRewardRates),
        ],
    },
    NavSection {
        role: Role::Supervisor,
        routes: &[
            route("/app/ops", "Dashboard", Page::OpsDashboard),
            route("/app/ops/cases", "Cases", Page::OpsCases),
            route("/app/ops/tasks", "Tasks", Page::OpsTasks),
            route("/app/ops/routes", "Routes", Page::OpsRoutes),
            route("/app/ops/digital-twin", "Digital Twin", Page::OpsDigitalTwin),
            route("/app/ops/reward-claims", "Reward Claims", Page::OpsRewardClaims),
            route("/app/ops/billing", "Billing", Page::OpsBilling),
            route("/app/ops/vehicles", "Vehicle Tracking", Page::OpsVehicles),
        ],
    },
    NavSection {
        role: Role::Crew,
        routes: &[
            route("/app/crew", "Today's Route", Page::CrewRoute),
            route("/app/crew/tasks", "Tasks", Page::CrewTasks),
            route("/app/crew/recyclables", "Recyclable Verification", Page::CrewRecyclables),
            route("/app/crew/exceptions", "Exceptions", Page::CrewExceptions),
        ],
    },
    NavSection {
        role: Role::Citizen,
        routes: &[
            route("/app/citizen", "Dashboard", Page::CitizenDashboard),
            route("/app/citizen/reports", "Litter Reports", Page::CitizenReports),
            route("/app/citizen/bulky", "Bulky Pickup", Page::CitizenBulky),
            route("/app/citizen/cases", "My Cases", Page::CitizenCases),
            route("/app/citizen/rewards", "Rewards", Page::CitizenRewards),
            route("/app/citizen/wallet", "Wallet", Page::CitizenWallet),
            route("/app/citizen/invoices", "Invoices", Page::CitizenInvoices),
            route("/app/citizen/plans", "Plans & Schedule", Page::CitizenPlans),
            route("/app/citizen/recyclables", "Recyclables", Page::CitizenRecyclables),
            route("/app/citizen/notifications", "Notifications", Page::CitizenNotifications),
        ],
    },
];

pub fn section_for(role: Role) -> Option<&'static NavSection> {
    NAV_TABLE.iter().find(|section| section.role == role)
}

pub fn nav_for(role: Role) -> &'static [RouteDescriptor] {
    section_for(role).map(|s| s.routes).unwrap_or(&[])
}

/// Browser path of a navigation page
pub fn path_for(page: Page) -> Option<&'static str> {
    NAV_TABLE
        .iter()
        .flat_map(|section| section.routes.iter())
        .find(|r| r.page == page)
        .map(|r| r.path)
}

pub fn home_page(role: Role) -> Option<Page> {
    nav_for(role).first().map(|r| r.page)
}

/// What the shell renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    /// `/app`: the role's home page inside the shell
    Home,
    Page(Page),
    PaymentSuccess,
    PaymentPending,
    PaymentFailed,
    NotFound,
}

impl View {
    /// Rendered inside the signed-in shell (sidebar, top bar)
    pub fn in_shell(self) -> bool {
        !matches!(self, View::Login | View::Register)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(View),
    Redirect(&'static str),
}

/// Path without query string or trailing slash
pub fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Decide what `path` shows for the current role (`None` = signed out)
pub fn guard(role: Option<Role>, path: &str) -> GuardOutcome {
    let path = normalize(path);
    match (path, role) {
        ("/", None) => GuardOutcome::Redirect(LOGIN_PATH),
        ("/", Some(_)) => GuardOutcome::Redirect(APP_PATH),
        (LOGIN_PATH | REGISTER_PATH, Some(_)) => GuardOutcome::Redirect(APP_PATH),
        (LOGIN_PATH, None) => GuardOutcome::Render(View::Login),
        (REGISTER_PATH, None) => GuardOutcome::Render(View::Register),
        (PAYMENT_SUCCESS_PATH | PAYMENT_PENDING_PATH | PAYMENT_FAILED_PATH, None) => {
            GuardOutcome::Redirect(LOGIN_PATH)
        }
        (PAYMENT_SUCCESS_PATH, Some(_)) => GuardOutcome::Render(View::PaymentSuccess),
        (PAYMENT_PENDING_PATH, Some(_)) => GuardOutcome::Render(View::PaymentPending),
        (PAYMENT_FAILED_PATH, Some(_)) => GuardOutcome::Render(View::PaymentFailed),
        (APP_PATH, None) => GuardOutcome::Redirect(LOGIN_PATH),
        (APP_PATH, Some(_)) => GuardOutcome::Render(View::Home),
        (p, None) if is_app_path(p) => GuardOutcome::Redirect(LOGIN_PATH),
        (p, Some(role)) if is_app_path(p) => guard_app_path(role, p),
        _ => GuardOutcome::Render(View::NotFound),
    }
}

fn is_app_path(path: &str) -> bool {
    path.strip_prefix(APP_PATH).is_some_and(|rest| rest.starts_with('/'))
}

fn guard_app_path(role: Role, path: &str) -> GuardOutcome {
    let owner = NAV_TABLE
        .iter()
        .find_map(|section| section.routes.iter().find(|r| r.path == path).map(|r| (section.role, r.page)));
    if let Some((owner, page)) = owner {
        return if owner == role {
            GuardOutcome::Render(View::Page(page))
        } else {
            GuardOutcome::Redirect(APP_PATH)
        };
    }

    // unknown page under some role's prefix
    let slug = path[APP_PATH.len() + 1..].split('/').next().unwrap_or("");
    match Role::from_slug(slug) {
        Some(owner) if owner != role => GuardOutcome::Redirect(APP_PATH),
        _ => GuardOutcome::Render(View::NotFound),
    }
}

/// Structural checks on the navigation table
///
/// - each role has exactly one section
/// - every path is unique and sits under its role's prefix
/// - every page has exactly one owning route
pub fn validate_nav_table(table: &[NavSection]) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    for role in Role::ALL {
        let sections = table.iter().filter(|s| s.role == role).count();
        if sections != 1 {
            problems.push(format!("role {role:?} has {sections} sections"));
        }
    }

    let mut seen_paths = std::collections::HashSet::new();
    let mut page_owners = std::collections::HashMap::new();
    for section in table {
        let prefix = format!("{}/{}", APP_PATH, section.role.slug());
        if section.routes.is_empty() {
            problems.push(format!("role {:?} has no routes", section.role));
        }
        for r in section.routes {
            if !seen_paths.insert(r.path) {
                problems.push(format!("duplicate path {}", r.path));
            }
            if !(r.path == prefix || r.path.starts_with(&format!("{prefix}/"))) {
                problems.push(format!("{} is outside {prefix}", r.path));
            }
            *page_owners.entry(r.page).or_insert(0) += 1;
        }
    }

    for page in Page::ALL {
        match page_owners.get(&page).copied().unwrap_or(0) {
            1 => {}
            0 => problems.push(format!("{page:?} is unreachable")),
            n => problems.push(format!("{page:?} is owned by {n} routes")),
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_table_is_valid() {
        assert_eq!(validate_nav_table(NAV_TABLE), Ok(()));
    }

    #[test]
    fn test_validation_catches_orphans_and_strays() {
        static BROKEN: &[NavSection] = &[NavSection {
            role: Role::Crew,
            routes: &[
                route("/app/crew", "Route", Page::CrewRoute),
                route("/app/admin/zones", "Zones", Page::AdminZones),
                route("/app/crew", "Again", Page::CrewTasks),
            ],
        }];
        let problems = validate_nav_table(BROKEN).unwrap_err();
        assert!(problems.iter().any(|p| p.contains("duplicate path /app/crew")));
        assert!(problems.iter().any(|p| p.contains("/app/admin/zones is outside /app/crew")));
        assert!(problems.iter().any(|p| p.contains("Admin") && p.contains("sections")));
        assert!(problems.iter().any(|p| p.contains("CitizenWallet is unreachable")));
    }

    #[test]
    fn test_admin_session_renders_admin_pages_only() {
        let admin = Some(Role::Admin);
        assert_eq!(
            guard(admin, "/app/admin/zones"),
            GuardOutcome::Render(View::Page(Page::AdminZones))
        );
        assert_eq!(guard(admin, "/app/crew/tasks"), GuardOutcome::Redirect(APP_PATH));
        assert_eq!(guard(admin, "/app/crew/unknown"), GuardOutcome::Redirect(APP_PATH));
        assert_eq!(guard(admin, "/app/admin/unknown"), GuardOutcome::Render(View::NotFound));
        assert_eq!(guard(admin, "/app"), GuardOutcome::Render(View::Home));
    }

    #[test]
    fn test_signed_out_redirects_to_login() {
        assert_eq!(guard(None, "/app/admin/zones"), GuardOutcome::Redirect(LOGIN_PATH));
        assert_eq!(guard(None, "/app"), GuardOutcome::Redirect(LOGIN_PATH));
        assert_eq!(guard(None, "/"), GuardOutcome::Redirect(LOGIN_PATH));
        assert_eq!(guard(None, "/payment/pending?ref=X"), GuardOutcome::Redirect(LOGIN_PATH));
        assert_eq!(guard(None, "/login"), GuardOutcome::Render(View::Login));
        assert_eq!(guard(None, "/register/"), GuardOutcome::Render(View::Register));
    }

    #[test]
    fn test_signed_in_skips_login() {
        assert_eq!(guard(Some(Role::Citizen), "/login"), GuardOutcome::Redirect(APP_PATH));
        assert_eq!(
            guard(Some(Role::Citizen), "/payment/pending?ref=T-1"),
            GuardOutcome::Render(View::PaymentPending)
        );
    }

    #[test]
    fn test_every_route_renders_for_its_own_role_only() {
        for section in NAV_TABLE {
            for r in section.routes {
                for role in Role::ALL {
                    let outcome = guard(Some(role), r.path);
                    if role == section.role {
                        assert_eq!(outcome, GuardOutcome::Render(View::Page(r.page)));
                    } else {
                        assert_eq!(outcome, GuardOutcome::Redirect(APP_PATH), "{role:?} at {}", r.path);
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/app/ops/"), "/app/ops");
        assert_eq!(normalize("/payment/pending?ref=1"), "/payment/pending");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/applesauce"), "/applesauce");
        assert_eq!(guard(Some(Role::Crew), "/applesauce"), GuardOutcome::Render(View::NotFound));
    }

    #[test]
    fn test_home_pages() {
        assert_eq!(home_page(Role::Crew), Some(Page::CrewRoute));
        assert_eq!(home_page(Role::Supervisor), Some(Page::OpsDashboard));
        assert_eq!(path_for(Page::OpsTasks), Some("/app/ops/tasks"));
    }
}
