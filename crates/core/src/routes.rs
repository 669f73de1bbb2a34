//! Routes
//!
//! Page paths and the access rules evaluated before a page is shown: the
//! cookie-based navigation guard for `/admin/*` and the store-based guards
//! used by layouts once the session has been hydrated.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    session::{Role, Session},
    storage::{CookieJar, StorageError, keys},
};

/// Every page of the storefront and back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page
    Home,
    /// Product catalog
    Menu,
    /// Cart
    Cart,
    /// Order-data form
    OrderData,
    /// Payment summary and upload
    Payment,
    /// Customer order history
    Orders,
    /// Customer profile
    Profile,
    /// Contact form and shop details
    Contact,
    /// About page
    About,
    /// Customer login
    Login,
    /// Customer registration
    Register,
    /// Back-office login
    AdminLogin,
    /// Back-office landing page
    AdminDashboard,
    /// Product management
    AdminProducts,
    /// Staff accounts
    AdminStaff,
    /// Testimonial moderation
    AdminTestimonials,
    /// Team members
    AdminTeamMembers,
    /// Timeline events
    AdminAbout,
    /// Contact details
    AdminContactInfo,
    /// Payment review
    AdminPaymentMonitor,
}

impl Route {
    /// Every route.
    pub const ALL: [Self; 20] = [
        Self::Home,
        Self::Menu,
        Self::Cart,
        Self::OrderData,
        Self::Payment,
        Self::Orders,
        Self::Profile,
        Self::Contact,
        Self::About,
        Self::Login,
        Self::Register,
        Self::AdminLogin,
        Self::AdminDashboard,
        Self::AdminProducts,
        Self::AdminStaff,
        Self::AdminTestimonials,
        Self::AdminTeamMembers,
        Self::AdminAbout,
        Self::AdminContactInfo,
        Self::AdminPaymentMonitor,
    ];

    /// URL path.
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Menu => "/menu",
            Self::Cart => "/keranjang",
            Self::OrderData => "/datapemesanan",
            Self::Payment => "/pembayaran",
            Self::Orders => "/orders",
            Self::Profile => "/profile",
            Self::Contact => "/kontak",
            Self::About => "/tentangkami",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::AdminLogin => "/admin/login",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminProducts => "/admin/products",
            Self::AdminStaff => "/admin/staff",
            Self::AdminTestimonials => "/admin/testimonials",
            Self::AdminTeamMembers => "/admin/teammember",
            Self::AdminAbout => "/admin/about",
            Self::AdminContactInfo => "/admin/contactinfo",
            Self::AdminPaymentMonitor => "/admin/paymentmonitor",
        }
    }

    /// Route for a path, ignoring any query string and trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = normalize(path);

        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Area the route belongs to.
    pub fn area(self) -> Area {
        Area::of(self.path())
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.path())
    }
}

/// Raised when a path names no page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no page at {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Self::from_path(path).ok_or_else(|| UnknownRoute(path.to_string()))
    }
}

/// Storefront or back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    /// Customer-facing pages.
    Storefront,

    /// Everything under `/admin`.
    Admin,
}

impl Area {
    /// Area of a raw path.
    pub fn of(path: &str) -> Self {
        let path = normalize(path);

        if path == "/admin" || path.starts_with("/admin/") {
            Self::Admin
        } else {
            Self::Storefront
        }
    }

    /// Login page for the area.
    pub fn login_route(self) -> Route {
        match self {
            Self::Storefront => Route::Login,
            Self::Admin => Route::AdminLogin,
        }
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);

    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Outcome of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the requested page.
    Allow,

    /// Send the visitor elsewhere.
    Redirect(Route),
}

/// Navigation guard for a request, evaluated from cookies alone.
///
/// Storefront paths always pass. Under `/admin`:
/// - a back-office visitor on the login page goes to the dashboard;
/// - any other page needs a token and an `ADMIN` or `STAFF` role, otherwise
///   the visitor goes to the admin login page;
/// - a token without a valid role is stale, and the session cookies are
///   removed.
///
/// # Errors
///
/// Returns an error if stale cookies could not be removed.
pub fn guard_request(path: &str, jar: &dyn CookieJar) -> Result<GuardDecision, StorageError> {
    if Area::of(path) == Area::Storefront {
        return Ok(GuardDecision::Allow);
    }

    let token = jar.get(keys::TOKEN);
    let role = jar
        .get(keys::USER_TYPE)
        .and_then(|role| role.parse::<Role>().ok());

    if token.is_some() && role.is_none() {
        debug!(path, "removing stale session cookies");
        strip_session_cookies(jar)?;
    }

    let back_office = token.is_some() && role.is_some_and(Role::is_back_office);

    if Route::from_path(path) == Some(Route::AdminLogin) {
        return Ok(if back_office {
            GuardDecision::Redirect(Route::AdminDashboard)
        } else {
            GuardDecision::Allow
        });
    }

    Ok(if back_office {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::AdminLogin)
    })
}

fn strip_session_cookies(jar: &dyn CookieJar) -> Result<(), StorageError> {
    jar.remove(keys::TOKEN)?;
    jar.remove(keys::USERNAME)?;
    jar.remove(keys::USER_TYPE)?;

    Ok(())
}

/// Layout guard for back-office pages, evaluated from the hydrated session.
pub fn guard_admin_layout(session: &Session) -> GuardDecision {
    if session.is_back_office() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::AdminLogin)
    }
}

/// Guard for the customer order list: back-office accounts use the payment
/// monitor instead, and anonymous visitors must log in.
pub fn guard_orders(session: &Session) -> GuardDecision {
    match session.role() {
        None => GuardDecision::Redirect(Route::Login),
        Some(role) if role.is_back_office() => GuardDecision::Redirect(Route::AdminPaymentMonitor),
        Some(_) => GuardDecision::Allow,
    }
}

/// Where a visitor lands right after signing in.
pub fn landing_after_login(role: Role) -> Route {
    if role.is_back_office() {
        Route::AdminDashboard
    } else {
        Route::Home
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        session::Credentials,
        storage::{Cookie, MemoryCookieJar},
    };

    use super::*;

    fn jar_with(token: Option<&str>, role: Option<&str>) -> TestResult<MemoryCookieJar> {
        let jar = MemoryCookieJar::new();

        if let Some(token) = token {
            jar.set(Cookie::session(keys::TOKEN, token))?;
            jar.set(Cookie::session(keys::USERNAME, "sari"))?;
        }
        if let Some(role) = role {
            jar.set(Cookie::session(keys::USER_TYPE, role))?;
        }

        Ok(jar)
    }

    #[test]
    fn paths_round_trip_through_routes() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }

        assert_eq!(Route::from_path("/menu/?category=3"), Some(Route::Menu));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn admin_area_is_a_path_prefix() {
        assert_eq!(Area::of("/admin/products"), Area::Admin);
        assert_eq!(Area::of("/admin"), Area::Admin);
        assert_eq!(Area::of("/administrasi"), Area::Storefront);
        assert_eq!(Area::of("/orders"), Area::Storefront);
    }

    #[test]
    fn storefront_is_always_open() -> TestResult {
        let jar = jar_with(None, None)?;

        assert_eq!(guard_request("/keranjang", &jar)?, GuardDecision::Allow);

        Ok(())
    }

    #[test]
    fn admin_pages_need_a_back_office_role() -> TestResult {
        assert_eq!(
            guard_request("/admin/products", &jar_with(None, None)?)?,
            GuardDecision::Redirect(Route::AdminLogin)
        );
        assert_eq!(
            guard_request("/admin/products", &jar_with(Some("t"), Some("USER"))?)?,
            GuardDecision::Redirect(Route::AdminLogin)
        );
        assert_eq!(
            guard_request("/admin/products", &jar_with(Some("t"), Some("STAFF"))?)?,
            GuardDecision::Allow
        );

        Ok(())
    }

    #[test]
    fn signed_in_admin_skips_the_login_page() -> TestResult {
        assert_eq!(
            guard_request("/admin/login", &jar_with(Some("t"), Some("ADMIN"))?)?,
            GuardDecision::Redirect(Route::AdminDashboard)
        );
        assert_eq!(
            guard_request("/admin/login", &jar_with(None, None)?)?,
            GuardDecision::Allow
        );

        Ok(())
    }

    #[test]
    fn stale_cookies_are_stripped() -> TestResult {
        let jar = jar_with(Some("t"), Some("OWNER"))?;

        assert_eq!(
            guard_request("/admin/dashboard", &jar)?,
            GuardDecision::Redirect(Route::AdminLogin)
        );
        assert!(jar.get(keys::TOKEN).is_none());
        assert!(jar.get(keys::USERNAME).is_none());

        let jar = jar_with(Some("t"), None)?;

        assert_eq!(guard_request("/admin/login", &jar)?, GuardDecision::Allow);
        assert!(jar.get(keys::TOKEN).is_none());

        Ok(())
    }

    #[test]
    fn orders_are_routed_by_role() {
        let user = Session::Authenticated(Credentials::new("t", "sari", Role::User));
        let admin = Session::Authenticated(Credentials::new("t", "bos", Role::Admin));

        assert_eq!(
            guard_orders(&Session::Anonymous),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(guard_orders(&user), GuardDecision::Allow);
        assert_eq!(
            guard_orders(&admin),
            GuardDecision::Redirect(Route::AdminPaymentMonitor)
        );
        assert_eq!(guard_admin_layout(&user), GuardDecision::Redirect(Route::AdminLogin));
        assert_eq!(
            guard_admin_layout(&Session::Anonymous),
            GuardDecision::Redirect(Route::AdminLogin)
        );
        assert_eq!(guard_admin_layout(&admin), GuardDecision::Allow);
    }
}
