//! Route table and admin guard.
//!
//! Maps URL paths onto the page tree of the original application and
//! enforces the one guarded branch: `/admin` requires an authenticated
//! session with the ADMIN role. The check is pure and synchronous against
//! the in-memory session; the session must be restored from storage before
//! routing begins, so there is no intermediate loading state. A failed
//! check is an immediate redirect home, never a blocked spinner.

use crate::cache::QueryKey;
use crate::session::SessionSnapshot;

/// Pages of the admin back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPage {
    Dashboard,
    Users,
    Hotels,
    Rooms,
}

/// Routable pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Hotels,
    HotelDetails(i64),
    Login,
    Register,
    MyBookings,
    Admin(AdminPage),
}

impl Route {
    /// Parse a URL path. Unknown paths yield `None` (the router redirects
    /// those home).
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Home),
            ["hotels"] => Some(Self::Hotels),
            ["hotels", id] => id.parse().ok().map(Self::HotelDetails),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["bookings"] => Some(Self::MyBookings),
            ["admin"] => Some(Self::Admin(AdminPage::Dashboard)),
            ["admin", "users"] => Some(Self::Admin(AdminPage::Users)),
            ["admin", "hotels"] => Some(Self::Admin(AdminPage::Hotels)),
            ["admin", "rooms"] => Some(Self::Admin(AdminPage::Rooms)),
            _ => None,
        }
    }

    /// Canonical path for the route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Hotels => "/hotels".to_string(),
            Self::HotelDetails(id) => format!("/hotels/{id}"),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::MyBookings => "/bookings".to_string(),
            Self::Admin(AdminPage::Dashboard) => "/admin".to_string(),
            Self::Admin(AdminPage::Users) => "/admin/users".to_string(),
            Self::Admin(AdminPage::Hotels) => "/admin/hotels".to_string(),
            Self::Admin(AdminPage::Rooms) => "/admin/rooms".to_string(),
        }
    }

    pub const fn requires_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// The query this page renders on mount, if it has one. Form pages
    /// fetch nothing.
    pub fn query(&self) -> Option<QueryKey> {
        match self {
            Self::Home | Self::Hotels | Self::Admin(AdminPage::Dashboard | AdminPage::Hotels) => {
                Some(QueryKey::hotels())
            }
            Self::HotelDetails(id) => Some(QueryKey::rooms_by_hotel(*id)),
            Self::MyBookings => Some(QueryKey::my_bookings()),
            Self::Admin(AdminPage::Users) => Some(QueryKey::users()),
            Self::Admin(AdminPage::Rooms) => Some(QueryKey::all_rooms_admin()),
            Self::Login | Self::Register => None,
        }
    }
}

/// Outcome of routing a path against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

/// Resolve a path. The admin branch redirects home unless the session is
/// authenticated with the ADMIN role; no admin API call is ever issued for
/// a denied navigation.
pub fn resolve(path: &str, session: &SessionSnapshot) -> Resolution {
    match Route::parse(path) {
        None => Resolution::Redirect(Route::Home),
        Some(route) if route.requires_admin() && !session.is_admin() => {
            Resolution::Redirect(Route::Home)
        }
        Some(route) => Resolution::Render(route),
    }
}
