//! Route guard: which screens a session may reach.

use std::fmt;

use crate::session::SessionStore;

/// Addressable screens of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Login,
  Dashboard,
  Users,
  UserDetail(u64),
  Products,
  ProductDetail(u64),
}

impl Route {
  /// Only reachable while logged out
  pub fn is_public_only(&self) -> bool {
    matches!(self, Self::Login)
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Login => f.write_str("/login"),
      Self::Dashboard => f.write_str("/dashboard"),
      Self::Users => f.write_str("/dashboard/users"),
      Self::UserDetail(id) => write!(f, "/dashboard/users/{}", id),
      Self::Products => f.write_str("/dashboard/products"),
      Self::ProductDetail(id) => write!(f, "/dashboard/products/{}", id),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Redirect(Route),
}

/// Decide for the given session.
pub fn check(route: &Route, session: &SessionStore) -> Decision {
  decide(route, session.is_authenticated())
}

pub fn decide(route: &Route, authenticated: bool) -> Decision {
  match (route.is_public_only(), authenticated) {
    (true, true) => Decision::Redirect(Route::Dashboard),
    (false, false) => Decision::Redirect(Route::Login),
    _ => Decision::Allow,
  }
}
