//! Route guard
//!
//! Decides, per navigation, whether the requested view renders:
//!
//! ```text
//!                 restoration done, no session
//!   RESOLVING ─────────────────────────────────▶ ANONYMOUS   → redirect /login (keeps `from`)
//!       │
//!       ├── session, grant held (or none needed) ▶ AUTHORIZED  → render
//!       │
//!       └── session, grant missing ─────────────▶ FORBIDDEN   → redirect landing (drops `from`)
//! ```
//!
//! While RESOLVING only the loading indicator is rendered: no route content
//! and no redirect.

use serde::Serialize;
use tracing::debug;

use super::routes::{Access, RouteRequirement, RouteTable};
use crate::auth::AppContext;
use crate::config::AuthConfig;
use crate::errors::Result;
use crate::rbac;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardState {
    Resolving,
    Anonymous,
    Authorized,
    /// Signed in, but the route's grant is missing
    Forbidden,
}

/// What the caller should do with the requested location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Blocking loading indicator, nothing else
    Loading,
    /// Render the requested route
    Render { location: String },
    /// Go to the login route; `from` is offered for post-login return
    RedirectToLogin { to: String, from: String },
    /// Go to the default landing route
    RedirectToLanding { to: String },
}

impl GuardDecision {
    pub fn renders_content(&self) -> bool {
        matches!(self, GuardDecision::Render { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_route: String,
    landing_route: String,
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(login_route: impl Into<String>, landing_route: impl Into<String>) -> Result<Self> {
        let login_route = login_route.into();
        let landing_route = landing_route.into();
        let table = RouteTable::for_app(&login_route, &landing_route)?;
        Ok(RouteGuard {
            login_route,
            landing_route,
            table,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::new(config.spec.login_route.clone(), config.spec.landing_route.clone())
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Guard state for a session and an optional required grant
    pub fn state(session: &Session, required: Option<&RouteRequirement>) -> GuardState {
        if session.is_loading() {
            return GuardState::Resolving;
        }
        if !session.is_authenticated() {
            return GuardState::Anonymous;
        }
        match required {
            Some(req) if !rbac::has_permission(session.user(), &req.module, req.action) => {
                GuardState::Forbidden
            }
            _ => GuardState::Authorized,
        }
    }

    /// Decision for a protected location with an optional required grant
    pub fn decide(
        &self,
        session: &Session,
        location: &str,
        required: Option<&RouteRequirement>,
    ) -> GuardDecision {
        let decision = match Self::state(session, required) {
            GuardState::Resolving => GuardDecision::Loading,
            GuardState::Anonymous => GuardDecision::RedirectToLogin {
                to: self.login_route.clone(),
                from: location.to_string(),
            },
            GuardState::Forbidden => GuardDecision::RedirectToLanding {
                to: self.landing_route.clone(),
            },
            GuardState::Authorized => GuardDecision::Render {
                location: location.to_string(),
            },
        };
        debug!(location, ?decision, "route guard decision");
        decision
    }

    /// Decision for any location, looked up in the route table
    ///
    /// - public routes render without a session; the login route sends a
    ///   signed-in user to the landing route
    /// - unknown locations go to the landing route, which is itself guarded
    pub fn navigate(&self, session: &Session, location: &str) -> GuardDecision {
        let Some(matched) = self.table.resolve(location) else {
            debug!(location, "unknown location, falling back to landing route");
            return self.decide(session, &self.landing_route, None);
        };

        match &matched.route.access {
            Access::Public => {
                if matched.route.pattern == self.login_route && session.is_authenticated() {
                    GuardDecision::RedirectToLanding {
                        to: self.landing_route.clone(),
                    }
                } else {
                    GuardDecision::Render {
                        location: location.to_string(),
                    }
                }
            }
            Access::Authenticated => self.decide(session, location, None),
            Access::Requires(req) => self.decide(session, location, Some(req)),
        }
    }

    /// [`navigate`](Self::navigate) against the session installed in `ctx`
    ///
    /// Fails when `ctx` carries no auth provider.
    pub fn check(&self, ctx: &AppContext, location: &str) -> Result<GuardDecision> {
        let auth = ctx.auth()?;
        Ok(auth.store().with(|session| self.navigate(session, location)))
    }

    /// Where to go after a successful login
    ///
    /// The preserved location when the guard sent the user to login,
    /// otherwise the landing route. A `from` pointing back at the login
    /// route is ignored.
    pub fn post_login_target(&self, redirect: Option<&GuardDecision>) -> String {
        match redirect {
            Some(GuardDecision::RedirectToLogin { from, .. }) if *from != self.login_route => {
                from.clone()
            }
            _ => self.landing_route.clone(),
        }
    }
}
