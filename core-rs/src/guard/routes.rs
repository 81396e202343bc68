/**
 * routes.rs
 * Route table of the business suite
 *
 * Patterns use `:name` segments for parameters:
 * - `/`                     dashboard, signed-in users only
 * - `/login`                public
 * - `/<module>`             requires (module, read)
 * - `/<module>/new`         requires (module, create)
 * - `/<module>/:id`         requires (module, read)
 * - `/<module>/:id/edit`    requires (module, update)
 *
 * Patterns are compiled to anchored regexes once, when the table is built.
 */

use regex::Regex;
use std::collections::HashMap;

use crate::errors::{AuthError, Result};
use crate::session::{Action, MODULES};

/// `(module, action)` a route requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    pub module: String,
    pub action: Action,
}

impl RouteRequirement {
    pub fn new(module: impl Into<String>, action: Action) -> Self {
        RouteRequirement {
            module: module.into(),
            action,
        }
    }
}

/// How a route is gated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Rendered for anyone, no session needed
    Public,
    /// Any signed-in user
    Authenticated,
    /// Signed-in user holding the grant
    Requires(RouteRequirement),
}

impl Access {
    pub fn requirement(&self) -> Option<&RouteRequirement> {
        match self {
            Access::Requires(req) => Some(req),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: String,
    pub access: Access,
    matcher: Regex,
    params: Vec<String>,
}

impl Route {
    pub fn new(pattern: &str, access: Access) -> Result<Self> {
        if !pattern.starts_with('/') {
            return Err(AuthError::Route(format!(
                "route pattern must start with '/': {}",
                pattern
            )));
        }

        let mut params = Vec::new();
        let mut source = String::from("^");
        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            source.push('/');
            if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(AuthError::Route(format!("unnamed parameter in {}", pattern)));
                }
                params.push(name.to_string());
                source.push_str("([^/]+)");
            } else {
                source.push_str(&regex::escape(segment));
            }
        }
        if source == "^" {
            source.push('/');
        }
        source.push_str("/?$");

        let matcher = Regex::new(&source)
            .map_err(|e| AuthError::Route(format!("bad route pattern {}: {}", pattern, e)))?;

        Ok(Route {
            pattern: pattern.to_string(),
            access,
            matcher,
            params,
        })
    }

    /// Parameter captures when `path` matches this route
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.matcher.captures(path)?;
        Some(
            self.params
                .iter()
                .enumerate()
                .filter_map(|(i, name)| caps.get(i + 1).map(|m| (name.clone(), m.as_str().to_string())))
                .collect(),
        )
    }
}

/// A resolved location
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

/// Ordered route list, first match wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pattern: &str, access: Access) -> Result<()> {
        self.routes.push(Route::new(pattern, access)?);
        Ok(())
    }

    /// Routes of the business suite
    pub fn for_app(login_route: &str, landing_route: &str) -> Result<Self> {
        let mut table = RouteTable::new();
        table.add(login_route, Access::Public)?;
        table.add(landing_route, Access::Authenticated)?;

        for module in MODULES {
            // `/new` before `/:id` so it is not captured as an id
            table.add(&format!("/{}", module), Access::Requires(RouteRequirement::new(*module, Action::Read)))?;
            table.add(&format!("/{}/new", module), Access::Requires(RouteRequirement::new(*module, Action::Create)))?;
            table.add(&format!("/{}/:id/edit", module), Access::Requires(RouteRequirement::new(*module, Action::Update)))?;
            table.add(&format!("/{}/:id", module), Access::Requires(RouteRequirement::new(*module, Action::Read)))?;
        }

        Ok(table)
    }

    /// Match a location (query string and fragment ignored)
    pub fn resolve(&self, location: &str) -> Option<RouteMatch<'_>> {
        let path = strip_query(location);
        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch { route, params })
        })
    }
}

fn strip_query(location: &str) -> &str {
    let end = location.find(|c| c == '?' || c == '#').unwrap_or(location.len());
    &location[..end]
}
