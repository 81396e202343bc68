//! Sidebar navigation filtered by module access

use serde::Serialize;

use super::evaluator::can_access_module;
use crate::session::{User, MODULES};

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Gated module, `None` for the dashboard
    pub module: Option<&'static str>,
    pub label: String,
    pub path: String,
}

/// Display label for a module slug ("work-orders" -> "Work Orders")
pub fn module_label(module: &str) -> String {
    module
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Entries visible to `user`, in module order
///
/// The dashboard is always listed; every other module needs an entry in the
/// user's permission list.
pub fn navigation_for(user: Option<&User>) -> Vec<NavItem> {
    let mut items = vec![NavItem {
        module: None,
        label: "Dashboard".to_string(),
        path: "/".to_string(),
    }];

    items.extend(
        MODULES
            .iter()
            .filter(|m| can_access_module(user, m))
            .map(|m| NavItem {
                module: Some(*m),
                label: module_label(m),
                path: format!("/{}", m),
            }),
    );

    items
}
