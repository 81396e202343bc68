//! Permission evaluator
//!
//! Answers "can this user do X on module Y" from the user's own permission
//! list. The only signal is an exact `(module, action)` match: no role
//! hierarchy, no inheritance, no wildcards.

use crate::session::{Action, SessionHandle, User};

/// Entry for `module`, first match wins
fn entry_for<'a>(user: &'a User, module: &str) -> Option<&'a crate::session::ModulePermission> {
    user.permissions.iter().find(|p| p.module == module)
}

/// True iff `user` holds `(module, action)`
pub fn has_permission(user: Option<&User>, module: &str, action: Action) -> bool {
    let Some(user) = user else {
        return false;
    };
    entry_for(user, module).map_or(false, |p| p.allows(action))
}

/// True iff `user` has any entry for `module`, whatever it grants
pub fn can_access_module(user: Option<&User>, module: &str) -> bool {
    user.map_or(false, |u| entry_for(u, module).is_some())
}

/// Evaluator bound to a live session
///
/// Reads the session at call time, so a profile update is visible to the
/// next check without rebuilding the evaluator.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    session: SessionHandle,
}

impl PermissionEvaluator {
    pub fn new(session: SessionHandle) -> Self {
        PermissionEvaluator { session }
    }

    pub fn has_permission(&self, module: &str, action: Action) -> bool {
        self.session
            .with(|s| has_permission(s.user(), module, action))
    }

    pub fn can_access_module(&self, module: &str) -> bool {
        self.session.with(|s| can_access_module(s.user(), module))
    }
}
