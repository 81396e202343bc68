// Permission Contract Tests
//
// The only authorization signal is an exact (module, action) entry in the
// user's own list. These tests fail if a role hierarchy, wildcard or
// implied action sneaks into the evaluator.

use pcab_core::rbac::{can_access_module, has_permission};
use pcab_core::session::{Action, ModulePermission, Role, User, MODULES};

fn user_with(perms: Vec<ModulePermission>) -> User {
    User::new("1", "Perm", "User", "perm@portacabin.com", Role::Admin).with_permissions(perms)
}

/// WHY: Empty list means no access, whatever the role says
#[test]
fn empty_permission_list_denies_everything() {
    let user = user_with(Vec::new());
    for module in MODULES.iter().chain(["*", "", "dashboard"].iter()) {
        for action in Action::ALL {
            assert!(!has_permission(Some(&user), module, action), "{} {}", module, action);
        }
        assert!(!can_access_module(Some(&user), module));
    }
}

#[test]
fn quotations_create_read_entry() {
    let user = user_with(vec![ModulePermission::new(
        "quotations",
        [Action::Create, Action::Read],
    )]);

    assert!(has_permission(Some(&user), "quotations", Action::Create));
    assert!(!has_permission(Some(&user), "quotations", Action::Delete));
}

/// WHY: No wildcard module
#[test]
fn star_module_is_just_a_name() {
    let user = user_with(vec![ModulePermission::new("*", Action::ALL)]);

    assert!(has_permission(Some(&user), "*", Action::Read));
    for module in MODULES {
        assert!(!has_permission(Some(&user), module, Action::Read));
    }
}

/// WHY: No implied actions (delete does not imply read)
#[test]
fn actions_do_not_imply_each_other() {
    let user = user_with(vec![ModulePermission::new("assets", [Action::Delete])]);

    assert!(has_permission(Some(&user), "assets", Action::Delete));
    for action in [Action::Create, Action::Read, Action::Update] {
        assert!(!has_permission(Some(&user), "assets", action));
    }
}

/// WHY: Module names match exactly
#[test]
fn module_names_are_case_and_prefix_exact() {
    let user = user_with(vec![ModulePermission::new("work-orders", [Action::Read])]);

    assert!(!has_permission(Some(&user), "Work-Orders", Action::Read));
    assert!(!has_permission(Some(&user), "work", Action::Read));
    assert!(!can_access_module(Some(&user), "work-orders/"));
}

/// WHY: Access to a module needs only an entry, any actions
#[test]
fn read_only_entry_counts_as_accessible() {
    let user = user_with(vec![ModulePermission::new("reports", [Action::Read])]);
    assert!(can_access_module(Some(&user), "reports"));
}
