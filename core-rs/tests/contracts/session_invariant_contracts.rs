// Session Invariant Contract Tests
//
// These tests pin behavior that views depend on. Every view reads
// `is_authenticated` and `is_loading`; if these drift, the route guard
// renders content for anonymous visitors or blocks signed-in ones.

use pcab_core::session::{reduce, Role, Session, SessionAction, User};

fn user(id: &str) -> User {
    User::new(id, "Contract", "User", "contract@portacabin.com", Role::Employee)
}

fn alphabet() -> Vec<SessionAction> {
    vec![
        SessionAction::LoginStart,
        SessionAction::LoginSuccess { user: user("1"), token: "tok".to_string() },
        SessionAction::LoginFailure,
        SessionAction::Logout,
        SessionAction::UpdateUser(user("2")),
        SessionAction::SetLoading(true),
        SessionAction::SetLoading(false),
    ]
}

/// All action sequences of exactly `len` steps
fn sequences(len: usize) -> Vec<Vec<SessionAction>> {
    let mut out = vec![Vec::new()];
    for _ in 0..len {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                alphabet().into_iter().map(move |a| {
                    let mut next = prefix.clone();
                    next.push(a);
                    next
                })
            })
            .collect();
    }
    out
}

/// WHY: `is_authenticated` must equal `user && token` after every step
/// BREAKS: Guard decisions; a user without a token would pass the guard
#[test]
fn authenticated_iff_user_and_token_for_all_sequences() {
    for len in 1..=4 {
        for seq in sequences(len) {
            let mut state = Session::initial();
            for action in seq.iter().cloned() {
                state = reduce(state, action);
                assert_eq!(
                    state.is_authenticated(),
                    state.user.is_some() && state.token.is_some(),
                    "sequence: {:?}",
                    seq.iter().map(|a| a.name()).collect::<Vec<_>>()
                );
            }
        }
    }
}

/// WHY: Logout must fully reset the session
/// BREAKS: A stale user would survive logout if this changes
#[test]
fn login_success_then_logout_is_initial_but_resolved() {
    let logged_in = reduce(
        Session::initial(),
        SessionAction::LoginSuccess { user: user("1"), token: "tok".to_string() },
    );
    let out = reduce(logged_in, SessionAction::Logout);

    let mut expected = Session::initial();
    expected.is_loading = false;
    assert_eq!(out, expected);
}

/// WHY: LOGIN_FAILURE and LOGOUT share one terminal state from any start
#[test]
fn failure_and_logout_are_terminal_from_any_state() {
    for seq in sequences(2) {
        let mut state = Session::initial();
        for action in seq {
            state = reduce(state, action);
        }
        assert_eq!(reduce(state.clone(), SessionAction::LoginFailure), Session::anonymous());
        assert_eq!(reduce(state, SessionAction::Logout), Session::anonymous());
    }
}

/// WHY: UPDATE_USER and SET_LOADING must not touch the other fields
#[test]
fn narrow_actions_touch_only_their_field() {
    for seq in sequences(2) {
        let mut state = Session::initial();
        for action in seq {
            state = reduce(state, action);
        }

        let updated = reduce(state.clone(), SessionAction::UpdateUser(user("9")));
        assert_eq!(updated.token, state.token);
        assert_eq!(updated.is_loading, state.is_loading);

        let flagged = reduce(state.clone(), SessionAction::SetLoading(!state.is_loading));
        assert_eq!(flagged.user, state.user);
        assert_eq!(flagged.token, state.token);
    }
}
