//! Session state and its pure transition function

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::user::User;

/// Client-held record of the current identity
///
/// `is_authenticated` is derived from `user` and `token`, never stored.
/// Serialized views carry it as `isAuthenticated`; it is ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
}

impl Session {
    /// State at application start: anonymous, restoration pending
    pub fn initial() -> Self {
        Session {
            user: None,
            token: None,
            is_loading: true,
        }
    }

    /// Resolved anonymous state
    pub fn anonymous() -> Self {
        Session {
            user: None,
            token: None,
            is_loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut view = serializer.serialize_struct("Session", 4)?;
        view.serialize_field("user", &self.user)?;
        view.serialize_field("token", &self.token)?;
        view.serialize_field("isAuthenticated", &self.is_authenticated())?;
        view.serialize_field("isLoading", &self.is_loading)?;
        view.end()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

/// Actions accepted by [`reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    LoginStart,
    LoginSuccess { user: User, token: String },
    LoginFailure,
    Logout,
    UpdateUser(User),
    SetLoading(bool),
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::LoginStart => "LOGIN_START",
            SessionAction::LoginSuccess { .. } => "LOGIN_SUCCESS",
            SessionAction::LoginFailure => "LOGIN_FAILURE",
            SessionAction::Logout => "LOGOUT",
            SessionAction::UpdateUser(_) => "UPDATE_USER",
            SessionAction::SetLoading(_) => "SET_LOADING",
        }
    }
}

/// Apply one action to a session
///
/// Payloads are taken as-is; nothing here validates a user record.
pub fn reduce(state: Session, action: SessionAction) -> Session {
    match action {
        SessionAction::LoginStart => Session {
            is_loading: true,
            ..state
        },
        SessionAction::LoginSuccess { user, token } => Session {
            user: Some(user),
            token: Some(token),
            is_loading: false,
        },
        SessionAction::LoginFailure | SessionAction::Logout => Session::anonymous(),
        SessionAction::UpdateUser(user) => Session {
            user: Some(user),
            ..state
        },
        SessionAction::SetLoading(is_loading) => Session { is_loading, ..state },
    }
}
