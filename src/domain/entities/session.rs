use serde::Serialize;

use crate::entities::user::PublicUser;

/// Where a client session stands after the last reload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    /// Valid only while the tab-scoped marker exists.
    Ephemeral(PublicUser),
    /// Survives browser restarts.
    Remembered(PublicUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&PublicUser> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Ephemeral(user) | SessionState::Remembered(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, SessionState::Anonymous)
    }

    pub fn is_remembered(&self) -> bool {
        matches!(self, SessionState::Remembered(_))
    }
}
