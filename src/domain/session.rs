//! Caller identity and role.
//!
//! Authentication itself happens upstream (the mobile client signs in
//! against the identity provider and requests arrive with forwarded
//! identity headers); the gateway only consumes the resolved identity as
//! an explicit [`Session`] value threaded into every coordinator call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two application roles.
///
/// Managers may mutate events, messages, and payments; supervisors have
/// read-only access to all three collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create, edit, and delete events and toggle paid/sent flags.
    Manager,
    /// Read-only access.
    Supervisor,
}

impl Role {
    /// Returns `true` for the manager role.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::Supervisor => write!(f, "supervisor"),
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "supervisor" => Ok(Self::Supervisor),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Error returned when a role string is neither `manager` nor `supervisor`.
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Resolved identity for one request.
///
/// Lifecycle follows the sign-in session: constructed when the upstream
/// proxy forwards identity headers, dropped when the request completes.
/// No ambient singleton holds the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identifier of the authenticated user.
    pub user_id: String,
    /// Resolved application role.
    pub role: Role,
}

impl Session {
    /// Creates a session for the given user and role.
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("manager".parse::<Role>().ok(), Some(Role::Manager));
        assert_eq!("Supervisor".parse::<Role>().ok(), Some(Role::Supervisor));
        assert_eq!(" MANAGER ".parse::<Role>().ok(), Some(Role::Manager));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn only_manager_is_manager() {
        assert!(Role::Manager.is_manager());
        assert!(!Role::Supervisor.is_manager());
    }

    #[test]
    fn display_round_trips() {
        for role in [Role::Manager, Role::Supervisor] {
            assert_eq!(role.to_string().parse::<Role>().ok(), Some(role));
        }
    }
}
