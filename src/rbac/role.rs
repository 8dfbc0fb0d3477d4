//! Role identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static category of helpdesk user
///
/// Roles are fixed at build time. The profile string stored on a user record
/// (`"user"`, `"admin"`) parses into one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular agent
    User,
    /// Administrator
    Admin,
}

impl Role {
    /// Profile string as stored on the user record
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// All known roles
    pub fn all() -> [Role; 2] {
        [Role::User, Role::Admin]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a profile string names no known role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match only; "Admin" is not "admin".
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
