//! Permission rule table
//!
//! Each role lists its permissions explicitly. `admin` does not hold the
//! `user` permissions unless they are written under `admin` too.

use crate::rbac::role::Role;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const USER_PERMISSIONS: &[&str] = &[
    "campaigns:view",
    "campaigns:create",
    "campaigns:edit",
    "campaigns:delete",
];

const ADMIN_PERMISSIONS: &[&str] = &[
    "dashboard:view",
    "drawer-admin-items:view",
    "tickets-manager:showall",
    "user-modal:editProfile",
    "user-modal:editQueues",
    "ticket-options:deleteTicket",
    "contacts-page:deleteContact",
    "connections-page:actionButtons",
    "connections-page:addConnection",
    "connections-page:editOrDeleteConnection",
    "campaigns:create",
    "campaigns:edit",
    "campaigns:delete",
];

/// Process-wide rule table
pub static RULES: Lazy<RuleTable> = Lazy::new(RuleTable::builtin);

/// Mapping from role to the permission tokens it holds
///
/// Tokens keep their listed order for readability; membership is an exact,
/// case-sensitive string comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: HashMap<Role, Vec<String>>,
}

impl RuleTable {
    /// The table shipped with the application
    pub fn builtin() -> Self {
        Self::from_entries([
            (Role::User, USER_PERMISSIONS),
            (Role::Admin, ADMIN_PERMISSIONS),
        ])
    }

    /// Build a table from explicit `(role, permissions)` entries
    ///
    /// A role that appears more than once keeps the union of its lists.
    pub fn from_entries<I, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: HashMap<Role, Vec<String>> = HashMap::new();
        for (role, permissions) in entries {
            rules
                .entry(role)
                .or_default()
                .extend(permissions.into_iter().map(|p| p.as_ref().to_string()));
        }
        Self { rules }
    }

    /// Whether `role` holds `permission`
    ///
    /// Roles without an entry are denied.
    pub fn can(&self, role: Role, permission: &str) -> bool {
        self.rules
            .get(&role)
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }

    /// Whether the role named by `profile` holds `permission`
    ///
    /// Unknown profiles are denied.
    pub fn can_profile(&self, profile: &str, permission: &str) -> bool {
        match profile.parse::<Role>() {
            Ok(role) => self.can(role, permission),
            Err(e) => {
                tracing::debug!(profile = %profile, permission = %permission, "{}", e);
                false
            }
        }
    }

    /// Permission tokens listed for `role`, empty when the role has no entry
    pub fn permissions(&self, role: Role) -> &[String] {
        self.rules.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `role` has an entry at all
    pub fn contains_role(&self, role: Role) -> bool {
        self.rules.contains_key(&role)
    }
}

/// Check `permission` for `role` against the built-in table
pub fn can(role: Role, permission: &str) -> bool {
    RULES.can(role, permission)
}

/// Check `permission` for a profile string against the built-in table
pub fn can_profile(profile: &str, permission: &str) -> bool {
    RULES.can_profile(profile, permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_permissions() {
        assert!(can(Role::User, "campaigns:create"));
        assert!(can(Role::User, "campaigns:view"));
        assert!(!can(Role::User, "dashboard:view"));
        assert!(!can(Role::User, "tickets-manager:showall"));
    }

    #[test]
    fn test_admin_does_not_inherit_user_permissions() {
        // campaigns:view is listed for user only
        assert!(can(Role::User, "campaigns:view"));
        assert!(!can(Role::Admin, "campaigns:view"));
        assert!(can(Role::Admin, "campaigns:create"));
        assert!(can(Role::Admin, "dashboard:view"));
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        assert!(can(Role::Admin, "user-modal:editProfile"));
        assert!(!can(Role::Admin, "user-modal:editprofile"));
        assert!(!can(Role::Admin, "campaigns:*"));
        assert!(!can(Role::Admin, "campaigns"));
        assert!(!can(Role::Admin, ""));
    }

    #[test]
    fn test_every_listed_permission_is_granted() {
        for role in Role::all() {
            for permission in RULES.permissions(role) {
                assert!(can(role, permission), "{} should hold {}", role, permission);
            }
        }
    }

    #[test]
    fn test_unknown_profile_is_denied() {
        assert!(can_profile("user", "campaigns:create"));
        assert!(!can_profile("supervisor", "campaigns:create"));
        assert!(!can_profile("", "campaigns:create"));
        assert!(!can_profile("Admin", "dashboard:view"));
    }

    #[test]
    fn test_role_without_entry_is_denied() {
        let table = RuleTable::from_entries([(Role::User, ["campaigns:view"])]);
        assert!(!table.contains_role(Role::Admin));
        assert!(!table.can(Role::Admin, "campaigns:view"));
        assert!(table.permissions(Role::Admin).is_empty());
        assert!(table.can(Role::User, "campaigns:view"));
    }

    #[test]
    fn test_duplicate_entries_are_harmless() {
        let table = RuleTable::from_entries([
            (Role::User, vec!["a:b", "a:b"]),
            (Role::User, vec!["c:d"]),
        ]);
        assert!(table.can(Role::User, "a:b"));
        assert!(table.can(Role::User, "c:d"));
        assert_eq!(table.permissions(Role::User).len(), 3);
    }

    #[test]
    fn test_builtin_keeps_listed_order() {
        let listed: Vec<&str> = RULES
            .permissions(Role::User)
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(listed, USER_PERMISSIONS);
    }
}
