//! Role-based access control
//!
//! A flat, static mapping from role to permission tokens. Lookups fail closed:
//! unknown profiles and roles without an entry are denied everything, and no
//! role inherits another role's permissions.

pub mod role;
pub mod rules;

pub use role::Role;
pub use rules::{can, can_profile, RuleTable, RULES};
