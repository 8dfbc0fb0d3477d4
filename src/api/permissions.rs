//! Permission lookup handlers
//!
//! Lets the UI ask the rule table which actions to offer.

use crate::rbac::{self, Role, RULES};
use axum::extract::{Path, Query};
use axum::response::Json;
use serde::{Deserialize, Serialize};

/// Query for `GET /api/permissions/check`
#[derive(Debug, Deserialize)]
pub struct PermissionQuery {
    /// Profile string of the user
    pub profile: String,
    /// Permission token, e.g. `campaigns:create`
    pub permission: String,
}

/// Answer to a permission check
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PermissionCheckResponse {
    /// Profile that was checked
    pub profile: String,
    /// Permission that was checked
    pub permission: String,
    /// Whether it is granted
    pub allowed: bool,
}

/// Permissions listed for a profile
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PermissionListResponse {
    /// Profile that was looked up
    pub profile: String,
    /// Granted permission tokens; empty for unknown profiles
    pub permissions: Vec<String>,
}

/// GET /api/permissions/check - Check one permission
pub async fn check_permission(Query(query): Query<PermissionQuery>) -> Json<PermissionCheckResponse> {
    let allowed = rbac::can_profile(&query.profile, &query.permission);
    Json(PermissionCheckResponse {
        profile: query.profile,
        permission: query.permission,
        allowed,
    })
}

/// GET /api/permissions/:profile - List a profile's permissions
pub async fn list_permissions(Path(profile): Path<String>) -> Json<PermissionListResponse> {
    let permissions = profile
        .parse::<Role>()
        .map(|role| RULES.permissions(role).to_vec())
        .unwrap_or_default();
    Json(PermissionListResponse {
        profile,
        permissions,
    })
}
