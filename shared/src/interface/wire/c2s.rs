use {
    crate::interface::shared::Role,
    schemars::JsonSchema,
    serde::{
        Deserialize,
        Serialize,
    },
};

pub const PATH_ROLE_PERMISSIONS: &str = "role_permissions";
pub const PATH_LOGOUT: &str = "logout";

/// Request the permission keys granted to a role. Response:
/// `Vec<PermissionKey>`.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RolePermissionsGet {
    pub role: Role,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Logout {}
