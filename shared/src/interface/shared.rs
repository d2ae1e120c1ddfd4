use {
    schemars::JsonSchema,
    serde::{
        Deserialize,
        Serialize,
    },
};

/// Coarse authorization category assigned to an authenticated user.
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Role {
    User,
    Agent,
    Admin,
}

/// Fine-grained capability identifier, checked before allowing an action.
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum PermissionKey {
    TicketView,
    TicketCreate,
    TicketComment,
    TicketAssign,
    TicketClose,
    TicketDelete,
    UserManage,
    ReportView,
}

#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SessionInfo {
    pub user: String,
    pub role: Role,
}

/// Static per-role fallback used when the remote role->permissions lookup
/// fails. May be narrower or broader than the server's current table.
pub fn default_role_permissions(role: Role) -> &'static [PermissionKey] {
    match role {
        Role::User => return &[PermissionKey::TicketView, PermissionKey::TicketCreate, PermissionKey::TicketComment],
        Role::Agent => return &[
            PermissionKey::TicketView,
            PermissionKey::TicketCreate,
            PermissionKey::TicketComment,
            PermissionKey::TicketAssign,
            PermissionKey::TicketClose,
            PermissionKey::ReportView,
        ],
        Role::Admin => return &[
            PermissionKey::TicketView,
            PermissionKey::TicketCreate,
            PermissionKey::TicketComment,
            PermissionKey::TicketAssign,
            PermissionKey::TicketClose,
            PermissionKey::TicketDelete,
            PermissionKey::UserManage,
            PermissionKey::ReportView,
        ],
    }
}
