use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Role, User};

/// Sent on every sign-in; creates the profile on first contact.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct UpsertUserRequest {
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, ToSchema)]
pub struct RoleResponse {
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
