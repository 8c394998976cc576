use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{RequestStatus, Role, RoleRequest};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, ToSchema)]
pub struct SubmitRoleRequest {
    pub requested_role: Role,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, ToSchema)]
pub struct ResolveRoleRequest {
    pub status: RequestStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(transparent)]
pub struct RoleRequestList {
    #[schema(value_type = Vec<RoleRequest>)]
    pub items: Vec<RoleRequest>,
}
