use reqwest::Method;
use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, keys},
        error::ClientResult,
    },
    dto::requests::{ResolveRoleRequest, RoleRequestList, SubmitRoleRequest},
    models::{RequestStatus, Role, RoleRequest},
};

pub const ALREADY_PENDING: &str = "You already have a pending request";

impl Bazaar {
    /// Asks for the chef or admin role. Refusals come back as a 400 whose
    /// message says why, [`ALREADY_PENDING`] while an earlier request is open.
    pub async fn request_role(&self, requested_role: Role) -> ClientResult<RoleRequest> {
        let request: RoleRequest = self
            .api()
            .send(Method::POST, "/requests", &SubmitRoleRequest { requested_role })
            .await?;
        self.cache().invalidate_resource(keys::REQUESTS);
        Ok(request)
    }

    /// Admin only.
    pub async fn role_requests(&self) -> ClientResult<Vec<RoleRequest>> {
        let api = self.api().clone();
        self.cache()
            .fetch(CacheKey::new(keys::REQUESTS), move || async move {
                let list: RoleRequestList = api.get("/requests").await?;
                Ok(list.items)
            })
            .await
    }

    /// Admin only. Approving changes the requester's role.
    pub async fn resolve_role_request(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> ClientResult<RoleRequest> {
        let request: RoleRequest = self
            .api()
            .send(
                Method::PATCH,
                &format!("/requests/{id}"),
                &ResolveRoleRequest { status },
            )
            .await?;
        let cache = self.cache();
        cache.invalidate_resource(keys::REQUESTS);
        cache.invalidate_resource(keys::USERS);
        cache.invalidate(&CacheKey::new(keys::ROLE).with(&request.user_email));
        cache.invalidate(&CacheKey::new(keys::USER).with(&request.user_email));
        Ok(request)
    }
}
