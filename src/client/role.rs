use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, QueryCache, keys},
        http::ApiClient,
        session::SessionSnapshot,
    },
    dto::users::RoleResponse,
    models::Role,
};

/// Role of the signed-in caller. Falls back to [`Role::User`] while the
/// session is unknown, when signed out, or when the lookup fails.
///
/// The role only decides what the client shows; the backend authorizes.
pub async fn resolve_role(api: &ApiClient, cache: &QueryCache, session: &SessionSnapshot) -> Role {
    let Some(email) = session.email() else {
        return Role::default();
    };

    let key = CacheKey::new(keys::ROLE).with(email);
    let api = api.clone();
    let path = format!("/user/role/{email}");
    let result = cache
        .fetch(key, move || async move {
            let resp: RoleResponse = api.get(&path).await?;
            Ok(resp.role)
        })
        .await;

    match result {
        Ok(role) => role,
        Err(err) => {
            tracing::warn!(%email, error = %err, "role lookup failed, using default");
            Role::default()
        }
    }
}

impl Bazaar {
    pub async fn current_role(&self) -> Role {
        let snapshot = self.session().snapshot();
        resolve_role(self.api(), self.cache(), &snapshot).await
    }
}
