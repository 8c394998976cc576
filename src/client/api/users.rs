use reqwest::Method;

use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, keys},
        error::ClientResult,
    },
    dto::users::{UpdateProfileRequest, UserList},
    models::User,
};

impl Bazaar {
    pub async fn profile(&self) -> ClientResult<User> {
        let email = self.require_email()?;
        let api = self.api().clone();
        let path = format!("/user/{email}");
        self.cache()
            .fetch(CacheKey::new(keys::USER).with(email), move || async move {
                api.get(&path).await
            })
            .await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientResult<User> {
        let email = self.require_email()?;
        let user: User = self
            .api()
            .send(Method::PATCH, "/users/profile", request)
            .await?;
        self.cache().invalidate(&CacheKey::new(keys::USER).with(&email));
        self.cache().invalidate_resource(keys::USERS);
        self.session().refresh_profile().await?;
        Ok(user)
    }

    /// Admin only.
    pub async fn users(&self) -> ClientResult<Vec<User>> {
        let api = self.api().clone();
        self.cache()
            .fetch(CacheKey::new(keys::USERS), move || async move {
                let list: UserList = api.get("/users").await?;
                Ok(list.items)
            })
            .await
    }

    /// Admin only. Blocks the user from ordering and from adding meals.
    pub async fn flag_fraud(&self, email: &str) -> ClientResult<User> {
        let user: User = self
            .api()
            .send(
                Method::PATCH,
                &format!("/users/fraud/{email}"),
                &serde_json::json!({}),
            )
            .await?;
        tracing::info!(%email, "user flagged as fraud");
        self.cache().invalidate_resource(keys::USERS);
        self.cache().invalidate(&CacheKey::new(keys::USER).with(email));
        Ok(user)
    }
}
