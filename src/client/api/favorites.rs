use reqwest::Method;
use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, keys},
        error::ClientResult,
    },
    dto::favorites::{AddFavoriteRequest, FavoriteList},
    models::Favorite,
};

#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteOutcome {
    Added(Favorite),
    AlreadyAdded,
}

impl FavoriteOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            FavoriteOutcome::Added(_) => "Added to favorites",
            FavoriteOutcome::AlreadyAdded => "Already added to favorites",
        }
    }
}

impl Bazaar {
    pub async fn favorites(&self) -> ClientResult<Vec<Favorite>> {
        let email = self.require_email()?;
        let api = self.api().clone();
        let path = format!("/favorites/{email}");
        self.cache()
            .fetch(CacheKey::new(keys::FAVORITES).with(email), move || async move {
                let list: FavoriteList = api.get(&path).await?;
                Ok(list.items)
            })
            .await
    }

    /// A duplicate add is reported as [`FavoriteOutcome::AlreadyAdded`], not
    /// as an error.
    pub async fn add_favorite(&self, meal_id: Uuid) -> ClientResult<FavoriteOutcome> {
        let email = self.require_email()?;
        let result: ClientResult<Favorite> = self
            .api()
            .send(Method::POST, "/favorites", &AddFavoriteRequest { meal_id })
            .await;

        match result {
            Ok(favorite) => {
                self.cache()
                    .invalidate(&CacheKey::new(keys::FAVORITES).with(email));
                Ok(FavoriteOutcome::Added(favorite))
            }
            Err(err) if err.is_conflict() => Ok(FavoriteOutcome::AlreadyAdded),
            Err(err) => Err(err),
        }
    }

    pub async fn remove_favorite(&self, id: Uuid) -> ClientResult<()> {
        let email = self.require_email()?;
        let _: serde_json::Value = self.api().delete(&format!("/favorites/{id}")).await?;
        self.cache()
            .invalidate(&CacheKey::new(keys::FAVORITES).with(email));
        Ok(())
    }
}
