use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, keys},
        error::ClientResult,
    },
    models::AdminStats,
};

impl Bazaar {
    pub async fn admin_stats(&self) -> ClientResult<AdminStats> {
        let api = self.api().clone();
        self.cache()
            .fetch(CacheKey::new(keys::ADMIN_STATS), move || async move {
                api.get("/admin/stats").await
            })
            .await
    }
}
