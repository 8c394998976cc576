use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, create_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects to `config.database_url` and brings the schema up to date.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database_url).await?;
        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}
