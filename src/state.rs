use std::sync::Arc;

use anyhow::Context;
use mongodb::{Client, Database};

use crate::auth::repo::User;
use crate::config::AppConfig;
use crate::storage::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());

        let client = Client::with_uri_str(&config.mongo_uri)
            .await
            .context("connect to mongodb")?;
        let db = client.database(&config.mongo_db);

        tracing::debug!("setting up user indexes");
        User::ensure_indexes(&db).await.context("create user indexes")?;

        let uploads = Arc::new(UploadStore::new(&config.uploads_dir));
        uploads.ensure_dir().await?;

        Ok(Self {
            db,
            config,
            uploads,
        })
    }
}
