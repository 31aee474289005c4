use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::categories::repo::{CategoryRepo, PgCategoryRepo};
use crate::config::AppConfig;
use crate::db;
use crate::products::repo::{PgProductRepo, ProductRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub categories: Arc<dyn CategoryRepo>,
    pub products: Arc<dyn ProductRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgCategoryRepo::new(pool.clone())),
            Arc::new(PgProductRepo::new(pool)),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        categories: Arc<dyn CategoryRepo>,
        products: Arc<dyn ProductRepo>,
    ) -> Self {
        Self {
            config,
            users,
            categories,
            products,
        }
    }
}
