use std::sync::Arc;

use crate::client::UsersClient;
use crate::config::AppConfig;
use crate::db;
use crate::ui::components::Templates;
use crate::users::repo::{InMemoryUserStore, PgUserStore, UserStore};
use crate::users::services::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub config: Arc<AppConfig>,
    /// Used by the UI pages to reach the JSON API.
    pub client: UsersClient,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database).await?;
        db::migrate(&pool).await;
        let store = Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>;
        Self::from_parts(store, Arc::new(config))
    }

    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>;
        Self::from_parts(store, Arc::new(config))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let client = UsersClient::new(&config.api_base_url);
        Ok(Self {
            users: UserService::new(store),
            config,
            client,
            templates: Arc::new(Templates::new()?),
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_api_base("http://127.0.0.1:9")
    }

    #[cfg(test)]
    pub fn with_api_base(api_base_url: &str) -> Self {
        let mut config = AppConfig::from_lookup(|_| None).expect("default config");
        config.api_base_url = api_base_url.to_string();
        Self::in_memory(config).expect("in-memory state")
    }
}
