use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    ads::repo::AdRepo, auth::repo::UserRepo, catalog::repo::CatalogRepo, config::AppConfig,
    db::PgStore, memory::MemoryStore, session::Session,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub catalog: Arc<dyn CatalogRepo>,
    pub ads: Arc<dyn AdRepo>,
    pub config: Arc<AppConfig>,
    /// The single login slot of this process.
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let store = PgStore::connect(&config).await?;
        store.migrate().await?;
        Ok(Self::from_store(Arc::new(store), config))
    }

    pub fn from_store<S>(store: Arc<S>, config: AppConfig) -> Self
    where
        S: UserRepo + CatalogRepo + AdRepo + 'static,
    {
        Self {
            users: store.clone(),
            catalog: store.clone(),
            ads: store,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// State over an empty in-process store, for tests.
    pub fn fake() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (Self::from_store(store.clone(), AppConfig::default()), store)
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }
}
