use std::sync::Arc;
use std::time::Duration;

use application::{KvService, UserService};
use cache::CacheStore;
use config::CacheSettings;
use database::UserStore;

pub mod application;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub kv: KvService,
}

impl AppState {
    /// 由外部构造好的存储与缓存组装应用状态
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn CacheStore>,
        settings: CacheSettings,
    ) -> Self {
        let timeout: Duration = settings.operation_timeout;
        Self {
            users: UserService::new(store, Arc::clone(&cache), settings),
            kv: KvService::new(cache, timeout),
        }
    }
}
