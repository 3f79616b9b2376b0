#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tokio::sync::oneshot;
use tower::ServiceExt;
use user_cache::{
    AppState,
    application::UserService,
    cache::{CacheError, CacheStore, MemoryCache},
    config::{CacheFillPolicy, CacheSettings},
    database::{StoreError, UserEntity, UserStore},
    routes,
};

pub fn settings() -> CacheSettings {
    CacheSettings {
        users_key: "users".to_string(),
        fill_ttl: Duration::from_secs(10),
        refresh_ttl: Duration::from_secs(60),
        operation_timeout: Duration::from_millis(500),
        fill_policy: CacheFillPolicy::Strict,
    }
}

pub fn service(store: Arc<dyn UserStore>, cache: Arc<dyn CacheStore>) -> UserService {
    UserService::new(store, cache, settings())
}

pub fn app(store: Arc<dyn UserStore>, cache: Arc<dyn CacheStore>) -> Router {
    routes::router(AppState::new(store, cache, settings()))
}

/// 解析用户集合并按 id 排序，避免依赖存储顺序
pub fn decode_users(payload: &[u8]) -> Vec<UserEntity> {
    let mut users: Vec<UserEntity> =
        serde_json::from_slice(payload).expect("payload should be a JSON array of users");
    users.sort_by_key(|user| user.id);
    users
}

pub fn usernames(payload: &[u8]) -> Vec<String> {
    decode_users(payload)
        .into_iter()
        .map(|user| user.username)
        .collect()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();

    TestResponse {
        status,
        content_type,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

fn backend_down() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

fn cache_down() -> CacheError {
    CacheError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection refused",
    )))
}

/// 内存中的用户表，记录调用次数并可注入故障
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<Vec<UserEntity>>,
    next_id: Mutex<i32>,
    calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 绕过服务层直接写表
    pub fn insert_out_of_band(&self, username: &str, email: &str) {
        self.push_row(username, email);
    }

    pub fn rows(&self) -> Vec<UserEntity> {
        self.rows.lock().unwrap().clone()
    }

    fn push_row(&self, username: &str, email: &str) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.rows.lock().unwrap().push(UserEntity {
            id: *next_id,
            username: username.to_string(),
            email: email.to_string(),
        });
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if flag.load(Ordering::SeqCst) {
            Err(backend_down())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn query_all_users(&self) -> Result<Vec<UserEntity>, StoreError> {
        self.check(&self.fail_reads)?;
        Ok(self.rows())
    }

    async fn insert_user(&self, username: &str, email: &str) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;
        self.push_row(username, email);
        Ok(())
    }

    async fn update_user_email(&self, username: &str, email: &str) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.username == username {
                row.email = email.to_string();
            }
        }
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;
        self.rows.lock().unwrap().retain(|row| row.username != username);
        Ok(())
    }
}

/// 永远不返回的存储，用来触发超时
pub struct HangingStore;

#[async_trait]
impl UserStore for HangingStore {
    async fn query_all_users(&self) -> Result<Vec<UserEntity>, StoreError> {
        std::future::pending().await
    }

    async fn insert_user(&self, _username: &str, _email: &str) -> Result<(), StoreError> {
        std::future::pending().await
    }

    async fn update_user_email(&self, _username: &str, _email: &str) -> Result<(), StoreError> {
        std::future::pending().await
    }

    async fn delete_user(&self, _username: &str) -> Result<(), StoreError> {
        std::future::pending().await
    }
}

/// 包装 MemoryCache，记录调用次数并可注入故障
#[derive(Default)]
pub struct FakeCache {
    inner: MemoryCache,
    calls: AtomicUsize,
    sets: AtomicUsize,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
}

impl FakeCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_set(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    /// 不计数地查看缓存内容
    pub async fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.get(key).await.expect("memory cache get")
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for FakeCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.record();
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(cache_down());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        self.record();
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(cache_down());
        }
        self.inner.set(key, value, ttl).await
    }

    async fn push_list(&self, key: &str, values: &[String]) -> Result<(), CacheError> {
        self.record();
        self.inner.push_list(key, values).await
    }

    async fn range_list(&self, key: &str) -> Result<Vec<String>, CacheError> {
        self.record();
        self.inner.range_list(key).await
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<(), CacheError> {
        self.record();
        self.inner.set_hash_field(key, field, value).await
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        self.record();
        self.inner.get_hash_field(key, field).await
    }
}

/// 第一次 `set` 会停在闸门前，直到测试放行
pub struct GatedCache {
    inner: MemoryCache,
    gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

pub struct GateHandle {
    pub entered: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

impl GatedCache {
    pub fn new() -> (Arc<Self>, GateHandle) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let cache = Arc::new(Self {
            inner: MemoryCache::new(),
            gate: Mutex::new(Some((entered_tx, release_rx))),
        });
        (
            cache,
            GateHandle {
                entered: entered_rx,
                release: release_tx,
            },
        )
    }
}

#[async_trait]
impl CacheStore for GatedCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            let _ = entered.send(());
            let _ = release.await;
        }
        self.inner.set(key, value, ttl).await
    }

    async fn push_list(&self, key: &str, values: &[String]) -> Result<(), CacheError> {
        self.inner.push_list(key, values).await
    }

    async fn range_list(&self, key: &str) -> Result<Vec<String>, CacheError> {
        self.inner.range_list(key).await
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<(), CacheError> {
        self.inner.set_hash_field(key, field, value).await
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        self.inner.get_hash_field(key, field).await
    }
}

/// 所有调用都不返回的缓存，用来触发缓存超时
pub struct HangingCache;

#[async_trait]
impl CacheStore for HangingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn push_list(&self, _key: &str, _values: &[String]) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn range_list(&self, _key: &str) -> Result<Vec<String>, CacheError> {
        std::future::pending().await
    }

    async fn set_hash_field(&self, _key: &str, _field: &str, _value: &str) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn get_hash_field(&self, _key: &str, _field: &str) -> Result<Option<String>, CacheError> {
        std::future::pending().await
    }
}
