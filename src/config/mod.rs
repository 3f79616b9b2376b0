use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::cache::keys::USERS_COLLECTION_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 读缓存未命中时，回填缓存失败的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheFillPolicy {
    /// 回填失败视为请求失败 (500)
    #[default]
    Strict,
    /// 回填失败只记录日志，仍返回刚查询到的数据
    Lenient,
}

impl FromStr for CacheFillPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(CacheFillPolicy::Strict),
            "lenient" => Ok(CacheFillPolicy::Lenient),
            _ => Err(()),
        }
    }
}

/// 用户集合缓存的参数
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub users_key: String,
    /// 读未命中回填时使用的过期时间
    pub fill_ttl: Duration,
    /// 写操作之后刷新缓存时使用的过期时间
    pub refresh_ttl: Duration,
    /// 单次存储/缓存调用的超时
    pub operation_timeout: Duration,
    pub fill_policy: CacheFillPolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            users_key: USERS_COLLECTION_KEY.to_string(),
            fill_ttl: Duration::from_secs(120),
            refresh_ttl: Duration::from_secs(300),
            operation_timeout: Duration::from_millis(2000),
            fill_policy: CacheFillPolicy::Strict,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub users_cache_key: String,
    pub users_cache_ttl_secs: u64,
    pub users_refresh_ttl_secs: u64,
    pub operation_timeout_ms: u64,
    pub cache_fill_policy: CacheFillPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 通过任意查找函数构造配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CacheSettings::default();

        Ok(Config {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            server_host: parse_or(&lookup, "SERVER_HOST", IpAddr::from([0, 0, 0, 0]))?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            users_cache_key: lookup("USERS_CACHE_KEY").unwrap_or(defaults.users_key),
            users_cache_ttl_secs: parse_positive(
                &lookup,
                "USERS_CACHE_TTL_SECS",
                defaults.fill_ttl.as_secs(),
            )?,
            users_refresh_ttl_secs: parse_positive(
                &lookup,
                "USERS_REFRESH_TTL_SECS",
                defaults.refresh_ttl.as_secs(),
            )?,
            operation_timeout_ms: parse_positive(
                &lookup,
                "OPERATION_TIMEOUT_MS",
                defaults.operation_timeout.as_millis() as u64,
            )?,
            cache_fill_policy: parse_or(&lookup, "CACHE_FILL_POLICY", defaults.fill_policy)?,
        })
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            users_key: self.users_cache_key.clone(),
            fill_ttl: Duration::from_secs(self.users_cache_ttl_secs),
            refresh_ttl: Duration::from_secs(self.users_refresh_ttl_secs),
            operation_timeout: self.operation_timeout(),
            fill_policy: self.cache_fill_policy,
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        None => Ok(default),
    }
}

/// 过期时间和超时不允许为 0
fn parse_positive<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, name, default)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: "0".to_string(),
        }),
        value => Ok(value),
    }
}
