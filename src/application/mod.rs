// 应用层
// 协调存储与缓存，所有后端调用都带超时

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

pub mod kv;
pub mod user_service;

pub use kv::KvService;
pub use user_service::UserService;

/// 在 `limit` 内执行一次后端调用，超时记为内部错误
pub(crate) async fn bounded<T, E, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Timeout { operation }),
    }
}

/// 必填字段检查，空字符串视为缺失
pub(crate) fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AppError> {
    if value.is_empty() {
        Err(AppError::MissingField(field))
    } else {
        Ok(value)
    }
}
