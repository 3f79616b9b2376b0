use serde::Deserialize;

/// 创建/更新用户的请求体
///
/// 字段缺失时为 `None`，由服务层统一判定为客户端错误。
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserPayload {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserQuery {
    #[serde(default)]
    pub username: String,
}
