use serde::Deserialize;

/// 键值接口共用的查询参数
///
/// `value` 可以重复出现，列表接口按顺序全部追加，其余接口只取第一个。
#[derive(Debug, Default, Deserialize)]
pub struct KvQuery {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: Vec<String>,
}

impl KvQuery {
    pub fn first_value(&self) -> &str {
        self.value.first().map(String::as_str).unwrap_or_default()
    }
}
