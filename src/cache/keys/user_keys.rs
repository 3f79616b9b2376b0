/// 用户集合快照的默认缓存键
pub const USERS_COLLECTION_KEY: &str = "users";
