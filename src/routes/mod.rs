// 路由模块

pub mod kv;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware::log_errors};

/// 组装全部路由
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/users", get(user::list_users))
        .route("/user", post(user::create_user))
        .route("/user/update", post(user::update_user))
        .route("/user/delete", post(user::delete_user));

    // 键值接口 GET / POST 均可
    let kv_routes = Router::new()
        .route("/set-string", get(kv::set_string).post(kv::set_string))
        .route("/get-string", get(kv::get_string).post(kv::get_string))
        .route("/set-list", get(kv::set_list).post(kv::set_list))
        .route("/get-list", get(kv::get_list).post(kv::get_list))
        .route("/set-hash", get(kv::set_hash).post(kv::set_hash))
        .route("/get-hash", get(kv::get_hash).post(kv::get_hash));

    Router::new()
        .merge(user_routes)
        .merge(kv_routes)
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
