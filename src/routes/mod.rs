pub mod assignments;

pub mod auth;

pub mod files;

pub mod users;

use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use users::configure_user_routes;

/// 配置全部路由
pub fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_auth_routes) // 配置认证相关路由
        .configure(configure_user_routes) // 配置用户相关路由
        .configure(configure_assignment_routes) // 配置作业提交相关路由
        .configure(configure_file_routes); // 配置文件访问路由
}

/// 未匹配任何路由时的 404 响应
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        format!("Route not found: {} {}", req.method(), req.path()),
    ))
}
