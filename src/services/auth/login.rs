use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode, auth::LoginRequest};
use crate::utils::password::verify_password;
use crate::utils::validate::require_non_blank;

use super::{AuthService, normalize_email};

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(email), Some(password)) = (
        require_non_blank(login_request.email.as_deref()),
        login_request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Email and password are required",
        )));
    };

    let storage = service.get_storage(request);

    // 1. 根据邮箱获取用户信息
    let user = match storage.get_user_by_email(&normalize_email(email)).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed",
                )),
            );
        }
    };

    // 2. 验证密码；未知邮箱、无密码账户与密码错误返回相同的错误
    let Some(user) = user.filter(|user| {
        user.password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash))
    }) else {
        tracing::info!("Password login rejected for {}", email);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Invalid credentials",
        )));
    };

    // 3. 签发令牌
    tracing::info!("User {} logged in successfully", user.id);
    Ok(service.login_response(user, "Login successful"))
}
