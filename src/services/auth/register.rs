use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::PortalError;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateUserRequest, RegisterRequest};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password;
use crate::utils::validate::{require_non_blank, validate_email, validate_matric_number};

use super::{AuthService, normalize_email};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 1. 必填字段
    let (Some(email), Some(password), Some(full_name)) = (
        require_non_blank(register_request.email.as_deref()),
        register_request
            .password
            .as_deref()
            .filter(|p| !p.is_empty()),
        require_non_blank(register_request.full_name.as_deref()),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "All fields are required",
        )));
    };
    let email = normalize_email(email);

    // 2. 验证邮箱
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    // 3. 学号可选，提供时必须符合格式
    let matric_number = require_non_blank(register_request.matric_number.as_deref());
    if let Some(matric) = matric_number
        && let Err(msg) = validate_matric_number(matric)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserMatricInvalid, msg)));
    }

    let storage = service.get_storage(request);

    // 4. 检查邮箱是否已存在
    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "User already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Register lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Registration failed",
                )),
            );
        }
    }

    // 5. 哈希密码
    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Registration failed",
                )),
            );
        }
    };

    // 6. 创建用户
    let create_request = CreateUserRequest {
        email,
        password_hash: Some(password_hash),
        full_name: full_name.to_string(),
        role: UserRole::User,
        external_id: None,
        matric_number: matric_number.map(str::to_string),
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered", user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "User registered successfully",
            )))
        }
        // 并发注册命中唯一索引
        Err(PortalError::Validation(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, msg),
        )),
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Registration failed",
                )),
            )
        }
    }
}
