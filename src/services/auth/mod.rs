pub mod external;
pub mod login;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::identity::IdentityVerifier;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{ExternalLoginRequest, LoginRequest, LoginResponse},
    users::{entities::User, requests::RegisterRequest},
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_identity_verifier(&self, request: &HttpRequest) -> Arc<dyn IdentityVerifier> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn IdentityVerifier>>>()
            .expect("Identity verifier not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 密码登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 外部身份登录
    pub async fn external_login(
        &self,
        external_request: ExternalLoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        external::handle_external_login(self, external_request, request).await
    }

    // 用户注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 验证令牌
    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_verify_token(self, request).await
    }

    // 获取当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 签发 access token 并构造登录响应
    pub(crate) fn login_response(&self, user: User, message: &str) -> HttpResponse {
        match user.generate_access_token() {
            Ok(token) => {
                let response = LoginResponse {
                    token,
                    token_type: "Bearer",
                    expires_in: self.get_config().jwt.access_token_expiry * 60, // 转换为秒
                    user,
                };
                HttpResponse::Ok().json(ApiResponse::success(response, message))
            }
            Err(e) => {
                tracing::error!("Failed to generate JWT token: {}", e);
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                ))
            }
        }
    }
}

/// 邮箱统一小写、去除空白后再存储与查询
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
