use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::PortalError;
use crate::identity::ExternalIdentity;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode, auth::ExternalLoginRequest};
use crate::utils::validate::require_non_blank;

use super::{AuthService, normalize_email};

const DEFAULT_EXTERNAL_NAME: &str = "External User";

pub async fn handle_external_login(
    service: &AuthService,
    external_request: ExternalLoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(credential) = require_non_blank(external_request.credential.as_deref()) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Identity credential is required",
        )));
    };

    // 1. 校验外部身份凭证
    let identity = match service.get_identity_verifier(request).verify(credential).await {
        Ok(identity) => identity,
        Err(e @ PortalError::IdentityProvider(_)) => {
            tracing::error!("External identity provider unavailable: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExternalIdentityFailed,
                    e.message(),
                )),
            );
        }
        Err(e) => {
            tracing::info!("External credential rejected: {}", e);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Invalid identity credential",
            )));
        }
    };

    match resolve_user(service, request, &identity).await {
        Ok(user) => {
            tracing::info!("User {} logged in with external identity", user.id);
            Ok(service.login_response(user, "External login successful"))
        }
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!("External login failed: {}", e);
            } else {
                tracing::info!("External login rejected: {}", e);
            }
            let code = match e {
                PortalError::Authentication(_) => ErrorCode::AuthFailed,
                _ => e.api_code(),
            };
            Ok(HttpResponse::build(e.status_code())
                .json(ApiResponse::error_empty(code, e.message())))
        }
    }
}

/// 外部身份 → 本地用户：先按外部 ID，再按邮箱绑定，都没有则新建
async fn resolve_user(
    service: &AuthService,
    request: &HttpRequest,
    identity: &ExternalIdentity,
) -> Result<User, PortalError> {
    let storage = service.get_storage(request);

    if let Some(user) = storage.get_user_by_external_id(&identity.subject).await? {
        return Ok(user);
    }

    let email = identity
        .email
        .as_deref()
        .map(normalize_email)
        .ok_or_else(|| PortalError::validation("Email not provided by identity provider"))?;

    match storage.get_user_by_email(&email).await? {
        Some(existing) => {
            if existing.external_id.is_some() {
                return Err(PortalError::authentication(
                    "Account is linked to a different external identity",
                ));
            }
            if service.get_config().identity.require_verified_email && !identity.email_verified {
                return Err(PortalError::authentication(
                    "Email must be verified by the identity provider to link this account",
                ));
            }
            storage
                .link_external_id(existing.id, &identity.subject)
                .await?
                .ok_or_else(|| PortalError::not_found("User not found"))
        }
        None => {
            let full_name = identity
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTERNAL_NAME.to_string());
            storage
                .create_user(CreateUserRequest {
                    email,
                    password_hash: None,
                    full_name,
                    role: UserRole::User,
                    external_id: Some(identity.subject.clone()),
                    matric_number: None,
                })
                .await
        }
    }
}
