use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::VerifyMatricRequest, responses::MatricVerificationResponse},
};
use crate::utils::validate::{require_non_blank, validate_matric_number};

pub async fn verify_matric(
    service: &UserService,
    verify_request: VerifyMatricRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 1. 格式校验
    let Some(matric) = require_non_blank(verify_request.matric_number.as_deref()) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserMatricInvalid,
            "Matric number is required",
        )));
    };
    if let Err(msg) = validate_matric_number(matric) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserMatricInvalid, msg)));
    }

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    // 2. 读取登记的学号
    let user = match service.get_storage(request).get_user_by_id(user_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to load user {}: {}", user_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to verify matric number",
                )),
            );
        }
    };

    let Some(stored) = user.and_then(|u| u.matric_number) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "No matric number on record for this user",
        )));
    };

    // 3. 比对（不区分大小写）
    if !stored.trim().eq_ignore_ascii_case(matric) {
        tracing::info!("Matric verification mismatch for user {}", user_id);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::UserMatricMismatch,
            "Matric number does not match",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MatricVerificationResponse { success: true },
        "Matric number verified",
    )))
}
