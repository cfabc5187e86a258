use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::FileService;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::is_valid_key;
use crate::services::assignments::download::archive_content_type;

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    key: String,
) -> ActixResult<HttpResponse> {
    if !is_valid_key(&key) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        )));
    }

    match service.get_object_store(request).get(&key).await {
        Ok(Some(data)) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, archive_content_type(&key)))
            .body(data)),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        ))),
        Err(e) => {
            tracing::error!("Object read failed for {}: {}", key, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            )
        }
    }
}
