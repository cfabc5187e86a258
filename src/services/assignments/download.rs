use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_extension;

pub async fn handle_download(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            tracing::error!("Assignment query failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Assignment query failed",
                )),
            );
        }
    };

    let data = match service.get_object_store(request).get(&assignment.file_key).await {
        Ok(Some(data)) => data,
        Ok(None) => {
            tracing::warn!(
                "Object {} for assignment {} is missing",
                assignment.file_key,
                assignment.id
            );
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            tracing::error!("Object read failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    Ok(HttpResponse::Ok()
        .insert_header((
            header::CONTENT_TYPE,
            archive_content_type(&assignment.file_key),
        ))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                assignment.download_file_name()
            ),
        ))
        .body(data))
}

/// 按扩展名推断压缩包的 MIME 类型
pub(crate) fn archive_content_type(key: &str) -> &'static str {
    match file_extension(key).as_deref() {
        Some(".zip") => "application/zip",
        Some(".rar") => "application/vnd.rar",
        Some(".7z") => "application/x-7z-compressed",
        Some(".gz") | Some(".tgz") => "application/gzip",
        _ => "application/octet-stream",
    }
}
