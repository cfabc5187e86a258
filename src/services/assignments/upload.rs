use actix_multipart::{Field, Multipart};
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use super::AssignmentService;
use super::download::archive_content_type;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::generate_assignment_key;
use crate::utils::validate::require_non_blank;
use crate::utils::{file_extension, validate_magic_bytes};

// 文本字段的最大字节数
const MAX_TEXT_FIELD_SIZE: usize = 1024;

#[derive(Default)]
struct UploadForm {
    student_name: Option<String>,
    matric_number: Option<String>,
    level: Option<String>,
    course_code: Option<String>,
    file: Option<UploadedFile>,
}

struct UploadedFile {
    extension: String,
    data: Bytes,
}

fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub async fn handle_upload(
    service: &AssignmentService,
    req: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    // 1. 解析表单；文件类型不合法时立即拒绝
    let form = match read_form(service, payload).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    // 2. 字段校验
    let (Some(student_name), Some(matric_number), Some(level), Some(course_code)) = (
        require_non_blank(form.student_name.as_deref()),
        require_non_blank(form.matric_number.as_deref()),
        require_non_blank(form.level.as_deref()),
        require_non_blank(form.course_code.as_deref()),
    ) else {
        return Ok(bad_request(
            ErrorCode::AssignmentFieldMissing,
            "All fields are required",
        ));
    };

    let min_matric_length = service.get_config().upload.min_matric_length;
    if matric_number.chars().count() < min_matric_length {
        return Ok(bad_request(
            ErrorCode::UserMatricInvalid,
            &format!("Matric number must be at least {min_matric_length} characters"),
        ));
    }

    let Some(file) = form.file else {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    // 3. 写入对象存储
    let object_store = service.get_object_store(req);
    let key = generate_assignment_key(&file.extension);
    let stored = match object_store
        .put(&key, file.data, archive_content_type(&key))
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Failed to store assignment archive: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "Failed to store file",
                )),
            );
        }
    };

    // 4. 写入提交记录；失败时删除已写入的对象
    let create_request = CreateAssignmentRequest {
        student_name: student_name.to_string(),
        matric_number: matric_number.to_string(),
        level: level.to_string(),
        course_code: course_code.to_string(),
        file_url: stored.url.clone(),
        file_key: stored.key.clone(),
        uploaded_at: chrono::Utc::now(),
    };

    match service.get_storage(req).create_assignment(create_request).await {
        Ok(assignment) => {
            tracing::info!(
                "Assignment {} uploaded for {}",
                assignment.id,
                assignment.matric_number
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Assignment uploaded successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to record assignment: {}", e);
            if let Err(cleanup) = object_store.delete(&stored.key).await {
                tracing::error!(
                    "Failed to remove orphaned object {}: {}",
                    stored.key,
                    cleanup
                );
            }
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "Failed to save assignment",
                )),
            )
        }
    }
}

async fn read_form(
    service: &AssignmentService,
    mut payload: Multipart,
) -> Result<UploadForm, HttpResponse> {
    let config = &service.get_config().upload;
    let mut form = UploadForm::default();

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::info!("Malformed multipart payload: {}", e);
                return Err(bad_request(
                    ErrorCode::BadRequest,
                    "Malformed multipart payload",
                ));
            }
        };

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }

                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();

                // 扩展名与声明的 MIME 类型在读取内容前校验
                let extension = file_extension(&file_name)
                    .filter(|ext| {
                        config
                            .allowed_types
                            .iter()
                            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
                    })
                    .ok_or_else(|| {
                        bad_request(
                            ErrorCode::FileTypeNotAllowed,
                            "Only archive files are allowed",
                        )
                    })?;

                if let Some(mime) = field.content_type() {
                    let declared = mime.essence_str();
                    if !config
                        .allowed_content_types
                        .iter()
                        .any(|allowed| allowed.eq_ignore_ascii_case(declared))
                    {
                        return Err(bad_request(
                            ErrorCode::FileTypeNotAllowed,
                            "File content type is not an accepted archive format",
                        ));
                    }
                }

                let data = read_limited(&mut field, config.max_size)
                    .await?
                    .ok_or_else(|| {
                        bad_request(ErrorCode::FileSizeExceeded, "File size exceeds the limit")
                    })?;

                if !validate_magic_bytes(&data, &extension) {
                    return Err(bad_request(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }

                form.file = Some(UploadedFile { extension, data });
            }
            "studentName" | "matricNumber" | "level" | "courseCode" => {
                let raw = read_limited(&mut field, MAX_TEXT_FIELD_SIZE)
                    .await?
                    .ok_or_else(|| bad_request(ErrorCode::BadRequest, "Form field is too long"))?;
                let value = String::from_utf8(raw.to_vec()).map_err(|_| {
                    bad_request(ErrorCode::BadRequest, "Form field is not valid UTF-8")
                })?;

                let slot = match name.as_str() {
                    "studentName" => &mut form.student_name,
                    "matricNumber" => &mut form.matric_number,
                    "level" => &mut form.level,
                    _ => &mut form.course_code,
                };
                *slot = Some(value);
            }
            _ => {
                // 忽略未知字段，但需要消费其内容
                while let Some(chunk) = field.next().await {
                    if chunk.is_err() {
                        break;
                    }
                }
            }
        }
    }

    Ok(form)
}

/// 读取字段内容；超过 limit 时返回 `Ok(None)`
async fn read_limited(field: &mut Field, limit: usize) -> Result<Option<Bytes>, HttpResponse> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| {
            tracing::info!("Failed to read multipart field: {}", e);
            bad_request(ErrorCode::BadRequest, "Malformed multipart payload")
        })?;
        if buffer.len() + data.len() > limit {
            return Ok(None);
        }
        buffer.extend_from_slice(&data);
    }
    Ok(Some(Bytes::from(buffer)))
}
