use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::FileService;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_download(
    request: HttpRequest,
    key: web::Path<String>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .handle_download(&request, key.into_inner())
        .await
}

// 配置路由（本地对象存储生成的 URL 指向此处，无需认证）
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/files/{key:.*}", web::get().to(handle_download));
}
