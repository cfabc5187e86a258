pub mod download;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::object_store::ObjectStore;

/// 对外提供对象存储中的文件（本地后端的 URL 指向这里）
pub struct FileService;

impl FileService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_object_store(&self, request: &HttpRequest) -> Arc<dyn ObjectStore> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectStore>>>()
            .expect("Object store not found in app data")
            .get_ref()
            .clone()
    }

    // Handle file download
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        key: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, key).await
    }
}
