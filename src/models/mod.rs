pub mod assignments;
pub mod auth;
pub mod common;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo};

/// 程序启动时间，用于启动耗时统计
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
