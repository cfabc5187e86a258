use serde::Serialize;

use super::entities::Assignment;
use crate::models::PaginationInfo;

// 作业列表响应
#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<Assignment>,
    #[serde(flatten)]
    pub pagination: PaginationInfo,
}
