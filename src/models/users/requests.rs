use super::entities::UserRole;
use serde::Deserialize;

// 用户注册请求（来自HTTP请求）
// 字段缺失统一在业务层返回 400
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub matric_number: Option<String>,
}

// 用户创建请求（用于存储层，password_hash 已哈希）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    pub external_id: Option<String>,
    pub matric_number: Option<String>,
}

// 学号校验请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyMatricRequest {
    pub matric_number: Option<String>,
}
