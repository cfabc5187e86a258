use super::entities::User;
use serde::Serialize;

// 用户响应
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

// 用户列表响应
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

// 学号校验响应
#[derive(Debug, Serialize)]
pub struct MatricVerificationResponse {
    pub success: bool,
}
