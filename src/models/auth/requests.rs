use serde::Deserialize;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// 邮箱
    pub email: Option<String>,
    /// 密码
    pub password: Option<String>,
}

// 外部身份登录请求
#[derive(Debug, Default, Deserialize)]
pub struct ExternalLoginRequest {
    /// 身份提供方签发的 ID token
    pub credential: Option<String>,
}
