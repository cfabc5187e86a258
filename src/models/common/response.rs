use serde::{Deserialize, Serialize};

use crate::models::ErrorCode;

// 统一的API响应结构
// 成功时携带 message，失败时携带 error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: Some(message.into()),
            error: None,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: None,
            error: Some(message.into()),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: Some(message.into()),
            error: None,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: None,
            error: Some(message.into()),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_carries_error_field() {
        let body = serde_json::to_value(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Access denied.",
        ))
        .unwrap();

        assert_eq!(body["error"], "Access denied.");
        assert_eq!(body["code"], ErrorCode::Forbidden as i32);
        assert!(body.get("message").is_none());
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_carries_data() {
        let body = serde_json::to_value(ApiResponse::success(42, "ok")).unwrap();

        assert_eq!(body["message"], "ok");
        assert_eq!(body["data"], 42);
        assert!(body.get("error").is_none());
    }
}
