use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{PortalError, Result};
use crate::models::common::pagination::{
    deserialize_optional_string_to_i64, normalize_limit, normalize_page,
};

// 作业列表查询参数（来自HTTP请求）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListParams {
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub limit: Option<i64>,
    pub student_name: Option<String>,
    pub matric_number: Option<String>,
    /// YYYY-MM-DD
    pub date: Option<String>,
}

// 作业列表查询参数（用于存储层，已规范化）
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentListQuery {
    pub page: i64,
    pub limit: i64,
    pub student_name: Option<String>,
    pub matric_number: Option<String>,
    pub date: Option<NaiveDate>,
}

impl Default for AssignmentListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            student_name: None,
            matric_number: None,
            date: None,
        }
    }
}

impl TryFrom<AssignmentListParams> for AssignmentListQuery {
    type Error = PortalError;

    fn try_from(params: AssignmentListParams) -> Result<Self> {
        let date = match non_blank(params.date) {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                PortalError::validation(format!("Invalid date '{raw}', expected YYYY-MM-DD"))
            })?),
            None => None,
        };

        Ok(Self {
            page: normalize_page(params.page),
            limit: normalize_limit(params.limit),
            student_name: non_blank(params.student_name),
            matric_number: non_blank(params.matric_number),
            date,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// 作业创建请求（用于存储层）
#[derive(Debug, Clone)]
pub struct CreateAssignmentRequest {
    pub student_name: String,
    pub matric_number: String,
    pub level: String,
    pub course_code: String,
    pub file_url: String,
    pub file_key: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_dropped() {
        let query = AssignmentListQuery::try_from(AssignmentListParams {
            student_name: Some("   ".to_string()),
            matric_number: Some(" 2019/1 ".to_string()),
            date: Some(String::new()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.student_name, None);
        assert_eq!(query.matric_number.as_deref(), Some("2019/1"));
        assert_eq!(query.date, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let err = AssignmentListQuery::try_from(AssignmentListParams {
            date: Some("16/10/2026".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(err.code(), "E005");
    }

    #[test]
    fn test_query_string_parsing() {
        let params: AssignmentListParams = serde_urlencoded_from(
            "page=2&limit=5&matricNumber=2019%2F1&date=2026-10-16&studentName=ali",
        );
        let query = AssignmentListQuery::try_from(params).unwrap();

        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 5);
        assert_eq!(query.matric_number.as_deref(), Some("2019/1"));
        assert_eq!(query.student_name.as_deref(), Some("ali"));
        assert_eq!(query.date, NaiveDate::from_ymd_opt(2026, 10, 16));
    }

    fn serde_urlencoded_from(qs: &str) -> AssignmentListParams {
        actix_web::web::Query::<AssignmentListParams>::from_query(qs)
            .unwrap()
            .into_inner()
    }
}
