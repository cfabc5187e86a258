use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::utils::{contains_pattern, search_key};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set,
};

/// 列表筛选条件：只有提供的条件才会以 AND 组合，用户输入全部作为绑定参数
pub(crate) fn assignment_filter(query: &AssignmentListQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(ref name) = query.student_name {
        condition = condition.add(Expr::cust_with_values(
            "student_name_search LIKE ? ESCAPE '!'",
            [contains_pattern(name)],
        ));
    }

    if let Some(ref matric) = query.matric_number {
        condition = condition.add(Expr::cust_with_values(
            "matric_number_search LIKE ? ESCAPE '!'",
            [contains_pattern(matric)],
        ));
    }

    if let Some(date) = query.date {
        let (start, end) = utc_day_bounds(date);
        condition = condition
            .add(Column::UploadedAt.gte(start))
            .add(Column::UploadedAt.lt(end));
    }

    condition
}

/// UTC 日历日的 [开始, 结束) 秒级时间戳
pub(crate) fn utc_day_bounds(date: NaiveDate) -> (i64, i64) {
    let start = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    (start, start + 86_400)
}

/// 统一的列表查询：筛选 + 按上传时间倒序
pub(crate) fn assignment_list_select(query: &AssignmentListQuery) -> Select<Assignments> {
    Assignments::find()
        .filter(assignment_filter(query))
        .order_by_desc(Column::UploadedAt)
        .order_by_desc(Column::Id)
}

impl SeaOrmStorage {
    /// 写入提交记录
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let model = ActiveModel {
            student_name_search: Set(search_key(&req.student_name)),
            matric_number_search: Set(search_key(&req.matric_number)),
            student_name: Set(req.student_name),
            matric_number: Set(req.matric_number),
            level: Set(req.level),
            course_code: Set(req.course_code),
            file_url: Set(req.file_url),
            file_key: Set(req.file_key),
            uploaded_at: Set(req.uploaded_at.timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to create assignment: {e}"))
        })?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取提交记录
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to query assignment: {e}"))
            })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出提交记录
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);

        let paginator = assignment_list_select(&query).paginate(&self.db, limit as u64);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count assignments: {e}"))
        })?;

        let pagination = PaginationInfo::new(page, limit, total as i64);

        // 超出末页直接返回空页；offset = limit * (page - 1) 此时不会越过 total
        if page > pagination.pages {
            return Ok(AssignmentListResponse {
                assignments: Vec::new(),
                pagination,
            });
        }

        let assignments = paginator
            .fetch_page((page - 1) as u64)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list assignments: {e}"))
            })?;

        Ok(AssignmentListResponse {
            assignments: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn build(query: &AssignmentListQuery) -> sea_orm::Statement {
        assignment_list_select(query).build(DbBackend::Postgres)
    }

    fn value_count(stmt: &sea_orm::Statement) -> usize {
        stmt.values.as_ref().map(|v| v.0.len()).unwrap_or(0)
    }

    #[test]
    fn test_no_filters_has_no_where_clause() {
        let stmt = build(&AssignmentListQuery::default());

        assert!(!stmt.sql.contains("WHERE"));
        assert!(stmt.sql.contains("ORDER BY \"assignments\".\"uploaded_at\" DESC"));
        assert_eq!(value_count(&stmt), 0);
    }

    #[test]
    fn test_all_filters_are_bound_parameters() {
        let query = AssignmentListQuery {
            student_name: Some("O'Brien%".to_string()),
            matric_number: Some("76042CT".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 10, 16),
            ..Default::default()
        };
        let stmt = build(&query);

        assert!(stmt.sql.contains("student_name_search LIKE"));
        assert!(stmt.sql.contains("matric_number_search LIKE"));
        assert!(stmt.sql.contains("ESCAPE '!'"));
        assert!(stmt.sql.contains("\"uploaded_at\" >="));
        assert!(stmt.sql.contains("\"uploaded_at\" <"));
        // 用户输入不会出现在 SQL 文本中
        assert!(!stmt.sql.contains("O'Brien"));
        assert!(!stmt.sql.contains("76042"));
        assert_eq!(value_count(&stmt), 4);
    }

    #[test]
    fn test_single_filter() {
        let query = AssignmentListQuery {
            matric_number: Some("2019/1".to_string()),
            ..Default::default()
        };
        let stmt = build(&query);

        assert!(stmt.sql.contains("matric_number_search LIKE"));
        assert!(!stmt.sql.contains("student_name_search LIKE"));
        assert_eq!(value_count(&stmt), 1);
    }

    #[test]
    fn test_utc_day_bounds() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(utc_day_bounds(date), (86_400, 172_800));
    }
}
