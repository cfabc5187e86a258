//! 作业提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_name: String,
    pub matric_number: String,
    // 小写折叠后的检索列，只用于筛选
    pub student_name_search: String,
    pub matric_number_search: String,
    pub level: String,
    pub course_code: String,
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    pub file_key: String,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::Assignment;
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            student_name: self.student_name,
            matric_number: self.matric_number,
            level: self.level,
            course_code: self.course_code,
            file_url: self.file_url,
            file_key: self.file_key,
            uploaded_at: DateTime::<Utc>::from_timestamp(self.uploaded_at, 0).unwrap_or_default(),
        }
    }
}
