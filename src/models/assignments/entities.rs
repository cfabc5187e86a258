use serde::{Deserialize, Serialize};

// 作业提交记录，创建后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub student_name: String,
    pub matric_number: String,
    pub level: String,
    pub course_code: String,
    pub file_url: String,
    // 对象存储中的键
    #[serde(skip_serializing, default)]
    pub file_key: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 下载时使用的附件文件名
    pub fn download_file_name(&self) -> String {
        let stem: String = format!("{}_{}", self.matric_number, self.course_code)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let extension =
            crate::utils::file_extension(&self.file_key).unwrap_or_else(|| ".zip".to_string());
        format!("{stem}{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file_name_is_sanitized() {
        let assignment = Assignment {
            id: 1,
            student_name: "Alice A".to_string(),
            matric_number: "2019/1/76042CT".to_string(),
            level: "100".to_string(),
            course_code: "CSC 101".to_string(),
            file_url: "http://localhost/files/a.zip".to_string(),
            file_key: "assignments/a.zip".to_string(),
            uploaded_at: chrono::Utc::now(),
        };

        assert_eq!(assignment.download_file_name(), "2019_1_76042CT_CSC_101.zip");
    }
}
