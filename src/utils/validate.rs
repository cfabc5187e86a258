use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

// 入学年份/学位级别/序号，例如 2019/1/76042CT
static MATRIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}/\d/[0-9A-Z]{5,7}$").expect("Invalid matric regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_matric_number(matric: &str) -> Result<(), &'static str> {
    if !MATRIC_RE.is_match(matric) {
        return Err("Invalid matric number format");
    }
    Ok(())
}

/// 必填字段：去除首尾空白后非空
pub fn require_non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("student@uni.edu.ng").is_ok());
        assert!(validate_email("first.last+tag@example.com").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn test_matric_format() {
        assert!(validate_matric_number("2019/1/76042CT").is_ok());
        assert!(validate_matric_number("2021/2/12345").is_ok());
        assert!(validate_matric_number("2019/1/1234ABC").is_ok());
        // 序号过短、过长或含小写字母
        assert!(validate_matric_number("2019/1/1234").is_err());
        assert!(validate_matric_number("2019/1/12345678").is_err());
        assert!(validate_matric_number("2019/1/76042ct").is_err());
        assert!(validate_matric_number("19/1/76042CT").is_err());
        assert!(validate_matric_number(" 2019/1/76042CT").is_err());
    }

    #[test]
    fn test_require_non_blank() {
        assert_eq!(require_non_blank(Some("  Ada ")), Some("Ada"));
        assert_eq!(require_non_blank(Some("   ")), None);
        assert_eq!(require_non_blank(None), None);
    }
}
