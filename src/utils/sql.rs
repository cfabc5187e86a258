/// LIKE 模式使用的转义字符
pub const LIKE_ESCAPE_CHAR: char = '!';

/// 转义 LIKE 通配符，使用户输入按字面量匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE_CHAR) {
            escaped.push(LIKE_ESCAPE_CHAR);
        }
        escaped.push(ch);
    }
    escaped
}

/// 检索列与查询模式共用的大小写折叠（Unicode 规则）
pub fn search_key(input: &str) -> String {
    input.to_lowercase()
}

/// 构造大小写不敏感的子串匹配模式：`%<转义后的折叠输入>%`
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like_pattern(&search_key(input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_wildcards() {
        assert_eq!(escape_like_pattern("50%_off!"), "50!%!_off!!");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }

    #[test]
    fn test_contains_pattern_lowercases() {
        assert_eq!(contains_pattern("76042CT"), "%76042ct%");
        assert_eq!(contains_pattern("a_b"), "%a!_b%");
    }

    #[test]
    fn test_search_key_folds_non_ascii() {
        assert_eq!(search_key("ÉMILE ỌLÁ"), "émile ọlá");
        assert_eq!(contains_pattern("ÉMILE"), "%émile%");
        assert!(search_key("Émile Ọlá").contains(&search_key("ÉMILE")));
    }
}
