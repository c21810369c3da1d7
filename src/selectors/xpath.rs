/// Accept both bare XPath and the `xpath=` engine-prefixed form.
pub fn normalize(expr: &str) -> String {
    let trimmed = expr.trim();
    trimmed
        .strip_prefix("xpath=")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Quote `value` as an XPath 1.0 string literal. XPath has no escape
/// sequences, so text containing both quote kinds becomes a `concat()`.
pub fn literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// A `div` whose direct child has a text node containing `text`.
pub fn section_by_title(text: &str) -> String {
    format!(
        ".//div/*[contains(text(), {})]/parent::div",
        literal(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefixed_and_bare() {
        assert_eq!(normalize("xpath=.//p"), ".//p");
        assert_eq!(normalize("  .//span "), ".//span");
        assert_eq!(normalize("xpath=  //body"), "//body");
    }

    #[test]
    fn test_literal_plain() {
        assert_eq!(literal("Daily Tip"), "'Daily Tip'");
    }

    #[test]
    fn test_literal_single_quote() {
        assert_eq!(literal("it's"), "\"it's\"");
    }

    #[test]
    fn test_literal_both_quotes() {
        assert_eq!(literal(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
    }

    #[test]
    fn test_section_by_title() {
        assert_eq!(
            section_by_title("Task List"),
            ".//div/*[contains(text(), 'Task List')]/parent::div"
        );
    }
}
