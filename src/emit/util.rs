/// Make text safe inside a Markdown table cell.
pub(crate) fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Render an optional number, or a dash.
pub(crate) fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_pipes_and_newlines() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn escapes_plain_text_unchanged() {
        assert_eq!(escape_cell("water"), "water");
    }

    #[test]
    fn dashes_missing_numbers() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some(7.3)), "7.3");
    }
}
