use unicode_normalization::UnicodeNormalization;

/// Which canonical form [`normalize_with`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Comparison-safe form: single spaces, `&` spelled out.
    Display,
    /// URL-query-safe form: words joined by `+`, search operators removed.
    Query,
}

/// Words the site's search treats as operators.
const QUERY_OPERATORS: &[&str] = &["and", "or", "not"];

/// Normalize a display name for comparison.
pub fn normalize(text: &str) -> String {
    normalize_with(text, Mode::Display)
}

/// Normalize a name into a search query.
pub fn normalize_query(text: &str) -> String {
    normalize_with(text, Mode::Query)
}

/// Normalize `text` into plain lowercase ASCII.
///
/// - Transliterates accented letters, curly apostrophes and dashes
/// - Keeps only `[a-z0-9 \-+']`
/// - `Display`: `&` becomes `and`, whitespace collapses to one space
/// - `Query`: `and`/`or`/`not` and words with no letter or digit dropped,
///   words joined with `+`
///
/// The output is a fixed point: normalizing it again in the same mode
/// returns it unchanged.
pub fn normalize_with(text: &str, mode: Mode) -> String {
    let ascii = transliterate(&text.to_lowercase());
    let expanded = ascii.replace('&', " and ");

    let filtered: String = expanded
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | ' ' | '-' | '+' | '\''))
        .collect();

    match mode {
        Mode::Display => filtered.split_whitespace().collect::<Vec<_>>().join(" "),
        Mode::Query => filtered
            .split([' ', '+'])
            .filter(|w| w.chars().any(|c| c.is_ascii_alphanumeric()))
            .filter(|w| !QUERY_OPERATORS.contains(w))
            .collect::<Vec<_>>()
            .join("+"),
    }
}

/// Remove stop words from a query produced by [`normalize_query`].
pub fn strip_stop_words(query: &str, stop_words: &[String]) -> String {
    query
        .split('+')
        .filter(|w| !w.is_empty() && !stop_words.iter().any(|s| s == w))
        .collect::<Vec<_>>()
        .join("+")
}

/// Map a lowercase string onto ASCII, dropping what has no ASCII form.
fn transliterate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfkd() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' | '`' => out.push('\''),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            'ø' => out.push('o'),
            'đ' | 'ð' => out.push('d'),
            'ł' => out.push('l'),
            'þ' => out.push_str("th"),
            '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FE58}' | '\u{FE63}' | '\u{FF0D}' => out.push('-'),
            c if c.is_ascii() => out.push(c),
            // Line and paragraph separators still split words.
            c if c.is_whitespace() => out.push(' '),
            // Combining marks left over from decomposition, and anything
            // without an ASCII rendering.
            _ => {}
        }
    }
    out
}
