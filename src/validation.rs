use std::sync::OnceLock;

use regex::Regex;

const MARKDOWN_SPECIAL: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

fn compact_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^\+7\d{10}$").expect("valid regex"),
            Regex::new(r"^8\d{10}$").expect("valid regex"),
            Regex::new(r"^7\d{10}$").expect("valid regex"),
        ]
    })
}

fn written_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^\+7\s*\(\d{3}\)\s*\d{3}\s*\d{2}\s*\d{2}$").expect("valid regex"),
            Regex::new(r"^\+7\s*\d{3}\s*\d{3}\s*\d{2}\s*\d{2}$").expect("valid regex"),
            Regex::new(r"^8\s*\d{3}\s*\d{3}\s*\d{2}\s*\d{2}$").expect("valid regex"),
        ]
    })
}

/// Accepts Russian phone numbers written as `+7XXXXXXXXXX`, `8XXXXXXXXXX` or
/// `7XXXXXXXXXX` once everything except digits and `+` is dropped, or as
/// `+7 (XXX) XXX XX XX`, `+7 XXX XXX XX XX`, `8 XXX XXX XX XX` verbatim.
pub fn validate_phone(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    let compact: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    let written = text.trim();

    compact_patterns().iter().any(|re| re.is_match(&compact))
        || written_patterns().iter().any(|re| re.is_match(written))
}

/// Escapes MarkdownV2 control characters. Apply exactly once per render.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
