use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;

/// URL-safe slug derived from a post title: lowercased, punctuation stripped,
/// whitespace runs collapsed into single dashes.
pub fn generate_slug(title: &str) -> String {
    lazy_static! {
        static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9 -]").unwrap();
        static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
        static ref DASHES: Regex = Regex::new(r"-+").unwrap();
    }
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG.replace_all(&lowered, "");
    let dashed = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = DASHES.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// First `max_len` characters plus an ellipsis when the text is longer,
/// the text unchanged otherwise.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len).collect();
    format!("{}...", head)
}

/// Human-readable date, e.g. "December 25, 2023".
pub fn format_date(date: OffsetDateTime) -> String {
    format!("{} {}, {}", date.month(), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn slug_from_simple_title() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(generate_slug("This is a Test!"), "this-is-a-test");
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(generate_slug("Multiple   Spaces"), "multiple-spaces");
    }

    #[test]
    fn slug_trims_leading_and_trailing_dashes() {
        assert_eq!(generate_slug("  padded title  "), "padded-title");
        assert_eq!(generate_slug("!!shout!!"), "shout");
    }

    #[test]
    fn truncate_long_text_appends_ellipsis() {
        let text = "This is a very long text that should be truncated";
        assert_eq!(truncate_text(text, 20), "This is a very long ...");
    }

    #[test]
    fn truncate_short_text_is_unchanged() {
        assert_eq!(truncate_text("Short", 20), "Short");
    }

    #[test]
    fn format_date_spells_out_month() {
        let formatted = format_date(datetime!(2023-12-25 00:00 UTC));
        assert!(formatted.contains("December"));
        assert!(formatted.contains("25"));
        assert!(formatted.contains("2023"));
    }
}
