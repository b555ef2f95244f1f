use once_cell::sync::Lazy;
use regex::Regex;

const ELLIPSIS: &str = "...";

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`]+`").unwrap());
static BOLD_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*[^*]+\*\*").unwrap());
static ITALIC_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*[^*]+\*").unwrap());
static STRIKE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~[^~]+~~").unwrap());
// One pattern covers level-2 and level-3 header lines, as "###" still
// contains a "##" prefix.
static HEADER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"##\s*[^\n]+").unwrap());
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-*]\s+").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Produces a plain-text preview of a post body with markdown stripped.
///
/// Emphasis spans and code are dropped wholesale rather than unwrapped, as
/// are header lines; links keep their display text, images disappear
/// entirely. The result is truncated at `max_len` characters (not
/// word-boundary aware) with an ellipsis marker appended, so the output
/// never exceeds `max_len + 3` characters.
pub fn excerpt(body: &str, max_len: usize) -> String {
    let clean = FENCED_CODE.replace_all(body, "");
    let clean = INLINE_CODE.replace_all(&clean, "");
    let clean = BOLD_SPAN.replace_all(&clean, "");
    let clean = ITALIC_SPAN.replace_all(&clean, "");
    let clean = STRIKE_SPAN.replace_all(&clean, "");
    let clean = HEADER_LINE.replace_all(&clean, "");
    let clean = LIST_MARKER.replace_all(&clean, "");
    let clean = IMAGE.replace_all(&clean, "");
    let clean = LINK.replace_all(&clean, "$1");
    let clean = NEWLINE_RUN.replace_all(&clean, " ");
    let clean = clean.trim();

    if clean.chars().count() <= max_len {
        return clean.to_string();
    }
    let cut: String = clean.chars().take(max_len).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}
