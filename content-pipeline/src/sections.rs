use daylog_core::{Sections, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

// Header patterns are deliberately unanchored: the feed's authors are not
// consistent about leading whitespace, and a first-occurrence match is all
// the format promises.
static PROJECTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)##\s*Projects?").unwrap());
static LEARNINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)##\s*Learnings?").unwrap());
static IMPROVEMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)##\s*Improvements?").unwrap());
static TASKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)##\s*Tasks?").unwrap());
static SUMMARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)##\s*Summary").unwrap());

static NEXT_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^##\s+").unwrap());

fn pattern_for(tag: Tag) -> &'static Regex {
    match tag {
        Tag::Projects => &PROJECTS,
        Tag::Learnings => &LEARNINGS,
        Tag::Improvements => &IMPROVEMENTS,
        Tag::Tasks => &TASKS,
    }
}

/// Derives the category tag set from header presence.
///
/// Tags are pure presence flags, computed independently of section boundary
/// extraction: a tag is emitted even when the section body turns out empty.
/// The summary header never produces a tag. Output follows the fixed display
/// order.
pub fn extract_tags(body: &str) -> Vec<Tag> {
    Tag::DISPLAY_ORDER
        .into_iter()
        .filter(|tag| pattern_for(*tag).is_match(body))
        .collect()
}

/// Splits a post body into named sections by recognized level-2 headers.
///
/// For each pattern only the first occurrence counts. A section's content
/// runs from the end of the matched header's line to the start of the next
/// `## `-style header line (or end of body), trimmed of surrounding
/// whitespace.
pub fn extract_sections(body: &str) -> Sections {
    Sections {
        summary: section_slice(body, &SUMMARY),
        projects: section_slice(body, &PROJECTS),
        learnings: section_slice(body, &LEARNINGS),
        improvements: section_slice(body, &IMPROVEMENTS),
        tasks: section_slice(body, &TASKS),
    }
}

fn section_slice(body: &str, header: &Regex) -> Option<String> {
    let matched = header.find(body)?;
    let content_start = body[matched.start()..]
        .find('\n')
        .map(|offset| matched.start() + offset + 1)
        .unwrap_or(body.len());
    let rest = &body[content_start..];
    let content_end = NEXT_HEADER
        .find(rest)
        .map(|next| content_start + next.start())
        .unwrap_or(body.len());
    Some(body[content_start..content_end].trim().to_string())
}
