use daylog_core::{Post, RawIssue, Tag};

use crate::excerpt::excerpt;
use crate::sections::{extract_sections, extract_tags};

/// Maps a raw issue record into the internal post entity.
///
/// The input is assumed to have passed the ingestion boundary already: pull
/// requests were filtered out and a missing body was defaulted to empty.
/// `vote_score` is supplied by the engagement store, which owns the
/// baseline-plus-delta rule.
pub fn transform(raw: &RawIssue, vote_score: i64, excerpt_len: usize) -> Post {
    Post {
        id: raw.id,
        number: raw.number,
        title: raw.title.clone(),
        body: raw.body.clone(),
        tags: extract_tags(&raw.body),
        sections: extract_sections(&raw.body),
        excerpt: excerpt(&raw.body, excerpt_len),
        created_at: raw.created_at,
        comment_count: raw.comment_count,
        source_url: raw.source_url.clone(),
        vote_score,
    }
}

/// Display category: the first matching tag in priority order, or a generic
/// "daily" label when no section header matched.
pub fn display_flair(tags: &[Tag]) -> &'static str {
    tags.first().map(Tag::slug).unwrap_or("daily")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn issue(body: &str) -> RawIssue {
        RawIssue {
            id: 9001,
            number: 12,
            title: "Day 12".to_string(),
            body: body.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap(),
            comment_count: 3,
            source_url: "https://github.com/o/r/issues/12".to_string(),
        }
    }

    #[test]
    fn tags_and_sections_stay_consistent() {
        let raw = issue("## Summary\nDid X\n## Tasks\n- wrote tests");
        let post = transform(&raw, 17, 200);
        assert_eq!(post.tags, vec![Tag::Tasks]);
        assert_eq!(post.sections.summary.as_deref(), Some("Did X"));
        assert_eq!(post.sections.tasks.as_deref(), Some("- wrote tests"));
        assert_eq!(post.vote_score, 17);
        // Every tag has a section; summary never tags.
        for tag in &post.tags {
            assert!(post.sections.for_tag(*tag).is_some());
        }
    }

    #[test]
    fn empty_body_is_a_valid_state() {
        let post = transform(&issue(""), 0, 200);
        assert!(post.tags.is_empty());
        assert!(post.excerpt.is_empty());
        assert_eq!(post.sections, daylog_core::Sections::default());
    }

    #[test]
    fn flair_prefers_priority_order() {
        assert_eq!(
            display_flair(&[Tag::Projects, Tag::Tasks]),
            "projects"
        );
        assert_eq!(display_flair(&[Tag::Improvements]), "improvements");
        assert_eq!(display_flair(&[]), "daily");
    }

    #[test]
    fn excerpt_respects_configured_length() {
        let raw = issue(&"log entry ".repeat(50));
        let post = transform(&raw, 0, 40);
        assert!(post.excerpt.chars().count() <= 43);
        assert!(post.excerpt.ends_with("..."));
    }
}
