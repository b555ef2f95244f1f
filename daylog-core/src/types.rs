use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Category label derived from the presence of a recognized section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Projects,
    Learnings,
    Improvements,
    Tasks,
}

impl Tag {
    /// Fixed display order, which doubles as the flair priority order.
    pub const DISPLAY_ORDER: [Tag; 4] = [
        Tag::Projects,
        Tag::Learnings,
        Tag::Improvements,
        Tag::Tasks,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Tag::Projects => "projects",
            Tag::Learnings => "learnings",
            Tag::Improvements => "improvements",
            Tag::Tasks => "tasks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tag::Projects => "📊 Projects",
            Tag::Learnings => "🧠 Learnings",
            Tag::Improvements => "🚀 Improvements",
            Tag::Tasks => "📋 Tasks",
        }
    }
}

/// Named blocks of a post body, delimited by recognized level-2 headers.
///
/// A non-summary field is `Some` exactly when the matching tag was emitted
/// for the same body; summary has no tag counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub summary: Option<String>,
    pub projects: Option<String>,
    pub learnings: Option<String>,
    pub improvements: Option<String>,
    pub tasks: Option<String>,
}

impl Sections {
    pub fn for_tag(&self, tag: Tag) -> Option<&str> {
        match tag {
            Tag::Projects => self.projects.as_deref(),
            Tag::Learnings => self.learnings.as_deref(),
            Tag::Improvements => self.improvements.as_deref(),
            Tag::Tasks => self.tasks.as_deref(),
        }
    }
}

/// Issue record as seen past the ingestion boundary: pull requests are
/// already filtered out and a missing body has been defaulted to empty.
#[derive(Debug, Clone)]
pub struct RawIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: u32,
    pub source_url: String,
}

/// Display-ready representation of one source issue.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub tags: Vec<Tag>,
    pub sections: Sections,
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: u32,
    pub source_url: String,
    pub vote_score: i64,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub avatar_url: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(VoteDirection::Up),
            "down" => Some(VoteDirection::Down),
            _ => None,
        }
    }

    /// Signed contribution of this direction to a score.
    pub fn delta(&self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    Post,
    Comment,
}

/// Votable entity. Only post votes contribute to karma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subject {
    pub kind: SubjectKind,
    pub id: u64,
}

impl Subject {
    pub fn post(id: u64) -> Self {
        Self {
            kind: SubjectKind::Post,
            id,
        }
    }

    pub fn comment(id: u64) -> Self {
        Self {
            kind: SubjectKind::Comment,
            id,
        }
    }

    /// Key under which this subject's vote record is persisted.
    pub fn storage_key(&self) -> String {
        match self.kind {
            SubjectKind::Post => format!("vote-post-{}", self.id),
            SubjectKind::Comment => format!("vote-comment-{}", self.id),
        }
    }
}

/// Aggregate engagement state, persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngagementProfile {
    pub karma: i64,
    pub streak: u32,
    pub last_visit: Option<NaiveDate>,
    pub unlocked_trophies: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_display_order_is_flair_priority() {
        assert_eq!(Tag::DISPLAY_ORDER[0], Tag::Projects);
        assert_eq!(Tag::DISPLAY_ORDER[3], Tag::Tasks);
    }

    #[test]
    fn subject_storage_keys() {
        assert_eq!(Subject::post(42).storage_key(), "vote-post-42");
        assert_eq!(Subject::comment(7).storage_key(), "vote-comment-7");
    }

    #[test]
    fn vote_direction_round_trips() {
        assert_eq!(VoteDirection::parse("up"), Some(VoteDirection::Up));
        assert_eq!(VoteDirection::parse("down"), Some(VoteDirection::Down));
        assert_eq!(VoteDirection::parse("sideways"), None);
        assert_eq!(VoteDirection::Up.as_str(), "up");
    }
}
