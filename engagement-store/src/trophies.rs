use daylog_core::{EngagementProfile, Post};

/// Minimum vote score at which a post counts as a crowd favorite.
pub const POPULAR_POST_THRESHOLD: i64 = 50;

/// Achievement unlock, keyed by a named predicate over the post collection
/// and the engagement profile. Unlocks are monotonic: once earned, a trophy
/// stays earned even if its predicate later turns false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trophy {
    FirstPost,
    WeekStreak,
    KarmaCentury,
    CrowdFavorite,
}

impl Trophy {
    pub const ALL: [Trophy; 4] = [
        Trophy::FirstPost,
        Trophy::WeekStreak,
        Trophy::KarmaCentury,
        Trophy::CrowdFavorite,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Trophy::FirstPost => "first-post",
            Trophy::WeekStreak => "week-streak",
            Trophy::KarmaCentury => "karma-100",
            Trophy::CrowdFavorite => "crowd-favorite",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Trophy::FirstPost => "First Post",
            Trophy::WeekStreak => "Week Streak",
            Trophy::KarmaCentury => "Karma Century",
            Trophy::CrowdFavorite => "Crowd Favorite",
        }
    }

    pub(crate) fn earned(&self, posts: &[Post], profile: &EngagementProfile) -> bool {
        match self {
            Trophy::FirstPost => !posts.is_empty(),
            Trophy::WeekStreak => profile.streak >= 7,
            Trophy::KarmaCentury => profile.karma >= 100,
            Trophy::CrowdFavorite => posts
                .iter()
                .any(|post| post.vote_score >= POPULAR_POST_THRESHOLD),
        }
    }
}
