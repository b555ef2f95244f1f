use chrono::{DateTime, Datelike, Duration, Utc};
use daylog_core::{Post, Tag};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    New,
    Hot,
    Top,
    /// Vote score with a logarithmic age term, approximating time-decayed
    /// ranking.
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Tag(Tag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRange {
    All,
    /// Same calendar date as `now`.
    Today,
    /// Within 7 days by wall-clock difference.
    Week,
    /// Within 30 days by wall-clock difference.
    Month,
    /// Same calendar year as `now`.
    Year,
    /// Literal `YYYY-MM` token, prefix-matched against the RFC 3339
    /// creation timestamp.
    YearMonth(String),
}

#[derive(Debug, Clone)]
pub struct FeedQuery {
    pub search_text: Option<String>,
    pub category: CategoryFilter,
    pub time_range: TimeRange,
    pub sort: SortMode,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            search_text: None,
            category: CategoryFilter::All,
            time_range: TimeRange::All,
            sort: SortMode::New,
        }
    }
}

/// Filters and orders the post collection. Returns a fresh vector; the input
/// is never mutated. `now` is injected so callers and tests agree on the
/// clock.
pub fn run_query(posts: &[Post], query: &FeedQuery, now: DateTime<Utc>) -> Vec<Post> {
    let mut out: Vec<Post> = posts
        .iter()
        .filter(|post| in_time_range(post, &query.time_range, now))
        .filter(|post| matches_category(post, query.category))
        .filter(|post| matches_search(post, query.search_text.as_deref()))
        .cloned()
        .collect();

    match query.sort {
        SortMode::New => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        // Stable sort keeps input order for equal scores.
        SortMode::Hot | SortMode::Top => out.sort_by(|a, b| b.vote_score.cmp(&a.vote_score)),
        SortMode::Best => out.sort_by(|a, b| best_score(b, now).total_cmp(&best_score(a, now))),
    }

    debug!(
        total = posts.len(),
        matched = out.len(),
        "feed query evaluated"
    );
    out
}

fn best_score(post: &Post, now: DateTime<Utc>) -> f64 {
    let hours = (now - post.created_at).num_seconds() as f64 / 3600.0;
    post.vote_score as f64 + 2.0 * hours.max(1.0).ln()
}

fn in_time_range(post: &Post, range: &TimeRange, now: DateTime<Utc>) -> bool {
    match range {
        TimeRange::All => true,
        TimeRange::Today => post.created_at.date_naive() == now.date_naive(),
        TimeRange::Week => now - post.created_at <= Duration::days(7),
        TimeRange::Month => now - post.created_at <= Duration::days(30),
        TimeRange::Year => post.created_at.year() == now.year(),
        TimeRange::YearMonth(token) => post.created_at.to_rfc3339().starts_with(token.as_str()),
    }
}

fn matches_category(post: &Post, category: CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Tag(tag) => post.tags.contains(&tag),
    }
}

fn matches_search(post: &Post, search: Option<&str>) -> bool {
    let Some(needle) = search else {
        return true;
    };
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    post.title.to_lowercase().contains(&needle) || post.body.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use daylog_core::Sections;

    fn post(id: u64, title: &str, body: &str, created: DateTime<Utc>, score: i64) -> Post {
        Post {
            id,
            number: id,
            title: title.to_string(),
            body: body.to_string(),
            tags: crate::sections::extract_tags(body),
            sections: Sections::default(),
            excerpt: String::new(),
            created_at: created,
            comment_count: 0,
            source_url: String::new(),
            vote_score: score,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn sort_new_puts_latest_first() {
        let posts = vec![
            post(1, "old", "", at(2026, 1, 15), 0),
            post(2, "new", "", at(2026, 2, 1), 0),
        ];
        let out = run_query(&posts, &FeedQuery::default(), now());
        assert_eq!(out[0].title, "new");
        assert_eq!(out[1].title, "old");
    }

    #[test]
    fn sort_top_orders_by_score_stably() {
        let posts = vec![
            post(1, "a", "", at(2026, 2, 1), 5),
            post(2, "b", "", at(2026, 2, 2), 9),
            post(3, "c", "", at(2026, 2, 3), 5),
        ];
        let query = FeedQuery {
            sort: SortMode::Top,
            ..FeedQuery::default()
        };
        let out = run_query(&posts, &query, now());
        assert_eq!(
            out.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn best_favors_score_but_rewards_the_age_term() {
        let fresh = post(1, "fresh", "", now() - Duration::hours(1), 10);
        let aged = post(2, "aged", "", now() - Duration::hours(400), 10);
        let query = FeedQuery {
            sort: SortMode::Best,
            ..FeedQuery::default()
        };
        let out = run_query(&[fresh, aged], &query, now());
        // Equal scores: 2·ln(hours) breaks the tie.
        assert_eq!(out[0].title, "aged");
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_body() {
        let posts = vec![
            post(1, "Parser work", "", at(2026, 2, 1), 0),
            post(2, "other", "deep PARSER refactor", at(2026, 2, 2), 0),
            post(3, "unrelated", "nothing here", at(2026, 2, 3), 0),
        ];
        let query = FeedQuery {
            search_text: Some("parser".to_string()),
            ..FeedQuery::default()
        };
        let out = run_query(&posts, &query, now());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn category_filter_requires_tag() {
        let posts = vec![
            post(1, "tagged", "## Tasks\n- x", at(2026, 2, 1), 0),
            post(2, "untagged", "plain", at(2026, 2, 2), 0),
        ];
        let query = FeedQuery {
            category: CategoryFilter::Tag(Tag::Tasks),
            ..FeedQuery::default()
        };
        let out = run_query(&posts, &query, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "tagged");
    }

    #[test]
    fn time_ranges_filter_by_clock_and_calendar() {
        let posts = vec![
            post(1, "today", "", Utc.with_ymd_and_hms(2026, 2, 10, 1, 0, 0).unwrap(), 0),
            post(2, "this-week", "", at(2026, 2, 6), 0),
            post(3, "last-year", "", at(2025, 11, 20), 0),
        ];
        let run = |range: TimeRange| {
            let query = FeedQuery {
                time_range: range,
                ..FeedQuery::default()
            };
            run_query(&posts, &query, now())
                .iter()
                .map(|p| p.title.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(TimeRange::Today), vec!["today"]);
        assert_eq!(run(TimeRange::Week), vec!["today", "this-week"]);
        assert_eq!(run(TimeRange::Year), vec!["today", "this-week"]);
        assert_eq!(run(TimeRange::All).len(), 3);
    }

    #[test]
    fn year_month_token_prefix_matches_timestamp() {
        let posts = vec![
            post(1, "feb", "", at(2026, 2, 3), 0),
            post(2, "nov", "", at(2025, 11, 20), 0),
        ];
        let query = FeedQuery {
            time_range: TimeRange::YearMonth("2025-11".to_string()),
            ..FeedQuery::default()
        };
        let out = run_query(&posts, &query, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "nov");
    }

    #[test]
    fn query_does_not_mutate_input() {
        let posts = vec![
            post(1, "a", "", at(2026, 2, 1), 1),
            post(2, "b", "", at(2026, 2, 2), 2),
        ];
        let query = FeedQuery {
            sort: SortMode::Top,
            ..FeedQuery::default()
        };
        let _ = run_query(&posts, &query, now());
        assert_eq!(posts[0].title, "a");
        assert_eq!(posts[1].title, "b");
    }
}
