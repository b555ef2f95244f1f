use std::collections::BTreeSet;

use chrono::NaiveDate;
use daylog_core::{EngagementProfile, Post, StoreError, Subject, SubjectKind, VoteDirection};
use tracing::{debug, info, warn};

use crate::kv::KeyValueStore;
use crate::trophies::Trophy;

mod keys {
    pub const KARMA: &str = "karma";
    pub const STREAK: &str = "streak";
    pub const LAST_VISIT: &str = "last-visit";
    pub const TROPHIES: &str = "trophies";
    pub const THEME: &str = "theme";
    pub const VIEW_MODE: &str = "view-mode";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pseudo-random baseline vote count for a post, seeded by the post id so
/// the same post shows the same baseline in every session. Matches the
/// original 10..60 display range.
pub fn baseline_score(post_id: u64) -> i64 {
    fastrand::Rng::with_seed(post_id).i64(10..60)
}

/// Persisted engagement model: per-subject vote records, aggregate karma,
/// visit streak, and the monotonic trophy set.
///
/// Every mutation flushes the backend synchronously before returning, so a
/// crashed session never loses an acknowledged vote.
#[derive(Debug)]
pub struct EngagementStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> EngagementStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn profile(&self) -> EngagementProfile {
        EngagementProfile {
            karma: self.numeric(keys::KARMA),
            streak: self.numeric(keys::STREAK).max(0) as u32,
            last_visit: self
                .backend
                .get(keys::LAST_VISIT)
                .and_then(|raw| NaiveDate::parse_from_str(&raw, DATE_FORMAT).ok()),
            unlocked_trophies: self.unlocked_trophies(),
        }
    }

    pub fn vote_for(&self, subject: Subject) -> Option<VoteDirection> {
        self.backend
            .get(&subject.storage_key())
            .and_then(|raw| VoteDirection::parse(&raw))
    }

    /// Toggles the vote record for a subject and returns the new state.
    ///
    /// Voting the current direction again clears it; voting the opposite
    /// direction overwrites it. Post votes adjust karma by the net change
    /// (absent→up +1, down→up +2, up→absent −1, and so on); comment votes
    /// never touch karma.
    pub fn toggle_vote(
        &mut self,
        subject: Subject,
        direction: VoteDirection,
    ) -> Result<Option<VoteDirection>, StoreError> {
        let key = subject.storage_key();
        let current = self.vote_for(subject);

        let new_state = if current == Some(direction) {
            self.backend.remove(&key);
            None
        } else {
            self.backend.set(&key, direction.as_str());
            Some(direction)
        };

        if subject.kind == SubjectKind::Post {
            let net = new_state.map_or(0, |d| d.delta()) - current.map_or(0, |d| d.delta());
            if net != 0 {
                let karma = self.numeric(keys::KARMA) + net;
                self.backend.set(keys::KARMA, &karma.to_string());
                debug!(subject_id = subject.id, net, karma, "karma adjusted");
            }
        }

        self.backend.flush()?;
        Ok(new_state)
    }

    /// Baseline plus the signed value of the current vote record.
    pub fn compute_vote_score(&self, post_id: u64) -> i64 {
        let delta = self
            .vote_for(Subject::post(post_id))
            .map_or(0, |d| d.delta());
        baseline_score(post_id) + delta
    }

    /// Advances the visit streak for `today`. A repeat visit on the same
    /// calendar date is a no-op; a visit exactly one day after the last one
    /// extends the streak; any gap (or a first visit) resets it to 1.
    /// Returns whether state changed.
    pub fn record_visit(&mut self, today: NaiveDate) -> Result<bool, StoreError> {
        let last_visit = self
            .backend
            .get(keys::LAST_VISIT)
            .and_then(|raw| NaiveDate::parse_from_str(&raw, DATE_FORMAT).ok());

        if last_visit == Some(today) {
            return Ok(false);
        }

        let streak = if last_visit.and_then(|d| d.succ_opt()) == Some(today) {
            self.numeric(keys::STREAK).max(0) as u32 + 1
        } else {
            1
        };

        self.backend.set(keys::STREAK, &streak.to_string());
        self.backend
            .set(keys::LAST_VISIT, &today.format(DATE_FORMAT).to_string());
        self.backend.flush()?;
        info!(streak, %today, "visit recorded");
        Ok(true)
    }

    /// Evaluates every trophy predicate against the current post collection
    /// and profile, unlocking any that hold for the first time. Returns only
    /// the newly unlocked trophies; the persisted set never shrinks.
    pub fn evaluate_trophies(&mut self, posts: &[Post]) -> Result<Vec<Trophy>, StoreError> {
        let profile = self.profile();
        let mut unlocked = profile.unlocked_trophies.clone();
        let mut newly = Vec::new();

        for trophy in Trophy::ALL {
            if unlocked.contains(trophy.id()) {
                continue;
            }
            if trophy.earned(posts, &profile) {
                unlocked.insert(trophy.id().to_string());
                newly.push(trophy);
                info!(trophy = trophy.id(), "trophy unlocked");
            }
        }

        if !newly.is_empty() {
            let serialized = serde_json::to_string(&unlocked.iter().collect::<Vec<_>>())?;
            self.backend.set(keys::TROPHIES, &serialized);
            self.backend.flush()?;
        }
        Ok(newly)
    }

    pub fn theme(&self) -> String {
        self.backend
            .get(keys::THEME)
            .unwrap_or_else(|| "dark".to_string())
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<(), StoreError> {
        self.backend.set(keys::THEME, theme);
        self.backend.flush()
    }

    pub fn view_mode(&self) -> String {
        self.backend
            .get(keys::VIEW_MODE)
            .unwrap_or_else(|| "card".to_string())
    }

    pub fn set_view_mode(&mut self, mode: &str) -> Result<(), StoreError> {
        self.backend.set(keys::VIEW_MODE, mode);
        self.backend.flush()
    }

    fn unlocked_trophies(&self) -> BTreeSet<String> {
        let Some(raw) = self.backend.get(keys::TROPHIES) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!("corrupt trophy list, treating as empty: {}", e);
                BTreeSet::new()
            }
        }
    }

    // Corrupt numeric values default to zero rather than failing the
    // session.
    fn numeric(&self, key: &str) -> i64 {
        let Some(raw) = self.backend.get(key) else {
            return 0;
        };
        match raw.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = raw.as_str(), "corrupt numeric state, defaulting to 0");
                0
            }
        }
    }
}
