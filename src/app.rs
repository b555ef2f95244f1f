use chrono::Utc;
use content_pipeline::{run_query, transform, CategoryFilter, FeedQuery, SortMode, TimeRange};
use daylog_core::{AppConfig, CoreError, Post, RawIssue, Subject, SubjectKind, VoteDirection};
use engagement_store::{EngagementStore, KeyValueStore};
use github_client::GitHubApiClient;
use tracing::{error, info, warn};

use crate::render::RenderTarget;

#[derive(Debug, Clone)]
pub enum Message {
    Refresh,
    OpenPost(u64),
    CloseDetail,
    Vote {
        subject: Subject,
        direction: VoteDirection,
    },
    SetSort(SortMode),
    SetCategory(CategoryFilter),
    SetTimeRange(TimeRange),
    Search(String),
    ToggleTheme,
    SetViewMode(String),
}

/// Session driver: owns the post collection, the feed query, and the
/// engagement store, and pushes every state change out through the render
/// target. All mutation happens on the single control thread inside
/// `update`.
pub struct App<S: KeyValueStore, R: RenderTarget> {
    config: AppConfig,
    client: GitHubApiClient,
    store: EngagementStore<S>,
    renderer: R,
    posts: Vec<Post>,
    query: FeedQuery,
    open_post: Option<u64>,
}

impl<S: KeyValueStore, R: RenderTarget> App<S, R> {
    pub fn new(
        config: AppConfig,
        client: GitHubApiClient,
        store: EngagementStore<S>,
        renderer: R,
    ) -> Self {
        Self {
            config,
            client,
            store,
            renderer,
            posts: Vec::new(),
            query: FeedQuery::default(),
            open_post: None,
        }
    }

    /// Session start: records today's visit, then loads and renders the
    /// feed.
    pub async fn bootstrap(&mut self) -> Result<(), CoreError> {
        self.record_visit();
        self.update(Message::Refresh).await
    }

    // A flush failure here (read-only state path) costs persistence, not
    // the session: the in-memory profile keeps working.
    fn record_visit(&mut self) {
        match self.store.record_visit(Utc::now().date_naive()) {
            Ok(true) => {
                let streak = self.store.profile().streak;
                if streak > 1 {
                    self.renderer
                        .notify(&format!("🔥 {streak} day visit streak!"));
                }
            }
            Ok(false) => {}
            Err(e) => {
                error!("Error recording visit, continuing without persistence: {}", e);
            }
        }
    }

    pub async fn update(&mut self, message: Message) -> Result<(), CoreError> {
        match message {
            Message::Refresh => {
                self.refresh().await?;
                self.render_feed();
            }
            Message::OpenPost(post_id) => {
                self.open_detail(post_id).await;
            }
            Message::CloseDetail => {
                self.open_post = None;
                self.render_feed();
            }
            Message::Vote { subject, direction } => {
                self.apply_vote(subject, direction)?;
            }
            Message::SetSort(sort) => {
                self.query.sort = sort;
                self.render_feed();
            }
            Message::SetCategory(category) => {
                self.query.category = category;
                self.render_feed();
            }
            Message::SetTimeRange(range) => {
                self.query.time_range = range;
                self.render_feed();
            }
            Message::Search(text) => {
                let trimmed = text.trim();
                self.query.search_text = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
                self.render_feed();
            }
            Message::ToggleTheme => {
                let next = if self.store.theme() == "dark" {
                    "light"
                } else {
                    "dark"
                };
                self.store.set_theme(next)?;
                let label = if next == "dark" {
                    "🌙 Dark mode enabled"
                } else {
                    "☀️ Light mode enabled"
                };
                self.renderer.notify(label);
            }
            Message::SetViewMode(mode) => {
                self.store.set_view_mode(&mode)?;
            }
        }
        Ok(())
    }

    pub fn post_id_for_number(&self, number: u64) -> Option<u64> {
        self.posts.iter().find(|p| p.number == number).map(|p| p.id)
    }

    /// Transport failures degrade to an empty feed; they are logged and
    /// surfaced once, never propagated to the render layer.
    async fn refresh(&mut self) -> Result<(), CoreError> {
        match self.client.fetch_issues().await {
            Ok(issues) => {
                self.ingest(issues);
                self.check_trophies()?;
            }
            Err(e) => {
                error!("Error fetching issues: {}", e);
                self.posts.clear();
                self.renderer.notify("❌ Error loading posts");
            }
        }
        Ok(())
    }

    fn ingest(&mut self, issues: Vec<RawIssue>) {
        self.posts = issues
            .iter()
            .map(|raw| {
                transform(
                    raw,
                    self.store.compute_vote_score(raw.id),
                    self.config.excerpt_length,
                )
            })
            .collect();
        info!(posts = self.posts.len(), "post collection rebuilt");
    }

    async fn open_detail(&mut self, post_id: u64) {
        let Some(post) = self.posts.iter().find(|p| p.id == post_id).cloned() else {
            warn!(post_id, "open requested for unknown post");
            return;
        };
        self.open_post = Some(post_id);

        let comments = match self.client.fetch_comments(post.number).await {
            Ok(comments) => comments,
            Err(e) => {
                error!("Error fetching comments for #{}: {}", post.number, e);
                self.renderer.notify("❌ Error loading comments");
                std::sync::Arc::new(Vec::new())
            }
        };

        // The view may have been closed while the fetch was in flight; a
        // late result is simply dropped.
        if self.open_post == Some(post_id) {
            self.renderer.render_detail(&post, &comments);
        }
    }

    fn apply_vote(
        &mut self,
        subject: Subject,
        direction: VoteDirection,
    ) -> Result<(), CoreError> {
        let new_state = self.store.toggle_vote(subject, direction)?;

        self.renderer.notify(match new_state {
            None => "Vote removed",
            Some(VoteDirection::Up) => "⬆️ Upvoted!",
            Some(VoteDirection::Down) => "⬇️ Downvoted!",
        });

        if subject.kind == SubjectKind::Post {
            let score = self.store.compute_vote_score(subject.id);
            if let Some(post) = self.posts.iter_mut().find(|p| p.id == subject.id) {
                post.vote_score = score;
            }
            self.check_trophies()?;
            self.render_feed();
        }
        Ok(())
    }

    fn check_trophies(&mut self) -> Result<(), CoreError> {
        for trophy in self.store.evaluate_trophies(&self.posts)? {
            self.renderer
                .notify(&format!("🏆 Trophy unlocked: {}", trophy.title()));
        }
        Ok(())
    }

    fn render_feed(&mut self) {
        let view = run_query(&self.posts, &self.query, Utc::now());
        self.renderer.render_feed(&view);
    }
}
