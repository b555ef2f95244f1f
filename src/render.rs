use chrono::Utc;
use content_pipeline::{display_flair, escape_html, render as render_markdown};
use daylog_core::{Comment, Post, Tag};

use crate::format::{format_count, relative_time};

/// Capability interface for presentation targets.
///
/// The pipeline crates know nothing about presentation; everything they
/// produce flows out through these three calls. Swapping the console
/// implementation for a DOM- or TUI-backed one is a glue-layer concern.
pub trait RenderTarget {
    fn render_feed(&mut self, posts: &[Post]);
    fn render_detail(&mut self, post: &Post, comments: &[Comment]);
    fn notify(&mut self, message: &str);
}

/// Terminal stand-in for the feed UI. Card lines are plain text; the detail
/// view prints the HTML fragments the pipeline produced, titles escaped per
/// the renderer contract.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderTarget for ConsoleRenderer {
    fn render_feed(&mut self, posts: &[Post]) {
        if posts.is_empty() {
            println!("📭 No posts yet. Check back soon for the first daily log!");
            return;
        }
        let now = Utc::now();
        for post in posts {
            println!(
                "#{:<4} {:>5}  [{}] {}  · {} · {} comments",
                post.number,
                format_count(post.vote_score),
                display_flair(&post.tags),
                post.title,
                relative_time(post.created_at, now),
                post.comment_count
            );
            if !post.excerpt.is_empty() {
                println!("      {}", post.excerpt);
            }
            if !post.tags.is_empty() {
                let labels: Vec<&str> = post.tags.iter().map(Tag::label).collect();
                println!("      {}", labels.join("  "));
            }
        }
        println!("{} post(s)", posts.len());
    }

    fn render_detail(&mut self, post: &Post, comments: &[Comment]) {
        let now = Utc::now();
        println!("<h1>{}</h1>", escape_html(&post.title));
        if let Some(summary) = &post.sections.summary {
            println!("<div class=\"summary\">{}</div>", render_markdown(summary));
        }
        for tag in &post.tags {
            if let Some(section) = post.sections.for_tag(*tag) {
                println!("<h2>{}</h2>", tag.label());
                println!("{}", render_markdown(section));
            }
        }
        if post.sections.summary.is_none() && post.tags.is_empty() {
            println!("{}", render_markdown(&post.body));
        }
        println!("🔗 {}", post.source_url);

        if comments.is_empty() {
            return;
        }
        println!("💬 {} comment(s)", comments.len());
        for comment in comments {
            println!(
                "<p><strong>{}</strong> · {}</p>",
                escape_html(&comment.author),
                relative_time(comment.created_at, now)
            );
            println!("{}", render_markdown(&comment.body));
        }
    }

    fn notify(&mut self, message: &str) {
        println!("· {message}");
    }
}
