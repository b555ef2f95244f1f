use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use content_pipeline::{CategoryFilter, SortMode, TimeRange};
use daylog_core::{AppConfig, CoreError, Subject, Tag, VoteDirection};
use engagement_store::{EngagementStore, JsonFileStore, KeyValueStore};
use github_client::GitHubApiClient;

use crate::app::{App, Message};
use crate::render::{ConsoleRenderer, RenderTarget};

mod app;
mod format;
mod render;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter("daylog=info,github_client=info,engagement_store=info")
        .init();

    tracing::info!("Starting Daylog - Daily Log Feed");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("daylog.toml"));
    let config = AppConfig::load_or_default(&config_path);

    let client = GitHubApiClient::new(&config);
    let store = EngagementStore::new(JsonFileStore::open(&config.state_path));
    let mut app = App::new(config, client, store, ConsoleRenderer::new());

    app.bootstrap().await?;
    run_loop(&mut app).await
}

async fn run_loop<S, R>(app: &mut App<S, R>) -> Result<(), CoreError>
where
    S: KeyValueStore,
    R: RenderTarget,
{
    let stdin = io::stdin();
    loop {
        print!("daylog> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let parts: Vec<&str> = line.split_whitespace().collect();

        let message = match parts.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => return Ok(()),
            ["help"] => {
                print_help();
                continue;
            }
            ["refresh"] => Message::Refresh,
            ["open", number] => match parse_post(app, number) {
                Some(id) => Message::OpenPost(id),
                None => continue,
            },
            ["close"] => Message::CloseDetail,
            ["vote", number, direction] => {
                match (parse_post(app, number), VoteDirection::parse(direction)) {
                    (Some(id), Some(direction)) => Message::Vote {
                        subject: Subject::post(id),
                        direction,
                    },
                    _ => continue,
                }
            }
            ["cvote", id, direction] => {
                match (id.parse::<u64>().ok(), VoteDirection::parse(direction)) {
                    (Some(id), Some(direction)) => Message::Vote {
                        subject: Subject::comment(id),
                        direction,
                    },
                    _ => continue,
                }
            }
            ["sort", mode] => match parse_sort(mode) {
                Some(sort) => Message::SetSort(sort),
                None => continue,
            },
            ["cat", category] => match parse_category(category) {
                Some(category) => Message::SetCategory(category),
                None => continue,
            },
            ["range", range] => Message::SetTimeRange(parse_range(range)),
            ["search", rest @ ..] => Message::Search(rest.join(" ")),
            ["theme"] => Message::ToggleTheme,
            ["view", mode] => Message::SetViewMode(mode.to_string()),
            _ => {
                println!("unknown command, try 'help'");
                continue;
            }
        };

        app.update(message).await?;
    }
}

fn parse_post<S: KeyValueStore, R: RenderTarget>(app: &App<S, R>, token: &str) -> Option<u64> {
    let number = token.parse::<u64>().ok()?;
    let id = app.post_id_for_number(number);
    if id.is_none() {
        println!("no post #{number} in the current feed");
    }
    id
}

fn parse_sort(token: &str) -> Option<SortMode> {
    match token {
        "new" => Some(SortMode::New),
        "hot" => Some(SortMode::Hot),
        "top" => Some(SortMode::Top),
        "best" => Some(SortMode::Best),
        _ => None,
    }
}

fn parse_category(token: &str) -> Option<CategoryFilter> {
    match token {
        "all" => Some(CategoryFilter::All),
        "projects" => Some(CategoryFilter::Tag(Tag::Projects)),
        "learnings" => Some(CategoryFilter::Tag(Tag::Learnings)),
        "improvements" => Some(CategoryFilter::Tag(Tag::Improvements)),
        "tasks" => Some(CategoryFilter::Tag(Tag::Tasks)),
        _ => None,
    }
}

fn parse_range(token: &str) -> TimeRange {
    match token {
        "today" => TimeRange::Today,
        "week" => TimeRange::Week,
        "month" => TimeRange::Month,
        "year" => TimeRange::Year,
        "all" => TimeRange::All,
        // Anything else is treated as a literal YYYY-MM token.
        other => TimeRange::YearMonth(other.to_string()),
    }
}

fn print_help() {
    println!(
        "commands:\n  \
         refresh                  reload the feed\n  \
         open <number>            show a post with its comments\n  \
         close                    back to the feed\n  \
         vote <number> up|down    toggle a post vote\n  \
         cvote <id> up|down       toggle a comment vote\n  \
         sort new|hot|top|best    change ranking\n  \
         cat all|projects|learnings|improvements|tasks\n  \
         range all|today|week|month|year|YYYY-MM\n  \
         search <text>            filter by title/body ('search' clears)\n  \
         theme                    toggle dark/light\n  \
         view <mode>              persist view-mode preference\n  \
         quit"
    );
}
