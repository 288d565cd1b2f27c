//! Interactive prompt. Input lines and finished catalog requests are handled
//! as events on one task; requests run concurrently on spawned tasks.

use crate::args::parse_position;
use crate::view::{render_detail, render_history, render_screen, render_status, Links};
use finder_core::config::parse_limit;
use finder_core::models::query::UnknownSearchType;
use finder_core::{
    CompletedSearch, PendingSearch, SearchController, SearchOutcome, SearchType, SharedCatalog,
};
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};

pub const HELP: &str = "\
Type a search term and press Enter to search.
  :type <title|author|subject>  change what the search matches
  :open <n>                     show details for result n
  :close                        close the detail view
  :history                      list recent searches
  :replay <n>                   search again for recent search n
  :clear                        forget recent searches
  :limit <n>                    show at most n results
  :help                         this message
  :quit                         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Search(String),
    SetType(SearchType),
    Open(usize),
    Close,
    History,
    Replay(usize),
    ClearHistory,
    Limit(usize),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReplError {
    #[error("unknown command ':{0}' (try :help)")]
    UnknownCommand(String),
    #[error(":{0} needs a number from the list")]
    BadNumber(&'static str),
    #[error(transparent)]
    BadType(#[from] UnknownSearchType),
}

/// Lines starting with ':' are commands; anything else, including an empty
/// line, is search text.
pub fn parse_line(line: &str) -> Result<ReplCommand, ReplError> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Ok(ReplCommand::Search(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default();

    match name {
        "type" | "t" => Ok(ReplCommand::SetType(arg.parse()?)),
        "open" | "o" => parse_position(arg)
            .map(ReplCommand::Open)
            .ok_or(ReplError::BadNumber("open")),
        "close" | "c" => Ok(ReplCommand::Close),
        "history" | "h" => Ok(ReplCommand::History),
        "replay" | "r" => parse_position(arg)
            .map(ReplCommand::Replay)
            .ok_or(ReplError::BadNumber("replay")),
        "clear" => Ok(ReplCommand::ClearHistory),
        "limit" => parse_limit("limit", arg)
            .map(ReplCommand::Limit)
            .map_err(|_| ReplError::BadNumber("limit")),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
        other => Err(ReplError::UnknownCommand(other.to_string())),
    }
}

fn dispatch(
    pending: PendingSearch,
    catalog: SharedCatalog,
    done: UnboundedSender<CompletedSearch>,
) {
    tokio::spawn(async move {
        let completed = pending.execute(catalog).await;
        // The receiver only goes away when the prompt exits.
        let _ = done.send(completed);
    });
}

/// What the prompt does after one command.
#[derive(Debug, Default)]
pub struct Reply {
    pub output: Vec<String>,
    pub request: Option<PendingSearch>,
    pub quit: bool,
}

impl Reply {
    fn show(text: impl Into<String>) -> Self {
        Self {
            output: vec![text.into()],
            ..Self::default()
        }
    }
}

pub async fn handle_command(
    controller: &mut SearchController,
    command: ReplCommand,
    links: &Links,
) -> Reply {
    match command {
        ReplCommand::Search(text) => {
            let search_type = controller.search_type();
            let request = controller.begin(&text, search_type);
            Reply {
                output: render_status(controller.state()).into_iter().collect(),
                request,
                quit: false,
            }
        }
        ReplCommand::Replay(index) => match controller.begin_replay(index) {
            Some(pending) => Reply {
                output: vec![format!("Searching again for {}", pending.query())],
                request: Some(pending),
                quit: false,
            },
            None => Reply::show("No recent search with that number."),
        },
        ReplCommand::SetType(search_type) => {
            controller.set_search_type(search_type);
            Reply::default()
        }
        ReplCommand::Open(index) => match controller.select(index) {
            Some(book) => Reply::show(render_detail(book, links)),
            None => Reply::show("No result with that number."),
        },
        ReplCommand::Close => {
            controller.clear_selection();
            Reply::show(render_screen(controller.state(), controller.history(), links))
        }
        ReplCommand::History => Reply::show(render_history(controller.history())),
        ReplCommand::ClearHistory => match controller.clear_history().await {
            Ok(()) => Reply::show("Recent searches cleared."),
            Err(e) => {
                warn!("Could not clear persisted search history: {}", e);
                Reply::show("Recent searches cleared for this session only.")
            }
        },
        ReplCommand::Limit(limit) => {
            controller.set_results_limit(limit);
            Reply::show(format!("Showing at most {} results from the next search.", limit))
        }
        ReplCommand::Help => Reply::show(HELP),
        ReplCommand::Quit => Reply {
            quit: true,
            ..Reply::default()
        },
    }
}

/// Applies a finished request. Returns the screen to redraw, or `None` when
/// the response was superseded by a newer search.
pub async fn handle_completion(
    controller: &mut SearchController,
    completed: CompletedSearch,
    links: &Links,
) -> Option<String> {
    if controller.finish(completed).await == SearchOutcome::Stale {
        return None;
    }
    Some(render_screen(controller.state(), controller.history(), links))
}

fn show(text: &str) {
    println!("{}", text);
}

fn prompt(controller: &SearchController) {
    print!("{}> ", controller.search_type());
    let _ = std::io::stdout().flush();
}

pub async fn run(
    mut controller: SearchController,
    links: Links,
) -> Result<(), Box<dyn std::error::Error>> {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<CompletedSearch>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    show("Book Finder: discover your next great read. Type :help for commands.");
    show(&render_screen(controller.state(), controller.history(), &links));
    prompt(&controller);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let reply = match parse_line(&line) {
                    Ok(command) => handle_command(&mut controller, command, &links).await,
                    Err(e) => Reply::show(e.to_string()),
                };

                for text in &reply.output {
                    show(text);
                }
                if let Some(pending) = reply.request {
                    dispatch(pending, controller.catalog(), done_tx.clone());
                }
                if reply.quit {
                    break;
                }
                prompt(&controller);
            }
            Some(completed) = done_rx.recv() => {
                let redraw = handle_completion(&mut controller, completed, &links).await;
                let Some(screen) = redraw else {
                    continue;
                };
                println!();
                show(&screen);
                prompt(&controller);
            }
        }
    }

    info!("Leaving interactive mode");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finder_core::config::HISTORY_KEY;
    use finder_core::models::storage::MemoryStorage;
    use finder_core::{BookRecord, Catalog, CatalogError, HistoryStore, SearchQuery};
    use std::sync::Arc;

    /// Returns `count` numbered books for each term it knows, nothing otherwise.
    struct FixedCatalog(Vec<(&'static str, usize)>);

    #[async_trait]
    impl Catalog for FixedCatalog {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<BookRecord>, CatalogError> {
            let count = self
                .0
                .iter()
                .find(|(text, _)| *text == query.text())
                .map(|(_, count)| *count)
                .unwrap_or(0);
            Ok((0..count)
                .map(|i| BookRecord {
                    title: Some(format!("{} {}", query.text(), i)),
                    ..BookRecord::default()
                })
                .collect())
        }
    }

    fn links() -> Links {
        Links {
            catalog_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org".to_string(),
        }
    }

    async fn controller(known: Vec<(&'static str, usize)>) -> SearchController {
        let history = HistoryStore::load(Arc::new(MemoryStorage::new()), HISTORY_KEY).await;
        SearchController::new(Arc::new(FixedCatalog(known)), history, 12)
    }

    async fn complete(controller: &mut SearchController, reply: Reply) -> Option<String> {
        let pending = reply.request.unwrap();
        let completed = pending.execute(controller.catalog()).await;
        handle_completion(controller, completed, &links()).await
    }

    #[test]
    fn test_plain_lines_are_searches() {
        assert_eq!(parse_line("Dune").unwrap(), ReplCommand::Search("Dune".to_string()));
        assert_eq!(parse_line("").unwrap(), ReplCommand::Search(String::new()));
        assert_eq!(parse_line("   ").unwrap(), ReplCommand::Search("   ".to_string()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_line(":type author").unwrap(), ReplCommand::SetType(SearchType::Author));
        assert_eq!(parse_line(":open 3").unwrap(), ReplCommand::Open(2));
        assert_eq!(parse_line(" :close").unwrap(), ReplCommand::Close);
        assert_eq!(parse_line(":history").unwrap(), ReplCommand::History);
        assert_eq!(parse_line(":replay 1").unwrap(), ReplCommand::Replay(0));
        assert_eq!(parse_line(":clear").unwrap(), ReplCommand::ClearHistory);
        assert_eq!(parse_line(":limit 24").unwrap(), ReplCommand::Limit(24));
        assert_eq!(parse_line(":q").unwrap(), ReplCommand::Quit);
    }

    #[test]
    fn test_command_errors() {
        assert_eq!(parse_line(":open"), Err(ReplError::BadNumber("open")));
        assert_eq!(parse_line(":replay zero"), Err(ReplError::BadNumber("replay")));
        assert_eq!(parse_line(":limit 0"), Err(ReplError::BadNumber("limit")));
        assert!(matches!(parse_line(":type isbn"), Err(ReplError::BadType(_))));
        assert_eq!(
            parse_line(":frobnicate"),
            Err(ReplError::UnknownCommand("frobnicate".to_string()))
        );
    }

    #[tokio::test]
    async fn test_overlapping_searches_redraw_only_for_latest() {
        let mut controller = controller(vec![("Dune", 3), ("Hobbit", 2)]).await;
        let links = links();

        let first =
            handle_command(&mut controller, ReplCommand::Search("Dune".into()), &links).await;
        assert_eq!(first.output, vec!["Searching for books...".to_string()]);
        let second =
            handle_command(&mut controller, ReplCommand::Search("Hobbit".into()), &links).await;

        assert_eq!(complete(&mut controller, first).await, None);
        assert!(controller.state().loading);

        let screen = complete(&mut controller, second).await.unwrap();
        assert!(screen.contains("Found 2 books"));
        assert!(screen.contains("Hobbit 0"));
        assert!(!screen.contains("Dune 0"));
        assert_eq!(controller.history().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_search_sends_nothing() {
        let mut controller = controller(vec![]).await;

        let reply =
            handle_command(&mut controller, ReplCommand::Search("  ".into()), &links()).await;

        assert!(reply.request.is_none());
        assert_eq!(reply.output, vec!["Please enter a search term.".to_string()]);
    }

    #[tokio::test]
    async fn test_open_and_close_follow_selection() {
        let mut controller = controller(vec![("Dune", 3)]).await;
        let links = links();
        let reply =
            handle_command(&mut controller, ReplCommand::Search("Dune".into()), &links).await;
        complete(&mut controller, reply).await.unwrap();

        let reply = handle_command(&mut controller, ReplCommand::Open(1), &links).await;
        assert!(reply.output[0].starts_with("== Dune 1 =="));
        assert_eq!(controller.state().selected, Some(1));

        let reply = handle_command(&mut controller, ReplCommand::Open(9), &links).await;
        assert_eq!(reply.output, vec!["No result with that number.".to_string()]);
        assert_eq!(controller.state().selected, Some(1));

        let reply = handle_command(&mut controller, ReplCommand::Close, &links).await;
        assert_eq!(controller.state().selected, None);
        assert!(reply.output[0].contains("Dune 2"));
    }

    #[tokio::test]
    async fn test_replay_and_type_commands() {
        let mut controller = controller(vec![("Tolkien", 2), ("Dune", 1)]).await;
        let links = links();
        handle_command(&mut controller, ReplCommand::SetType(SearchType::Author), &links).await;
        let reply =
            handle_command(&mut controller, ReplCommand::Search("Tolkien".into()), &links).await;
        complete(&mut controller, reply).await.unwrap();
        handle_command(&mut controller, ReplCommand::SetType(SearchType::Title), &links).await;
        let reply =
            handle_command(&mut controller, ReplCommand::Search("Dune".into()), &links).await;
        complete(&mut controller, reply).await.unwrap();

        let reply = handle_command(&mut controller, ReplCommand::Replay(1), &links).await;
        assert_eq!(reply.output, vec!["Searching again for Tolkien (author)".to_string()]);
        assert_eq!(reply.request.as_ref().unwrap().query().search_type(), SearchType::Author);
        complete(&mut controller, reply).await.unwrap();
        assert_eq!(controller.history()[0].query.text(), "Tolkien");
        assert_eq!(controller.search_type(), SearchType::Author);

        let reply = handle_command(&mut controller, ReplCommand::Replay(7), &links).await;
        assert!(reply.request.is_none());
        assert_eq!(reply.output, vec!["No recent search with that number.".to_string()]);
    }

    #[tokio::test]
    async fn test_limit_clear_and_quit() {
        let mut controller = controller(vec![("Dune", 10)]).await;
        let links = links();

        handle_command(&mut controller, ReplCommand::Limit(4), &links).await;
        let reply =
            handle_command(&mut controller, ReplCommand::Search("Dune".into()), &links).await;
        complete(&mut controller, reply).await.unwrap();
        assert_eq!(controller.state().results.len(), 4);

        let reply = handle_command(&mut controller, ReplCommand::ClearHistory, &links).await;
        assert_eq!(reply.output, vec!["Recent searches cleared.".to_string()]);
        assert!(controller.history().is_empty());

        let reply = handle_command(&mut controller, ReplCommand::Quit, &links).await;
        assert!(reply.quit);
        assert!(reply.output.is_empty());
    }
}
