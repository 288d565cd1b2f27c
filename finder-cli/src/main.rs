use finder_core::models::storage::{self, MemoryStorage};
use finder_core::{
    Config, HistoryStore, OpenLibraryCatalog, SearchController, SearchOutcome, SharedStorage,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod args;
mod repl;
mod view;

use args::{parse_args, Command, USAGE};
use view::{render_history, render_screen, Links};

const DEFAULT_LOG_FILTER: &str = "finder_cli=warn,finder_core=warn";

async fn open_storage(config: &Config) -> SharedStorage {
    match storage::connect(&config.backend).await {
        Ok(storage) => storage,
        Err(e) => {
            warn!("Storage backend unavailable ({}); history will not outlive this session", e);
            Arc::new(MemoryStorage::new())
        }
    }
}

fn print_search_result(controller: &SearchController, outcome: SearchOutcome, links: &Links) {
    info!("Search finished: {:?}", outcome);
    println!("{}", render_screen(controller.state(), &[], links));
}

/// Loads configuration and history and builds the controller.
async fn open_session() -> Result<(SearchController, Links), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let links = Links {
        catalog_url: config.catalog_url.clone(),
        covers_url: config.covers_url.clone(),
    };

    let storage = open_storage(&config).await;
    let history = HistoryStore::load(storage, config.history_key.clone()).await;
    let catalog = Arc::new(OpenLibraryCatalog::new(config.catalog_url.clone()));
    let controller = SearchController::new(catalog, history, config.results_limit);
    Ok((controller, links))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            error!("Invalid arguments: {}", e);
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    match command {
        Command::Help => println!("{}", USAGE),
        Command::Interactive => {
            let (controller, links) = open_session().await?;
            repl::run(controller, links).await?;
        }
        Command::Search { search_type, text } => {
            let (mut controller, links) = open_session().await?;
            let outcome = controller.search(&text, search_type).await;
            print_search_result(&controller, outcome, &links);
        }
        Command::History => {
            let (controller, _) = open_session().await?;
            println!("{}", render_history(controller.history()));
        }
        Command::Replay(index) => {
            let (mut controller, links) = open_session().await?;
            match controller.replay(index).await {
                Some(outcome) => print_search_result(&controller, outcome, &links),
                None => {
                    eprintln!("No recent search number {}.", index + 1);
                    std::process::exit(1);
                }
            }
        }
        Command::ClearHistory => {
            let (mut controller, _) = open_session().await?;
            controller.clear_history().await?;
            println!("Recent searches cleared.");
        }
    }

    Ok(())
}
