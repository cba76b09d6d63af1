//! Command-line front end for the storefront catalog.
//!
//! ## Usage
//!
//! ```bash
//! # List the catalog, filtered like the product list screen
//! storefront list --search ring --category jewelery
//!
//! # Show one product
//! storefront show 5
//!
//! # Category names known to the service
//! storefront categories
//!
//! # Line-driven session: j/k move, o opens, b goes back, /text searches,
//! # c <name> picks a category, x clears filters, r refreshes, q quits
//! storefront browse
//! ```
//!
//! Every subcommand runs the same event/action loop: events go through
//! [`handle_event`], `PostToWorker` actions are answered by the in-process
//! [`CatalogWorker`], and `ScheduleTick` sleeps before delivering `Tick`.

#![allow(clippy::multiple_crate_versions)]

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueHint};

use storefront::{
    handle_event, initialize, observability, ui, Action, AppState, CatalogWorker, Config, Event, LoadPhase, Result,
    Screen, StorefrontError, WorkerMessage, WorkerResponse,
};

/// Browse a REST product catalog
#[derive(Parser)]
#[command(name = "storefront", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/storefront/config.toml when present)
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Catalog service root URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    trace_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products
    List {
        /// Case-insensitive text matched against product titles
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category name
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one product
    Show {
        #[arg(allow_hyphen_values = true)]
        id: i64,
    },

    /// List category names
    Categories {
        /// Bypass the response cache
        #[arg(long)]
        refresh: bool,
    },

    /// Interactive line-driven session over stdin
    Browse,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = observability::init_tracing(&config) {
        eprintln!("Warning: span export disabled: {e}");
    }

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if cli.trace_level.is_some() {
        config.trace_level.clone_from(&cli.trace_level);
    }
    Ok(config)
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let (state, worker) = initialize(config)?;
    let mut session = Session { state, worker };

    match command {
        Command::List { search, category } => {
            session.dispatch(Event::Start).await?;
            if let Some(category) = category {
                session.dispatch(Event::SelectCategory(category)).await?;
            }
            if let Some(search) = search {
                session.dispatch(Event::SearchInput(search)).await?;
            }
            session.print()?;
            session.fail_on_error()
        }
        Command::Show { id } => {
            match session.worker.handle_message(WorkerMessage::load_product(id)).await {
                WorkerResponse::ProductLoaded { product } => {
                    session.state.screen = Screen::Detail(Box::new(product));
                    session.print()
                }
                WorkerResponse::Error(error) => Err(error.into()),
                other => Err(unexpected(&other)),
            }
        }
        Command::Categories { refresh } => {
            match session.worker.handle_message(WorkerMessage::load_categories(refresh)).await {
                WorkerResponse::CategoriesLoaded { categories } => {
                    let mut out = io::stdout().lock();
                    for category in categories {
                        writeln!(out, "{category}")?;
                    }
                    Ok(())
                }
                WorkerResponse::Error(error) => Err(error.into()),
                other => Err(unexpected(&other)),
            }
        }
        Command::Browse => session.browse().await,
    }
}

fn unexpected(response: &WorkerResponse) -> StorefrontError {
    StorefrontError::Worker(format!("unexpected response {response:?}"))
}

struct Session {
    state: AppState,
    worker: CatalogWorker,
}

impl Session {
    /// Runs `event` and every event its actions produce. Returns `true` on quit.
    async fn dispatch(&mut self, event: Event) -> Result<bool> {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let (_needs_render, actions) = handle_event(&mut self.state, &event)?;
            for action in actions {
                match action {
                    Action::PostToWorker(message) => {
                        let response = self.worker.handle_message(message).await;
                        queue.push_back(Event::WorkerResponse(response));
                    }
                    Action::ScheduleTick(wait) => {
                        tokio::time::sleep(wait).await;
                        queue.push_back(Event::Tick);
                    }
                    Action::Quit => return Ok(true),
                }
            }
        }
        Ok(false)
    }

    fn print(&self) -> Result<()> {
        let frame = ui::render(&self.state.compute_viewmodel());
        let mut out = io::stdout().lock();
        out.write_all(frame.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn fail_on_error(&self) -> Result<()> {
        match (&self.state.phase, &self.state.error) {
            (LoadPhase::Failed, Some(error)) => Err(error.clone().into()),
            _ => Ok(()),
        }
    }

    async fn browse(&mut self) -> Result<()> {
        self.dispatch(Event::Start).await?;
        self.print()?;

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Some(event) = parse_command(&line?) else {
                eprintln!("commands: j k o b r t x q /<text> c <category>");
                continue;
            };
            if self.dispatch(event).await? {
                break;
            }
            self.print()?;
        }
        Ok(())
    }
}

fn parse_command(line: &str) -> Option<Event> {
    if let Some(query) = line.strip_prefix('/') {
        return Some(Event::SearchInput(query.to_string()));
    }
    if let Some(category) = line.strip_prefix("c ") {
        return Some(Event::SelectCategory(category.trim().to_string()));
    }
    match line.trim() {
        "j" => Some(Event::KeyDown),
        "k" => Some(Event::KeyUp),
        "o" => Some(Event::OpenSelected),
        "b" => Some(Event::Back),
        "r" => Some(Event::Refresh),
        "t" => Some(Event::Retry),
        "x" => Some(Event::ClearFilters),
        "q" => Some(Event::Quit),
        _ => None,
    }
}
