//! Gmail Reader - search a Gmail mailbox from the terminal
//!
//! This is the main entry point for the `gmail-reader` binary.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use mail::{
    Authorizer, GmailClient, GmailCredentials, SortDirection, SortField, SortOrder,
    StaticAuthorizer,
};
use std::fs::File;
use std::io;

mod app;
mod input;
mod settings;
mod tui;
mod views;

use app::ReaderApp;
use settings::ReaderSettings;

/// Log file used while the full-screen session owns the terminal
const LOG_FILE: &str = "gmail-reader.log";

/// Table width when stdout is not a terminal
const DEFAULT_PRINT_WIDTH: u16 = 120;

#[derive(Parser, Debug)]
#[command(name = "gmail-reader", version, about = "Search your Gmail from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use an existing OAuth access token instead of the browser sign-in
    #[arg(long, env = "GMAIL_ACCESS_TOKEN", hide_env_values = true, global = true)]
    access_token: Option<String>,

    /// Log filter (trace, debug, info, warn, error); defaults to RUST_LOG or info
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session (default)
    Shell,
    /// Sign in, run one search and print a page of results
    Search(SearchArgs),
    /// Write a default settings.json to the config directory
    InitConfig,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Gmail search query, e.g. `from:billing invoice`
    #[arg(required = true)]
    query: Vec<String>,

    /// Column to sort by
    #[arg(long, default_value = "snippet")]
    sort: SortField,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Rows per page (5, 10 or 25); defaults to the configured value
    #[arg(long)]
    rows: Option<usize>,

    /// Page to print, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

fn main() {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = &cli.log_level {
        logger.parse_filters(level);
    }
    if matches!(cli.command, None | Some(Commands::Shell)) {
        if let Some(file) = log_file() {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    logger.format_timestamp_millis().init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(cli.access_token),
        Commands::Search(args) => run_search(cli.access_token, args),
        Commands::InitConfig => {
            let path = ReaderSettings::write_default()?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Open the session log in the config directory, truncating the last run
fn log_file() -> Option<File> {
    let dir = config::ensure_config_dir().ok()?;
    File::create(dir.join(LOG_FILE)).ok()
}

/// Pick the sign-in method: a supplied token, else the browser flow
fn authorizer(access_token: Option<String>) -> Option<Box<dyn Authorizer>> {
    if let Some(token) = access_token {
        info!("Using access token from command line");
        return Some(Box::new(StaticAuthorizer::new(token)));
    }

    match GmailCredentials::load() {
        Ok(creds) => {
            info!("Using OAuth client from {}", creds.source);
            Some(Box::new(creds.into_authorizer()))
        }
        Err(e) => {
            warn!("Gmail credentials not found: {}", e);
            None
        }
    }
}

fn run_shell(access_token: Option<String>) -> Result<()> {
    let settings = ReaderSettings::load();
    let mut app = ReaderApp::new(GmailClient::new(), authorizer(access_token), settings)?;
    app.set_status("Press L to sign in, / to search, ? for help.");
    tui::run(&mut app)
}

fn run_search(access_token: Option<String>, args: SearchArgs) -> Result<()> {
    let settings = ReaderSettings::load();
    let rows = args.rows.unwrap_or(settings.default_rows_per_page);
    let mut app = ReaderApp::new(GmailClient::new(), authorizer(access_token), settings)?;
    if !app.login() {
        anyhow::bail!("not signed in: {}", app.status().unwrap_or_default());
    }

    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let state = app.search_state_mut();
    state.set_order(SortOrder::new(args.sort, direction));
    state.set_page_size(rows)?;

    let query = args.query.join(" ");
    if !app.run_query(&query) {
        anyhow::bail!("search query is empty");
    }

    let state = app.search_state_mut();
    if !state.results().is_empty() {
        let page = args.page.max(1);
        if state.set_page(page - 1).is_err() {
            anyhow::bail!("page {} is out of range (1-{})", page, state.page_count());
        }
    }
    let width = crossterm::terminal::size().map_or(DEFAULT_PRINT_WIDTH, |(columns, _)| columns);
    views::print_page(app.search_state(), width, &mut io::stdout())?;
    Ok(())
}
