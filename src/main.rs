use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pagechat::app::{r#loop::run_loop, session::Session, state::AppState};
use pagechat::config::AppConfig;
use pagechat::domain::codec::PropertyCodec;
use pagechat::infrastructure::notion_adapter::NotionConnector;
use pagechat::theme::ThemeMode;

const LOG_ENV: &str = "PAGECHAT_LOG";

/// Chat with a Notion database from the terminal.
#[derive(Debug, Parser)]
#[command(name = "pagechat", version, about)]
struct Args {
    /// Config file (defaults to ~/.config/pagechat/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database id, overriding the config file
    #[arg(short, long, env = "NOTION_DATABASE_ID")]
    database: Option<String>,

    /// Start with the light theme
    #[arg(long)]
    light: bool,
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: Option<&Path>) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("pagechat=info"));

    let file = path.and_then(|p| {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir).ok()?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(p)
            .ok()
    });

    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref());
    if let Some(database) = args.database {
        config.database_id = Some(database);
    }
    if args.light {
        config.theme = ThemeMode::Light;
    }

    init_logging(config.log_path().as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "starting pagechat");
    if config.api_key.is_none() {
        warn!("NOTION_API_KEY is not set; store commands will fail until it is");
    }

    setup_panic_hook();

    // The store connects lazily on the first command
    let connector = Arc::new(NotionConnector::new(config.notion()));
    let session = Arc::new(
        Session::new(connector)
            .with_codec(PropertyCodec::new(config.initial_status.clone()))
            .with_working_hours(config.working_hours())
            .with_recent_limit(config.recent_limit),
    );
    let app_state = AppState::new(
        config.theme,
        config.database_id.clone().unwrap_or_default(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_loop(&mut terminal, app_state, session).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}
