mod action;
mod app;
mod auth;
mod catalog;
mod config;
mod error;
mod event;
mod favorites;
mod pagination;
mod runtime_cache;
mod search;
mod session;
mod tmdb;
mod tui;
mod types;
mod ui;

use std::fs::OpenOptions;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::event::Event;
use crate::favorites::Favorites;
use crate::tmdb::Tmdb;
use crate::tui::EventHandler;

/// Browse popular movies and search the catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "reel", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/reel/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with this search query instead of the popular feed
    #[arg(short, long)]
    query: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(cli.log_file.is_none())
                .with_writer(log_writer(cli.log_file.as_deref())?),
        )
        .init();

    let config = Config::load(cli.config.as_deref());
    let credential = auth::load_credential(&config.catalog)?;
    let tmdb = Tmdb::from_config(&config.catalog, credential)?;
    tracing::info!(catalog = tmdb.name(), base_url = %config.catalog.base_url, "catalog configured");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(Arc::new(tmdb), &config, cli.query).await;

    // Restore terminal
    tui::restore()?;

    result
}

fn log_writer(path: Option<&Path>) -> std::io::Result<BoxMakeWriter> {
    let Some(path) = path else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

async fn run(
    catalog: Arc<dyn Catalog>,
    config: &Config,
    query: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let favorites = Favorites::load(favorites::default_path());
    let mut app = App::new(catalog, action_tx.clone(), &config.browse, favorites);
    if let Some(query) = query.as_deref() {
        app.search_for(query);
    }

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render | Event::Resize => {
                        terminal.draw(|frame| ui::render(frame, &mut app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
