use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod app;
mod config;
mod conversation;
mod dispatch;
mod error;
mod handler;
mod input;
mod logging;
mod message;
mod session;
mod tui;
mod typewriter;
mod ui;

use app::App;
use config::{Config, Overrides};
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "tars")]
#[command(version, about = "Terminal chat client for a remote chat endpoint")]
struct Cli {
    /// Chat endpoint that accepts {"message": ...} and returns {"reply": ...}
    #[arg(long, env = "TARS_ENDPOINT")]
    endpoint: Option<String>,

    /// Milliseconds between revealed characters of a reply
    #[arg(long = "reveal-ms")]
    reveal_ms: Option<u64>,

    /// Header label
    #[arg(long)]
    title: Option<String>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = config.resolve(Overrides {
        endpoint: cli.endpoint,
        reveal_interval_ms: cli.reveal_ms,
        title: cli.title,
        log_dir: cli.log_dir,
    });

    let _log_guard = logging::init_logging(&settings.log_dir, &settings.log_level)?;
    let mut app = App::new(&settings)?;
    info!(endpoint = %app.client.endpoint(), "starting chat session");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut app, &mut terminal, EventHandler::new(settings.reveal_interval)).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "chat session ended with an error");
    }
    info!(messages = app.session.messages().len(), "chat session closed");
    result
}

async fn run(app: &mut App, terminal: &mut Tui, mut events: EventHandler) -> Result<()> {
    let tx = events.sender();
    terminal.draw(|frame| ui::render(app, frame))?;

    while let Some(event) = events.next().await {
        let redraw = handler::handle_event(app, event, &tx)?;
        if app.should_quit {
            break;
        }
        if redraw {
            terminal.draw(|frame| ui::render(app, frame))?;
        }
    }

    Ok(())
}
