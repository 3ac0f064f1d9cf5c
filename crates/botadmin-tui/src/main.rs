use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use botadmin_core::{Config, Locale};

mod app;
mod handler;
mod theme;
mod tui;
mod ui;

use app::{App, Settings};

#[derive(Parser)]
#[command(name = "botadmin")]
#[command(about = "Terminal admin dashboard for managing messaging-bot tenants")]
struct Cli {
    /// Interface language (en, fr)
    #[arg(short, long)]
    locale: Option<String>,

    /// Force the light palette
    #[arg(long, conflicts_with = "dark")]
    light: bool,

    /// Force the dark palette
    #[arg(long)]
    dark: bool,

    /// Maximum accepted upload size in MB
    #[arg(long)]
    max_file_size_mb: Option<f64>,

    /// Approximate width of one terminal cell in pixels
    #[arg(long)]
    cell_width: Option<u16>,
}

/// Logs go to a file; stderr belongs to the terminal UI.
fn init_tracing() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("botadmin");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("botadmin.log"))?;

    let env_filter = EnvFilter::try_from_env("BOTADMIN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

fn settings_from(cli: &Cli, mut config: Config) -> Result<Settings> {
    if let Some(locale) = &cli.locale {
        let parsed = Locale::from_str(locale)
            .with_context(|| format!("Unknown locale '{}'", locale))?;
        config.locale = Some(parsed.as_str().to_string());
    }
    if let Some(mb) = cli.max_file_size_mb {
        config.max_file_size_mb = Some(mb);
    }
    if let Some(width) = cli.cell_width {
        config.cell_width_px = Some(width);
    }

    let dark_mode = if cli.light {
        false
    } else if cli.dark {
        true
    } else {
        config.dark_mode().unwrap_or_else(theme::detect_dark_background)
    };

    Ok(Settings { config, dark_mode })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = Config::load()?;
    let settings = settings_from(&cli, config)?;
    let mut app = App::new(settings);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let size = terminal.size()?;
    app.on_resize(size.width);
    info!(columns = size.width, viewport = app.form.viewport().label(), "botadmin started");

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}
