// Wallet Challenge Console - run wallet SDK challenges from a terminal form
mod app;
mod event;
mod ui;

use anyhow::Context;
use app::App;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event::{AppEvent, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wallet_challenge_lib::sdk::demo::ModalPresenter;
use wallet_challenge_lib::sdk::{DemoOutcome, DemoSdk};
use wallet_challenge_lib::session::Session;
use wallet_challenge_lib::settings::Endpoint;
use wallet_challenge_lib::storage::{self, JsonFileStore};
use wallet_challenge_lib::{config, logger};

#[derive(Parser, Debug)]
#[command(name = "wallet-challenge-tui", version, about = "Run wallet SDK challenges from a terminal form")]
struct Args {
    /// Data directory (settings and logs)
    #[arg(long, env = config::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Endpoint selected at startup (not remembered between runs)
    #[arg(long, value_enum, default_value_t = Endpoint::Sandbox)]
    endpoint: Endpoint,

    /// Log level for the session log file
    #[arg(long, default_value = "info")]
    log_level: String,

    /// How the demo SDK finishes every challenge
    #[arg(long, value_enum, default_value_t = DemoOutcome::Success)]
    demo_outcome: DemoOutcome,

    /// Simulated SDK round-trip in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_DEMO_LATENCY_MS)]
    demo_latency_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app_dir = match args.data_dir.clone() {
        Some(dir) => dir,
        None => storage::get_app_data_dir()?,
    };
    storage::init_storage(&app_dir).context("Failed to initialize storage")?;

    // Initialize logger (no console output)
    let _log_guard = logger::init_logger(&app_dir, &args.log_level).context("Failed to initialize logging")?;
    tracing::info!("{} {} starting, data dir {}", config::APP_NAME, config::APP_VERSION, app_dir.display());

    // Setup event handler first (the SDK needs the sender for completions and modals)
    let mut event_handler = EventHandler::new();
    event_handler.spawn_input_listener();
    event_handler.spawn_tick_timer(Duration::from_millis(config::TICK_RATE_MS));

    let modal_sender = event_handler.sender();
    let presenter: ModalPresenter = Arc::new(move |modal| {
        let _ = modal_sender.send(AppEvent::Modal(modal));
    });
    let sdk = DemoSdk::new(args.demo_outcome, Duration::from_millis(args.demo_latency_ms)).with_presenter(presenter);

    let session = Session::start(Arc::new(sdk), Box::new(JsonFileStore::new(&app_dir)), args.endpoint);
    let mut app = App::new(session, event_handler.sender());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("Error: {:?}", err);
    }
    tracing::info!("Exiting");

    Ok(result?)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> io::Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| {
            render_ui(f, app);
        })?;

        // Handle events
        if let Some(event) = event_handler.next().await {
            app.handle_event(event);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render_ui(f: &mut ratatui::Frame, app: &App) {
    use ratatui::layout::{Constraint, Direction, Layout};

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Form + history
            Constraint::Length(2), // Hints
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[0]);

    ui::render_form(f, app, columns[0]);
    ui::render_history(f, app, columns[1]);
    ui::render_hints(f, app, rows[1]);

    // Overlays last
    ui::render_modal(f, app, rows[0]);
    ui::render_toast(f, app, rows[0]);
}
