use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use fundraiser::config::AppConfig;
use fundraiser::core::logging;
use fundraiser::tui::app::AppState;
use fundraiser::tui::services::Services;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();
    let _log_guard = logging::init_tui(&config.data_dir());
    log::info!("{} v{} starting", fundraiser::NAME, fundraiser::VERSION);

    // Fail before touching the terminal so the error stays readable.
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(&config, event_tx)?;
    let mut app = AppState::new(event_rx, services, &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("TUI exited with error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    log::info!("Shutting down");
    Ok(())
}
