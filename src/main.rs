//! missal - Catholic prayers and daily Mass readings in your terminal
//!
//! A terminal UI application that shows a searchable prayer catalogue and the
//! readings of the day, fetched from Gemini and cached on disk.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use missal::app::App;
use missal::cache::{FileStore, KeyValueStore};
use missal::catalog::FAVORITES_KEY;
use missal::cli::{Cli, StartupConfig};
use missal::config::Settings;
use missal::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Removes cached content, keeping favorites
fn clear_cache(store: &FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let removed = store.clear_except(&[FAVORITES_KEY])?;
    println!(
        "Removed {} cached entr{} from {}",
        removed,
        if removed == 1 { "y" } else { "ies" },
        store.dir().display()
    );
    Ok(())
}

/// Runs the TUI until the user quits
async fn run_tui(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick();
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let fetch tasks make progress between frames
        tokio::task::yield_now().await;
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let startup = StartupConfig::from_cli(&cli)?;
    let settings = Settings::from_cli(&cli)?;
    let store = FileStore::with_dir(settings.cache_dir.clone());

    if cli.clear_cache {
        return clear_cache(&store);
    }

    match logging::init(&settings.cache_dir) {
        Ok(path) => tracing::info!(log = %path.display(), "logging initialised"),
        Err(e) => eprintln!("Warning: {}", e),
    }
    tracing::debug!(?settings, "resolved settings");

    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    let app = App::new(&settings, store, startup)?;

    run_tui(app).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
