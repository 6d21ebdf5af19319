use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tarefas::app::App;
use tarefas::cli::{run_command, Cli};
use tarefas::config::AppConfig;
use tarefas::error::Result;
use tarefas::logging;
use tarefas::storage::FileStore;
use tarefas::theme::Theme;
use tarefas::ui;

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::error!(error = %e, "exiting with error");
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let data_dir = config.data_dir(cli.data_dir.as_deref())?;
    logging::init(&config.log_level, &data_dir)?;
    let mut store = FileStore::new(&data_dir);

    match cli.command {
        Some(command) => {
            let stdout = io::stdout();
            run_command(command, &mut store, &config, &mut stdout.lock())
        }
        None => run_tui(store, &config),
    }
}

fn run_tui(store: FileStore, config: &AppConfig) -> Result<()> {
    // Load before touching the terminal so errors print normally
    let mut app = App::new(store, config, Theme::detect_system())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
