//! tictactoe_client - terminal client for the remote tic-tac-toe service.

#![warn(missing_docs)]

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tictactoe_api::{GameService, RestGameClient};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

use tictactoe_client::{
    AppController, AuthMode, Cli, ClientConfig, Command, FileCredentialStore, OneShot,
    SessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Tui);

    if command == Command::Tui {
        init_file_tracing()?;
    } else {
        init_stderr_tracing();
    }

    let config = load_config(&cli)?;
    let service: Arc<dyn GameService> = Arc::new(RestGameClient::new(config.base_url().clone()));
    let storage = FileCredentialStore::new(config.credentials_path());

    match command {
        Command::Tui => run_tui(config, service, storage).await,
        other => run_oneshot(other, config, service, storage).await,
    }
}

/// Log to a file so output doesn't corrupt the terminal UI.
fn init_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create("tictactoe_client.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// File, then environment, then flags.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    info!(base_url = %config.base_url(), "Configuration ready");
    Ok(config)
}

/// Run the interactive terminal client
async fn run_tui(
    config: ClientConfig,
    service: Arc<dyn GameService>,
    storage: FileCredentialStore,
) -> Result<()> {
    info!("Starting tictactoe_client TUI");

    let mut controller = AppController::new(config, service, Box::new(storage));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = controller.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        error!(error = %e, "Client exited with error");
    }
    res
}

/// Run a single non-interactive command and print its result
async fn run_oneshot(
    command: Command,
    config: ClientConfig,
    service: Arc<dyn GameService>,
    storage: FileCredentialStore,
) -> Result<()> {
    let session = SessionStore::load(Box::new(storage));
    let mut runner = OneShot::new(service, *config.page_size(), session);

    let lines = match command {
        Command::Login { username, password } => {
            vec![runner.submit(AuthMode::Login, username, password).await?]
        }
        Command::Register { username, password } => {
            vec![runner.submit(AuthMode::Register, username, password).await?]
        }
        Command::Logout => vec![runner.logout()],
        Command::Games { status, offset } => runner.list_games(offset, status).await?,
        Command::Rankings { offset } => runner.list_rankings(offset).await?,
        Command::Tui => Vec::new(),
    };

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
