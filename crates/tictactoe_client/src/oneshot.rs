//! Non-interactive subcommands.
//!
//! Each subcommand runs exactly one command through the same [`Commands`]
//! and stores as the terminal client, then prints the resulting state.

use std::sync::Arc;

use tictactoe_api::{GameService, GameStatus};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, instrument, warn};

use crate::commands::{AuthMode, Commands};
use crate::event::AppEvent;
use crate::scope::ViewScope;
use crate::screens::REGISTERED_NOTICE;
use crate::store::{GameState, SessionAction, SessionStore, reduce_games};

/// Runs one command at a time against the service and the session store.
#[derive(Debug)]
pub struct OneShot {
    commands: Commands,
    session: SessionStore,
    games: GameState,
    events: UnboundedReceiver<AppEvent>,
    scope: ViewScope,
    registered: bool,
}

impl OneShot {
    /// Creates a runner over `service` and an already restored session.
    #[instrument(skip(service, session))]
    pub fn new(service: Arc<dyn GameService>, page_size: u32, session: SessionStore) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        Self {
            commands: Commands::new(service, page_size, sender),
            session,
            games: GameState::new(page_size),
            events,
            scope: ViewScope::new(),
            registered: false,
        }
    }

    /// Session store after the last command.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Game store after the last command.
    pub fn games(&self) -> &GameState {
        &self.games
    }

    /// Applies every event produced so far.
    fn drain(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                AppEvent::Session(action) => self.session.dispatch(action),
                AppEvent::Game { token, action } if token.is_current() => {
                    self.games = reduce_games(&self.games, action);
                }
                AppEvent::Registered => self.registered = true,
                other => warn!(event = ?other, "Unexpected event"),
            }
        }
    }

    fn credential(&self) -> anyhow::Result<String> {
        self.session
            .credential()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `login` first."))
    }

    fn game_error(&self) -> anyhow::Result<()> {
        match self.games.error() {
            Some(error) => Err(anyhow::anyhow!(error.clone())),
            None => Ok(()),
        }
    }

    fn session_error(&self) -> anyhow::Result<()> {
        match self.session.state().error() {
            Some(error) => Err(anyhow::anyhow!(error.clone())),
            None => Ok(()),
        }
    }

    /// Logs in or registers. Returns the line to print.
    #[instrument(skip(self, password))]
    pub async fn submit(
        &mut self,
        mode: AuthMode,
        username: String,
        password: String,
    ) -> anyhow::Result<String> {
        self.registered = false;
        self.commands
            .submit_credentials(mode, username, password)
            .await;
        self.drain();
        self.session_error()?;

        match mode {
            AuthMode::Login => Ok(format!("Logged in as {}", self.session.state().username())),
            AuthMode::Register if self.registered => Ok(REGISTERED_NOTICE.to_string()),
            AuthMode::Register => Err(anyhow::anyhow!("Registration was not confirmed")),
        }
    }

    /// Forgets the stored session.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> String {
        self.session.dispatch(SessionAction::Logout);
        "Logged out".to_string()
    }

    /// Fetches one page of games. Returns the lines to print.
    #[instrument(skip(self))]
    pub async fn list_games(
        &mut self,
        offset: u32,
        status: Option<GameStatus>,
    ) -> anyhow::Result<Vec<String>> {
        let credential = self.credential()?;
        self.commands
            .fetch_games(self.scope.token(), credential, offset, status)
            .await;
        self.drain();
        self.game_error()?;

        let username = self.session.state().username().clone();
        let mut lines: Vec<String> = self
            .games
            .existing_games()
            .iter()
            .map(|game| {
                let name = |p: &Option<tictactoe_api::PlayerRef>| {
                    p.as_ref()
                        .map_or("N/A".to_string(), |p| p.username().clone())
                };
                format!(
                    "#{:<6} {:<10} {} vs {}{}",
                    game.id(),
                    game.status().to_string(),
                    name(game.first_player()),
                    name(game.second_player()),
                    if game.has_participant(&username) {
                        "  (you)"
                    } else {
                        ""
                    }
                )
            })
            .collect();

        let pagination = self.games.pagination();
        lines.push(format!(
            "{} games total{}{}",
            pagination.count(),
            if pagination.has_previous() {
                ", previous page available"
            } else {
                ""
            },
            if pagination.has_next() {
                ", next page available"
            } else {
                ""
            }
        ));
        info!(rows = lines.len() - 1, "Games printed");
        Ok(lines)
    }

    /// Fetches one page of rankings. Returns the lines to print.
    #[instrument(skip(self))]
    pub async fn list_rankings(&mut self, offset: u32) -> anyhow::Result<Vec<String>> {
        let credential = self.credential()?;
        self.commands
            .fetch_rankings(self.scope.token(), credential, offset)
            .await;
        self.drain();
        self.game_error()?;

        let mut lines = vec![format!(
            "{:<20} {:>12} {:>10}",
            "Username", "Games Played", "Win Rate"
        )];
        lines.extend(self.games.rankings().iter().map(|entry| {
            format!(
                "{:<20} {:>12} {:>10}",
                entry.username(),
                entry.games_played(),
                format!("{}%", entry.win_rate())
            )
        }));
        Ok(lines)
    }
}
