//! Commands: one service call each, reported back as store actions.
//!
//! Every command follows the same shape. It announces loading, calls the
//! service, turns the outcome into actions and finally clears loading on
//! every exit path. Game commands report through a [`ScopedSender`] so that
//! results for a view the user already left are discarded.

use std::sync::Arc;

use derive_getters::Getters;
use tictactoe_api::{ApiError, Credentials, GameId, GameService, GameStatus, MoveRequest};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use crate::event::AppEvent;
use crate::scope::{ScopeToken, ScopedSender};
use crate::store::{GameAction, SessionAction};

/// Fallback shown when a session or rankings call fails without a message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";
/// Fallback for a failed game listing.
pub const FETCH_GAMES_ERROR: &str = "An error occurred while fetching games.";
/// Fallback for a failed game creation.
pub const CREATE_GAME_ERROR: &str = "An error occurred while creating the game.";
/// Fallback for a failed detail fetch.
pub const FETCH_GAME_ERROR: &str = "An error occurred while fetching the game.";
/// Fallback for a failed join.
pub const JOIN_GAME_ERROR: &str = "An error occurred while joining the game.";
/// Fallback for a failed move.
pub const MAKE_MOVE_ERROR: &str = "An error occurred while making the move.";

/// Which branch of the credentials form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum AuthMode {
    /// Exchange credentials for a token.
    #[default]
    Login,
    /// Create an account.
    Register,
}

impl AuthMode {
    /// Returns the other mode.
    pub fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

/// Issues service calls and reports their outcome on the event channel.
///
/// Cheap to clone; the controller hands a clone to each spawned task.
#[derive(Debug, Clone, Getters)]
pub struct Commands {
    service: Arc<dyn GameService>,
    page_size: u32,
    #[getter(skip)]
    events: UnboundedSender<AppEvent>,
}

impl Commands {
    /// Creates commands over `service`, listing `page_size` rows per page.
    #[instrument(skip(service, events))]
    pub fn new(
        service: Arc<dyn GameService>,
        page_size: u32,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            service,
            page_size,
            events,
        }
    }

    fn session(&self, action: SessionAction) {
        if self.events.send(AppEvent::Session(action)).is_err() {
            warn!("Event receiver closed, dropping session action");
        }
    }

    fn scoped(&self, token: ScopeToken) -> ScopedSender {
        ScopedSender::new(token, self.events.clone())
    }

    /// Submits the credentials form in the given mode.
    ///
    /// Login success stores the identity. Register success only emits
    /// [`AppEvent::Registered`]; the user still has to log in.
    #[instrument(skip(self, password))]
    pub async fn submit_credentials(&self, mode: AuthMode, username: String, password: String) {
        self.session(SessionAction::SetError(None));
        self.session(SessionAction::SetLoading(true));

        let credentials = Credentials::new(username, password);
        match mode {
            AuthMode::Login => match self.service.login(&credentials).await {
                Ok(response) => {
                    info!(username = %response.username(), "Login accepted");
                    self.session(SessionAction::Login {
                        username: response.username().clone(),
                        token: response.token().clone(),
                    });
                }
                Err(e) => self.session_failed(&e),
            },
            AuthMode::Register => match self.service.register(&credentials).await {
                Ok(()) => {
                    info!(username = %credentials.username(), "Registration accepted");
                    if self.events.send(AppEvent::Registered).is_err() {
                        warn!("Event receiver closed, dropping registration notice");
                    }
                }
                Err(e) => self.session_failed(&e),
            },
        }

        self.session(SessionAction::SetLoading(false));
    }

    fn session_failed(&self, error: &ApiError) {
        warn!(error = %error, "Session command failed");
        self.session(SessionAction::SetError(Some(
            error.user_message(UNKNOWN_ERROR),
        )));
    }

    /// Fetches one page of games at `offset`, optionally filtered.
    #[instrument(skip(self, token, credential))]
    pub async fn fetch_games(
        &self,
        token: ScopeToken,
        credential: String,
        offset: u32,
        status: Option<GameStatus>,
    ) {
        let out = self.scoped(token);
        out.send(GameAction::SetLoading(true));

        match self
            .service
            .list_games(&credential, self.page_size, offset, status)
            .await
        {
            Ok(page) => {
                debug!(count = page.count(), "Games fetched");
                out.send(GameAction::SetGames(page));
                out.send(GameAction::SetError(None));
            }
            Err(e) => fail(&out, &e, FETCH_GAMES_ERROR),
        }

        out.send(GameAction::SetLoading(false));
    }

    /// Creates a game, lists it first and opens it.
    #[instrument(skip(self, token, credential))]
    pub async fn create_game(&self, token: ScopeToken, credential: String) {
        let out = self.scoped(token);
        out.send(GameAction::SetLoading(true));

        match self.service.create_game(&credential).await {
            Ok(detail) => {
                let game_id = *detail.id();
                info!(game_id, "Game created");
                out.send(GameAction::CreateGame(detail));
                out.send(GameAction::SetError(None));
                out.send(GameAction::SetLoading(false));
                out.send_event(AppEvent::GameCreated(game_id));
                return;
            }
            Err(e) => fail(&out, &e, CREATE_GAME_ERROR),
        }

        out.send(GameAction::SetLoading(false));
    }

    /// Fetches the full state of one game and makes it current.
    #[instrument(skip(self, token, credential))]
    pub async fn fetch_game(&self, token: ScopeToken, credential: String, game_id: GameId) {
        let out = self.scoped(token);
        out.send(GameAction::SetLoading(true));

        match self.service.get_game(&credential, game_id).await {
            Ok(detail) => {
                debug!(status = %detail.status(), "Game fetched");
                out.send(GameAction::SetCurrentGame(Some(detail)));
                out.send(GameAction::SetError(None));
            }
            Err(e) => fail(&out, &e, FETCH_GAME_ERROR),
        }

        out.send(GameAction::SetLoading(false));
    }

    /// Joins the current game and refetches it on success.
    ///
    /// Does nothing when no game is current.
    #[instrument(skip(self, token, credential))]
    pub async fn join_game(&self, token: ScopeToken, credential: String, game_id: Option<GameId>) {
        let Some(game_id) = game_id else {
            debug!("No current game to join");
            return;
        };
        let out = self.scoped(token.clone());
        out.send(GameAction::SetLoading(true));

        match self.service.join_game(&credential, game_id).await {
            Ok(()) => {
                info!(game_id, "Joined game");
                out.send(GameAction::SetError(None));
                self.fetch_game(token, credential, game_id).await;
            }
            Err(e) => fail(&out, &e, JOIN_GAME_ERROR),
        }

        out.send(GameAction::SetLoading(false));
    }

    /// Submits a move on the current game.
    ///
    /// The board is not touched locally; the next fetch shows the result.
    /// Does nothing when no game is current.
    #[instrument(skip(self, token, credential))]
    pub async fn make_move(
        &self,
        token: ScopeToken,
        credential: String,
        game_id: Option<GameId>,
        row: usize,
        col: usize,
    ) {
        let Some(game_id) = game_id else {
            debug!("No current game to move in");
            return;
        };
        let out = self.scoped(token);
        out.send(GameAction::SetLoading(true));

        match self
            .service
            .make_move(&credential, game_id, MoveRequest::new(row, col))
            .await
        {
            Ok(()) => {
                info!(game_id, row, col, "Move accepted");
                out.send(GameAction::SetError(None));
            }
            Err(e) => fail(&out, &e, MAKE_MOVE_ERROR),
        }

        out.send(GameAction::SetLoading(false));
    }

    /// Fetches one page of rankings at `offset`.
    #[instrument(skip(self, token, credential))]
    pub async fn fetch_rankings(&self, token: ScopeToken, credential: String, offset: u32) {
        let out = self.scoped(token);
        out.send(GameAction::SetLoading(true));

        match self
            .service
            .rankings(&credential, self.page_size, offset)
            .await
        {
            Ok(page) => {
                debug!(rows = page.results().len(), "Rankings fetched");
                out.send(GameAction::SetRankings(page.into_results()));
                out.send(GameAction::SetError(None));
            }
            Err(e) => fail(&out, &e, UNKNOWN_ERROR),
        }

        out.send(GameAction::SetLoading(false));
    }
}

fn fail(out: &ScopedSender, error: &ApiError, fallback: &str) {
    warn!(error = %error, "Game command failed");
    out.send(GameAction::SetError(Some(error.user_message(fallback))));
}
