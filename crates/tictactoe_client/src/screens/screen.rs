//! Screen trait and the actions screens hand back to the controller.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tictactoe_api::GameId;

use crate::commands::AuthMode;
use crate::store::{GameState, SessionState};

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`]; the controller turns it
/// into store updates, navigation and commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    /// Nothing for the controller to do.
    Stay,
    /// Submit the credentials form.
    Submit {
        /// Login or register.
        mode: AuthMode,
        /// Entered username.
        username: String,
        /// Entered password.
        password: String,
    },
    /// Create a new game.
    CreateGame,
    /// Move to the next status filter.
    CycleFilter,
    /// Show the next page of games.
    NextPage,
    /// Show the previous page of games.
    PreviousPage,
    /// Open a game.
    SelectGame(GameId),
    /// Leave the board for the list.
    BackToList,
    /// Take the open seat of the viewed game.
    JoinGame,
    /// Play a cell of the viewed game.
    MakeMove {
        /// Row, top to bottom.
        row: usize,
        /// Column, left to right.
        col: usize,
    },
    /// Refetch the viewed game now.
    Refresh,
    /// Show the next page of rankings.
    RankingsNext,
    /// Show the previous page of rankings.
    RankingsPrevious,
    /// Exit the application.
    Quit,
}

/// Read-only view of the stores handed to screens.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Session store state.
    pub session: &'a SessionState,
    /// Game store state.
    pub games: &'a GameState,
    /// Game being viewed, if the board is open.
    pub viewed: Option<GameId>,
}

/// Trait implemented by each screen of the client.
///
/// Each screen owns only its own input state (cursors, form fields) and
/// renders everything else from the [`ViewContext`].
pub trait Screen {
    /// Renders the screen into `area`.
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>);

    /// Handles a key event and returns the resulting [`ScreenAction`].
    fn handle_key(&mut self, key: KeyEvent, ctx: &ViewContext<'_>) -> ScreenAction;
}
