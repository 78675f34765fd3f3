//! Messages flowing from background tasks to the UI loop.

use tictactoe_api::GameId;

use crate::scope::ScopeToken;
use crate::store::{GameAction, SessionAction};

/// Everything the controller can receive on its event channel.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Apply an action to the session store.
    Session(SessionAction),
    /// Apply an action to the game store, if `token` is still current.
    Game {
        /// Scope the originating command was started in.
        token: ScopeToken,
        /// Action to apply.
        action: GameAction,
    },
    /// Registration succeeded; the form should switch back to login.
    Registered,
    /// A new game was created and should be opened.
    GameCreated(GameId),
    /// The poller fired for the given game.
    PollTick(GameId),
}
