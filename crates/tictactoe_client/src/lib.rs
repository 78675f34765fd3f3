//! Terminal client for a remote tic-tac-toe service.
//!
//! The service decides everything about a game; this crate keeps a local
//! mirror of what it returned and lets a user browse, create, join and play
//! games from the terminal.
//!
//! # Architecture
//!
//! - **Stores**: pure reducers for the session and for game data
//! - **Commands**: one service call each, reported back as store actions
//! - **Scopes**: results of commands for a view the user left are dropped
//! - **Navigation**: the Listing / Viewing state machine and its effects
//! - **Poller**: periodic refresh of an unfinished game
//! - **Screens**: ratatui rendering and key handling
//! - **Controller**: the event loop tying everything together

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod controller;
mod event;
mod input;
mod navigation;
mod oneshot;
mod poller;
mod scope;
mod screens;
mod storage;
mod store;

pub use cli::{Cli, Command};
pub use commands::{
    AuthMode, CREATE_GAME_ERROR, Commands, FETCH_GAME_ERROR, FETCH_GAMES_ERROR, JOIN_GAME_ERROR,
    MAKE_MOVE_ERROR, UNKNOWN_ERROR,
};
pub use config::{BASE_URL_ENV, CREDENTIALS_ENV, ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use controller::AppController;
pub use event::AppEvent;
pub use input::{Cell, move_cursor};
pub use navigation::{GameView, Navigator, ViewEffect};
pub use oneshot::OneShot;
pub use poller::Poller;
pub use scope::{ScopeToken, ScopedSender, ViewScope};
pub use screens::{REGISTERED_NOTICE, ScreenAction, Tab};
pub use storage::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError, StoredCredentials,
};
pub use store::{
    GameAction, GameState, Pagination, SessionAction, SessionState, SessionStore, StatusFilter,
    reduce_games, reduce_session,
};
