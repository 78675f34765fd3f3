//! Typed client for the remote tic-tac-toe game service.
//!
//! The service owns every game rule: move validation, turn arbitration and
//! win detection all happen server side. This crate only describes the wire
//! contract and offers a [`GameService`] trait with a reqwest-backed
//! implementation.
//!
//! # Architecture
//!
//! - **Types**: wire shapes for games, boards, players and rankings
//! - **Turn**: the display-only "whose move is it" hint
//! - **Errors**: [`ApiError`] plus extraction of server-supplied messages
//! - **Service**: the [`GameService`] trait and [`RestGameClient`]
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_api::{Credentials, GameService, RestGameClient};
//!
//! # async fn example() -> Result<(), tictactoe_api::ApiError> {
//! let client = RestGameClient::new("https://tictactoe.aboutdream.io");
//! let login = client
//!     .login(&Credentials::new("alice".to_string(), "secret".to_string()))
//!     .await?;
//! let page = client.list_games(login.token(), 10, 0, None).await?;
//! println!("{} games", page.count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod error_body;
mod rest;
mod service;
mod turn;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use error_body::extract_error_message;
pub use rest::RestGameClient;
pub use service::GameService;
pub use turn::{next_player, occupied_cells};
pub use types::{
    Board, Credentials, GameDetail, GameId, GameStatus, GameSummary, LoginResponse, Mark,
    MoveRequest, Page, PlayerRef, RankingEntry,
};
