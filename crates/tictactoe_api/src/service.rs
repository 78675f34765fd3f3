//! The game service contract.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{
    Credentials, GameDetail, GameId, GameStatus, GameSummary, LoginResponse, MoveRequest, Page,
    RankingEntry,
};

/// Operations offered by the remote game service.
///
/// Every call except [`login`](GameService::login) and
/// [`register`](GameService::register) authenticates with a bearer token.
#[async_trait]
pub trait GameService: Send + Sync + std::fmt::Debug {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Creates an account. Does not log in.
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;

    /// Lists one page of games, optionally restricted to a status.
    async fn list_games(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
        status: Option<GameStatus>,
    ) -> Result<Page<GameSummary>, ApiError>;

    /// Creates a new game owned by the caller.
    async fn create_game(&self, token: &str) -> Result<GameDetail, ApiError>;

    /// Fetches the full state of one game.
    async fn get_game(&self, token: &str, game_id: GameId) -> Result<GameDetail, ApiError>;

    /// Takes the open seat of a game.
    async fn join_game(&self, token: &str, game_id: GameId) -> Result<(), ApiError>;

    /// Submits a move. The service decides whether it is legal.
    async fn make_move(
        &self,
        token: &str,
        game_id: GameId,
        request: MoveRequest,
    ) -> Result<(), ApiError>;

    /// Lists one page of player rankings.
    async fn rankings(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<RankingEntry>, ApiError>;
}
