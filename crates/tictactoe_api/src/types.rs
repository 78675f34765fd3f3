//! Wire types exchanged with the game service.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Identifier the service assigns to a game.
pub type GameId = u64;

/// Lifecycle stage of a game, as reported by the service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for a second player.
    Open,
    /// Both seats taken, moves being played.
    Progress,
    /// No more moves accepted.
    Finished,
}

/// A player as embedded in game payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PlayerRef {
    id: u64,
    username: String,
}

/// Contents of an occupied cell.
///
/// The service marks cells with the owning player's id; symbolic marks are
/// accepted as well so a board can be rendered whichever way it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mark {
    /// Id of the player who owns the cell.
    Player(u64),
    /// A literal symbol such as `"X"`.
    Symbol(String),
}

impl Mark {
    /// Returns the symbol to draw for this mark.
    ///
    /// Marks owned by the first player render as `X`, every other player
    /// mark as `O`. Symbolic marks render as sent.
    #[instrument]
    pub fn symbol(&self, first_player: Option<&PlayerRef>) -> String {
        match self {
            Self::Player(id) if first_player.map(|p| p.id) == Some(*id) => "X".to_string(),
            Self::Player(_) => "O".to_string(),
            Self::Symbol(symbol) => symbol.clone(),
        }
    }
}

/// 3x3 board, rows top to bottom, `None` for an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [[Option<Mark>; 3]; 3],
}

impl Board {
    /// Builds a board from its rows.
    pub fn from_rows(rows: [[Option<Mark>; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[[Option<Mark>; 3]; 3] {
        &self.rows
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Option<Mark>> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Option<Mark>> {
        self.rows.iter().flatten()
    }
}

/// A game as listed by `GET /games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameSummary {
    id: GameId,
    status: GameStatus,
    #[serde(default)]
    first_player: Option<PlayerRef>,
    #[serde(default)]
    second_player: Option<PlayerRef>,
}

impl GameSummary {
    /// Returns true when `username` holds either seat.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn has_participant(&self, username: &str) -> bool {
        [&self.first_player, &self.second_player]
            .into_iter()
            .flatten()
            .any(|p| p.username == username)
    }
}

/// Full state of one game as returned by `GET /games/{id}`.
///
/// Always a complete snapshot; the client replaces its copy wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameDetail {
    id: GameId,
    status: GameStatus,
    #[serde(default)]
    board: Board,
    #[serde(default)]
    first_player: Option<PlayerRef>,
    #[serde(default)]
    second_player: Option<PlayerRef>,
    #[serde(default)]
    winner: Option<PlayerRef>,
}

impl GameDetail {
    /// Builds a detail snapshot. Mostly useful for fakes and tests.
    pub fn new(
        id: GameId,
        status: GameStatus,
        board: Board,
        first_player: Option<PlayerRef>,
        second_player: Option<PlayerRef>,
        winner: Option<PlayerRef>,
    ) -> Self {
        Self {
            id,
            status,
            board,
            first_player,
            second_player,
            winner,
        }
    }

    /// Returns the list-row view of this game.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            status: self.status,
            first_player: self.first_player.clone(),
            second_player: self.second_player.clone(),
        }
    }

    /// Returns true once the service stops accepting moves.
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }
}

/// One page of a paginated listing.
///
/// `next` and `previous` are opaque cursors; only their presence matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Page<T> {
    results: Vec<T>,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    previous: Option<String>,
}

impl<T> Page<T> {
    /// Builds a page.
    pub fn new(
        results: Vec<T>,
        count: u64,
        next: Option<String>,
        previous: Option<String>,
    ) -> Self {
        Self {
            results,
            count,
            next,
            previous,
        }
    }

    /// Consumes the page, returning its rows.
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

/// A row of the player rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct RankingEntry {
    username: String,
    #[serde(rename = "game_count", default)]
    games_played: u64,
    #[serde(default)]
    win_rate: f64,
}

/// Body of `POST /login/` and `POST /register/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `POST /login/` response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LoginResponse {
    username: String,
    token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /games/{id}/move/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MoveRequest {
    row: usize,
    col: usize,
}
