//! In-memory game service shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tictactoe_api::{
    ApiError, Board, Credentials, GameDetail, GameId, GameService, GameStatus, GameSummary,
    LoginResponse, MoveRequest, Page, PlayerRef, RankingEntry,
};
use tictactoe_client::AppEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// A call the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    Register(String),
    ListGames {
        token: String,
        limit: u32,
        offset: u32,
        status: Option<GameStatus>,
    },
    CreateGame,
    GetGame(GameId),
    JoinGame(GameId),
    MakeMove(GameId, usize, usize),
    Rankings {
        limit: u32,
        offset: u32,
    },
}

/// Returns canned responses and records every call.
#[derive(Debug)]
pub struct FakeService {
    pub calls: Mutex<Vec<Call>>,
    pub login: Result<LoginResponse, ApiError>,
    pub register: Result<(), ApiError>,
    pub games: Result<Page<GameSummary>, ApiError>,
    pub created: Result<GameDetail, ApiError>,
    /// Template for `get_game`; the id is replaced with the requested one.
    pub detail: Result<GameDetail, ApiError>,
    /// Statuses returned by successive `get_game` calls before falling back
    /// to `detail`.
    pub statuses: Mutex<VecDeque<GameStatus>>,
    pub join: Result<(), ApiError>,
    pub moves: Result<(), ApiError>,
    pub rankings: Result<Page<RankingEntry>, ApiError>,
}

pub fn alice() -> PlayerRef {
    PlayerRef::new(1, "a".to_string())
}

pub fn bob() -> PlayerRef {
    PlayerRef::new(2, "b".to_string())
}

pub fn detail(id: GameId, status: GameStatus) -> GameDetail {
    GameDetail::new(id, status, Board::default(), Some(alice()), Some(bob()), None)
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            login: Ok(LoginResponse::new("a".to_string(), "T".to_string())),
            register: Ok(()),
            games: Ok(Page::new(
                vec![
                    detail(1, GameStatus::Progress).summary(),
                    detail(2, GameStatus::Open).summary(),
                ],
                2,
                None,
                None,
            )),
            created: Ok(GameDetail::new(
                99,
                GameStatus::Open,
                Board::default(),
                Some(alice()),
                None,
                None,
            )),
            detail: Ok(detail(0, GameStatus::Progress)),
            statuses: Mutex::new(VecDeque::new()),
            join: Ok(()),
            moves: Ok(()),
            rankings: Ok(Page::new(
                vec![RankingEntry::new("a".to_string(), 12, 50.0)],
                1,
                None,
                None,
            )),
        }
    }
}

impl FakeService {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Makes the next `get_game` calls report these statuses in order.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = GameStatus>) -> Self {
        *self.statuses.lock().expect("statuses lock") = statuses.into_iter().collect();
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl GameService for FakeService {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record(Call::Login(credentials.username().clone()));
        self.login.clone()
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.record(Call::Register(credentials.username().clone()));
        self.register.clone()
    }

    async fn list_games(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
        status: Option<GameStatus>,
    ) -> Result<Page<GameSummary>, ApiError> {
        self.record(Call::ListGames {
            token: token.to_string(),
            limit,
            offset,
            status,
        });
        self.games.clone()
    }

    async fn create_game(&self, _token: &str) -> Result<GameDetail, ApiError> {
        self.record(Call::CreateGame);
        self.created.clone()
    }

    async fn get_game(&self, _token: &str, game_id: GameId) -> Result<GameDetail, ApiError> {
        self.record(Call::GetGame(game_id));
        let scripted = self.statuses.lock().expect("statuses lock").pop_front();
        self.detail.clone().map(|d| {
            GameDetail::new(
                game_id,
                scripted.unwrap_or(*d.status()),
                d.board().clone(),
                d.first_player().clone(),
                d.second_player().clone(),
                d.winner().clone(),
            )
        })
    }

    async fn join_game(&self, _token: &str, game_id: GameId) -> Result<(), ApiError> {
        self.record(Call::JoinGame(game_id));
        self.join.clone()
    }

    async fn make_move(
        &self,
        _token: &str,
        game_id: GameId,
        request: MoveRequest,
    ) -> Result<(), ApiError> {
        self.record(Call::MakeMove(game_id, *request.row(), *request.col()));
        self.moves.clone()
    }

    async fn rankings(
        &self,
        _token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<RankingEntry>, ApiError> {
        self.record(Call::Rankings { limit, offset });
        self.rankings.clone()
    }
}

/// Collects every event sent so far.
pub fn drain(rx: &mut UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
