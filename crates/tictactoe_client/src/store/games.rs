//! Game store: listing, current game, rankings and paging.

use derive_getters::Getters;
use tictactoe_api::{GameDetail, GameStatus, GameSummary, Page, RankingEntry};
use tracing::{debug, instrument};

/// Status filter offered on the game list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumIter, strum::Display)]
pub enum StatusFilter {
    /// No filter.
    #[default]
    #[strum(to_string = "All")]
    All,
    /// Games waiting for a second player.
    #[strum(to_string = "Open")]
    Open,
    /// Games being played.
    #[strum(to_string = "In Progress")]
    Progress,
    /// Games that are over.
    #[strum(to_string = "Completed")]
    Finished,
}

impl StatusFilter {
    /// Returns the status to send to the service, `None` for no filter.
    pub fn status(self) -> Option<GameStatus> {
        match self {
            Self::All => None,
            Self::Open => Some(GameStatus::Open),
            Self::Progress => Some(GameStatus::Progress),
            Self::Finished => Some(GameStatus::Finished),
        }
    }

    /// Returns the next filter in display order, wrapping around.
    #[instrument]
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Open,
            Self::Open => Self::Progress,
            Self::Progress => Self::Finished,
            Self::Finished => Self::All,
        }
    }
}

/// Cursor metadata from the last list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Pagination {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
}

impl Pagination {
    /// True when the service reported a following page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// True when the service reported a preceding page.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Everything the game screens read.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct GameState {
    existing_games: Vec<GameSummary>,
    current_game: Option<GameDetail>,
    rankings: Vec<RankingEntry>,
    pagination: Pagination,
    filter: StatusFilter,
    page_size: u32,
    list_offset: u32,
    rankings_offset: u32,
    is_loading: bool,
    error: Option<String>,
}

impl GameState {
    /// Creates an empty store that pages `page_size` rows at a time.
    #[instrument]
    pub fn new(page_size: u32) -> Self {
        Self {
            existing_games: Vec::new(),
            current_game: None,
            rankings: Vec::new(),
            pagination: Pagination::default(),
            filter: StatusFilter::All,
            page_size,
            list_offset: 0,
            rankings_offset: 0,
            is_loading: false,
            error: None,
        }
    }

    /// Id of the game currently held, if any.
    pub fn current_game_id(&self) -> Option<tictactoe_api::GameId> {
        self.current_game.as_ref().map(|game| *game.id())
    }
}

/// Changes that can be applied to a [`GameState`].
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    /// Replace the listing and its cursors.
    SetGames(Page<GameSummary>),
    /// Replace the rankings rows.
    SetRankings(Vec<RankingEntry>),
    /// Change the status filter; returns to the first page.
    SetFilter(StatusFilter),
    /// Replace the current game snapshot.
    SetCurrentGame(Option<GameDetail>),
    /// A game was just created: list it first and make it current.
    CreateGame(GameDetail),
    /// Advance one page if the service reported a next page.
    NextPage,
    /// Go back one page if the service reported a previous page.
    PreviousPage,
    /// Return the listing to the first page.
    ResetListOffset,
    /// Advance the rankings one page.
    NextRankingsPage,
    /// Go back one rankings page, stopping at the first.
    PreviousRankingsPage,
    /// Return the rankings to the first page.
    ResetRankingsOffset,
    /// A command started or finished.
    SetLoading(bool),
    /// Replace the current error.
    SetError(Option<String>),
    /// Drop everything, keeping the page size.
    Reset,
}

/// Pure game reducer.
#[instrument(skip(state, action), fields(action = action_name(&action)))]
pub fn reduce_games(state: &GameState, action: GameAction) -> GameState {
    let mut next = state.clone();
    match action {
        GameAction::SetGames(page) => {
            next.pagination = Pagination {
                count: *page.count(),
                next: page.next().clone(),
                previous: page.previous().clone(),
            };
            next.existing_games = page.into_results();
            debug!(rows = next.existing_games.len(), "Listing replaced");
        }
        GameAction::SetRankings(rankings) => next.rankings = rankings,
        GameAction::SetFilter(filter) => {
            next.filter = filter;
            next.list_offset = 0;
        }
        GameAction::SetCurrentGame(game) => next.current_game = game,
        GameAction::CreateGame(game) => {
            next.existing_games.insert(0, game.summary());
            next.current_game = Some(game);
        }
        GameAction::NextPage => {
            if next.pagination.has_next() {
                next.list_offset = next.list_offset.saturating_add(next.page_size);
            }
        }
        GameAction::PreviousPage => {
            if next.pagination.has_previous() {
                next.list_offset = next.list_offset.saturating_sub(next.page_size);
            }
        }
        GameAction::ResetListOffset => next.list_offset = 0,
        GameAction::NextRankingsPage => {
            next.rankings_offset = next.rankings_offset.saturating_add(next.page_size);
        }
        GameAction::PreviousRankingsPage => {
            next.rankings_offset = next.rankings_offset.saturating_sub(next.page_size);
        }
        GameAction::ResetRankingsOffset => next.rankings_offset = 0,
        GameAction::SetLoading(is_loading) => next.is_loading = is_loading,
        GameAction::SetError(error) => next.error = error,
        GameAction::Reset => next = GameState::new(state.page_size),
    }
    next
}

fn action_name(action: &GameAction) -> &'static str {
    match action {
        GameAction::SetGames(_) => "SetGames",
        GameAction::SetRankings(_) => "SetRankings",
        GameAction::SetFilter(_) => "SetFilter",
        GameAction::SetCurrentGame(_) => "SetCurrentGame",
        GameAction::CreateGame(_) => "CreateGame",
        GameAction::NextPage => "NextPage",
        GameAction::PreviousPage => "PreviousPage",
        GameAction::ResetListOffset => "ResetListOffset",
        GameAction::NextRankingsPage => "NextRankingsPage",
        GameAction::PreviousRankingsPage => "PreviousRankingsPage",
        GameAction::ResetRankingsOffset => "ResetRankingsOffset",
        GameAction::SetLoading(_) => "SetLoading",
        GameAction::SetError(_) => "SetError",
        GameAction::Reset => "Reset",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use tictactoe_api::{Board, PlayerRef};

    fn detail(id: u64) -> GameDetail {
        GameDetail::new(
            id,
            GameStatus::Open,
            Board::default(),
            Some(PlayerRef::new(1, "a".to_string())),
            None,
            None,
        )
    }

    fn listing(ids: &[u64], next: bool, previous: bool) -> Page<GameSummary> {
        Page::new(
            ids.iter().map(|id| detail(*id).summary()).collect(),
            ids.len() as u64,
            next.then(|| "next".to_string()),
            previous.then(|| "previous".to_string()),
        )
    }

    #[test]
    fn create_game_prepends_and_selects() {
        for existing in [vec![], vec![1], vec![3, 2, 1]] {
            let state = reduce_games(
                &GameState::new(10),
                GameAction::SetGames(listing(&existing, false, false)),
            );
            let created = reduce_games(&state, GameAction::CreateGame(detail(99)));

            assert_eq!(created.existing_games.len(), existing.len() + 1);
            assert_eq!(*created.existing_games[0].id(), 99);
            assert_eq!(created.current_game_id(), Some(99));
            let rest: Vec<u64> = created.existing_games[1..].iter().map(|g| *g.id()).collect();
            assert_eq!(rest, existing);
        }
    }

    #[test]
    fn filter_change_resets_offset() {
        for filter in StatusFilter::iter() {
            let mut state = reduce_games(
                &GameState::new(10),
                GameAction::SetGames(listing(&[1], true, false)),
            );
            state = reduce_games(&state, GameAction::NextPage);
            state = reduce_games(&state, GameAction::NextPage);
            assert_eq!(state.list_offset, 20);

            let filtered = reduce_games(&state, GameAction::SetFilter(filter));
            assert_eq!(filtered.list_offset, 0);
            assert_eq!(filtered.filter, filter);
        }
    }

    #[test]
    fn paging_follows_cursor_presence() {
        let empty = reduce_games(
            &GameState::new(10),
            GameAction::SetGames(listing(&[], false, false)),
        );
        assert!(!empty.pagination.has_next());
        assert!(!empty.pagination.has_previous());
        assert_eq!(reduce_games(&empty, GameAction::NextPage).list_offset, 0);
        assert_eq!(reduce_games(&empty, GameAction::PreviousPage).list_offset, 0);

        let middle = GameState {
            list_offset: 30,
            ..reduce_games(&empty, GameAction::SetGames(listing(&[1], true, true)))
        };
        assert_eq!(reduce_games(&middle, GameAction::NextPage).list_offset, 40);
        assert_eq!(reduce_games(&middle, GameAction::PreviousPage).list_offset, 20);
    }

    #[test]
    fn rankings_offset_stops_at_zero() {
        let state = GameState::new(10);
        let forward = reduce_games(&state, GameAction::NextRankingsPage);
        assert_eq!(forward.rankings_offset, 10);
        let back = reduce_games(&forward, GameAction::PreviousRankingsPage);
        let back_again = reduce_games(&back, GameAction::PreviousRankingsPage);
        assert_eq!(back_again.rankings_offset, 0);
    }

    #[test]
    fn current_game_is_replaced_wholesale() {
        let state = reduce_games(&GameState::new(10), GameAction::CreateGame(detail(5)));
        let mut newer = detail(5);
        newer = GameDetail::new(
            *newer.id(),
            GameStatus::Finished,
            Board::default(),
            newer.first_player().clone(),
            Some(PlayerRef::new(2, "b".to_string())),
            Some(PlayerRef::new(2, "b".to_string())),
        );
        let replaced = reduce_games(&state, GameAction::SetCurrentGame(Some(newer.clone())));
        assert_eq!(replaced.current_game, Some(newer));
    }

    #[test]
    fn reset_keeps_page_size() {
        let state = reduce_games(&GameState::new(25), GameAction::CreateGame(detail(1)));
        let reset = reduce_games(&state, GameAction::Reset);
        assert_eq!(reset, GameState::new(25));
    }

    #[test]
    fn filters_cycle_through_every_status() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(filter.status());
            filter = filter.cycle();
        }
        assert_eq!(filter, StatusFilter::All);
        assert_eq!(
            seen,
            vec![
                None,
                Some(GameStatus::Open),
                Some(GameStatus::Progress),
                Some(GameStatus::Finished)
            ]
        );
        assert_eq!(StatusFilter::Progress.to_string(), "In Progress");
    }
}
