//! The Listing / Viewing state machine.
//!
//! [`Navigator`] is pure: each transition returns the effects the controller
//! must carry out (fetches and poller changes) instead of performing them.

use derive_getters::Getters;
use tictactoe_api::{GameDetail, GameId};
use tracing::{debug, info, instrument};

/// Which part of the games tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameView {
    /// The paginated list of games.
    #[default]
    Listing,
    /// The board of one game.
    Viewing(GameId),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    /// Fetch the detail of this game now.
    FetchDetail(GameId),
    /// Refetch the game list now.
    FetchList,
    /// Start refreshing this game periodically.
    StartPolling(GameId),
    /// Stop the periodic refresh.
    StopPolling,
}

/// Current view plus whether a poller is running, and for which game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Navigator {
    view: GameView,
    polling: Option<GameId>,
}

impl Navigator {
    /// Starts on the list with nothing polling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the game being viewed, if any.
    pub fn viewed_game(&self) -> Option<GameId> {
        match self.view {
            GameView::Listing => None,
            GameView::Viewing(id) => Some(id),
        }
    }

    /// Opens a game and starts polling it.
    ///
    /// Selecting a different game than the one being polled stops that
    /// poller first. The status is unknown until the first detail arrives,
    /// so polling runs until a detail shows the game finished.
    #[instrument(skip(self))]
    pub fn select(&mut self, game_id: GameId) -> Vec<ViewEffect> {
        info!(game_id, "Opening game");
        let mut effects = Vec::new();
        if self.polling.is_some_and(|polled| polled != game_id) {
            self.polling = None;
            effects.push(ViewEffect::StopPolling);
        }
        self.view = GameView::Viewing(game_id);
        effects.push(ViewEffect::FetchDetail(game_id));
        if self.polling.is_none() {
            self.polling = Some(game_id);
            effects.push(ViewEffect::StartPolling(game_id));
        }
        effects
    }

    /// Returns to the list, discarding any pending poll.
    #[instrument(skip(self))]
    pub fn back(&mut self) -> Vec<ViewEffect> {
        info!("Back to game list");
        let mut effects = Vec::new();
        if self.polling.take().is_some() {
            effects.push(ViewEffect::StopPolling);
        }
        self.view = GameView::Listing;
        effects.push(ViewEffect::FetchList);
        effects
    }

    /// Returns to the list without fetching anything.
    ///
    /// Used when the games tab is left or the session ends.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Vec<ViewEffect> {
        let effects = if self.polling.take().is_some() {
            vec![ViewEffect::StopPolling]
        } else {
            Vec::new()
        };
        self.view = GameView::Listing;
        effects
    }

    /// Reacts to a fresh detail snapshot.
    ///
    /// Snapshots for a game that is not being viewed are ignored. A
    /// finished game stops polling; an unfinished one makes sure its own
    /// poller is running.
    #[instrument(skip(self, detail), fields(game_id = *detail.id(), status = %detail.status()))]
    pub fn on_detail(&mut self, detail: &GameDetail) -> Vec<ViewEffect> {
        let game_id = *detail.id();
        if self.view != GameView::Viewing(game_id) {
            debug!("Detail for a game not on screen");
            return Vec::new();
        }

        let mut effects = Vec::new();
        if detail.is_finished() {
            if self.polling.take().is_some() {
                info!("Game finished, polling stopped");
                effects.push(ViewEffect::StopPolling);
            }
            return effects;
        }

        if self.polling != Some(game_id) {
            if self.polling.take().is_some() {
                effects.push(ViewEffect::StopPolling);
            }
            self.polling = Some(game_id);
            effects.push(ViewEffect::StartPolling(game_id));
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_api::{Board, GameStatus, PlayerRef};

    fn detail(id: GameId, status: GameStatus) -> GameDetail {
        GameDetail::new(
            id,
            status,
            Board::default(),
            Some(PlayerRef::new(1, "a".to_string())),
            None,
            None,
        )
    }

    #[test]
    fn select_fetches_detail_and_polls() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.select(3),
            vec![ViewEffect::FetchDetail(3), ViewEffect::StartPolling(3)]
        );
        assert_eq!(nav.view, GameView::Viewing(3));
        assert_eq!(nav.polling, Some(3));
    }

    #[test]
    fn unfinished_detail_keeps_the_running_poller() {
        let mut nav = Navigator::new();
        nav.select(3);
        assert!(nav.on_detail(&detail(3, GameStatus::Progress)).is_empty());
        assert_eq!(nav.polling, Some(3));
    }

    #[test]
    fn reselecting_the_polled_game_does_not_restart() {
        let mut nav = Navigator::new();
        nav.select(3);
        assert_eq!(nav.select(3), vec![ViewEffect::FetchDetail(3)]);
    }

    #[test]
    fn finishing_stops_polling() {
        let mut nav = Navigator::new();
        nav.select(3);
        nav.on_detail(&detail(3, GameStatus::Progress));
        assert_eq!(
            nav.on_detail(&detail(3, GameStatus::Finished)),
            vec![ViewEffect::StopPolling]
        );
        assert_eq!(nav.polling, None);
    }

    #[test]
    fn finished_game_stops_polling_on_first_detail() {
        let mut nav = Navigator::new();
        nav.select(3);
        assert_eq!(
            nav.on_detail(&detail(3, GameStatus::Finished)),
            vec![ViewEffect::StopPolling]
        );
        assert_eq!(nav.polling, None);
    }

    #[test]
    fn unfinished_detail_restarts_stopped_poller() {
        let mut nav = Navigator::new();
        nav.select(3);
        nav.on_detail(&detail(3, GameStatus::Finished));
        assert_eq!(
            nav.on_detail(&detail(3, GameStatus::Progress)),
            vec![ViewEffect::StartPolling(3)]
        );
    }

    #[test]
    fn back_stops_polling_and_refetches_list() {
        let mut nav = Navigator::new();
        nav.select(3);
        nav.on_detail(&detail(3, GameStatus::Open));
        assert_eq!(
            nav.back(),
            vec![ViewEffect::StopPolling, ViewEffect::FetchList]
        );
        assert_eq!(nav.view, GameView::Listing);
        assert_eq!(nav.polling, None);
    }

    #[test]
    fn switching_games_restarts_polling() {
        let mut nav = Navigator::new();
        nav.select(3);
        nav.on_detail(&detail(3, GameStatus::Progress));

        assert_eq!(
            nav.select(4),
            vec![
                ViewEffect::StopPolling,
                ViewEffect::FetchDetail(4),
                ViewEffect::StartPolling(4),
            ]
        );
        assert!(nav.on_detail(&detail(3, GameStatus::Progress)).is_empty());
        assert_eq!(nav.polling, Some(4));
    }

    #[test]
    fn detail_while_listing_is_ignored() {
        let mut nav = Navigator::new();
        assert!(nav.on_detail(&detail(3, GameStatus::Progress)).is_empty());
        assert_eq!(nav.polling, None);
    }

    #[test]
    fn reset_leaves_nothing_running() {
        let mut nav = Navigator::new();
        nav.select(3);
        nav.on_detail(&detail(3, GameStatus::Progress));
        assert_eq!(nav.reset(), vec![ViewEffect::StopPolling]);
        assert_eq!(nav, Navigator::new());
    }
}
