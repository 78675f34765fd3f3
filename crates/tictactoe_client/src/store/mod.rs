//! Client-side stores.
//!
//! Both stores follow the same contract: an action goes in, a new state comes
//! out. Neither store computes game state of its own; they only mirror what
//! the service returned.

mod games;
mod session;

pub use games::{GameAction, GameState, Pagination, StatusFilter, reduce_games};
pub use session::{SessionAction, SessionState, SessionStore, reduce_session};
