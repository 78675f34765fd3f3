//! Periodic refresh of the viewed game.

use std::time::Duration;

use tictactoe_api::GameId;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, instrument};

use crate::event::AppEvent;

/// Sends [`AppEvent::PollTick`] for one game at a fixed period.
///
/// The first tick fires one period after start. Dropping the poller aborts
/// its task, so no tick is delivered afterwards.
#[derive(Debug)]
pub struct Poller {
    game_id: GameId,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawns the polling task on the current tokio runtime.
    #[instrument(skip(events))]
    pub fn start(game_id: GameId, period: Duration, events: UnboundedSender<AppEvent>) -> Self {
        info!(game_id, period_secs = period.as_secs(), "Polling started");
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                debug!(game_id, "Poll tick");
                if events.send(AppEvent::PollTick(game_id)).is_err() {
                    break;
                }
            }
        });
        Self { game_id, handle }
    }

    /// Game this poller refreshes.
    pub fn game_id(&self) -> GameId {
        self.game_id
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        debug!(game_id = self.game_id, "Polling stopped");
        self.handle.abort();
    }
}
