use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dto::draft_dto::{DraftPhase, DraftState, Side};
use crate::dto::settings_dto::DraftSettings;
use crate::services::draft_store::DraftStore;
use crate::services::session_registry::SharedRegistry;
use crate::services::websocket::{send_draft_update, send_timer_update};

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TurnTimerState {
    pub seconds_left: u32,
    pub overtime_seconds_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Primary countdown decremented.
    Counting,
    /// Primary countdown is at zero, overtime pool decremented.
    Overtime,
    /// Both exhausted: the caller must force the turn.
    Expired,
    /// Draft is complete, nothing left to time.
    Stopped,
}

/// Identity of a turn. The countdown restarts whenever it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TurnKey {
    phase: DraftPhase,
    turn: Side,
    pick_index: u32,
    preban_turns: u32,
}

impl From<&DraftState> for TurnKey {
    fn from(state: &DraftState) -> Self {
        Self {
            phase: state.phase,
            turn: state.turn,
            pick_index: state.current_pick_index,
            preban_turns: state.preban_turns,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnTimer {
    turn_seconds: u32,
    state: TurnTimerState,
    observed: Option<TurnKey>,
}

impl TurnTimer {
    pub fn new(turn_seconds: u32, overtime_seconds: u32) -> Self {
        Self {
            turn_seconds,
            state: TurnTimerState {
                seconds_left: turn_seconds,
                overtime_seconds_left: overtime_seconds,
            },
            observed: None,
        }
    }

    pub fn from_settings(settings: &DraftSettings) -> Self {
        Self::new(settings.turn_seconds, settings.overtime_seconds)
    }

    /// Continues from a persisted countdown. The first observed turn keeps
    /// the saved `seconds_left`.
    pub fn resume(settings: &DraftSettings, saved: TurnTimerState, draft: &DraftState) -> Self {
        Self {
            turn_seconds: settings.turn_seconds,
            state: saved,
            observed: Some(TurnKey::from(draft)),
        }
    }

    pub fn state(&self) -> TurnTimerState {
        self.state
    }

    /// Restarts the per-turn countdown if the draft moved to another turn.
    /// Returns whether a reset happened.
    pub fn observe(&mut self, draft: &DraftState) -> bool {
        let key = TurnKey::from(draft);
        if self.observed == Some(key) {
            return false;
        }
        self.observed = Some(key);
        self.state.seconds_left = self.turn_seconds;
        true
    }

    pub fn tick(&mut self, draft: &DraftState) -> TickOutcome {
        if draft.completed {
            return TickOutcome::Stopped;
        }
        self.observe(draft);

        if self.state.seconds_left > 0 {
            self.state.seconds_left -= 1;
            TickOutcome::Counting
        } else if self.state.overtime_seconds_left > 0 {
            self.state.overtime_seconds_left -= 1;
            TickOutcome::Overtime
        } else {
            self.state.seconds_left = self.turn_seconds;
            TickOutcome::Expired
        }
    }
}

/// Runs the one-second countdown for a session until it completes or is removed.
pub fn spawn_timer(
    registry: SharedRegistry,
    store: DraftStore,
    tx: broadcast::Sender<String>,
    draft_id: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting turn timer for draft {}", draft_id);
        let mut interval = tokio::time::interval(TICK);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let report = match store.tick(&registry, &draft_id).await {
                Ok(report) => report,
                Err(e) => {
                    info!("Stopping turn timer: {}", e);
                    break;
                }
            };

            if report.outcome == TickOutcome::Stopped {
                info!("Draft {} is complete, stopping turn timer.", draft_id);
                break;
            }

            send_timer_update(&tx, &draft_id, &report.timer);

            if let Some(record) = report.forced {
                warn!(
                    "Turn expired in draft {}, forced advance to pick {}",
                    draft_id, record.state.current_pick_index
                );
                send_draft_update(&tx, &record.state);
            }
        }
    })
}
