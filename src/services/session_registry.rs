use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::dto::draft_dto::DraftState;
use crate::dto::settings_dto::DraftSettings;
use crate::services::draft_engine::{DraftAction, DraftError};
use crate::services::turn_timer::{TickOutcome, TurnTimer, TurnTimerState};

const SESSION_ID_LEN: usize = 12;

/// What gets persisted for a session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionRecord {
    pub state: DraftState,
    pub settings: DraftSettings,
    pub timer: TurnTimerState,
}

pub struct DraftSession {
    pub state: DraftState,
    pub settings: DraftSettings,
    pub timer: TurnTimer,
    timer_task: Option<JoinHandle<()>>,
}

impl DraftSession {
    fn new(state: DraftState, settings: DraftSettings, mut timer: TurnTimer) -> Self {
        timer.observe(&state);
        Self { state, settings, timer, timer_task: None }
    }

    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            state: self.state.clone(),
            settings: self.settings.clone(),
            timer: self.timer.state(),
        }
    }

    fn stop_timer(&mut self) {
        if let Some(task) = self.timer_task.take() {
            task.abort();
        }
    }
}

impl Drop for DraftSession {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub timer: TurnTimerState,
    /// Set when the tick forced the turn.
    pub forced: Option<SessionRecord>,
    /// Set when the tick spent overtime, which has to outlive a restart.
    pub checkpoint: Option<SessionRecord>,
}

impl TickReport {
    /// Record to persist for this tick, if any.
    pub fn to_save(&self) -> Option<&SessionRecord> {
        self.forced.as_ref().or(self.checkpoint.as_ref())
    }
}

/// All live drafts keyed by session id.
pub struct SessionRegistry {
    settings: DraftSettings,
    sessions: HashMap<String, DraftSession>,
}

pub type SharedRegistry = Arc<RwLock<SessionRegistry>>;

impl SessionRegistry {
    pub fn new(settings: DraftSettings) -> Self {
        Self { settings, sessions: HashMap::new() }
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn create_draft(&mut self, side_a_name: &str, side_b_name: &str) -> String {
        let mut id = Alphanumeric.sample_string(&mut rand::rng(), SESSION_ID_LEN);
        while self.sessions.contains_key(&id) {
            id = Alphanumeric.sample_string(&mut rand::rng(), SESSION_ID_LEN);
        }

        let state = DraftState::new(id.clone(), side_a_name.to_string(), side_b_name.to_string(), &self.settings);
        let timer = TurnTimer::from_settings(&self.settings);
        self.sessions.insert(id.clone(), DraftSession::new(state, self.settings.clone(), timer));

        info!("Created draft {}: {} vs {}", id, side_a_name, side_b_name);
        id
    }

    /// Puts a persisted session back, replacing any live one with the same id.
    pub fn restore(&mut self, record: SessionRecord) {
        let timer = TurnTimer::resume(&record.settings, record.timer, &record.state);
        let id = record.state.id.clone();
        self.sessions.insert(id, DraftSession::new(record.state, record.settings, timer));
    }

    pub fn get(&self, id: &str) -> Result<&DraftSession, DraftError> {
        self.sessions
            .get(id)
            .ok_or_else(|| DraftError::SessionNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut DraftSession, DraftError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| DraftError::SessionNotFound(id.to_string()))
    }

    pub fn list(&self) -> Vec<&DraftState> {
        let mut drafts: Vec<&DraftState> = self.sessions.values().map(|s| &s.state).collect();
        drafts.sort_by(|a, b| a.id.cmp(&b.id));
        drafts
    }

    pub fn ids(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }

    /// Runs an engine action. The stored state is only replaced on success.
    pub fn apply(&mut self, id: &str, action: &DraftAction) -> Result<SessionRecord, DraftError> {
        let session = self.get_mut(id)?;
        let next = session.state.apply(action)?;
        session.timer.observe(&next);
        session.state = next;
        Ok(session.record())
    }

    /// Fresh draft under the same id and side names. The overtime pool refills.
    pub fn reset(&mut self, id: &str) -> Result<SessionRecord, DraftError> {
        let settings = self.settings.clone();
        let session = self.get_mut(id)?;
        session.stop_timer();

        let names = session.state.side_names.clone();
        session.state = DraftState::new(id.to_string(), names.side_a, names.side_b, &settings);
        session.settings = settings;
        session.timer = TurnTimer::from_settings(&session.settings);
        session.timer.observe(&session.state);

        info!("Reset draft {}", id);
        Ok(session.record())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), DraftError> {
        // Dropping the session aborts its timer task.
        self.sessions
            .remove(id)
            .ok_or_else(|| DraftError::SessionNotFound(id.to_string()))?;
        info!("Removed draft {}", id);
        Ok(())
    }

    pub fn attach_timer(&mut self, id: &str, task: JoinHandle<()>) -> Result<(), DraftError> {
        let session = self.get_mut(id)?;
        session.stop_timer();
        session.timer_task = Some(task);
        Ok(())
    }

    /// One elapsed second for a session. An expired turn is forced through
    /// the engine in the same call.
    pub fn tick(&mut self, id: &str) -> Result<TickReport, DraftError> {
        let session = self.get_mut(id)?;
        let outcome = session.timer.tick(&session.state);

        let mut forced = None;
        let mut checkpoint = None;
        match outcome {
            TickOutcome::Expired => {
                let next = session.state.timeout()?;
                session.timer.observe(&next);
                session.state = next;
                forced = Some(session.record());
            }
            TickOutcome::Overtime => checkpoint = Some(session.record()),
            _ => {}
        }

        Ok(TickReport { outcome, timer: session.timer.state(), forced, checkpoint })
    }
}
