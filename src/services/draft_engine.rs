use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::dto::draft_dto::{DraftPhase, DraftState, PerSide, Side};
use crate::dto::settings_dto::DraftSettings;
use crate::services::pick_order::{preban_side, slot_for_pick_index, SlotKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Character '{0}' is blank or already taken")]
    InvalidTarget(String),

    #[error("{action} is not allowed during the {phase:?} phase")]
    IllegalPhase { action: &'static str, phase: DraftPhase },

    #[error("Draft session '{0}' was not found")]
    SessionNotFound(String),
}

/// Everything a caller can ask the engine to do.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum DraftAction {
    Ban(String),
    Pick(String),
    Skip,
    ForfeitBan,
    Timeout,
    SetWinner(Side),
}

impl DraftState {
    pub fn new(id: String, side_a_name: String, side_b_name: String, settings: &DraftSettings) -> Self {
        let mut state = Self {
            id,
            side_names: PerSide { side_a: side_a_name, side_b: side_b_name },
            phase: DraftPhase::PreBan,
            turn: preban_side(0),
            prebans: Vec::new(),
            preban_turns: 0,
            side_bans: PerSide::default(),
            picks: PerSide::default(),
            pick_sequence: Vec::new(),
            current_pick_index: 1,
            max_picks: settings.max_picks,
            max_bans: settings.max_bans,
            max_pre_bans: settings.max_pre_bans,
            completed: false,
            winner: None,
        };

        if state.max_pre_bans == 0 {
            state.enter_indexed_slot();
        }

        state
    }

    pub fn apply(&self, action: &DraftAction) -> Result<DraftState, DraftError> {
        match action {
            DraftAction::Ban(id) => self.ban_character(id),
            DraftAction::Pick(id) => self.select_character(id),
            DraftAction::Skip => self.skip_turn(),
            DraftAction::ForfeitBan => self.forfeit_ban(),
            DraftAction::Timeout => self.timeout(),
            DraftAction::SetWinner(side) => Ok(self.set_winner(*side)),
        }
    }

    pub fn ban_character(&self, character_id: &str) -> Result<DraftState, DraftError> {
        if !matches!(self.phase, DraftPhase::PreBan | DraftPhase::Ban) {
            return Err(DraftError::IllegalPhase { action: "ban", phase: self.phase });
        }
        self.check_target(character_id)?;

        let mut next = self.clone();
        match self.phase {
            DraftPhase::PreBan => {
                next.prebans.push(character_id.to_string());
                next.resolve_preban_turn();
            }
            _ => {
                next.side_bans[self.turn].push(character_id.to_string());
                next.advance();
            }
        }

        info!("Draft {}: {:?} banned {}", self.id, self.turn, character_id);
        Ok(next)
    }

    pub fn select_character(&self, character_id: &str) -> Result<DraftState, DraftError> {
        if self.phase != DraftPhase::Pick {
            return Err(DraftError::IllegalPhase { action: "pick", phase: self.phase });
        }
        self.check_target(character_id)?;

        let mut next = self.clone();
        next.picks[self.turn].push(character_id.to_string());
        next.pick_sequence.push(character_id.to_string());
        next.advance();

        info!("Draft {}: {:?} picked {}", self.id, self.turn, character_id);
        Ok(next)
    }

    pub fn skip_turn(&self) -> Result<DraftState, DraftError> {
        if self.phase != DraftPhase::Pick {
            return Err(DraftError::IllegalPhase { action: "skip", phase: self.phase });
        }

        let mut next = self.clone();
        next.advance();

        info!("Draft {}: {:?} skipped pick {}", self.id, self.turn, self.current_pick_index);
        Ok(next)
    }

    /// Resolves a ban turn without banning anything.
    pub fn forfeit_ban(&self) -> Result<DraftState, DraftError> {
        let mut next = self.clone();
        match self.phase {
            DraftPhase::PreBan => next.resolve_preban_turn(),
            DraftPhase::Ban => next.advance(),
            phase => return Err(DraftError::IllegalPhase { action: "forfeit ban", phase }),
        }

        info!("Draft {}: {:?} forfeited a ban", self.id, self.turn);
        Ok(next)
    }

    /// The forced action for an expired turn.
    pub fn timeout(&self) -> Result<DraftState, DraftError> {
        match self.phase {
            DraftPhase::Pick => self.skip_turn(),
            DraftPhase::PreBan | DraftPhase::Ban => self.forfeit_ban(),
            phase => Err(DraftError::IllegalPhase { action: "timeout", phase }),
        }
    }

    pub fn set_winner(&self, side: Side) -> DraftState {
        let mut next = self.clone();
        next.winner = Some(side);
        next
    }

    /* Queries */

    pub fn is_character_banned(&self, character_id: &str) -> bool {
        self.prebans.iter().any(|id| id == character_id)
            || self.side_bans.side_a.iter().any(|id| id == character_id)
            || self.side_bans.side_b.iter().any(|id| id == character_id)
    }

    pub fn is_character_picked(&self, character_id: &str) -> bool {
        self.picks.side_a.iter().any(|id| id == character_id)
            || self.picks.side_b.iter().any(|id| id == character_id)
    }

    pub fn is_sides_turn(&self, side: Side) -> bool {
        !self.completed && self.turn == side
    }

    /// 1-based position of the character in the overall pick order.
    /// This is its position among picks, not its table slot: skipped slots
    /// are not counted.
    pub fn pick_number_of(&self, character_id: &str) -> Option<u32> {
        self.pick_sequence
            .iter()
            .position(|id| id == character_id)
            .map(|pos| pos as u32 + 1)
    }

    pub fn current_player_name(&self) -> &str {
        &self.side_names[self.turn]
    }

    pub fn opponent_name(&self) -> &str {
        &self.side_names[self.turn.opponent()]
    }

    pub fn total_picks(&self) -> u32 {
        (self.picks.side_a.len() + self.picks.side_b.len()) as u32
    }

    fn check_target(&self, character_id: &str) -> Result<(), DraftError> {
        if character_id.trim().is_empty()
            || self.is_character_banned(character_id)
            || self.is_character_picked(character_id)
        {
            return Err(DraftError::InvalidTarget(character_id.to_string()));
        }
        Ok(())
    }

    fn resolve_preban_turn(&mut self) {
        self.preban_turns += 1;
        if self.preban_turns >= self.max_pre_bans {
            debug!("Draft {}: pre-bans done, entering picks", self.id);
            self.enter_indexed_slot();
        } else {
            self.turn = preban_side(self.preban_turns);
        }
    }

    fn advance(&mut self) {
        self.current_pick_index += 1;
        self.enter_indexed_slot();
    }

    /// Reads phase and turn for `current_pick_index` from the pick order.
    fn enter_indexed_slot(&mut self) {
        if self.total_picks() >= self.max_picks * 2 {
            self.complete();
            return;
        }

        match slot_for_pick_index(self.current_pick_index) {
            Some(slot) => {
                self.phase = match slot.kind {
                    SlotKind::Ban => DraftPhase::Ban,
                    _ => DraftPhase::Pick,
                };
                self.turn = slot.side;
            }
            None => self.complete(),
        }
    }

    fn complete(&mut self) {
        info!("Draft {} is complete.", self.id);
        self.phase = DraftPhase::Complete;
        self.completed = true;
    }
}

#[cfg(test)]
mod draft_engine_tests {
    use super::*;

    fn fresh() -> DraftState {
        DraftState::new("d1".into(), "Alice".into(), "Bob".into(), &DraftSettings::default())
    }

    fn after_prebans() -> DraftState {
        fresh()
            .ban_character("pb1").unwrap()
            .ban_character("pb2").unwrap()
            .ban_character("pb3").unwrap()
    }

    #[test]
    fn new_draft_starts_in_preban_for_side_a() {
        let state = fresh();
        assert_eq!(state.phase, DraftPhase::PreBan);
        assert_eq!(state.turn, Side::SideA);
        assert_eq!(state.current_pick_index, 1);
        assert!(state.prebans.is_empty());
        assert!(!state.completed);
    }

    #[test]
    fn draft_without_prebans_starts_in_pick() {
        let settings = DraftSettings { max_pre_bans: 0, ..DraftSettings::default() };
        let state = DraftState::new("d2".into(), "A".into(), "B".into(), &settings);
        assert_eq!(state.phase, DraftPhase::Pick);
        assert_eq!(state.turn, Side::SideA);
    }

    #[test]
    fn third_preban_enters_pick_phase() {
        let one = fresh().ban_character("pb1").unwrap();
        assert_eq!(one.turn, Side::SideB);
        let two = one.ban_character("pb2").unwrap();
        assert_eq!(two.turn, Side::SideA);
        assert_eq!(two.phase, DraftPhase::PreBan);

        let three = two.ban_character("pb3").unwrap();
        assert_eq!(three.phase, DraftPhase::Pick);
        assert_eq!(three.turn, Side::SideA);
        assert_eq!(three.current_pick_index, 1);
        assert_eq!(three.prebans, vec!["pb1", "pb2", "pb3"]);
    }

    #[test]
    fn pick_during_preban_is_illegal() {
        let err = fresh().select_character("c1").unwrap_err();
        assert_eq!(err, DraftError::IllegalPhase { action: "pick", phase: DraftPhase::PreBan });
    }

    #[test]
    fn blank_and_taken_targets_are_rejected() {
        let state = after_prebans();
        assert!(matches!(state.select_character("  "), Err(DraftError::InvalidTarget(_))));
        assert!(matches!(state.select_character("pb2"), Err(DraftError::InvalidTarget(_))));

        let picked = state.select_character("c1").unwrap();
        assert!(matches!(picked.select_character("c1"), Err(DraftError::InvalidTarget(_))));
    }

    #[test]
    fn skip_advances_without_recording() {
        let state = after_prebans();
        let skipped = state.skip_turn().unwrap();
        assert_eq!(skipped.current_pick_index, 2);
        assert_eq!(skipped.turn, Side::SideB);
        assert_eq!(skipped.total_picks(), 0);
    }

    #[test]
    fn skip_is_illegal_outside_pick() {
        assert!(matches!(fresh().skip_turn(), Err(DraftError::IllegalPhase { .. })));
    }

    #[test]
    fn timeout_forfeits_preban_turn() {
        let state = fresh().timeout().unwrap();
        assert_eq!(state.preban_turns, 1);
        assert!(state.prebans.is_empty());
        assert_eq!(state.turn, Side::SideB);
    }

    #[test]
    fn skipped_slots_do_not_count_as_picks() {
        let state = after_prebans()
            .skip_turn().unwrap()
            .select_character("c1").unwrap();
        assert_eq!(state.current_pick_index, 3);
        assert_eq!(state.pick_number_of("c1"), Some(1));
    }

    #[test]
    fn queries_report_names_and_pick_numbers() {
        let state = after_prebans()
            .select_character("c1").unwrap()
            .select_character("c2").unwrap();
        assert_eq!(state.pick_number_of("c2"), Some(2));
        assert_eq!(state.pick_number_of("c9"), None);
        assert_eq!(state.current_player_name(), "Alice");
        assert_eq!(state.opponent_name(), "Bob");
        assert!(state.is_sides_turn(Side::SideA));
        assert!(state.is_character_picked("c1"));
        assert!(state.is_character_banned("pb1"));
    }

    #[test]
    fn winner_does_not_touch_turn_logic() {
        let state = after_prebans();
        let won = state.set_winner(Side::SideB);
        assert_eq!(won.winner, Some(Side::SideB));
        assert_eq!(won.phase, state.phase);
        assert_eq!(won.current_pick_index, state.current_pick_index);
    }
}
