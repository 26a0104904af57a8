use serde::{Serialize, Deserialize};
use std::ops::{Index, IndexMut};

use crate::dto::score_dto::DraftScore;
use crate::services::turn_timer::TurnTimerState;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    SideA,
    SideB,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::SideA => Side::SideB,
            Side::SideB => Side::SideA,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftPhase {
    PreBan,
    Pick,
    Ban,
    Complete,
}

/// One value per side, serialized as `{"side_a": .., "side_b": ..}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PerSide<T> {
    pub side_a: T,
    pub side_b: T,
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::SideA => &self.side_a,
            Side::SideB => &self.side_b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::SideA => &mut self.side_a,
            Side::SideB => &mut self.side_b,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DraftState {
    pub id: String,
    pub side_names: PerSide<String>,
    pub phase: DraftPhase,
    pub turn: Side,
    pub prebans: Vec<String>,
    /// Pre-ban turns resolved so far, including forfeited ones.
    pub preban_turns: u32,
    pub side_bans: PerSide<Vec<String>>,
    pub picks: PerSide<Vec<String>>,
    /// Picks of both sides in the order they happened.
    pub pick_sequence: Vec<String>,
    pub current_pick_index: u32,
    pub max_picks: u32,
    pub max_bans: u32,
    pub max_pre_bans: u32,
    pub completed: bool,
    pub winner: Option<Side>,
}

/* Request payloads */

#[derive(Debug, Deserialize)]
pub struct CreateDraft {
    pub side_a_name: String,
    pub side_b_name: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedDraft {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CharacterTarget {
    pub character_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetWinner {
    pub side: Side,
}

/* Responses and broadcast messages */

#[derive(Debug, Serialize, Clone)]
pub struct DraftSnapshot {
    pub state: DraftState,
    pub timer: TurnTimerState,
    pub score: Option<DraftScore>,
}

#[derive(Serialize)]
pub struct UpdateDraft {
    pub r#type: String,
    pub draft_state: DraftState,
}

#[derive(Serialize)]
pub struct UpdateTimer {
    pub r#type: String,
    pub draft_id: String,
    pub timer: TurnTimerState,
}
