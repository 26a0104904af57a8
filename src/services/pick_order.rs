use serde::Serialize;

use crate::dto::draft_dto::Side;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    PreBan,
    Pick,
    Ban,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub slot: u32,
    pub kind: SlotKind,
    pub side: Side,
}

const fn slot(slot: u32, kind: SlotKind, side: Side) -> Slot {
    Slot { slot, kind, side }
}

use crate::dto::draft_dto::Side::{SideA as A, SideB as B};
use self::SlotKind::{Ban, Pick, PreBan};

/// The draft order. Every component reads turns from here.
///
/// Slots 1-2 open the pre-ban phase and are not indexed by
/// `current_pick_index`; pick index `n` is the n-th slot after them.
pub const PICK_ORDER: [Slot; 16] = [
    slot(1, PreBan, A),
    slot(2, PreBan, B),
    slot(3, Pick, A),
    slot(4, Pick, B),
    slot(5, Pick, A),
    slot(6, Pick, B),
    slot(7, Pick, A),
    slot(8, Pick, B),
    slot(9, Ban, A),
    slot(10, Ban, B),
    slot(11, Pick, B),
    slot(12, Pick, A),
    slot(13, Pick, B),
    slot(14, Pick, A),
    slot(15, Pick, B),
    slot(16, Pick, A),
];

fn indexed_slots() -> impl Iterator<Item = &'static Slot> {
    PICK_ORDER.iter().filter(|s| s.kind != SlotKind::PreBan)
}

/// Slot addressed by a 1-based pick index, `None` once the order is exhausted.
pub fn slot_for_pick_index(pick_index: u32) -> Option<&'static Slot> {
    if pick_index == 0 {
        return None;
    }
    indexed_slots().nth(pick_index as usize - 1)
}

/// Number of indexed slots (picks plus mid-draft bans).
pub fn indexed_slot_count() -> u32 {
    indexed_slots().count() as u32
}

/// Side acting on the n-th pre-ban turn (0-based), cycling the pre-ban slots.
pub fn preban_side(preban_turn: u32) -> Side {
    let prebans: Vec<&Slot> = PICK_ORDER.iter().filter(|s| s.kind == SlotKind::PreBan).collect();
    if prebans.is_empty() {
        return Side::SideA;
    }
    prebans[preban_turn as usize % prebans.len()].side
}

pub fn pick_slots_for(side: Side) -> u32 {
    indexed_slots().filter(|s| s.kind == SlotKind::Pick && s.side == side).count() as u32
}

pub fn ban_slots_for(side: Side) -> u32 {
    indexed_slots().filter(|s| s.kind == SlotKind::Ban && s.side == side).count() as u32
}
