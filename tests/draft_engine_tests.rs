// tests/draft_engine_tests.rs
//
// Full drafts driven through the engine:
// - pre-bans hand over to picks with side A on pick 1;
// - the pick order alternates, with side B resuming after the mid-draft bans;
// - rejected actions leave the state untouched;
// - a finished draft accepts nothing but a winner.

use pick_ban_backend::dto::draft_dto::{DraftPhase, DraftState, Side};
use pick_ban_backend::dto::settings_dto::DraftSettings;
use pick_ban_backend::services::draft_engine::{DraftAction, DraftError};

fn new_draft() -> DraftState {
    DraftState::new("draft".into(), "Alice".into(), "Bob".into(), &DraftSettings::default())
}

fn ban_prebans(state: DraftState) -> DraftState {
    ["pb1", "pb2", "pb3"]
        .iter()
        .fold(state, |s, id| s.ban_character(id).unwrap())
}

/// Plays the legal action for every indexed slot, recording who acted.
fn play_to_end(mut state: DraftState) -> (DraftState, Vec<Side>, Vec<DraftPhase>) {
    let mut turns = Vec::new();
    let mut phases = Vec::new();
    let mut n = 0;
    while !state.completed {
        n += 1;
        turns.push(state.turn);
        phases.push(state.phase);
        state = match state.phase {
            DraftPhase::Pick => state.select_character(&format!("c{}", n)).unwrap(),
            DraftPhase::Ban => state.ban_character(&format!("b{}", n)).unwrap(),
            other => panic!("unexpected phase {:?}", other),
        };
    }
    (state, turns, phases)
}

fn all_assigned(state: &DraftState) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    ids.extend(state.prebans.iter().cloned());
    ids.extend(state.side_bans.side_a.iter().cloned());
    ids.extend(state.side_bans.side_b.iter().cloned());
    ids.extend(state.picks.side_a.iter().cloned());
    ids.extend(state.picks.side_b.iter().cloned());
    ids
}

#[test]
fn third_preban_moves_to_pick_with_side_a() {
    let state = new_draft();
    let state = state.ban_character("pb1").unwrap();
    let state = state.ban_character("pb2").unwrap();
    assert_eq!(state.phase, DraftPhase::PreBan);

    let state = state.ban_character("pb3").unwrap();
    assert_eq!(state.phase, DraftPhase::Pick);
    assert_eq!(state.turn, Side::SideA);
    assert_eq!(state.current_pick_index, 1);
}

#[test]
fn pick_order_follows_the_table() {
    let (state, turns, phases) = play_to_end(ban_prebans(new_draft()));

    use pick_ban_backend::dto::draft_dto::Side::{SideA as A, SideB as B};
    assert_eq!(turns, vec![A, B, A, B, A, B, A, B, B, A, B, A, B, A]);
    assert_eq!(phases[6], DraftPhase::Ban);
    assert_eq!(phases[7], DraftPhase::Ban);
    assert!(phases.iter().enumerate().all(|(i, p)| (i == 6 || i == 7) || *p == DraftPhase::Pick));

    assert_eq!(state.phase, DraftPhase::Complete);
    assert!(state.completed);
    assert_eq!(state.picks.side_a.len(), 6);
    assert_eq!(state.picks.side_b.len(), 6);
    assert_eq!(state.side_bans.side_a, vec!["b7"]);
    assert_eq!(state.side_bans.side_b, vec!["b8"]);
}

#[test]
fn side_b_resumes_after_the_mid_draft_bans() {
    let mut state = ban_prebans(new_draft());
    for n in 1..=6 {
        state = state.select_character(&format!("c{}", n)).unwrap();
    }
    assert_eq!((state.phase, state.turn), (DraftPhase::Ban, Side::SideA));

    state = state.ban_character("ban-a").unwrap();
    assert_eq!((state.phase, state.turn), (DraftPhase::Ban, Side::SideB));

    state = state.ban_character("ban-b").unwrap();
    assert_eq!((state.phase, state.turn), (DraftPhase::Pick, Side::SideB));
    assert_eq!(state.current_pick_index, 9);
}

#[test]
fn pick_index_moves_by_one_per_accepted_action() {
    let mut state = ban_prebans(new_draft());
    let mut n = 0;
    while !state.completed {
        n += 1;
        let before = state.current_pick_index;
        let action = match (state.phase, n % 3) {
            (DraftPhase::Ban, _) => DraftAction::Ban(format!("b{}", n)),
            (_, 0) => DraftAction::Skip,
            _ => DraftAction::Pick(format!("c{}", n)),
        };
        state = state.apply(&action).unwrap();
        assert_eq!(state.current_pick_index, before + 1);
    }
}

#[test]
fn rejected_actions_leave_state_unchanged() {
    let state = ban_prebans(new_draft()).select_character("c1").unwrap();
    let before = state.clone();

    assert_eq!(state.select_character("c1"), Err(DraftError::InvalidTarget("c1".into())));
    assert_eq!(state.select_character("pb1"), Err(DraftError::InvalidTarget("pb1".into())));
    assert_eq!(state.select_character(""), Err(DraftError::InvalidTarget("".into())));
    assert!(matches!(state.ban_character("x"), Err(DraftError::IllegalPhase { .. })));
    assert!(matches!(state.forfeit_ban(), Err(DraftError::IllegalPhase { .. })));
    assert_eq!(state, before);
}

#[test]
fn no_character_is_assigned_twice() {
    let mut state = new_draft();
    // Hammer the same few ids through every phase; the engine must refuse repeats.
    let pool = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r"];
    let mut step = 0;
    while !state.completed && step < 200 {
        let id = pool[step % pool.len()];
        step += 1;
        let next = match state.phase {
            DraftPhase::PreBan | DraftPhase::Ban => state.ban_character(id),
            DraftPhase::Pick => state.select_character(id),
            DraftPhase::Complete => break,
        };
        if let Ok(next) = next {
            state = next;
        }

        let mut ids = all_assigned(&state);
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
    assert!(state.completed);
}

#[test]
fn completed_draft_only_accepts_a_winner() {
    let (state, _, _) = play_to_end(ban_prebans(new_draft()));
    let finished = state.clone();

    assert!(matches!(state.select_character("new"), Err(DraftError::IllegalPhase { .. })));
    assert!(matches!(state.skip_turn(), Err(DraftError::IllegalPhase { .. })));
    assert!(matches!(state.timeout(), Err(DraftError::IllegalPhase { .. })));
    assert!(!state.is_sides_turn(Side::SideA));
    assert!(!state.is_sides_turn(Side::SideB));

    let won = state.set_winner(Side::SideA);
    assert_eq!(won.winner, Some(Side::SideA));
    assert_eq!(DraftState { winner: None, ..won }, finished);
}

#[test]
fn skipping_every_pick_still_terminates() {
    let mut state = ban_prebans(new_draft());
    let mut actions = 0;
    while !state.completed {
        state = state.timeout().unwrap();
        actions += 1;
    }
    assert_eq!(actions, 14);
    assert_eq!(state.total_picks(), 0);
    assert!(state.side_bans.side_a.is_empty());
}

#[test]
fn queries_are_stable_between_mutations() {
    let state = ban_prebans(new_draft())
        .select_character("hutao").unwrap()
        .select_character("xiao").unwrap();

    for _ in 0..3 {
        assert!(state.is_character_picked("hutao"));
        assert!(!state.is_character_banned("hutao"));
        assert!(state.is_character_banned("pb2"));
        assert_eq!(state.pick_number_of("xiao"), Some(2));
    }
}

#[test]
fn state_round_trips_through_json() {
    let (state, _, _) = play_to_end(ban_prebans(new_draft()));
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["phase"], "Complete");
    assert_eq!(json["turn"], "side_a");
    assert!(json["picks"]["side_b"].is_array());

    let back: DraftState = serde_json::from_value(json).unwrap();
    assert_eq!(back, state);
}
