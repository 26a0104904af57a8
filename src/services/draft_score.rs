use crate::dto::draft_dto::{DraftState, PerSide, Side};
use crate::dto::score_dto::{DraftScore, SideScore};
use crate::services::catalogue::CatalogueLookup;
use crate::services::cost_model::CostModel;

/// Points for one side's picks. Budget flags are advisory, the engine never
/// rejects a pick for cost.
pub fn score_side(picks: &[String], catalogue: &impl CatalogueLookup, costs: &impl CostModel) -> SideScore {
    let mut character_points = 0;
    let mut weapon_points = 0;

    for id in picks {
        let Some(character) = catalogue.character(id) else {
            continue;
        };
        character_points += costs.cost_of_character(&character.id, character.constellation_level);

        let weapon = character
            .equipped_weapon_id
            .as_deref()
            .and_then(|weapon_id| catalogue.weapon(weapon_id));
        if let Some(weapon) = weapon {
            weapon_points += costs.cost_of_weapon(&weapon.id, weapon.refinement_level);
        }
    }

    let rules = costs.rules();
    let total_points = character_points + weapon_points;
    SideScore {
        character_points,
        weapon_points,
        total_points,
        over_budget: total_points > rules.max_points,
        over_weapon_budget: weapon_points > rules.max_weapon_points,
    }
}

pub fn score_draft(state: &DraftState, catalogue: &impl CatalogueLookup, costs: &impl CostModel) -> DraftScore {
    DraftScore {
        draft_id: state.id.clone(),
        sides: PerSide {
            side_a: score_side(&state.picks[Side::SideA], catalogue, costs),
            side_b: score_side(&state.picks[Side::SideB], catalogue, costs),
        },
    }
}
