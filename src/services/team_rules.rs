use crate::dto::team_dto::{Team, TeamValidation};
use crate::services::catalogue::CatalogueLookup;
use crate::services::draft_score::score_side;
use crate::services::cost_model::CostModel;

/// Checks a saved roster against the roster minimums of the draft rules.
pub fn validate_team(team: &Team, catalogue: &impl CatalogueLookup, costs: &impl CostModel) -> TeamValidation {
    let roster_size = team.character_ids.0.len() as u32;
    let total_cost = score_side(&team.character_ids.0, catalogue, costs).total_points;
    let rules = costs.rules();

    TeamValidation {
        roster_size,
        total_cost,
        meets_min_roster: roster_size >= rules.min_roster_size,
        meets_min_cost: total_cost >= rules.min_total_cost,
    }
}
