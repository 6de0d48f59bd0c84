use crate::types::{Competitor, StandingRow, LARGE_BRACKET_SIZE, SMALL_BRACKET_SIZE};

/// Rank qualified competitors by score, highest first. Equal scores keep
/// their roster order.
pub fn compute_seed_list(roster: &[Competitor]) -> Vec<Competitor> {
    let mut seeds: Vec<Competitor> = roster
        .iter()
        .filter(|competitor| competitor.is_qualified())
        .cloned()
        .collect();
    // NaN never survives the filter, so total_cmp agrees with numeric
    // order here (infinity included).
    seeds.sort_by(|a, b| b.score.total_cmp(&a.score));
    seeds
}

pub fn bracket_size(seed_list: &[Competitor]) -> usize {
    if seed_list.len() > SMALL_BRACKET_SIZE {
        LARGE_BRACKET_SIZE
    } else {
        SMALL_BRACKET_SIZE
    }
}

pub fn standings(seed_list: &[Competitor]) -> Vec<StandingRow> {
    seed_list
        .iter()
        .enumerate()
        .map(|(idx, competitor)| StandingRow {
            place: idx + 1,
            id: competitor.id,
            name: competitor.name.clone(),
            score: competitor.score,
        })
        .collect()
}
