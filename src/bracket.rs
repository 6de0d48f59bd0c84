use crate::seeding::bracket_size;
use crate::types::{Competitor, Occupant, Round, LARGE_BRACKET_SIZE};

/// Standard single-elimination seed order: adjacent entries are paired, and
/// the top two seeds can only meet in the final.
/// `seed_positions(8)` is `[1, 8, 4, 5, 2, 7, 3, 6]`.
pub fn seed_positions(size: u32) -> Vec<u32> {
  let mut seeds = vec![1u32];
  while seeds.len() < size as usize {
    let n = seeds.len() as u32;
    let mut next = Vec::with_capacity(seeds.len() * 2);
    for seed in seeds.iter().copied() {
      next.push(seed);
      next.push((n * 2 + 1).saturating_sub(seed));
    }
    seeds = next;
  }
  seeds
}

/// 1-based seed lookup; ranks past the end of the list are empty.
pub fn seed_at(seed_list: &[Competitor], rank: u32) -> Occupant {
  if rank == 0 {
    return Occupant::Empty;
  }
  seed_list.get(rank as usize - 1).into()
}

/// Pair seeds for an entry round of `size` competitors.
pub fn seeded_pairings(seed_list: &[Competitor], size: usize) -> Vec<(Occupant, Occupant)> {
  seed_positions(size as u32)
    .chunks(2)
    .map(|pair| (seed_at(seed_list, pair[0]), seed_at(seed_list, pair[1])))
    .collect()
}

/// First-round pairings. Round 1 only exists in a 16-entrant bracket, so a
/// smaller seed list produces no matches.
pub fn generate_round1(seed_list: &[Competitor]) -> Vec<(Occupant, Occupant)> {
  if bracket_size(seed_list) < LARGE_BRACKET_SIZE {
    return Vec::new();
  }
  seeded_pairings(seed_list, LARGE_BRACKET_SIZE)
}

/// The round fed straight from the seed list.
pub fn entry_round(size: usize) -> Round {
  if size >= LARGE_BRACKET_SIZE {
    Round::Top16
  } else {
    Round::Top8
  }
}

/// Rounds shown for a bracket of `size`, in bracket order.
pub fn rounds_in_play(size: usize) -> Vec<Round> {
  let entry = entry_round(size);
  Round::ALL.into_iter().filter(|round| *round >= entry).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seeded(count: usize) -> Vec<Competitor> {
    (1..=count)
      .map(|rank| Competitor {
        id: rank as u32,
        name: format!("Seed {rank}"),
        score: 1000.0 - rank as f64,
      })
      .collect()
  }

  fn ids(pairings: &[(Occupant, Occupant)]) -> Vec<(Option<u32>, Option<u32>)> {
    pairings
      .iter()
      .map(|(a, b)| (a.competitor().map(|c| c.id), b.competitor().map(|c| c.id)))
      .collect()
  }

  #[test]
  fn seed_positions_match_fixed_tables() {
    assert_eq!(seed_positions(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    assert_eq!(
      seed_positions(16),
      vec![1, 16, 8, 9, 4, 13, 5, 12, 2, 15, 7, 10, 3, 14, 6, 11]
    );
  }

  #[test]
  fn full_sixteen_pairs_follow_table() {
    let pairs = ids(&generate_round1(&seeded(16)));
    let expected: Vec<(Option<u32>, Option<u32>)> = [
      (1, 16), (8, 9), (4, 13), (5, 12), (2, 15), (7, 10), (3, 14), (6, 11),
    ]
    .iter()
    .map(|(a, b)| (Some(*a), Some(*b)))
    .collect();
    assert_eq!(pairs, expected);
  }

  #[test]
  fn second_match_pairs_eighth_and_ninth_seed() {
    let seeds = seeded(16);
    let round1 = generate_round1(&seeds);
    assert_eq!(round1[1].0, Occupant::Competitor(seeds[7].clone()));
    assert_eq!(round1[1].1, Occupant::Competitor(seeds[8].clone()));
  }

  #[test]
  fn short_sixteen_bracket_leaves_empty_slots() {
    let round1 = generate_round1(&seeded(10));
    assert_eq!(round1.len(), 8);
    // (1,16) has no 16th seed; (7,10) is fully populated.
    assert!(round1[0].0.is_competitor(1));
    assert_eq!(round1[0].1, Occupant::Empty);
    assert!(round1[5].0.is_competitor(7));
    assert!(round1[5].1.is_competitor(10));
    assert_eq!(round1[6].1, Occupant::Empty);
  }

  #[test]
  fn eight_or_fewer_has_no_first_round() {
    assert!(generate_round1(&seeded(8)).is_empty());
    assert!(generate_round1(&seeded(0)).is_empty());
  }

  #[test]
  fn eight_bracket_entry_pairs() {
    let pairs = ids(&seeded_pairings(&seeded(6), 8));
    assert_eq!(
      pairs,
      vec![
        (Some(1), None),
        (Some(4), Some(5)),
        (Some(2), None),
        (Some(3), Some(6)),
      ]
    );
  }

  #[test]
  fn rounds_in_play_skip_top16_for_small_bracket() {
    assert_eq!(
      rounds_in_play(8),
      vec![Round::Top8, Round::Semifinal, Round::Final, Round::ThirdPlace]
    );
    assert_eq!(rounds_in_play(16).len(), 5);
    assert_eq!(entry_round(16), Round::Top16);
  }
}
