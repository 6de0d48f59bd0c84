use crate::bracket::{rounds_in_play, seed_at, seed_positions};
use crate::ledger::ResultLedger;
use crate::seeding::bracket_size;
use crate::types::*;

#[derive(Clone, Copy, Debug)]
enum SlotSource {
  /// 1-based rank into the seed list.
  Seed(u32),
  Winner(SlotKey),
  Loser(SlotKey),
  Empty,
}

/// Read-only view that derives every pairing from the seed list and the
/// ledger on demand. Nothing is cached, so a new ledger entry is visible to
/// all downstream rounds on the next read.
pub struct Progression<'a> {
  seed_list: &'a [Competitor],
  ledger: &'a ResultLedger,
  size: usize,
}

impl<'a> Progression<'a> {
  pub fn new(seed_list: &'a [Competitor], ledger: &'a ResultLedger) -> Self {
    Progression {
      seed_list,
      ledger,
      size: bracket_size(seed_list),
    }
  }

  pub fn bracket_size(&self) -> usize {
    self.size
  }

  pub fn rounds(&self) -> Vec<Round> {
    rounds_in_play(self.size)
  }

  pub fn winner(&self, key: SlotKey) -> Occupant {
    self.ledger.get_winner(key)
  }

  /// The recorded winner while it still occupies one of the slot's sides.
  /// A competitor bumped out of the slot (roster edited after the result)
  /// reads as pending; a recorded empty side still propagates.
  pub fn current_winner(&self, key: SlotKey) -> Occupant {
    let winner = self.winner(key);
    let Occupant::Competitor(competitor) = &winner else {
      return winner;
    };
    let (a, b) = self.match_participants(key);
    if a.is_competitor(competitor.id) || b.is_competitor(competitor.id) {
      winner
    } else {
      tracing::debug!("slot {key} winner {} is no longer a participant", competitor.name);
      Occupant::Pending
    }
  }

  pub fn match_participants(&self, key: SlotKey) -> (Occupant, Occupant) {
    let [a, b] = self.slot_sources(key);
    (self.resolve_slot(a), self.resolve_slot(b))
  }

  /// The side of `key` that did not win. Pending until the slot has a
  /// winner that actually occupies one of its sides.
  pub fn loser(&self, key: SlotKey) -> Occupant {
    let winner = self.current_winner(key);
    if winner == Occupant::Pending {
      return Occupant::Pending;
    }
    let (a, b) = self.match_participants(key);
    if same_occupant(&a, &winner) {
      b
    } else if same_occupant(&b, &winner) {
      a
    } else {
      tracing::warn!(
        "slot {key} has winner {} who is not one of its participants ({} vs {})",
        winner.display_name(),
        a.display_name(),
        b.display_name()
      );
      Occupant::Pending
    }
  }

  pub fn podium(&self) -> Podium {
    let final_key = key(Round::Final, 1);
    let third_key = key(Round::ThirdPlace, 1);
    Podium {
      champion: self.current_winner(final_key).competitor().cloned(),
      runner_up: self.loser(final_key).competitor().cloned(),
      third: self.current_winner(third_key).competitor().cloned(),
    }
  }

  pub fn round_view(&self, round: Round) -> RoundView {
    let matches = (1..=round.match_count())
      .map(|match_number| {
        let slot = key(round, match_number);
        let winner = self.current_winner(slot);
        let (a, b) = self.match_participants(slot);
        MatchView {
          key: slot.to_string(),
          match_number,
          sides: [side_view(&a, &winner), side_view(&b, &winner)],
        }
      })
      .collect();
    RoundView {
      round: round.number(),
      label: round.label().to_string(),
      matches,
    }
  }

  pub fn round_views(&self) -> Vec<RoundView> {
    self.rounds().into_iter().map(|round| self.round_view(round)).collect()
  }

  fn slot_sources(&self, slot: SlotKey) -> [SlotSource; 2] {
    let m = slot.match_number();
    if m == 0 || m > slot.round().match_count() {
      return [SlotSource::Empty, SlotSource::Empty];
    }
    match slot.round() {
      Round::Top16 => {
        if self.size < LARGE_BRACKET_SIZE {
          return [SlotSource::Empty, SlotSource::Empty];
        }
        self.seed_sources(LARGE_BRACKET_SIZE, m)
      }
      Round::Top8 => {
        if self.size >= LARGE_BRACKET_SIZE {
          feeder_sources(Round::Top16, m)
        } else {
          self.seed_sources(SMALL_BRACKET_SIZE, m)
        }
      }
      Round::Semifinal => feeder_sources(Round::Top8, m),
      Round::Final => feeder_sources(Round::Semifinal, m),
      Round::ThirdPlace => [
        SlotSource::Loser(key(Round::Semifinal, 1)),
        SlotSource::Loser(key(Round::Semifinal, 2)),
      ],
    }
  }

  fn seed_sources(&self, size: usize, match_number: u8) -> [SlotSource; 2] {
    let positions = seed_positions(size as u32);
    let Some(first) = (match_number as usize).checked_sub(1).map(|idx| idx * 2) else {
      return [SlotSource::Empty, SlotSource::Empty];
    };
    match (positions.get(first), positions.get(first + 1)) {
      (Some(a), Some(b)) => [SlotSource::Seed(*a), SlotSource::Seed(*b)],
      _ => [SlotSource::Empty, SlotSource::Empty],
    }
  }

  fn resolve_slot(&self, source: SlotSource) -> Occupant {
    match source {
      SlotSource::Empty => Occupant::Empty,
      SlotSource::Seed(rank) => seed_at(self.seed_list, rank),
      SlotSource::Winner(slot) => self.current_winner(slot),
      SlotSource::Loser(slot) => self.loser(slot),
    }
  }
}

/// Match `m` of the next round is fed by matches `2m-1` and `2m` of `round`.
fn feeder_sources(round: Round, match_number: u8) -> [SlotSource; 2] {
  let second = match_number * 2;
  [
    SlotSource::Winner(key(round, second - 1)),
    SlotSource::Winner(key(round, second)),
  ]
}

/// Slot keys built internally are always in range.
fn key(round: Round, match_number: u8) -> SlotKey {
  SlotKey::from_parts(round, match_number)
}

fn same_occupant(a: &Occupant, b: &Occupant) -> bool {
  match (a, b) {
    (Occupant::Competitor(x), Occupant::Competitor(y)) => x.id == y.id,
    (Occupant::Empty, Occupant::Empty) => true,
    _ => false,
  }
}

fn side_view(occupant: &Occupant, winner: &Occupant) -> SideView {
  SideView {
    competitor_id: occupant.competitor().map(|c| c.id),
    name: occupant.display_name().to_string(),
    is_winner: occupant.competitor().is_some() && same_occupant(occupant, winner),
  }
}
