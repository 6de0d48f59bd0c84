use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::bracket::generate_round1;
use crate::config::append_results_log;
use crate::ledger::ResultLedger;
use crate::progression::Progression;
use crate::roster::Roster;
use crate::seeding::{bracket_size, compute_seed_list, standings};
use crate::types::*;

/// Application state for one session: roster, result ledger and phase.
/// Seed list and pairings are derived on every read.
pub struct Tournament {
    config: AppConfig,
    roster: Roster,
    ledger: ResultLedger,
    phase: Phase,
    started_at: Option<DateTime<Local>>,
}

impl Tournament {
    pub fn new(config: AppConfig) -> Self {
        Tournament {
            config,
            roster: Roster::new(),
            ledger: ResultLedger::new(),
            phase: Phase::Qualifying,
            started_at: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &ResultLedger {
        &self.ledger
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    // ── Roster ─────────────────────────────────────────────────────────

    pub fn update_name(&mut self, id: u32, name: &str) -> Result<(), String> {
        self.roster.set_name(id, name)?;
        debug!("competitor {id} renamed to {name:?}");
        Ok(())
    }

    pub fn update_score(&mut self, id: u32, score: f64) -> Result<(), String> {
        self.roster.set_score(id, score)?;
        debug!("competitor {id} score set to {score}");
        Ok(())
    }

    pub fn update_score_text(&mut self, id: u32, raw: &str) -> Result<f64, String> {
        let score = self.roster.set_score_text(id, raw)?;
        debug!("competitor {id} score set to {score} from {raw:?}");
        Ok(score)
    }

    // ── Derived views ──────────────────────────────────────────────────

    pub fn seed_list(&self) -> Vec<Competitor> {
        compute_seed_list(self.roster.entries())
    }

    pub fn bracket_size(&self) -> usize {
        bracket_size(&self.seed_list())
    }

    pub fn standings(&self) -> Vec<StandingRow> {
        standings(&self.seed_list())
    }

    pub fn round1(&self) -> Vec<(Occupant, Occupant)> {
        generate_round1(&self.seed_list())
    }

    pub fn with_progression<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Progression<'_>) -> R,
    {
        let seeds = self.seed_list();
        let progression = Progression::new(&seeds, &self.ledger);
        f(&progression)
    }

    pub fn match_participants(&self, key: SlotKey) -> (Occupant, Occupant) {
        self.with_progression(|progression| progression.match_participants(key))
    }

    pub fn get_winner(&self, key: SlotKey) -> Occupant {
        self.ledger.get_winner(key)
    }

    pub fn podium(&self) -> Podium {
        self.with_progression(|progression| progression.podium())
    }

    pub fn snapshot(&self) -> BracketSnapshot {
        let seeds = self.seed_list();
        let progression = Progression::new(&seeds, &self.ledger);
        let rounds = if self.phase == Phase::InProgress {
            progression.round_views()
        } else {
            Vec::new()
        };
        BracketSnapshot {
            phase: self.phase,
            started_at: self.started_at.map(|at| at.to_rfc3339()),
            bracket_size: progression.bracket_size(),
            standings: standings(&seeds),
            rounds,
            podium: progression.podium(),
        }
    }

    // ── Transitions ────────────────────────────────────────────────────

    pub fn start_tournament(&mut self) {
        self.ledger.reset_all();
        self.phase = Phase::InProgress;
        self.started_at = Some(Local::now());
        let seeds = self.seed_list();
        info!(
            "tournament started: {} qualified, bracket of {}",
            seeds.len(),
            bracket_size(&seeds)
        );
        append_results_log(&self.config, "START", &format!("qualified={}", seeds.len()));
    }

    pub fn reset_all(&mut self) {
        self.ledger.reset_all();
        self.roster.clear();
        self.phase = Phase::Qualifying;
        self.started_at = None;
        info!("tournament reset: roster and results cleared");
        append_results_log(&self.config, "RESET", "");
    }

    /// Record `winner` for `key`, overwriting any earlier entry. With
    /// `strict_results` the winner must be a real, current participant of
    /// the slot.
    pub fn record_winner(&mut self, key: SlotKey, winner: Option<Competitor>) -> Result<(), String> {
        if self.config.strict_results {
            self.check_winner(key, winner.as_ref())?;
        }
        let label = winner
            .as_ref()
            .map(|c| format!("{} (#{})", c.name, c.id))
            .unwrap_or_else(|| EMPTY_SLOT_LABEL.to_string());
        info!("{} match {} ({key}) winner: {label}", key.round().label(), key.match_number());
        append_results_log(&self.config, &key.to_string(), &label);
        self.ledger.set_winner(key, winner);
        Ok(())
    }

    /// Record whatever currently occupies `side` of `key`.
    pub fn record_side(&mut self, key: SlotKey, side: Side) -> Result<Occupant, String> {
        let (a, b) = self.match_participants(key);
        let picked = match side {
            Side::A => a,
            Side::B => b,
        };
        self.record_winner(key, picked.competitor().cloned())?;
        Ok(picked)
    }

    fn check_winner(&self, key: SlotKey, winner: Option<&Competitor>) -> Result<(), String> {
        let seeds = self.seed_list();
        let progression = Progression::new(&seeds, &self.ledger);
        if !progression.rounds().contains(&key.round()) {
            return Err(format!(
                "{} is not played in a bracket of {}.",
                key.round().label(),
                progression.bracket_size()
            ));
        }
        let winner = winner.ok_or_else(|| format!("Slot {key} needs a competitor as winner."))?;
        let (a, b) = progression.match_participants(key);
        if a.is_competitor(winner.id) || b.is_competitor(winner.id) {
            Ok(())
        } else {
            Err(format!(
                "{} is not playing in slot {key} ({} vs {}).",
                winner.name,
                a.display_name(),
                b.display_name()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config(strict: bool) -> AppConfig {
        AppConfig {
            strict_results: strict,
            results_log: false,
            ..AppConfig::default()
        }
    }

    fn tournament_with(count: u32, strict: bool) -> Tournament {
        let mut tournament = Tournament::new(quiet_config(strict));
        for id in 1..=count {
            tournament.update_name(id, &format!("Driver {id}")).unwrap();
            tournament.update_score(id, 100.0 - id as f64).unwrap();
        }
        tournament
    }

    fn slot(round: Round, m: u8) -> SlotKey {
        SlotKey::new(round, m).unwrap()
    }

    #[test]
    fn start_enters_progress_and_clears_ledger() {
        let mut tournament = tournament_with(8, false);
        tournament.record_side(slot(Round::Top8, 1), Side::A).unwrap();
        assert_eq!(tournament.ledger().len(), 1);

        tournament.start_tournament();
        assert_eq!(tournament.phase(), Phase::InProgress);
        assert!(tournament.ledger().is_empty());
        assert_eq!(tournament.snapshot().rounds.len(), 4);
    }

    #[test]
    fn reset_all_clears_results_and_roster() {
        let mut tournament = tournament_with(12, false);
        tournament.start_tournament();
        tournament.record_side(slot(Round::Top16, 1), Side::A).unwrap();
        tournament.reset_all();

        assert_eq!(tournament.phase(), Phase::Qualifying);
        for round in Round::ALL {
            for m in 1..=round.match_count() {
                assert_eq!(tournament.get_winner(slot(round, m)), Occupant::Pending);
            }
        }
        assert!(tournament
            .roster()
            .entries()
            .iter()
            .all(|e| e.name.is_empty() && e.score == 0.0));
        assert!(tournament.seed_list().is_empty());
    }

    #[test]
    fn round1_winners_feed_top8() {
        let mut tournament = tournament_with(16, false);
        tournament.start_tournament();
        let x = tournament.seed_list()[0].clone();
        tournament.record_winner(slot(Round::Top16, 1), Some(x.clone())).unwrap();
        tournament.record_side(slot(Round::Top16, 2), Side::B).unwrap();

        let (a, b) = tournament.match_participants(slot(Round::Top8, 1));
        assert_eq!(a, Occupant::Competitor(x));
        assert!(b.is_competitor(9));
    }

    #[test]
    fn bumped_winner_stops_propagating() {
        let mut tournament = tournament_with(8, false);
        tournament.start_tournament();
        let top8 = slot(Round::Top8, 1);
        tournament.record_side(top8, Side::A).unwrap();
        let (a, _) = tournament.match_participants(slot(Round::Semifinal, 1));
        assert!(a.is_competitor(1));

        // Driver 1 drops out of qualification; 2-1 is now Driver 2 vs nobody.
        tournament.update_score(1, 0.0).unwrap();
        let (a, b) = tournament.match_participants(top8);
        assert!(a.is_competitor(2));
        assert_eq!(b, Occupant::Empty);

        let (a, _) = tournament.match_participants(slot(Round::Semifinal, 1));
        assert_eq!(a, Occupant::Pending);
        // The ledger keeps the orphan entry.
        assert!(tournament.get_winner(top8).is_competitor(1));
        let view = &tournament.snapshot().rounds[0].matches[0];
        assert!(view.sides.iter().all(|side| !side.is_winner));
    }

    #[test]
    fn bumped_finalist_leaves_podium_empty() {
        let mut tournament = tournament_with(8, false);
        tournament.start_tournament();
        for m in 1..=4 {
            tournament.record_side(slot(Round::Top8, m), Side::A).unwrap();
        }
        tournament.record_side(slot(Round::Semifinal, 1), Side::A).unwrap();
        tournament.record_side(slot(Round::Semifinal, 2), Side::A).unwrap();
        tournament.record_side(slot(Round::Final, 1), Side::A).unwrap();
        assert_eq!(tournament.podium().champion.map(|c| c.id), Some(1));

        tournament.update_name(1, "").unwrap();
        let podium = tournament.podium();
        assert!(podium.champion.is_none());
        assert!(podium.runner_up.is_none());
    }

    #[test]
    fn permissive_mode_records_anything() {
        let mut tournament = tournament_with(8, false);
        tournament.start_tournament();
        let outsider = tournament.seed_list()[6].clone();
        tournament.record_winner(slot(Round::Top8, 1), Some(outsider)).unwrap();
        tournament.record_winner(slot(Round::Final, 1), None).unwrap();
        assert!(tournament.get_winner(slot(Round::Top8, 1)).is_competitor(7));
        assert_eq!(tournament.get_winner(slot(Round::Final, 1)), Occupant::Empty);
    }

    #[test]
    fn strict_mode_rejects_non_participants() {
        let mut tournament = tournament_with(6, true);
        tournament.start_tournament();
        let seeds = tournament.seed_list();

        let err = tournament
            .record_winner(slot(Round::Top8, 1), Some(seeds[3].clone()))
            .unwrap_err();
        assert!(err.contains("not playing"));
        // (1, 8) with only six seeds: the empty side cannot win.
        assert!(tournament.record_side(slot(Round::Top8, 1), Side::B).is_err());
        assert!(tournament.record_winner(slot(Round::Top16, 1), Some(seeds[0].clone())).is_err());
        assert!(tournament.ledger().is_empty());

        tournament.record_side(slot(Round::Top8, 1), Side::A).unwrap();
        assert!(tournament.get_winner(slot(Round::Top8, 1)).is_competitor(1));
    }

    #[test]
    fn snapshot_hides_rounds_while_qualifying() {
        let tournament = tournament_with(10, false);
        let snapshot = tournament.snapshot();
        assert_eq!(snapshot.phase, Phase::Qualifying);
        assert_eq!(snapshot.bracket_size, 16);
        assert_eq!(snapshot.standings.len(), 10);
        assert!(snapshot.rounds.is_empty());
        assert!(snapshot.started_at.is_none());
        assert_eq!(tournament.round1().len(), 8);
    }

    #[test]
    fn full_small_bracket_produces_podium() {
        let mut tournament = tournament_with(8, true);
        tournament.start_tournament();
        for m in 1..=4 {
            tournament.record_side(slot(Round::Top8, m), Side::A).unwrap();
        }
        // Semis: (1 vs 4), (2 vs 3)
        tournament.record_side(slot(Round::Semifinal, 1), Side::A).unwrap();
        tournament.record_side(slot(Round::Semifinal, 2), Side::B).unwrap();
        tournament.record_side(slot(Round::Final, 1), Side::B).unwrap();
        tournament.record_side(slot(Round::ThirdPlace, 1), Side::A).unwrap();

        let podium = tournament.podium();
        assert_eq!(podium.champion.map(|c| c.id), Some(3));
        assert_eq!(podium.runner_up.map(|c| c.id), Some(1));
        assert_eq!(podium.third.map(|c| c.id), Some(4));
    }
}
