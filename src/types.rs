use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Arc, Mutex},
};

use crate::tournament::Tournament;

// ── Constants ──────────────────────────────────────────────────────────

pub const MAX_COMPETITORS: usize = 16;
pub const SMALL_BRACKET_SIZE: usize = 8;
pub const LARGE_BRACKET_SIZE: usize = 16;
pub const EMPTY_SLOT_LABEL: &str = "-";

// ── Shared state type aliases ──────────────────────────────────────────

pub type SharedTournament = Arc<Mutex<Tournament>>;

// ── Roster types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: u32,
    pub name: String,
    pub score: f64,
}

impl Competitor {
    pub fn blank(id: u32) -> Self {
        Competitor {
            id,
            name: String::new(),
            score: 0.0,
        }
    }

    /// Qualified competitors have a non-blank name and a score above zero.
    /// `NaN` never qualifies.
    pub fn is_qualified(&self) -> bool {
        !self.name.trim().is_empty() && self.score > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Qualifying,
    InProgress,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Qualifying => write!(f, "qualifying"),
            Phase::InProgress => write!(f, "in progress"),
        }
    }
}

// ── Bracket types ──────────────────────────────────────────────────────

/// Rounds in bracket order. The discriminant is the round number used by
/// slot keys: 1 = Top 16 ... 5 = third-place decider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Round {
    Top16 = 1,
    Top8 = 2,
    Semifinal = 3,
    Final = 4,
    ThirdPlace = 5,
}

impl Round {
    pub const ALL: [Round; 5] = [
        Round::Top16,
        Round::Top8,
        Round::Semifinal,
        Round::Final,
        Round::ThirdPlace,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Round> {
        Round::ALL.into_iter().find(|round| round.number() == number)
    }

    pub fn match_count(self) -> u8 {
        match self {
            Round::Top16 => 8,
            Round::Top8 => 4,
            Round::Semifinal => 2,
            Round::Final | Round::ThirdPlace => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Round::Top16 => "Top 16",
            Round::Top8 => "Top 8",
            Round::Semifinal => "Semifinals",
            Round::Final => "Final",
            Round::ThirdPlace => "3rd Place",
        }
    }
}

/// One pairing coordinate across the whole tournament. Match numbers are
/// 1-based within their round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotKey {
    round: Round,
    match_number: u8,
}

impl SlotKey {
    pub fn new(round: Round, match_number: u8) -> Result<Self, String> {
        if match_number == 0 || match_number > round.match_count() {
            return Err(format!(
                "{} has matches 1..={}, got {match_number}.",
                round.label(),
                round.match_count()
            ));
        }
        Ok(SlotKey { round, match_number })
    }

    pub fn from_numbers(round: u8, match_number: u8) -> Result<Self, String> {
        let round = Round::from_number(round).ok_or_else(|| format!("Unknown round {round}."))?;
        SlotKey::new(round, match_number)
    }

    /// Unchecked constructor for keys the bracket derives itself.
    pub(crate) fn from_parts(round: Round, match_number: u8) -> Self {
        SlotKey { round, match_number }
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn match_number(&self) -> u8 {
        self.match_number
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.round.number(), self.match_number)
    }
}

/// What currently sits in one side of a match.
#[derive(Debug, Clone, PartialEq)]
pub enum Occupant {
    Competitor(Competitor),
    /// Fed by a slot that has no recorded winner yet.
    Pending,
    /// No competitor will ever arrive (short seed list, or an empty side was
    /// recorded as a winner upstream).
    Empty,
}

impl Occupant {
    pub fn competitor(&self) -> Option<&Competitor> {
        match self {
            Occupant::Competitor(competitor) => Some(competitor),
            Occupant::Pending | Occupant::Empty => None,
        }
    }

    pub fn is_competitor(&self, id: u32) -> bool {
        self.competitor().map(|c| c.id) == Some(id)
    }

    pub fn display_name(&self) -> &str {
        self.competitor()
            .map(|c| c.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(EMPTY_SLOT_LABEL)
    }
}

impl From<Option<&Competitor>> for Occupant {
    fn from(value: Option<&Competitor>) -> Self {
        match value {
            Some(competitor) => Occupant::Competitor(competitor.clone()),
            None => Occupant::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn parse(raw: &str) -> Result<Side, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" | "1" => Ok(Side::A),
            "b" | "2" => Ok(Side::B),
            other => Err(format!("Side must be a or b, got \"{other}\".")),
        }
    }
}

// ── View types ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub place: usize,
    pub id: u32,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideView {
    pub competitor_id: Option<u32>,
    pub name: String,
    pub is_winner: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub key: String,
    pub match_number: u8,
    pub sides: [SideView; 2],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub round: u8,
    pub label: String,
    pub matches: Vec<MatchView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Podium {
    pub champion: Option<Competitor>,
    pub runner_up: Option<Competitor>,
    pub third: Option<Competitor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketSnapshot {
    pub phase: Phase,
    pub started_at: Option<String>,
    pub bracket_size: usize,
    pub standings: Vec<StandingRow>,
    pub rounds: Vec<RoundView>,
    pub podium: Podium,
}

// ── Config types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub strict_results: bool,
    pub results_log: bool,
    pub log_dir: String,
    pub overlay_addr: String,
    pub overlay_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strict_results: false,
            results_log: true,
            log_dir: "logs".to_string(),
            overlay_addr: String::new(),
            overlay_dir: String::new(),
        }
    }
}
