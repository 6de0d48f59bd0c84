use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::tournament::Tournament;
use crate::types::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Name { id: u32, name: String },
    Score { id: u32, raw: String },
    Roster,
    Standings,
    Start,
    Reset,
    Win { key: SlotKey, side: Side },
    Bracket,
    Podium,
    Json,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  name <id> <text>           set a competitor's name (qualifying only)
  score <id> <value>         set a competitor's qualification score (qualifying only)
  roster                     show roster rows
  standings                  show qualification results
  start                      start the tournament
  reset                      clear results, names and scores
  win <round> <match> <a|b>  record the winner of a match
  bracket                    show every round
  podium                     show 1st / 2nd / 3rd
  json                       print the bracket snapshot as JSON
  help                       show this text
  quit                       exit";

// ── Helpers ─────────────────────────────────────────────────────────────

/// Lock the shared state, then call `f` with the tournament.
fn with_tournament<F, R>(shared: &SharedTournament, f: F) -> Result<R, String>
where
    F: FnOnce(&mut Tournament) -> Result<R, String>,
{
    let mut guard = shared.lock().map_err(|e| e.to_string())?;
    f(&mut guard)
}

fn check_qualifying(tournament: &Tournament) -> Result<(), String> {
    if tournament.phase() != Phase::Qualifying {
        return Err("Roster is locked while the tournament runs; use `reset` to start over.".to_string());
    }
    Ok(())
}

fn split_word(raw: &str) -> (&str, &str) {
    let trimmed = raw.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
        None => (trimmed, ""),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("Expected {what}, got \"{}\".", raw.trim()))
}

// ── Parsing ─────────────────────────────────────────────────────────────

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let (word, rest) = split_word(line);
    if word.is_empty() {
        return Ok(None);
    }
    let command = match word.to_ascii_lowercase().as_str() {
        "name" => {
            let (id, name) = split_word(rest);
            Command::Name {
                id: parse_number(id, "a competitor id")?,
                name: name.trim_end().to_string(),
            }
        }
        "score" => {
            let (id, raw) = split_word(rest);
            Command::Score {
                id: parse_number(id, "a competitor id")?,
                raw: raw.trim().to_string(),
            }
        }
        "win" => {
            let (round, rest) = split_word(rest);
            let (match_number, side) = split_word(rest);
            let key = SlotKey::from_numbers(
                parse_number(round, "a round number")?,
                parse_number(match_number, "a match number")?,
            )?;
            Command::Win { key, side: Side::parse(side)? }
        }
        "roster" => Command::Roster,
        "standings" => Command::Standings,
        "start" => Command::Start,
        "reset" => Command::Reset,
        "bracket" => Command::Bracket,
        "podium" => Command::Podium,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command \"{other}\"; try `help`.")),
    };
    Ok(Some(command))
}

// ── Commands ────────────────────────────────────────────────────────────

pub fn execute(shared: &SharedTournament, command: Command) -> Result<String, String> {
    debug!("executing {command:?}");
    match command {
        Command::Name { id, name } => with_tournament(shared, |t| {
            check_qualifying(t)?;
            t.update_name(id, &name)?;
            Ok(format!("#{id} name = {name:?}"))
        }),
        Command::Score { id, raw } => with_tournament(shared, |t| {
            check_qualifying(t)?;
            let score = t.update_score_text(id, &raw)?;
            Ok(format!("#{id} score = {score}"))
        }),
        Command::Roster => with_tournament(shared, |t| Ok(format_roster(t.roster().visible_entries()))),
        Command::Standings => with_tournament(shared, |t| Ok(format_standings(&t.standings()))),
        Command::Start => with_tournament(shared, |t| {
            t.start_tournament();
            Ok(format_bracket(&t.snapshot()))
        }),
        Command::Reset => with_tournament(shared, |t| {
            t.reset_all();
            Ok("Everything cleared. Enter names and scores.".to_string())
        }),
        Command::Win { key, side } => with_tournament(shared, |t| {
            if t.phase() != Phase::InProgress {
                return Err("Start the tournament before recording winners.".to_string());
            }
            let picked = t.record_side(key, side)?;
            Ok(format!(
                "{} match {}: {} wins",
                key.round().label(),
                key.match_number(),
                picked.display_name()
            ))
        }),
        Command::Bracket => with_tournament(shared, |t| Ok(format_bracket(&t.snapshot()))),
        Command::Podium => with_tournament(shared, |t| Ok(format_podium(&t.podium()))),
        Command::Json => with_tournament(shared, |t| {
            serde_json::to_string_pretty(&t.snapshot()).map_err(|e| e.to_string())
        }),
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

/// Read commands until `quit` or end of input. Command errors are printed
/// and the loop continues; only I/O failures end it early. Lines that are
/// not valid UTF-8 are decoded lossily.
pub fn run_console<R: BufRead, W: Write>(
    shared: &SharedTournament,
    mut input: R,
    mut output: W,
) -> Result<(), String> {
    writeln!(output, "{HELP_TEXT}").map_err(|e| e.to_string())?;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = input.read_until(b'\n', &mut buf).map_err(|e| e.to_string())?;
        if read == 0 {
            break;
        }
        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let reply = match parse_command(line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(shared, command),
            Err(e) => Err(e),
        };
        let written = match reply {
            Ok(text) => writeln!(output, "{text}"),
            Err(e) => {
                warn!("command {line:?} failed: {e}");
                writeln!(output, "error: {e}")
            }
        };
        written.map_err(|e| e.to_string())?;
        output.flush().map_err(|e| e.to_string())?;
    }
    Ok(())
}

// ── Formatting ──────────────────────────────────────────────────────────

pub fn format_roster(entries: &[Competitor]) -> String {
    entries
        .iter()
        .map(|entry| {
            let name = if entry.name.is_empty() { EMPTY_SLOT_LABEL } else { entry.name.as_str() };
            format!("#{:<3} {:<24} {}", entry.id, name, entry.score)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_standings(rows: &[StandingRow]) -> String {
    if rows.is_empty() {
        return "No qualified competitors yet.".to_string();
    }
    let mut lines = vec![format!("{:<5} {:<24} {}", "Place", "Name", "Score")];
    lines.extend(
        rows.iter()
            .map(|row| format!("{:<5} {:<24} {}", row.place, row.name, row.score)),
    );
    lines.join("\n")
}

pub fn format_bracket(snapshot: &BracketSnapshot) -> String {
    if snapshot.phase != Phase::InProgress {
        return "Tournament has not started.".to_string();
    }
    let mut lines = Vec::new();
    for round in &snapshot.rounds {
        lines.push(format!("== {} (round {})", round.label, round.round));
        for m in &round.matches {
            let side = |idx: usize| {
                let view = &m.sides[idx];
                if view.is_winner {
                    format!("[{}]", view.name)
                } else {
                    view.name.clone()
                }
            };
            lines.push(format!("  {}: {} vs {}", m.match_number, side(0), side(1)));
        }
    }
    lines.push(format_podium(&snapshot.podium));
    lines.join("\n")
}

pub fn format_podium(podium: &Podium) -> String {
    let name = |c: &Option<Competitor>| {
        c.as_ref()
            .map(|c| c.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| EMPTY_SLOT_LABEL.to_string())
    };
    format!(
        "1st: {}\n2nd: {}\n3rd: {}",
        name(&podium.champion),
        name(&podium.runner_up),
        name(&podium.third)
    )
}
