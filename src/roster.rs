use crate::types::{Competitor, MAX_COMPETITORS};

/// Fixed-capacity list of competitor entries. Ids are 1-based, assigned on
/// creation and never reused; entries are edited in place.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<Competitor>,
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        let entries = (1..=MAX_COMPETITORS as u32).map(Competitor::blank).collect();
        Roster { entries }
    }

    pub fn entries(&self) -> &[Competitor] {
        &self.entries
    }

    pub fn get(&self, id: u32) -> Option<&Competitor> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut Competitor, String> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| format!("No competitor with id {id} (valid ids are 1..={MAX_COMPETITORS})."))
    }

    pub fn set_name(&mut self, id: u32, name: &str) -> Result<(), String> {
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_score(&mut self, id: u32, score: f64) -> Result<(), String> {
        self.get_mut(id)?.score = score;
        Ok(())
    }

    /// Set a score from raw field text, coerced the way a numeric input does.
    pub fn set_score_text(&mut self, id: u32, raw: &str) -> Result<f64, String> {
        let score = coerce_score(raw);
        self.set_score(id, score)?;
        Ok(score)
    }

    /// Clear every name and score. Ids are kept.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.name.clear();
            entry.score = 0.0;
        }
    }

    /// Number of input rows to offer: every named entry plus one blank row,
    /// never fewer than one nor more than the capacity.
    pub fn visible_count(&self) -> usize {
        let named = self
            .entries
            .iter()
            .filter(|entry| !entry.name.trim().is_empty())
            .count();
        (named + 1).clamp(1, MAX_COMPETITORS)
    }

    pub fn visible_entries(&self) -> &[Competitor] {
        &self.entries[..self.visible_count()]
    }
}

/// Blank text reads as 0, anything unparsable as NaN (which never
/// qualifies).
pub fn coerce_score(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_roster_has_sixteen_blank_entries_with_stable_ids() {
        let roster = Roster::new();
        assert_eq!(roster.entries().len(), MAX_COMPETITORS);
        for (idx, entry) in roster.entries().iter().enumerate() {
            assert_eq!(entry.id, idx as u32 + 1);
            assert!(entry.name.is_empty());
            assert_eq!(entry.score, 0.0);
        }
    }

    #[test]
    fn edits_apply_in_place_and_reject_unknown_ids() {
        let mut roster = Roster::new();
        roster.set_name(3, "Keiichi").unwrap();
        roster.set_score(3, 87.5).unwrap();
        let entry = roster.get(3).unwrap();
        assert_eq!(entry.name, "Keiichi");
        assert_eq!(entry.score, 87.5);

        assert!(roster.set_name(0, "nobody").is_err());
        assert!(roster.set_score(17, 10.0).is_err());
    }

    #[test]
    fn score_text_is_coerced() {
        assert_eq!(coerce_score(""), 0.0);
        assert_eq!(coerce_score("  42 "), 42.0);
        assert_eq!(coerce_score("-3"), -3.0);
        assert!(coerce_score("fast").is_nan());

        let mut roster = Roster::new();
        let stored = roster.set_score_text(1, "abc").unwrap();
        assert!(stored.is_nan());
        assert!(roster.get(1).unwrap().score.is_nan());
    }

    #[test]
    fn visible_count_tracks_named_entries() {
        let mut roster = Roster::new();
        assert_eq!(roster.visible_count(), 1);

        roster.set_name(1, "A").unwrap();
        roster.set_name(2, "B").unwrap();
        roster.set_name(5, "   ").unwrap();
        assert_eq!(roster.visible_count(), 3);

        for id in 1..=16 {
            roster.set_name(id, &format!("Driver {id}")).unwrap();
        }
        assert_eq!(roster.visible_count(), 16);
        assert_eq!(roster.visible_entries().len(), 16);
    }

    #[test]
    fn clear_zeroes_names_and_scores() {
        let mut roster = Roster::new();
        roster.set_name(4, "Daigo").unwrap();
        roster.set_score(4, 90.0).unwrap();
        roster.clear();
        assert!(roster.entries().iter().all(|e| e.name.is_empty() && e.score == 0.0));
        assert_eq!(roster.get(4).unwrap().id, 4);
    }
}
