use std::collections::HashMap;

use crate::types::{Competitor, Occupant, SlotKey};

/// Winners recorded per slot. Entries are only ever overwritten or cleared
/// all at once; a recorded `None` is an empty side that was picked.
#[derive(Debug, Clone, Default)]
pub struct ResultLedger {
    winners: HashMap<SlotKey, Option<Competitor>>,
}

impl ResultLedger {
    pub fn new() -> Self {
        ResultLedger::default()
    }

    /// Last write wins.
    pub fn set_winner(&mut self, key: SlotKey, winner: Option<Competitor>) {
        self.winners.insert(key, winner);
    }

    pub fn get_winner(&self, key: SlotKey) -> Occupant {
        match self.winners.get(&key) {
            None => Occupant::Pending,
            Some(winner) => winner.as_ref().into(),
        }
    }

    pub fn is_recorded(&self, key: SlotKey) -> bool {
        self.winners.contains_key(&key)
    }

    pub fn reset_all(&mut self) {
        self.winners.clear();
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}
