//! Card tracking: yellow accumulation and the expelled set.

use std::collections::{HashMap, HashSet};

use crate::models::CardKind;

/// Per-match discipline ledger. Expelled players are no longer selectable
/// and block any dispatch naming them.
#[derive(Debug, Default)]
pub struct CardLedger {
    yellows: HashMap<String, u8>,
    expelled: HashSet<String>,
}

impl CardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yellow_count(&self, player_id: &str) -> u8 {
        *self.yellows.get(player_id).unwrap_or(&0)
    }

    pub fn is_expelled(&self, player_id: &str) -> bool {
        self.expelled.contains(player_id)
    }

    /// Record a dispatched card. A second yellow or a straight red expels.
    pub fn record(&mut self, player_id: &str, card: CardKind) {
        match card {
            CardKind::Yellow => {
                let count = self.yellows.entry(player_id.to_string()).or_insert(0);
                *count = count.saturating_add(1);
                if *count >= 2 {
                    self.expelled.insert(player_id.to_string());
                }
            }
            CardKind::YellowSecond => {
                self.yellows.insert(player_id.to_string(), 2);
                self.expelled.insert(player_id.to_string());
            }
            CardKind::Red => {
                self.expelled.insert(player_id.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        self.yellows.clear();
        self.expelled.clear();
    }
}
