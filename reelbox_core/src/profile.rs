//! The persisted player record.

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Challenge assigned to a brand-new or reset profile.
pub const DEFAULT_CHALLENGE: Symbol = Symbol::Lemon;
pub const DEFAULT_CHALLENGE_GOAL: u32 = 5;

/// Flat player record, stored as one JSON object.
///
/// Every field falls back to its default when missing from the stored
/// record, so older save files keep loading. `last_date` defaults to an
/// empty string; the store fills it with today's date on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub spent: u64,
    pub earned: u64,
    pub high_score: u64,
    pub streak: u32,
    pub level: u32,
    pub xp: u64,
    pub challenge_type: Symbol,
    pub challenge_goal: u32,
    pub challenge_progress: u32,
    pub challenge_completed: bool,
    pub last_date: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            spent: 0,
            earned: 0,
            high_score: 0,
            streak: 0,
            level: 1,
            xp: 0,
            challenge_type: DEFAULT_CHALLENGE,
            challenge_goal: DEFAULT_CHALLENGE_GOAL,
            challenge_progress: 0,
            challenge_completed: false,
            last_date: String::new(),
        }
    }
}

impl Profile {
    /// Fresh profile dated `today`.
    pub fn new(today: impl Into<String>) -> Self {
        Self {
            last_date: today.into(),
            ..Self::default()
        }
    }

    /// Restores `high_score >= earned`.
    pub fn settle_high_score(&mut self) {
        self.high_score = self.high_score.max(self.earned);
    }

    /// Net result of the session history: earned minus spent.
    pub fn balance(&self) -> i128 {
        i128::from(self.earned) - i128::from(self.spent)
    }
}
