use crate::symbols::{Symbol, STRIP};
use serde::{Deserialize, Serialize};

/// Multiplier paid for any two matching symbols on the payline.
pub const PAIR_MULTIPLIER: u64 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaytableEntry {
    pub symbol: Symbol,
    pub payout_multiplier: u64,
}

/// Three-of-a-kind payouts, one entry per symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paytable(pub Vec<PaytableEntry>);

impl Paytable {
    pub fn standard() -> Self {
        const MULTIPLIERS: [u64; 8] = [5, 10, 15, 20, 50, 100, 500, 1000];
        Self(
            STRIP
                .iter()
                .zip(MULTIPLIERS)
                .map(|(&symbol, payout_multiplier)| PaytableEntry {
                    symbol,
                    payout_multiplier,
                })
                .collect(),
        )
    }

    pub fn multiplier(&self, symbol: Symbol) -> u64 {
        self.0
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.payout_multiplier)
            .unwrap_or(0)
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Jackpot(Symbol),
    Double,
    Miss,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        !matches!(self, Outcome::Miss)
    }
}

pub fn classify(line: [Symbol; 3]) -> Outcome {
    let [a, b, c] = line;
    if a == b && b == c {
        Outcome::Jackpot(a)
    } else if a == b || b == c || a == c {
        Outcome::Double
    } else {
        Outcome::Miss
    }
}

/// Bonus for a running streak: kicks in once the streak passes 2.
pub fn streak_multiplier(streak: u32) -> u64 {
    if streak > 2 {
        u64::from(streak - 1).max(1)
    } else {
        1
    }
}

/// Level bonus in tenths: level 1 is 10 (x1.0), every level adds 1 (x0.1).
pub fn level_multiplier_tenths(level: u32) -> u64 {
    10 + u64::from(level.max(1) - 1)
}

pub fn level_multiplier(level: u32) -> f64 {
    level_multiplier_tenths(level) as f64 / 10.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub outcome: Outcome,
    /// Streak after this spin.
    pub streak: u32,
    pub streak_multiplier: u64,
    pub level_multiplier_tenths: u64,
    pub win: u64,
    pub message: String,
}

/// Scores one payline.
///
/// `streak` is the value entering the spin. A win increments it first and the
/// streak multiplier is taken from the incremented value; a miss resets it.
pub fn evaluate(
    paytable: &Paytable,
    line: [Symbol; 3],
    bet: u64,
    streak: u32,
    level: u32,
) -> Payout {
    let outcome = classify(line);
    let streak = if outcome.is_win() {
        streak.saturating_add(1)
    } else {
        0
    };
    let s_mult = streak_multiplier(streak);
    let l_tenths = level_multiplier_tenths(level);

    let base = match outcome {
        Outcome::Jackpot(symbol) => paytable.multiplier(symbol),
        Outcome::Double => PAIR_MULTIPLIER,
        Outcome::Miss => 0,
    };
    let raw = u128::from(bet) * u128::from(base) * u128::from(s_mult) * u128::from(l_tenths) / 10;
    let win = u64::try_from(raw).unwrap_or(u64::MAX);

    let message = match outcome {
        Outcome::Jackpot(symbol) => format!("JACKPOT! {} Won ${}", symbol.key(), win),
        Outcome::Double => format!("Double! Won ${win}"),
        Outcome::Miss => "No luck. Spin again!".to_string(),
    };

    Payout {
        outcome,
        streak,
        streak_multiplier: s_mult,
        level_multiplier_tenths: l_tenths,
        win,
        message,
    }
}
