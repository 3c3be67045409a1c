use serde::{Deserialize, Serialize};

/// Number of stops on every reel strip.
pub const SYMBOL_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Symbol {
    #[serde(rename = "CHERRY")]
    Cherry,
    #[serde(rename = "LEMON")]
    Lemon,
    #[serde(rename = "ORANGE")]
    Orange,
    #[serde(rename = "GRAPE")]
    Grape,
    #[serde(rename = "BELL")]
    Bell,
    #[serde(rename = "BAR")]
    Bar,
    #[serde(rename = "777")]
    Seven,
    #[serde(rename = "DIAMOND")]
    Diamond,
}

/// Reel strip order. Every reel uses the same strip.
pub const STRIP: [Symbol; SYMBOL_COUNT] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Grape,
    Symbol::Bell,
    Symbol::Bar,
    Symbol::Seven,
    Symbol::Diamond,
];

/// Symbols a daily challenge may ask for. The three rarest are excluded.
pub const CHALLENGE_SYMBOLS: [Symbol; 5] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Grape,
    Symbol::Bell,
];

impl Symbol {
    pub fn from_index(i: usize) -> Self {
        STRIP[i % SYMBOL_COUNT]
    }

    pub fn to_index(self) -> usize {
        match self {
            Symbol::Cherry => 0,
            Symbol::Lemon => 1,
            Symbol::Orange => 2,
            Symbol::Grape => 3,
            Symbol::Bell => 4,
            Symbol::Bar => 5,
            Symbol::Seven => 6,
            Symbol::Diamond => 7,
        }
    }

    /// Stable key used in the save file and in messages.
    pub fn key(self) -> &'static str {
        match self {
            Symbol::Cherry => "CHERRY",
            Symbol::Lemon => "LEMON",
            Symbol::Orange => "ORANGE",
            Symbol::Grape => "GRAPE",
            Symbol::Bell => "BELL",
            Symbol::Bar => "BAR",
            Symbol::Seven => "777",
            Symbol::Diamond => "DIAMOND",
        }
    }

    /// ASCII art drawn on the reel.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "o^o",
            Symbol::Lemon => "(`_`)",
            Symbol::Orange => "( * )",
            Symbol::Grape => "`%o",
            Symbol::Bell => "/_\\",
            Symbol::Bar => "=[BAR]=",
            Symbol::Seven => "[[ 7 ]]",
            Symbol::Diamond => "~ V ~",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_wraps_around_strip() {
        assert_eq!(Symbol::from_index(0), Symbol::Cherry);
        assert_eq!(Symbol::from_index(7), Symbol::Diamond);
        assert_eq!(Symbol::from_index(8), Symbol::Cherry);
        assert_eq!(Symbol::from_index(21), Symbol::Bar);
        for (i, s) in STRIP.iter().enumerate() {
            assert_eq!(s.to_index(), i);
        }
    }

    #[test]
    fn keys_match_save_format() {
        assert!(serde_json::from_str::<Symbol>("\"seven\"").is_err());
        assert_eq!(serde_json::to_string(&Symbol::Seven).unwrap(), "\"777\"");
        let parsed: Symbol = serde_json::from_str("\"LEMON\"").unwrap();
        assert_eq!(parsed, Symbol::Lemon);
    }

    #[test]
    fn challenge_subset_skips_rare_symbols() {
        for rare in [Symbol::Bar, Symbol::Seven, Symbol::Diamond] {
            assert!(!CHALLENGE_SYMBOLS.contains(&rare));
        }
    }
}
