pub mod engine;
pub mod error;
pub mod paytable;
pub mod profile;
pub mod progression;
pub mod reels;
pub mod rng;
pub mod store;
pub mod symbols;

pub use crate::engine::{place_bet, plan_spin, resolve_spin, spin_once, BetReceipt, EngineParams, GameMode, SpinOutcome};
pub use crate::error::{StoreError, StoreResult};
pub use crate::paytable::{classify, evaluate, Outcome, Paytable, PaytableEntry, Payout};
pub use crate::profile::Profile;
pub use crate::progression::{add_xp, xp_needed_for_level, ChallengeCompletion, LevelUp, XpGain};
pub use crate::reels::{Frame, ReelState, SpinAnimation, SpinPlan, WINDOW_HEIGHT};
pub use crate::rng::{derive_floats, derive_hash_hex, EntropyRandom, RandomSource, ScriptedRandom, SeededRandom};
pub use crate::store::{JsonFileStore, MemoryStore, ProfileStore};
pub use crate::symbols::{Symbol, CHALLENGE_SYMBOLS, STRIP};
