use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    paytable::{evaluate, Outcome, Paytable, Payout},
    profile::Profile,
    progression::{complete_challenge, tally_challenge, ChallengeCompletion, LevelUp, XP_PER_BET},
    reels::{ReelState, SpinPlan, BASE_STOP_TICKS, REEL_COUNT},
    rng::RandomSource,
    symbols::Symbol,
};

/// Which rule set a session plays under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// XP, levels, level bonus and the daily challenge.
    #[default]
    Progression,
    /// Payouts and streaks only.
    Classic,
}

impl GameMode {
    pub fn has_progression(self) -> bool {
        matches!(self, GameMode::Progression)
    }
}

#[derive(Debug, Clone)]
pub struct EngineParams {
    pub paytable: Paytable,
    pub mode: GameMode,
    pub stop_ticks: [u32; REEL_COUNT],
}

impl EngineParams {
    pub fn new(mode: GameMode) -> Self {
        Self {
            paytable: Paytable::standard(),
            mode,
            stop_ticks: BASE_STOP_TICKS,
        }
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetReceipt {
    pub bet: u64,
    pub xp_granted: u64,
    pub level_ups: Vec<LevelUp>,
}

/// Books the stake before the reels move: spend, then bet XP.
pub fn place_bet(profile: &mut Profile, params: &EngineParams, bet: u64) -> BetReceipt {
    profile.spent = profile.spent.saturating_add(bet);
    let (xp_granted, level_ups) = if params.mode.has_progression() {
        let xp = bet.saturating_mul(XP_PER_BET);
        (xp, profile.grant_xp(xp))
    } else {
        (0, Vec::new())
    };
    debug!(bet, xp_granted, spent = profile.spent, "bet placed");
    BetReceipt {
        bet,
        xp_granted,
        level_ups,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinOutcome {
    pub line: [Symbol; REEL_COUNT],
    pub payout: Payout,
    /// Challenge symbols counted on this spin.
    pub challenge_hits: u32,
    pub challenge: Option<ChallengeCompletion>,
    /// Level-ups caused by the challenge bonus.
    pub level_ups: Vec<LevelUp>,
    pub message: String,
}

impl SpinOutcome {
    pub fn win(&self) -> u64 {
        self.payout.win
    }
}

/// Settles a spin whose payline is known. Call after [`place_bet`].
///
/// Challenge symbols are counted first, then the payline is scored against
/// the level reached after the bet XP, then a finished challenge pays its
/// bonus, and the win is credited last.
pub fn resolve_spin(
    profile: &mut Profile,
    params: &EngineParams,
    line: [Symbol; REEL_COUNT],
    bet: u64,
) -> SpinOutcome {
    let progression = params.mode.has_progression();

    let challenge_hits = if progression {
        tally_challenge(profile, line)
    } else {
        0
    };

    let level = if progression { profile.level } else { 1 };
    let payout = evaluate(&params.paytable, line, bet, profile.streak, level);
    profile.streak = payout.streak;

    let mut message = payout.message.clone();
    let challenge = if progression {
        complete_challenge(profile)
    } else {
        None
    };
    if let Some(done) = &challenge {
        message.push_str(&format!(" | DAILY CHALLENGE DONE! +{} XP", done.bonus_xp));
    }
    let level_ups = challenge
        .as_ref()
        .map(|c| c.level_ups.clone())
        .unwrap_or_default();

    profile.earned = profile.earned.saturating_add(payout.win);

    if let Outcome::Jackpot(symbol) = payout.outcome {
        info!(%symbol, win = payout.win, streak = profile.streak, "jackpot");
    } else {
        debug!(outcome = ?payout.outcome, win = payout.win, streak = profile.streak, "spin resolved");
    }

    SpinOutcome {
        line,
        payout,
        challenge_hits,
        challenge,
        level_ups,
        message,
    }
}

/// Plans the reel stops for one spin.
pub fn plan_spin<R: RandomSource + ?Sized>(params: &EngineParams, rng: &mut R) -> SpinPlan {
    SpinPlan::draw(params.stop_ticks, rng)
}

/// Convenience: a whole spin without animation. Advances `reels` to where
/// they land and returns the settled outcome with every level-up of the
/// turn.
pub fn spin_once<R: RandomSource + ?Sized>(
    profile: &mut Profile,
    params: &EngineParams,
    reels: &mut ReelState,
    bet: u64,
    rng: &mut R,
) -> SpinOutcome {
    let receipt = place_bet(profile, params, bet);
    *reels = plan_spin(params, rng).landing(*reels);
    let mut outcome = resolve_spin(profile, params, reels.payline(), bet);
    let mut level_ups = receipt.level_ups;
    level_ups.append(&mut outcome.level_ups);
    outcome.level_ups = level_ups;
    outcome
}
