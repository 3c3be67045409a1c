//! XP curve, level-ups and the daily challenge.

use tracing::debug;

use crate::profile::Profile;
use crate::rng::RandomSource;
use crate::symbols::{Symbol, CHALLENGE_SYMBOLS};

/// XP granted per unit of currency bet.
pub const XP_PER_BET: u64 = 10;
/// Daily challenge bonus XP per current level.
pub const CHALLENGE_XP_PER_LEVEL: u64 = 500;
pub const CHALLENGE_GOAL_MIN: u32 = 5;
pub const CHALLENGE_GOAL_MAX: u32 = 15;

/// XP needed to clear `level`: `floor(100 * level^1.5)`.
///
/// Evaluated as `isqrt(10_000 * level^3)` so perfect squares never land a
/// hair under their integer value.
pub fn xp_needed_for_level(level: u32) -> u64 {
    let l = u128::from(level);
    isqrt(10_000 * l * l * l)
}

fn isqrt(n: u128) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u128;
    while x * x > n {
        x -= 1;
    }
    while (x + 1) * (x + 1) <= n {
        x += 1;
    }
    x as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    /// Level just reached.
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpGain {
    pub level: u32,
    pub xp: u64,
    pub level_ups: Vec<LevelUp>,
}

/// Adds `amount` and levels up as many times as the new total allows.
pub fn add_xp(level: u32, xp: u64, amount: u64) -> XpGain {
    let mut level = level.max(1);
    let mut xp = xp.saturating_add(amount);
    let mut level_ups = Vec::new();
    let mut needed = xp_needed_for_level(level);
    while xp >= needed {
        xp -= needed;
        level += 1;
        level_ups.push(LevelUp { level });
        needed = xp_needed_for_level(level);
    }
    XpGain {
        level,
        xp,
        level_ups,
    }
}

impl Profile {
    /// Applies [`add_xp`] to this profile and returns the level-ups it caused.
    pub fn grant_xp(&mut self, amount: u64) -> Vec<LevelUp> {
        let gain = add_xp(self.level, self.xp, amount);
        self.level = gain.level;
        self.xp = gain.xp;
        gain.level_ups
    }
}

/// Counts challenge symbols on the payline while the challenge is open.
/// Returns how many were added.
pub fn tally_challenge(profile: &mut Profile, line: [Symbol; 3]) -> u32 {
    if profile.challenge_completed {
        return 0;
    }
    let hits = line
        .iter()
        .filter(|&&s| s == profile.challenge_type)
        .count() as u32;
    profile.challenge_progress = profile.challenge_progress.saturating_add(hits);
    hits
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeCompletion {
    pub bonus_xp: u64,
    pub level_ups: Vec<LevelUp>,
}

/// Closes the challenge once progress reaches the goal and pays the bonus.
pub fn complete_challenge(profile: &mut Profile) -> Option<ChallengeCompletion> {
    if profile.challenge_completed || profile.challenge_progress < profile.challenge_goal {
        return None;
    }
    profile.challenge_completed = true;
    let bonus_xp = u64::from(profile.level) * CHALLENGE_XP_PER_LEVEL;
    let level_ups = profile.grant_xp(bonus_xp);
    debug!(bonus_xp, level = profile.level, "daily challenge completed");
    Some(ChallengeCompletion {
        bonus_xp,
        level_ups,
    })
}

/// Draws a new challenge for `today` and clears progress.
pub fn daily_reset<R: RandomSource + ?Sized>(profile: &mut Profile, today: &str, rng: &mut R) {
    let pick = rng.next_below(CHALLENGE_SYMBOLS.len() as u32) as usize;
    profile.challenge_type = CHALLENGE_SYMBOLS[pick];
    profile.challenge_goal = rng.range_inclusive(CHALLENGE_GOAL_MIN, CHALLENGE_GOAL_MAX);
    profile.challenge_progress = 0;
    profile.challenge_completed = false;
    profile.last_date = today.to_string();
    debug!(
        challenge = %profile.challenge_type,
        goal = profile.challenge_goal,
        date = today,
        "new daily challenge"
    );
}

/// Runs [`daily_reset`] when the profile was last seen on another day.
pub fn roll_over_day<R: RandomSource + ?Sized>(
    profile: &mut Profile,
    today: &str,
    rng: &mut R,
) -> bool {
    if profile.last_date == today {
        return false;
    }
    daily_reset(profile, today, rng);
    true
}
