//! Text layout of the machine. Everything here is pure and returns strings.

use reelbox_core::paytable::{level_multiplier, streak_multiplier};
use reelbox_core::reels::PAYLINE_ROW;
use reelbox_core::{xp_needed_for_level, GameMode, Profile, ReelState, Symbol};

pub const CONTENT_WIDTH: usize = 52;
pub const CELL_WIDTH: usize = 16;
pub const FULL_WIDTH: usize = CONTENT_WIDTH + 8;
pub const XP_BAR_WIDTH: usize = 15;
const BANNER_WIDTH: usize = 58;

fn boxed(text: &str) -> String {
    format!("|| {:^width$} ||", text, width = CONTENT_WIDTH + 2)
}

fn cell(symbol: Symbol, on_payline: bool) -> String {
    let raw = if on_payline {
        format!("> {} <", symbol.glyph())
    } else {
        format!("  {}  ", symbol.glyph())
    };
    format!("{:^width$}", raw, width = CELL_WIDTH)
}

pub fn xp_bar(xp: u64, needed: u64) -> String {
    let filled = if needed == 0 {
        0
    } else {
        ((u128::from(xp) * XP_BAR_WIDTH as u128 / u128::from(needed)) as usize).min(XP_BAR_WIDTH)
    };
    format!("[{}{}]", "=".repeat(filled), "-".repeat(XP_BAR_WIDTH - filled))
}

pub fn challenge_line(profile: &Profile) -> String {
    if profile.challenge_completed {
        "DAILY CHALLENGE: COMPLETED! (Check back tomorrow)".to_string()
    } else {
        format!(
            "DAILY CHALLENGE: Land {} {}s ({}/{})",
            profile.challenge_goal,
            profile.challenge_type.key(),
            profile.challenge_progress,
            profile.challenge_goal
        )
    }
}

fn header(profile: &Profile, mode: GameMode) -> Vec<String> {
    let mut lines = vec![boxed(&format!(
        "BEST: ${} | SPENT: ${} | EARNED: ${}",
        profile.high_score, profile.spent, profile.earned
    ))];

    // a win bumps the streak before it is multiplied
    let s_mult = streak_multiplier(profile.streak.saturating_add(1));
    if mode.has_progression() {
        let needed = xp_needed_for_level(profile.level);
        lines.push(boxed(&format!(
            "LVL {} {} XP: {}/{}",
            profile.level,
            xp_bar(profile.xp, needed),
            profile.xp,
            needed
        )));
        lines.push(boxed(&challenge_line(profile)));
        lines.push(boxed(&format!(
            "STREAK: {} | NEXT WIN: x{} | LVL BONUS: x{:.1}",
            profile.streak,
            s_mult,
            level_multiplier(profile.level)
        )));
    } else {
        lines.push(boxed(&format!("STREAK: {} | NEXT WIN: x{}", profile.streak, s_mult)));
    }
    lines
}

/// Full machine: header, seven rows per reel with the payline marked, and
/// the status message underneath.
pub fn render(reels: &ReelState, profile: &Profile, mode: GameMode, message: &str) -> String {
    let rule = "=".repeat(FULL_WIDTH);
    let spacer = format!(
        "|| {blank} | {blank} | {blank} ||",
        blank = " ".repeat(CELL_WIDTH)
    );

    let mut out = Vec::new();
    out.push(rule.clone());
    out.extend(header(profile, mode));
    out.push(rule.clone());
    for (row_idx, row) in reels.window().iter().enumerate() {
        let on_payline = row_idx == PAYLINE_ROW;
        out.push(spacer.clone());
        out.push(format!(
            "|| {} | {} | {} ||",
            cell(row[0], on_payline),
            cell(row[1], on_payline),
            cell(row[2], on_payline)
        ));
    }
    out.push(spacer);
    out.push(rule);
    out.push(format!("  {message}"));
    out.join("\n")
}

pub fn prompt(default_bet: u64) -> String {
    format!("\nENTER: Spin ${default_bet} | # : Bet | reset: Reset | q: Quit")
}

pub fn level_up_banner(level: u32) -> String {
    let stars = "*".repeat(BANNER_WIDTH);
    let line = |text: &str| format!("** {:^width$} **", text, width = BANNER_WIDTH - 6);
    [
        "\n".repeat(4),
        stars.clone(),
        line("!!! LEVEL UP !!!"),
        line(&format!("You reached Level {level}")),
        line("Winnings Bonus Increased!"),
        stars,
    ]
    .join("\n")
}

pub const LEVEL_UP_ACK: &str = "\nPress ENTER to claim your reward and continue...";
