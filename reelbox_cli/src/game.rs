//! The interactive loop: prompt, spin, animate, settle, save.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use reelbox_core::{
    place_bet, plan_spin, resolve_spin, EngineParams, LevelUp, Profile, ProfileStore,
    RandomSource, ReelState,
};
use tracing::{debug, info};

use crate::display;
use crate::terminal::Screen;

pub const WELCOME: &str = "Welcome back! Press ENTER to spin.";
const RESET_MESSAGE: &str = "Profile reset. Press ENTER to spin.";
const SPINNING: &str = "SPINNING...";
const BANNER_FLASHES: usize = 3;

/// Local calendar date used as the daily challenge key.
pub fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Spin(u64),
    Reset,
    Quit,
}

impl Command {
    /// Input is trimmed and lowercased. Anything that is not `q`, `reset`
    /// or an unsigned integer spins at `default_bet`.
    pub fn parse(input: &str, default_bet: u64) -> Self {
        let input = input.trim().to_lowercase();
        match input.as_str() {
            "q" => Command::Quit,
            "reset" => Command::Reset,
            s if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Command::Spin(s.parse().unwrap_or(default_bet))
            }
            _ => Command::Spin(default_bet),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub tick: Duration,
    pub banner_on: Duration,
    pub banner_off: Duration,
}

impl Pacing {
    pub fn from_tick_ms(tick_ms: u64) -> Self {
        Self {
            tick: Duration::from_millis(tick_ms),
            banner_on: Duration::from_millis(tick_ms.saturating_mul(8)),
            banner_off: Duration::from_millis(tick_ms.saturating_mul(4)),
        }
    }

    #[cfg(test)]
    pub fn instant() -> Self {
        Self::from_tick_ms(0)
    }
}

pub struct Game<'a> {
    pub profile: Profile,
    pub reels: ReelState,
    pub message: String,
    params: EngineParams,
    store: &'a dyn ProfileStore,
    rng: &'a mut dyn RandomSource,
    pacing: Pacing,
    default_bet: u64,
    today: String,
}

impl<'a> Game<'a> {
    /// Loads the profile and draws random starting reels.
    pub fn new(
        params: EngineParams,
        store: &'a dyn ProfileStore,
        rng: &'a mut dyn RandomSource,
        pacing: Pacing,
        default_bet: u64,
        today: String,
    ) -> Self {
        let profile = store.load(&today, &mut *rng);
        let reels = ReelState::random(&mut *rng);
        info!(
            store = %store.describe(),
            level = profile.level,
            earned = profile.earned,
            "session started"
        );
        Self {
            profile,
            reels,
            message: WELCOME.to_string(),
            params,
            store,
            rng,
            pacing,
            default_bet,
            today,
        }
    }

    pub fn run(&mut self, screen: &mut dyn Screen) -> Result<()> {
        loop {
            self.draw(screen, &self.message.clone())?;
            let Some(line) = screen.read_line(&display::prompt(self.default_bet))? else {
                debug!("input closed");
                break;
            };
            if !self.apply(Command::parse(&line, self.default_bet), screen)? {
                break;
            }
        }
        info!(earned = self.profile.earned, spent = self.profile.spent, "session ended");
        Ok(())
    }

    /// Runs one command. Returns false when the player quits.
    pub fn apply(&mut self, command: Command, screen: &mut dyn Screen) -> Result<bool> {
        match command {
            Command::Quit => return Ok(false),
            Command::Reset => {
                self.profile = Profile::new(self.today.clone());
                self.store.save(&mut self.profile);
                self.message = RESET_MESSAGE.to_string();
                info!("profile reset");
            }
            Command::Spin(bet) => self.spin(bet, screen)?,
        }
        Ok(true)
    }

    fn spin(&mut self, bet: u64, screen: &mut dyn Screen) -> Result<()> {
        let receipt = place_bet(&mut self.profile, &self.params, bet);
        self.celebrate(&receipt.level_ups, screen)?;

        let plan = plan_spin(&self.params, &mut *self.rng);
        for frame in plan.animate(self.reels) {
            self.reels = frame.reels;
            self.draw(screen, SPINNING)?;
            screen.pause(self.pacing.tick);
        }

        let outcome = resolve_spin(&mut self.profile, &self.params, self.reels.payline(), bet);
        self.celebrate(&outcome.level_ups, screen)?;
        self.message = outcome.message;
        self.store.save(&mut self.profile);
        Ok(())
    }

    fn celebrate(&self, level_ups: &[LevelUp], screen: &mut dyn Screen) -> Result<()> {
        for up in level_ups {
            info!(level = up.level, "level up");
            let banner = display::level_up_banner(up.level);
            for _ in 0..BANNER_FLASHES {
                screen.show(&banner)?;
                screen.pause(self.pacing.banner_on);
                screen.clear()?;
                screen.pause(self.pacing.banner_off);
            }
            screen.read_line(display::LEVEL_UP_ACK)?;
        }
        Ok(())
    }

    fn draw(&self, screen: &mut dyn Screen, message: &str) -> Result<()> {
        screen.show(&display::render(
            &self.reels,
            &self.profile,
            self.params.mode,
            message,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::{GameMode, MemoryStore, ScriptedRandom, Symbol};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeScreen {
        inputs: VecDeque<String>,
        frames: Vec<String>,
        prompts: Vec<String>,
        pauses: usize,
    }

    impl FakeScreen {
        fn with_inputs(inputs: &[&str]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| format!("{s}\n")).collect(),
                ..Self::default()
            }
        }
    }

    impl Screen for FakeScreen {
        fn show(&mut self, frame: &str) -> Result<()> {
            self.frames.push(frame.to_string());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }

        fn pause(&mut self, _duration: Duration) {
            self.pauses += 1;
        }

        fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            Ok(self.inputs.pop_front())
        }
    }

    #[test]
    fn huge_tick_saturates() {
        let pacing = Pacing::from_tick_ms(u64::MAX);
        assert_eq!(pacing.banner_on, Duration::from_millis(u64::MAX));
        assert_eq!(pacing.banner_off, Duration::from_millis(u64::MAX));
        let pacing = Pacing::from_tick_ms(50);
        assert_eq!(pacing.banner_on, Duration::from_millis(400));
        assert_eq!(pacing.banner_off, Duration::from_millis(200));
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("", 1), Command::Spin(1));
        assert_eq!(Command::parse("  \n", 1), Command::Spin(1));
        assert_eq!(Command::parse("25\n", 1), Command::Spin(25));
        assert_eq!(Command::parse("0", 1), Command::Spin(0));
        assert_eq!(Command::parse("-5", 1), Command::Spin(1));
        assert_eq!(Command::parse("lots", 3), Command::Spin(3));
        assert_eq!(Command::parse("99999999999999999999999", 1), Command::Spin(1));
        assert_eq!(Command::parse(" Q ", 1), Command::Quit);
        assert_eq!(Command::parse("RESET", 1), Command::Reset);
    }

    #[test]
    fn spin_then_quit_saves_each_spin() {
        let store = MemoryStore::new();
        // start reels 0,0,0; jitters 0,3,5 -> BELL, CHERRY, CHERRY
        let mut rng = ScriptedRandom::new(vec![0, 0, 0, 0, 3, 5]);
        let mut game = Game::new(
            EngineParams::default(),
            &store,
            &mut rng,
            Pacing::instant(),
            1,
            "2024-05-01".to_string(),
        );
        let mut screen = FakeScreen::with_inputs(&["", "q"]);
        game.run(&mut screen).unwrap();

        assert_eq!(game.reels.payline(), [Symbol::Bell, Symbol::Cherry, Symbol::Cherry]);
        assert_eq!(game.profile.spent, 1);
        assert_eq!(game.profile.earned, 2);
        assert_eq!(game.message, "Double! Won $2");
        // 81 animation ticks plus the two idle redraws
        assert_eq!(screen.pauses, 81);
        assert_eq!(screen.frames.len(), 83);
        let saved: Profile = reload(&store.contents().unwrap());
        assert_eq!(saved.earned, 2);
        assert_eq!(saved.high_score, 2);
    }

    fn reload(raw: &str) -> Profile {
        MemoryStore::with_contents(raw).load("2024-05-01", &mut ScriptedRandom::default())
    }

    #[test]
    fn level_up_shows_banner_and_waits() {
        let store = MemoryStore::new();
        let mut rng = ScriptedRandom::new(vec![0]);
        let mut game = Game::new(
            EngineParams::default(),
            &store,
            &mut rng,
            Pacing::instant(),
            1,
            "2024-05-01".to_string(),
        );
        let mut screen = FakeScreen::with_inputs(&["10", "", "q"]);
        game.run(&mut screen).unwrap();
        assert_eq!(game.profile.level, 2);
        let banners = screen
            .frames
            .iter()
            .filter(|f| f.contains("You reached Level 2"))
            .count();
        assert_eq!(banners, BANNER_FLASHES);
        assert!(screen.prompts.iter().any(|p| p == display::LEVEL_UP_ACK));
    }

    #[test]
    fn reset_wipes_and_persists() {
        let store = MemoryStore::with_contents(
            r#"{"spent": 50, "earned": 80, "high_score": 90, "level": 4, "last_date": "2024-05-01"}"#,
        );
        let mut rng = ScriptedRandom::default();
        let mut game = Game::new(
            EngineParams::default(),
            &store,
            &mut rng,
            Pacing::instant(),
            1,
            "2024-05-01".to_string(),
        );
        assert_eq!(game.profile.level, 4);
        let mut screen = FakeScreen::default();
        assert!(game.apply(Command::Reset, &mut screen).unwrap());
        assert_eq!(game.profile, Profile::new("2024-05-01"));
        let stored = reload(&store.contents().unwrap());
        assert_eq!(stored.high_score, 0);
        assert!(!game.apply(Command::Quit, &mut screen).unwrap());
    }

    #[test]
    fn classic_mode_has_no_xp() {
        let store = MemoryStore::new();
        let mut rng = ScriptedRandom::new(vec![1, 2, 3]);
        let mut game = Game::new(
            EngineParams::new(GameMode::Classic),
            &store,
            &mut rng,
            Pacing::instant(),
            5,
            "2024-05-01".to_string(),
        );
        let mut screen = FakeScreen::with_inputs(&["", "", "q"]);
        game.run(&mut screen).unwrap();
        assert_eq!(game.profile.spent, 10);
        assert_eq!((game.profile.level, game.profile.xp), (1, 0));
        assert!(screen.prompts[0].contains("Spin $5"));
    }

    #[test]
    fn end_of_input_quits() {
        let store = MemoryStore::new();
        let mut rng = ScriptedRandom::default();
        let mut game = Game::new(
            EngineParams::default(),
            &store,
            &mut rng,
            Pacing::instant(),
            1,
            "2024-05-01".to_string(),
        );
        let mut screen = FakeScreen::default();
        game.run(&mut screen).unwrap();
        assert_eq!(screen.frames.len(), 1);
        assert!(store.contents().is_none());
    }
}
