use reelbox_core::{spin_once, EngineParams, Profile, ReelState, SeededRandom};

fn main() {
    // Example: a thousand seeded spins at bet 1 and the resulting return
    let mut rng = SeededRandom::new("example-seed");
    let params = EngineParams::default();
    let mut profile = Profile::new("2024-01-01");
    let mut reels = ReelState::random(&mut rng);
    let mut jackpots = 0u32;
    for _ in 0..1000 {
        let outcome = spin_once(&mut profile, &params, &mut reels, 1, &mut rng);
        if matches!(outcome.payout.outcome, reelbox_core::Outcome::Jackpot(_)) {
            jackpots += 1;
        }
    }
    println!(
        "seed_hash={} spent={} earned={} rtp={:.3} jackpots={} level={}",
        rng.seed_hash_hex(),
        profile.spent,
        profile.earned,
        profile.earned as f64 / profile.spent as f64,
        jackpots,
        profile.level
    );
}
