use hmac::{Hmac, Mac};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Where every random decision in the game comes from: reel jitter, the
/// daily challenge draw and the starting reel positions.
pub trait RandomSource {
    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    fn next_below(&mut self, bound: u32) -> u32;

    /// Uniform value in `lo..=hi`.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_below(hi - lo + 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }
}

/// OS-seeded source used for normal play.
pub struct EntropyRandom(StdRng);

impl EntropyRandom {
    pub fn new() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.0.gen_range(0..bound)
    }
}

// Reproducible source: seed + nonce -> HMAC-SHA256 -> bytes -> floats in [0,1)

pub type HmacSha256 = Hmac<Sha256>;

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

pub fn derive_floats(hmac_bytes: &[u8], count: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(count);
    let mut buffer = hmac_bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            // stretch deterministically by hashing what we had
            buffer = Sha256::digest(&buffer).to_vec();
            i = 0;
            continue;
        }
        let chunk = &buffer[i..i + 4];
        let v = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        out.push(f64::from(v) / (f64::from(u32::MAX) + 1.0));
        i += 4;
    }
    out
}

/// Each HMAC block yields this many draws before the nonce advances.
const DRAWS_PER_BLOCK: usize = 8;

pub struct SeededRandom {
    seed: String,
    nonce: u64,
    pool: Vec<f64>,
}

impl SeededRandom {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            nonce: 0,
            pool: Vec::new(),
        }
    }

    /// Public fingerprint of the seed, safe to log.
    pub fn seed_hash_hex(&self) -> String {
        derive_hash_hex(self.seed.as_bytes())
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    fn hmac_bytes(&self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(format!("reelbox:{}", self.nonce).as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    fn next_f64(&mut self) -> f64 {
        if self.pool.is_empty() {
            let mut block = derive_floats(&self.hmac_bytes(), DRAWS_PER_BLOCK);
            block.reverse();
            self.pool = block;
            self.nonce += 1;
        }
        self.pool.pop().unwrap_or(0.0)
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let v = (self.next_f64() * f64::from(bound)).floor() as u32;
        v.min(bound - 1)
    }
}

/// Replays a fixed list of draws, cycling when it runs out. Each draw is
/// reduced modulo the requested bound.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<u32>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 || self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % bound
    }
}
