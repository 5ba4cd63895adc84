//! Seeded integer streams.
//!
//! A seed is a single-use stream: every draw advances it, and reproducing a
//! value requires replaying the same draws in the same order from the same
//! starting seed. Independent consumers must derive their own seed with
//! [`derive_seed`] instead of sharing one stream.

use rand::RngCore;

const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;

/// Advances `seed` one linear-congruential step and returns the high 32 bits
pub fn next_int(seed: &mut u64) -> u32 {
    *seed = seed
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
    (*seed >> 32) as u32
}

/// Advances `seed` and maps the draw into `[0, 1)`
pub fn next_float(seed: &mut u64) -> f64 {
    f64::from(next_int(seed)) / 4_294_967_296.0
}

/// SplitMix64 finalizer; a bijective avalanche over `u64`
pub fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives an independent seed from a parent seed and a salt
pub fn derive_seed(seed: u64, salt: u64) -> u64 {
    mix(seed ^ mix(salt))
}

/// Owned stream over [`next_int`], usable anywhere a `rand::Rng` is expected
///
/// # Example
/// ```
/// use celestial::seed::SeedStream;
/// use rand::Rng;
///
/// let mut a = SeedStream::new(42);
/// let mut b = SeedStream::new(42);
/// let x: f64 = a.random();
/// assert_eq!(x, b.random::<f64>());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedStream {
    state: u64,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Current state; feeding it to [`SeedStream::new`] resumes the stream
    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn next_int(&mut self) -> u32 {
        next_int(&mut self.state)
    }

    pub fn next_float(&mut self) -> f64 {
        next_float(&mut self.state)
    }
}

impl RngCore for SeedStream {
    fn next_u32(&mut self) -> u32 {
        self.next_int()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_int());
        let low = u64::from(self.next_int());
        high << 32 | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_int().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
