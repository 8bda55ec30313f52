//! Core data types for Ermine property-based testing.

use std::fmt;

/// Size parameter for controlling test data generation.
///
/// Size ranges from 0 to 100, where larger values allow more
/// extreme generated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Size(pub usize);

impl Size {
    /// Create a new size value.
    pub fn new(value: usize) -> Self {
        Size(value)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Whether this size lies inside the valid [0, 100] window.
    pub fn in_bounds(&self) -> bool {
        self.0 <= 100
    }

    /// Clamp size to a maximum value.
    pub fn clamp(&self, max: usize) -> Self {
        Size(self.0.min(max))
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size(value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

/// Splittable random seed for deterministic test generation.
///
/// A seed is an immutable SplitMix64 state plus its odd gamma increment,
/// retaining the integer it was created from. Every operation returns new
/// seed values; nothing is ever mutated in place, so seeds can be threaded
/// through generators freely without aliasing concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    origin: u64,
    state: u64,
    gamma: u64,
}

impl Seed {
    /// Create a seed deterministically from an integer.
    pub fn create(origin: u64) -> Self {
        let state = splitmix64_mix(origin);
        let gamma = mix_gamma(state);
        Seed {
            origin,
            state,
            gamma,
        }
    }

    /// Create a seed from a non-deterministic source.
    pub fn spawn() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed::create(rng.gen())
    }

    /// The integer this seed was created from, for display and
    /// reproduction via [`Seed::create`].
    ///
    /// Note this identifies the origin only; it does not encode the
    /// stream position reached after splits.
    pub fn value_of(&self) -> u64 {
        self.origin
    }

    /// Draw an integer uniformly from the inclusive range `[min, max]`.
    ///
    /// This is a pure function of the seed state and the bounds: calling
    /// it twice with the same seed and bounds yields the same value. Use
    /// [`Seed::split`] or [`Seed::stream`] to obtain further draws.
    pub fn next_int(&self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let word = splitmix64_mix(self.state.wrapping_add(self.gamma));
        let span = (hi as i128 - lo as i128) as u128 + 1;
        if span > u64::MAX as u128 {
            // Full 64-bit span: every word maps directly.
            return word as i64;
        }
        let offset = ((word as u128 * span) >> 64) as i128;
        (lo as i128 + offset) as i64
    }

    /// Split a seed into two independent seeds.
    ///
    /// Splitting is deterministic: the same input seed always produces the
    /// same two outputs, and the two halves are disjoint random streams.
    pub fn split(&self) -> (Self, Self) {
        let state = self.state.wrapping_add(self.gamma);
        let output = splitmix64_mix(state);
        let gamma = mix_gamma(output);
        (
            Seed {
                origin: self.origin,
                state,
                gamma: self.gamma,
            },
            Seed {
                origin: self.origin,
                state: output,
                gamma,
            },
        )
    }

    /// An infinite stream of independent seeds.
    ///
    /// Repeatedly splits, yielding the left half and retaining the right
    /// half as the next state. Used wherever an unbounded number of draws
    /// is needed, such as generator retry streams.
    pub fn stream(self) -> SeedStream {
        SeedStream { next: self }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.origin)
    }
}

/// Infinite iterator of independent seeds derived by repeated splitting.
#[derive(Debug, Clone, Copy)]
pub struct SeedStream {
    next: Seed,
}

impl Iterator for SeedStream {
    type Item = Seed;

    fn next(&mut self) -> Option<Seed> {
        let (left, right) = self.next.split();
        self.next = right;
        Some(left)
    }
}

/// Configuration for a property run.
#[derive(Debug, Clone)]
pub struct PropertyConfig {
    /// Number of iterations to run; must be positive.
    pub iterations: u64,

    /// The run seed; the sole source of randomness for the whole run.
    pub seed: Seed,

    /// Explicit size held constant across iterations. When absent the
    /// runner derives a size schedule from the iteration count.
    pub size: Option<Size>,

    /// Replay path: skip the search and navigate straight to a
    /// previously recorded counterexample.
    pub shrink_path: Option<Vec<usize>>,

    /// Maximum discards tolerated per iteration before reporting
    /// exhaustion.
    pub discard_limit: usize,

    /// Maximum shrink candidates examined during minimization.
    pub shrink_limit: usize,
}

impl PropertyConfig {
    /// Create a config with default limits for the given seed.
    pub fn new(seed: Seed) -> Self {
        PropertyConfig {
            iterations: 100,
            seed,
            size: None,
            shrink_path: None,
            discard_limit: 100,
            shrink_limit: 1000,
        }
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Hold an explicit size constant across all iterations.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Replay a previously recorded shrink path.
    pub fn with_shrink_path(mut self, path: Vec<usize>) -> Self {
        self.shrink_path = Some(path);
        self
    }

    /// Set the per-iteration discard limit.
    pub fn with_discards(mut self, limit: usize) -> Self {
        self.discard_limit = limit;
        self
    }

    /// Set the shrink-candidate examination limit.
    pub fn with_shrinks(mut self, limit: usize) -> Self {
        self.shrink_limit = limit;
        self
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
