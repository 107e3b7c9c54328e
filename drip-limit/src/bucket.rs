use std::ops::ControlFlow;
use std::time::Duration;

use quanta::Clock;
use quanta::Instant;

use crate::BucketConfig;
use crate::DripError;

/// Weight contributed by a single drip, and the lowest level a bucket
/// reports straight after one.
const UNIT: f64 = 1.0;

/// Classification of a single drip-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The level after the drip is at or below capacity.
    Normal,
    /// The level after the drip exceeds capacity.
    Overflow,
}

impl Verdict {
    pub fn is_normal(self) -> bool {
        self == Verdict::Normal
    }

    pub fn is_overflow(self) -> bool {
        self == Verdict::Overflow
    }
}

impl From<Verdict> for ControlFlow<()> {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Normal => ControlFlow::Continue(()),
            Verdict::Overflow => ControlFlow::Break(()),
        }
    }
}

/// A leaky bucket snapshot.
///
/// A `Bucket` is never mutated. Every drip-in returns a new value and the
/// caller rebinds to it, so an old snapshot stays valid for inspection.
/// The `level` is only authoritative at the instant recorded in
/// [`Bucket::last_drip`]; anything later has to account for the leak.
#[derive(Debug, Clone)]
pub struct Bucket {
    level: f64,
    config: BucketConfig,
    /// When `level` was last correct.
    last_drip: Instant,
    clock: Clock,
}

impl Default for Bucket {
    /// An empty bucket with capacity 10 leaking 1 unit per second.
    fn default() -> Self {
        let clock = Clock::new();
        Self {
            level: 0.0,
            config: BucketConfig::default(),
            last_drip: clock.now(),
            clock,
        }
    }
}

impl Bucket {
    /// Creates an empty bucket backed by the system monotonic clock.
    ///
    /// # Errors
    ///
    /// Returns `DripError::InvalidParameter` if either argument is not
    /// positive and finite.
    pub fn new(capacity: f64, leak_rate: f64) -> Result<Self, DripError> {
        Self::with_clock(capacity, leak_rate, Clock::new())
    }

    /// Creates an empty bucket reading time from `clock`.
    ///
    /// Pass the clock half of [`Clock::mock`] to control elapsed time.
    pub fn with_clock(capacity: f64, leak_rate: f64, clock: Clock) -> Result<Self, DripError> {
        Self::from_config_with_clock(BucketConfig::new(capacity, leak_rate), clock)
    }

    pub fn from_config(config: BucketConfig) -> Result<Self, DripError> {
        Self::from_config_with_clock(config, Clock::new())
    }

    pub fn from_config_with_clock(config: BucketConfig, clock: Clock) -> Result<Self, DripError> {
        config.validate()?;
        Ok(Self {
            level: 0.0,
            config,
            last_drip: clock.now(),
            clock,
        })
    }

    /// Derives an empty bucket with this bucket's tuning and clock.
    ///
    /// `self` is left untouched, so an overflowed bucket can be kept around
    /// while a fresh one takes over.
    pub fn reset(&self) -> Result<Self, DripError> {
        let fresh = Self::from_config_with_clock(self.config, self.clock.clone())?;
        tracing::debug!(
            previous = self.level,
            capacity = self.config.capacity,
            leak_rate = self.config.leak_rate,
            "bucket reset"
        );
        Ok(fresh)
    }

    /// Registers one event against the bucket.
    ///
    /// The level leaks for the time elapsed since the last drip, one unit is
    /// added, and the result is clamped to at least one unit. The verdict is
    /// `Overflow` if the new level exceeds capacity. An overflowed bucket is
    /// still usable: it keeps leaking and accepting drips.
    pub fn drip_in(&self) -> (Verdict, Bucket) {
        let now = self.clock.now();
        let elapsed = self.elapsed_until(now);
        let level = self.level_after(elapsed);

        let verdict = if level <= self.config.capacity {
            Verdict::Normal
        } else {
            Verdict::Overflow
        };

        tracing::trace!(previous = self.level, ?elapsed, level, ?verdict, "drip");
        if verdict.is_overflow() {
            tracing::debug!(level, capacity = self.config.capacity, "bucket overflowed");
        }

        let next = Bucket {
            level,
            config: self.config,
            last_drip: now,
            clock: self.clock.clone(),
        };
        (verdict, next)
    }

    /// Like [`Bucket::drip_in`], but an overflow is an error.
    ///
    /// # Errors
    ///
    /// Returns `DripError::Overflow` holding the post-drip bucket.
    pub fn drip_in_or_fail(&self) -> Result<Bucket, DripError> {
        match self.drip_in() {
            (Verdict::Normal, next) => Ok(next),
            (Verdict::Overflow, next) => Err(DripError::Overflow {
                bucket: Box::new(next),
            }),
        }
    }

    /// The level this bucket would hold right now, before any unit is added.
    pub fn decayed_level(&self) -> f64 {
        let elapsed = self.elapsed_until(self.clock.now());
        (self.level - self.drained_over(elapsed)).max(0.0)
    }

    /// How long to wait before the next drip-in would be `Normal`.
    ///
    /// Zero if a drip right now would be accepted. A drip-in made after
    /// waiting at least this long is `Normal`. A bucket whose capacity is
    /// below one unit overflows on every drip, so it reports `Duration::MAX`.
    pub fn retry_after(&self) -> Duration {
        let capacity = self.config.capacity;
        if capacity < UNIT {
            return Duration::MAX;
        }

        let elapsed = self.elapsed_until(self.clock.now());
        let excess = self.level_after(elapsed) - capacity;
        if excess <= 0.0 {
            return Duration::ZERO;
        }

        let nanos = (excess / self.config.leak_rate * 1e9).ceil();
        if nanos >= u64::MAX as f64 {
            return Duration::MAX;
        }
        let mut wait = Duration::from_nanos(nanos as u64);

        // The estimate can still land a rounding error short of capacity, so
        // check it against the drip-in arithmetic and widen until it holds.
        let mut step = Duration::from_nanos(1);
        for _ in 0..u64::BITS {
            match elapsed.checked_add(wait) {
                Some(total) if self.level_after(total) <= capacity => return wait,
                Some(_) => {}
                None => break,
            }
            wait = wait.saturating_add(step);
            step = step.saturating_mul(2);
        }
        Duration::MAX
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn capacity(&self) -> f64 {
        self.config.capacity
    }

    pub fn leak_rate(&self) -> f64 {
        self.config.leak_rate
    }

    pub fn config(&self) -> BucketConfig {
        self.config
    }

    pub fn last_drip(&self) -> Instant {
        self.last_drip
    }

    /// Time since the last drip.
    ///
    /// A clock that has gone backwards counts as no time having passed, so
    /// regression can never raise the level.
    fn elapsed_until(&self, now: Instant) -> Duration {
        match now.checked_duration_since(self.last_drip) {
            Some(elapsed) => elapsed,
            None => {
                tracing::warn!(
                    behind = ?self.last_drip.duration_since(now),
                    "monotonic clock ran backwards, treating as no elapsed time"
                );
                Duration::ZERO
            }
        }
    }

    fn drained_over(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() * self.config.leak_rate
    }

    /// Level after one drip landing `elapsed` after the last one.
    fn level_after(&self, elapsed: Duration) -> f64 {
        (self.level - self.drained_over(elapsed) + UNIT).max(UNIT)
    }
}
