use serde::Deserialize;
use serde::Serialize;

use crate::DripError;

/// Overflow threshold used when none is given.
pub const DEFAULT_CAPACITY: f64 = 10.0;
/// Leak rate, in units per second, used when none is given.
pub const DEFAULT_LEAK_RATE: f64 = 1.0;

/// Tuning parameters for a [`Bucket`](crate::Bucket).
///
/// Fields missing from a deserialised config take their defaults, so a host
/// application can embed this in its own configuration and only override what
/// it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    pub(crate) capacity: f64,
    pub(crate) leak_rate: f64,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            leak_rate: DEFAULT_LEAK_RATE,
        }
    }
}

impl BucketConfig {
    /// Creates a new `BucketConfig`.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The fill level above which drips are classified as overflow.
    /// * `leak_rate` - How many units drain out of the bucket per second.
    pub fn new(capacity: f64, leak_rate: f64) -> Self {
        Self {
            capacity,
            leak_rate,
        }
    }

    /// Builder-style: set the overflow threshold.
    pub fn capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style: set the leak rate in units per second.
    pub fn leak_rate(mut self, leak_rate: f64) -> Self {
        self.leak_rate = leak_rate;
        self
    }

    /// Check that both parameters are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns `DripError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<(), DripError> {
        check_positive("capacity", self.capacity)?;
        check_positive("leak_rate", self.leak_rate)?;
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), DripError> {
    // NaN fails the comparison, infinity fails is_finite
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DripError::InvalidParameter { name, value })
    }
}
