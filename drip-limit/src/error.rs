use crate::Bucket;

/// Errors produced by bucket construction and the strict drip-in.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DripError {
    /// A tuning parameter was zero, negative, NaN or infinite.
    ///
    /// Only raised when a bucket is constructed, never by a drip-in.
    #[error("invalid bucket parameter `{name}`: {value} (must be positive and finite)")]
    InvalidParameter {
        /// The rejected parameter, `capacity` or `leak_rate`.
        name: &'static str,
        /// The value that was supplied.
        value: f64,
    },

    /// A strict drip-in pushed the level above capacity.
    ///
    /// The post-drip bucket is carried along: an overflowed bucket keeps
    /// decaying and accepting drips, so the caller can recover it with
    /// [`DripError::into_bucket`] and keep threading it.
    #[error(
        "bucket overflowed: level {} exceeds capacity {}",
        .bucket.level(),
        .bucket.capacity()
    )]
    Overflow {
        /// The bucket state after the overflowing drip.
        bucket: Box<Bucket>,
    },
}

impl DripError {
    /// Recover the post-drip bucket from an `Overflow`.
    ///
    /// Returns `None` for `InvalidParameter`, which never has a bucket.
    pub fn into_bucket(self) -> Option<Bucket> {
        match self {
            Self::Overflow { bucket } => Some(*bucket),
            Self::InvalidParameter { .. } => None,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}
