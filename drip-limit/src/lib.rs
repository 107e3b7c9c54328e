//! # drip-limit
//!
//! `drip-limit` classifies a stream of discrete events (faults, failed logins,
//! flaky I/O results) as either within tolerance or anomalous, using a leaky
//! bucket.
//!
//! ## Core Philosophy
//!
//! A [`Bucket`] is an immutable snapshot. Reporting an event with
//! [`Bucket::drip_in`] returns a [`Verdict`] together with the next snapshot,
//! and the caller rebinds to it. There are no timers, callbacks or background
//! threads: the leak is reconstructed lazily from a monotonic clock reading
//! taken at each call.
//!
//! ## Key Concepts
//!
//! * **Level**: the virtual fill. Each drip adds one unit; the level leaks at
//!   `leak_rate` units per second between drips.
//! * **Capacity**: levels at or below it are `Normal`, anything above is
//!   `Overflow`. Overflow is transient; the bucket keeps working.
//! * **Injectable Time**: every bucket reads a [`quanta::Clock`], so tests can
//!   use [`quanta::Clock::mock`] instead of sleeping.
//!
//! What to do on overflow, and how to store buckets per source, is left to
//! the caller.
//!
//! ## Example
//!
//! ```rust
//! use drip_limit::Bucket;
//! use drip_limit::Verdict;
//!
//! let mut bucket = Bucket::new(3.0, 1.0).unwrap();
//!
//! for attempt in 0..5 {
//!     let (verdict, next) = bucket.drip_in();
//!     bucket = next;
//!     if verdict == Verdict::Overflow {
//!         println!("attempt {attempt}: too many faults, giving up");
//!         break;
//!     }
//! }
//! ```

mod bucket;
mod config;
mod error;

pub use bucket::Bucket;
pub use bucket::Verdict;
pub use config::BucketConfig;
pub use config::DEFAULT_CAPACITY;
pub use config::DEFAULT_LEAK_RATE;
pub use error::DripError;
