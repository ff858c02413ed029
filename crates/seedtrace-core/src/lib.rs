//! SeedTrace Core
//!
//! Shared building blocks for the event classifier and the schedule projector.
//!
//! # Core Concepts
//!
//! - [`parse_timestamp`]: Lenient timestamp parsing (RFC 3339, naive, date-only, epoch millis)
//! - [`DayKey`]: ISO `YYYY-MM-DD` calendar-day key used for every day-bucketed view
//! - [`serde_helpers`]: Deserializers that never fail on loosely-typed JSON fields
//!
//! # Example
//!
//! ```rust
//! use seedtrace_core::{parse_timestamp, DayKey};
//!
//! let instant = parse_timestamp("2025-01-01T00:00:00Z").unwrap();
//! let key = DayKey::from_instant(&instant, &chrono::Utc);
//! assert_eq!(key.to_string(), "2025-01-01");
//! ```

#![warn(unreachable_pub)]

mod time;

pub mod serde_helpers;

pub use time::{
    epoch_millis, parse_day, parse_timestamp, shift_days, truncate_to_day, DayKey, DayKeyError,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
