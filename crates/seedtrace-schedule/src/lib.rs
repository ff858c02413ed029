//! SeedTrace Schedule Projector
//!
//! Places cultivation and compliance work on calendar days:
//! - Expected harvest, transplant and drying-check dates from plant and harvest records
//! - Audit, inspection and deadline rows from a configurable catalogue
//! - Day grouping, rolling N-day windows and Sunday-first month grids
//!
//! Every entry point takes its reference time and time zone explicitly; nothing
//! here reads the clock.
//!
//! # Example
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use seedtrace_schedule::{project_cultivation_events, Plant, ScheduleKind};
//!
//! let plant = Plant::new("P-1", "2025-01-01T00:00:00Z").with_strain("Blue Dream");
//! let events = project_cultivation_events(&[plant], &[], &Utc);
//!
//! let harvest = events.iter().find(|e| e.kind == ScheduleKind::Harvest).unwrap();
//! assert_eq!(harvest.date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod audit;
pub mod calendar;
pub mod config;
pub mod error;
pub mod projector;
pub mod records;
pub mod types;

// Re-exports for convenience
pub use audit::{place_catalogue, AuditItem, AUDIT_CATALOGUE};
pub use calendar::{
    group_by_date, window_events, DayBucket, Dated, FeedEvent, GridCell, MonthGrid, MAX_WINDOW_DAYS,
};
pub use config::{
    ProjectorConfig, DEFAULT_DRYING_CHECK_OFFSET_DAYS, DEFAULT_HARVEST_OFFSET_DAYS,
    DEFAULT_TRANSPLANT_OFFSET_DAYS,
};
pub use error::{ConfigError, Result};
pub use projector::{project_audit_calendar, project_cultivation_events, ScheduleProjector};
pub use records::{Harvest, HarvestStatus, Plant};
pub use types::{ScheduleKind, ScheduledEvent};

pub use seedtrace_core::DayKey;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for calendar projection
    pub use crate::{
        group_by_date, project_audit_calendar, project_cultivation_events, window_events,
        Harvest, MonthGrid, Plant, ProjectorConfig, ScheduleKind, ScheduleProjector,
        ScheduledEvent,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
