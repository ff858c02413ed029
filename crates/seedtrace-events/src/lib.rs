//! SeedTrace Event Classifier
//!
//! Turns raw lifecycle events into display-ready history rows:
//! - Parses loosely-typed JSON into a [`DomainEvent`] tagged union (never fails)
//! - Derives category, origin, responsible party and time key ([`classify`])
//! - Sorts, filters and partitions history rows
//! - Measures lab turnaround from submission/certificate pairs
//!
//! # Example
//!
//! ```rust
//! use seedtrace_events::{classify, Category, DomainEvent};
//! use serde_json::json;
//!
//! let event = DomainEvent::from_value(json!({
//!     "type": "transfer",
//!     "batchId": "B-1001",
//!     "to": "Downtown Retail",
//!     "transferredBy": "Sam Ortiz",
//!     "transferredAt": "2025-01-05T10:00:00Z"
//! }));
//!
//! let row = classify(&event);
//! assert_eq!(row.category, Category::Operator);
//! assert_eq!(row.origin, "Retail: Downtown Retail");
//! assert_eq!(row.responsible, "sam_ortiz");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod classify;
pub mod event;
pub mod history;
pub mod kind;
pub mod turnaround;
pub mod username;

// Re-exports for convenience
pub use classify::{
    classify, normalized_label, rule_for, time_key, Category, ClassificationRule,
    EventClassification, OriginRule, CLASSIFICATION_TABLE, PLACEHOLDER,
};
pub use event::{
    parse_events, CultivationStep, DomainEvent, DryingRecord, EventFields, EventRecord,
    LicensingRecord, TransferRecord, UnknownEvent,
};
pub use history::{
    history, partition_by_category, sort_by_time_desc, CategoryPartition, HistoryEntry,
    HistoryFilter,
};
pub use kind::{EventKind, Field};
pub use turnaround::{average_hours, lab_turnaround, Turnaround};
pub use username::{normalize_username, resolve_username, DiscriminatorSource};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with lifecycle events
    pub use crate::{
        classify, history, parse_events, Category, DomainEvent, EventClassification, EventKind,
        HistoryEntry, HistoryFilter,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
