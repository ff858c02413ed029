//! Testing utilities for SeedTrace workspace
//!
//! Shared fixtures: a full batch lifecycle, licensing history, plants and harvests.

#![allow(missing_docs)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use seedtrace_events::DomainEvent;
use seedtrace_schedule::{Harvest, HarvestStatus, Plant};
use serde_json::{json, Value};

pub fn event(value: Value) -> DomainEvent {
    DomainEvent::from_value(value)
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Licence application through issue, renewal and amendment
pub fn licensing_values() -> Vec<Value> {
    vec![
        json!({"type": "application-submitted", "licenceId": "LIC-20A7", "receivedAt": "2024-11-02T09:00:00Z"}),
        json!({"type": "fee-payment", "licenceId": "LIC-20A7", "receivedAt": "2024-11-03T10:30:00Z"}),
        json!({"type": "license-issued", "licenceId": "LIC-20A7", "issuedAt": "2024-12-01T12:00:00Z"}),
        json!({"type": "license-renewed", "licenceId": "LIC-20A7", "renewedAt": "2025-11-28T08:00:00Z"}),
        json!({"type": "license-amended", "licenceId": "LIC-20A7", "amendedAt": "2025-02-14T16:45:00Z"}),
    ]
}

/// Seed intake through retail transfer for batch `B-1001`
pub fn lifecycle_values() -> Vec<Value> {
    vec![
        json!({"type": "seed-received", "batchId": "B-1001", "supplier": "Pacific Seed Co", "receivedAt": "2025-01-02T08:00:00Z"}),
        json!({"type": "germination", "batchId": "B-1001", "by": "Maria Lopez", "startedAt": "2025-01-03T09:00:00Z"}),
        json!({"type": "transplant", "batchId": "B-1001", "by": "Maria Lopez", "to": "Greenhouse A", "startedAt": "2025-01-17T09:00:00Z"}),
        json!({"type": "flip-to-flower", "batchId": "B-1001", "inspector": "Dana Reyes", "startedAt": "2025-02-10T09:00:00Z"}),
        json!({"type": "harvest", "batchId": "B-1001", "by": "Maria Lopez", "harvestedAt": "2025-03-04T07:30:00Z"}),
        json!({"type": "drying", "batchId": "B-1001", "location": "Dry Room 2", "trimmedBy": "Alex Kim", "startedAt": "2025-03-04T12:00:00Z"}),
        json!({"type": "lab-submission", "batchId": "B-1001", "lab": "Acme Labs", "submittedBy": "Alex Kim", "submittedAt": "2025-03-12T10:00:00Z"}),
        json!({"type": "coa-issued", "batchId": "B-1001", "lab": "Acme Labs", "issuedAt": "2025-03-15T16:00:00Z"}),
        json!({"type": "packaged", "batchId": "B-1001", "packagedBy": "Jordan Lee", "packagedAt": "2025-03-18T11:00:00Z"}),
        json!({"type": "transfer", "batchId": "B-1001", "to": "Downtown Retail", "transferredBy": "Sam Ortiz", "transferredAt": "2025-03-20T15:00:00Z"}),
    ]
}

pub fn licensing_events() -> Vec<DomainEvent> {
    licensing_values().into_iter().map(event).collect()
}

pub fn lifecycle_events() -> Vec<DomainEvent> {
    lifecycle_values().into_iter().map(event).collect()
}

/// Licensing and lifecycle events together, as a JSON array document
pub fn mixed_events_json() -> String {
    let mut values = licensing_values();
    values.extend(lifecycle_values());
    Value::Array(values).to_string()
}

pub fn sample_plants() -> Vec<Plant> {
    vec![
        Plant::new("P-1", "2025-01-01T00:00:00Z")
            .with_strain("Blue Dream")
            .with_location("Greenhouse A"),
        Plant::new("P-2", "2025-01-10T00:00:00Z")
            .with_strain("Sour Diesel")
            .with_location("Greenhouse B"),
        Plant::new("P-3", "2024-10-01T00:00:00Z")
            .with_strain("OG Kush")
            .with_location("Greenhouse A")
            .harvested(),
    ]
}

pub fn sample_harvests() -> Vec<Harvest> {
    vec![
        Harvest::new("H-1", HarvestStatus::Drying)
            .with_plant("P-3")
            .with_harvested_at("2025-01-01T00:00:00Z")
            .with_yield(640.0),
        Harvest::new("H-2", HarvestStatus::Dried)
            .with_plant("P-9")
            .with_harvested_at("2024-12-01T00:00:00Z")
            .with_yield(512.0),
    ]
}
