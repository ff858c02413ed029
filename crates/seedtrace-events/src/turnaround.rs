//! Lab turnaround time (TAT)
//!
//! Pairs each `lab-submission` with the first later `coa-issued` for the same
//! batch. Each certificate closes at most one submission.

use crate::classify::time_key;
use crate::event::DomainEvent;
use crate::kind::{EventKind, Field};
use chrono::{DateTime, TimeZone, Utc};
use seedtrace_core::parse_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Turnaround of one lab submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turnaround {
    /// Batch under test (`None` when the submission names none)
    pub batch_id: Option<String>,
    /// Testing lab
    pub lab: Option<String>,
    /// When the sample was submitted
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the certificate of analysis was issued
    pub issued_at: Option<DateTime<Utc>>,
}

impl Turnaround {
    /// Whether the certificate is still outstanding
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.issued_at.is_none()
    }

    /// Elapsed hours from submission to certificate
    #[must_use]
    pub fn hours(&self) -> Option<f64> {
        let submitted = self.submitted_at?;
        let issued = self.issued_at?;
        #[allow(clippy::cast_precision_loss)]
        let minutes = (issued - submitted).num_minutes() as f64;
        Some(minutes / 60.0)
    }
}

struct Certificate<'a> {
    batch_id: &'a str,
    issued_at: DateTime<Utc>,
}

/// Instant of `field`, falling back to the event's time key
fn instant(event: &DomainEvent, field: Field) -> Option<DateTime<Utc>> {
    event
        .field(field)
        .and_then(parse_timestamp)
        .or_else(|| time_key(event).and_then(|millis| Utc.timestamp_millis_opt(millis).single()))
}

/// Compute turnaround for every submission in `events`
///
/// Results follow submission order in the input. Undated submissions, and
/// submissions without a batch, are reported as pending.
#[must_use]
pub fn lab_turnaround(events: &[DomainEvent]) -> Vec<Turnaround> {
    let mut certificates: Vec<Certificate<'_>> = events
        .iter()
        .filter(|e| e.kind() == Some(EventKind::CoaIssued))
        .filter_map(|e| {
            Some(Certificate {
                batch_id: e.batch_id()?,
                issued_at: instant(e, Field::IssuedAt)?,
            })
        })
        .collect();
    certificates.sort_by_key(|c| c.issued_at);

    let mut used: HashSet<usize> = HashSet::new();
    let results: Vec<Turnaround> = events
        .iter()
        .filter(|e| e.kind() == Some(EventKind::LabSubmission))
        .map(|submission| {
            let batch_id = submission.batch_id();
            let submitted_at = instant(submission, Field::SubmittedAt);

            let issued_at = match (batch_id, submitted_at) {
                (Some(batch), Some(submitted)) => certificates
                    .iter()
                    .enumerate()
                    .find(|(idx, c)| {
                        !used.contains(idx) && c.batch_id == batch && c.issued_at >= submitted
                    })
                    .map(|(idx, c)| {
                        used.insert(idx);
                        c.issued_at
                    }),
                _ => None,
            };

            Turnaround {
                batch_id: batch_id.map(str::to_string),
                lab: submission.field(Field::Lab).map(str::to_string),
                submitted_at,
                issued_at,
            }
        })
        .collect();

    tracing::debug!(
        "Lab turnaround: {} submissions, {} pending",
        results.len(),
        results.iter().filter(|t| t.is_pending()).count()
    );
    results
}

/// Mean turnaround in hours over completed submissions
#[must_use]
pub fn average_hours(turnarounds: &[Turnaround]) -> Option<f64> {
    let completed: Vec<f64> = turnarounds.iter().filter_map(Turnaround::hours).collect();
    if completed.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = completed.len() as f64;
    Some(completed.iter().sum::<f64>() / count)
}
