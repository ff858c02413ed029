//! Audit and compliance calendar
//!
//! A catalogue of rows, each placed `offset_days` after the reference day.

use crate::types::{ScheduleKind, ScheduledEvent};
use seedtrace_core::shift_days;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One catalogue row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditItem {
    /// Days after the reference day (negative for overdue items)
    pub offset_days: i64,
    pub kind: ScheduleKind,
    pub label: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<Cow<'static, str>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Cow<'static, str>>,
}

impl AuditItem {
    /// Create row
    #[must_use]
    pub fn new(offset_days: i64, kind: ScheduleKind, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            offset_days,
            kind,
            label: label.into(),
            href: None,
            description: None,
        }
    }

    /// Set link
    #[must_use]
    pub fn with_href(mut self, href: impl Into<Cow<'static, str>>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Place this row relative to `reference_day`
    ///
    /// `None` when the offset leaves the representable calendar.
    #[must_use]
    pub fn place(&self, reference_day: chrono::NaiveDate) -> Option<ScheduledEvent> {
        let date = shift_days(reference_day, self.offset_days)?;

        let mut event = ScheduledEvent::new(date, self.label.to_string(), self.kind);
        event.href = self.href.as_deref().map(str::to_string);
        event.description = self.description.as_deref().map(str::to_string);
        Some(event)
    }
}

const fn row(
    offset_days: i64,
    kind: ScheduleKind,
    label: &'static str,
    href: Option<&'static str>,
    description: Option<&'static str>,
) -> AuditItem {
    AuditItem {
        offset_days,
        kind,
        label: Cow::Borrowed(label),
        href: match href {
            Some(h) => Some(Cow::Borrowed(h)),
            None => None,
        },
        description: match description {
            Some(d) => Some(Cow::Borrowed(d)),
            None => None,
        },
    }
}

/// Default compliance calendar
pub static AUDIT_CATALOGUE: &[AuditItem] = &[
    row(
        -3,
        ScheduleKind::FollowUp,
        "Follow-up: security camera remediation",
        Some("/compliance/findings"),
        Some("Confirm camera coverage of the vault entrance was restored"),
    ),
    row(
        0,
        ScheduleKind::ComplianceReview,
        "Compliance review: weekly inventory reconciliation",
        Some("/compliance/inventory"),
        None,
    ),
    row(
        2,
        ScheduleKind::Audit,
        "Quarterly audit: Green Valley Farms",
        Some("/audits"),
        Some("State auditor on site; have seed-to-sale records ready"),
    ),
    row(
        5,
        ScheduleKind::Inspection,
        "Site inspection: North Processing",
        Some("/inspections"),
        None,
    ),
    row(
        7,
        ScheduleKind::CapDeadline,
        "CAP deadline: pesticide storage",
        Some("/compliance/caps"),
        Some("Corrective action plan for finding F-2291 is due"),
    ),
    row(
        9,
        ScheduleKind::ReportDeadline,
        "Monthly compliance report due",
        Some("/reports"),
        None,
    ),
    row(
        12,
        ScheduleKind::LicenseRenewal,
        "License renewal due: Harbor Retail",
        Some("/licensing"),
        Some("Renewal packet and fee must be filed before expiry"),
    ),
    row(
        16,
        ScheduleKind::FollowUp,
        "Follow-up inspection: North Processing",
        Some("/inspections"),
        None,
    ),
    row(
        21,
        ScheduleKind::Audit,
        "Lab proficiency audit: Acme Labs",
        Some("/labs"),
        None,
    ),
    row(
        25,
        ScheduleKind::CapDeadline,
        "CAP deadline: record keeping",
        Some("/compliance/caps"),
        None,
    ),
    row(
        28,
        ScheduleKind::ComplianceReview,
        "Compliance review: transport manifests",
        Some("/compliance/transfers"),
        None,
    ),
    row(
        30,
        ScheduleKind::LicenseRenewal,
        "License renewal due: Sunrise Cultivation",
        Some("/licensing"),
        None,
    ),
    row(
        35,
        ScheduleKind::ReportDeadline,
        "Quarterly report deadline",
        Some("/reports"),
        Some("Submit quarterly production and sales totals"),
    ),
];

/// Place every catalogue row relative to `reference_day`
#[must_use]
pub fn place_catalogue(catalogue: &[AuditItem], reference_day: chrono::NaiveDate) -> Vec<ScheduledEvent> {
    catalogue
        .iter()
        .filter_map(|item| item.place(reference_day))
        .collect()
}
