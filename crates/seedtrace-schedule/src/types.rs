//! Calendar types shared by the projectors and the calendar views

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Fixed set of calendar event kinds
///
/// Unrecognized kind strings map to [`ScheduleKind::Other`], which renders with
/// a neutral label and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    Harvest,
    Transplant,
    DryingCheck,
    Audit,
    Inspection,
    ComplianceReview,
    LicenseRenewal,
    ReportDeadline,
    FollowUp,
    CapDeadline,
    #[default]
    #[serde(other)]
    Other,
}

impl ScheduleKind {
    /// Every kind, `Other` last
    pub const ALL: [ScheduleKind; 11] = [
        Self::Harvest,
        Self::Transplant,
        Self::DryingCheck,
        Self::Audit,
        Self::Inspection,
        Self::ComplianceReview,
        Self::LicenseRenewal,
        Self::ReportDeadline,
        Self::FollowUp,
        Self::CapDeadline,
        Self::Other,
    ];

    /// Wire string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvest => "harvest",
            Self::Transplant => "transplant",
            Self::DryingCheck => "drying-check",
            Self::Audit => "audit",
            Self::Inspection => "inspection",
            Self::ComplianceReview => "compliance-review",
            Self::LicenseRenewal => "license-renewal",
            Self::ReportDeadline => "report-deadline",
            Self::FollowUp => "follow-up",
            Self::CapDeadline => "cap-deadline",
            Self::Other => "other",
        }
    }

    /// Parse a wire string, falling back to [`ScheduleKind::Other`]
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
            .unwrap_or(Self::Other)
    }

    /// Legend label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Harvest => "Expected harvest",
            Self::Transplant => "Transplant",
            Self::DryingCheck => "Drying check",
            Self::Audit => "Audit",
            Self::Inspection => "Inspection",
            Self::ComplianceReview => "Compliance review",
            Self::LicenseRenewal => "License renewal",
            Self::ReportDeadline => "Report deadline",
            Self::FollowUp => "Follow-up",
            Self::CapDeadline => "CAP deadline",
            Self::Other => "Event",
        }
    }

    /// Legend colour (CSS hex)
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Harvest => "#16a34a",
            Self::Transplant => "#65a30d",
            Self::DryingCheck => "#d97706",
            Self::Audit => "#2563eb",
            Self::Inspection => "#7c3aed",
            Self::ComplianceReview => "#0891b2",
            Self::LicenseRenewal => "#db2777",
            Self::ReportDeadline => "#dc2626",
            Self::FollowUp => "#0d9488",
            Self::CapDeadline => "#ea580c",
            Self::Other => "#6b7280",
        }
    }
}

impl Display for ScheduleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event placed on a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Calendar day (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Display label
    pub label: String,
    /// Event kind, used for colour mapping
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    /// Link to the related record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ScheduledEvent {
    /// Create event
    #[must_use]
    pub fn new(date: NaiveDate, label: impl Into<String>, kind: ScheduleKind) -> Self {
        Self {
            date,
            label: label.into(),
            kind,
            href: None,
            description: None,
        }
    }

    /// Set link
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
