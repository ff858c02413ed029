//! Event kinds and the field vocabulary of lifecycle events

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Known lifecycle event kinds, keyed by their wire `type` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    ApplicationSubmitted,
    LicenseIssued,
    LicenseRenewed,
    LicenseAmended,
    LicenseSuspended,
    LicenseReinstated,
    FeePayment,
    SeedReceived,
    Germination,
    Transplant,
    FlipToFlower,
    Harvest,
    Drying,
    LabSubmission,
    CoaIssued,
    Packaged,
    Transfer,
}

impl EventKind {
    /// Every known kind, in pipeline order
    pub const ALL: [EventKind; 17] = [
        Self::ApplicationSubmitted,
        Self::LicenseIssued,
        Self::LicenseRenewed,
        Self::LicenseAmended,
        Self::LicenseSuspended,
        Self::LicenseReinstated,
        Self::FeePayment,
        Self::SeedReceived,
        Self::Germination,
        Self::Transplant,
        Self::FlipToFlower,
        Self::Harvest,
        Self::Drying,
        Self::LabSubmission,
        Self::CoaIssued,
        Self::Packaged,
        Self::Transfer,
    ];

    /// Wire `type` string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationSubmitted => "application-submitted",
            Self::LicenseIssued => "license-issued",
            Self::LicenseRenewed => "license-renewed",
            Self::LicenseAmended => "license-amended",
            Self::LicenseSuspended => "license-suspended",
            Self::LicenseReinstated => "license-reinstated",
            Self::FeePayment => "fee-payment",
            Self::SeedReceived => "seed-received",
            Self::Germination => "germination",
            Self::Transplant => "transplant",
            Self::FlipToFlower => "flip-to-flower",
            Self::Harvest => "harvest",
            Self::Drying => "drying",
            Self::LabSubmission => "lab-submission",
            Self::CoaIssued => "coa-issued",
            Self::Packaged => "packaged",
            Self::Transfer => "transfer",
        }
    }

    /// Look up a kind by its exact wire tag
    ///
    /// The British `licence-*` spelling is accepted for the licence lifecycle.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let canonical = match tag.strip_prefix("licence-") {
            Some(rest) => return Self::from_tag(&format!("license-{rest}")),
            None => tag,
        };
        Self::ALL.into_iter().find(|kind| kind.as_str() == canonical)
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named fields an event record may carry
///
/// Identifiers, actors and timestamps are readable on every kind. The
/// descriptive fields (`holder`, `to`, `from`, `location`) only on the kinds
/// that use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    LicenceId,
    BatchId,
    Holder,
    Supplier,
    Lab,
    To,
    From,
    Location,
    By,
    TrimmedBy,
    SubmittedBy,
    PackagedBy,
    TransferredBy,
    Inspector,
    ReceivedAt,
    StartedAt,
    HarvestedAt,
    SubmittedAt,
    IssuedAt,
    PackagedAt,
    TransferredAt,
    RenewedAt,
    AmendedAt,
    SuspendedAt,
    ReinstatedAt,
}

impl Field {
    /// Timestamp fields, in time-key priority order
    pub const TIMESTAMPS: [Field; 11] = [
        Self::ReceivedAt,
        Self::StartedAt,
        Self::HarvestedAt,
        Self::SubmittedAt,
        Self::IssuedAt,
        Self::PackagedAt,
        Self::TransferredAt,
        Self::RenewedAt,
        Self::AmendedAt,
        Self::SuspendedAt,
        Self::ReinstatedAt,
    ];

    /// JSON key of the field
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LicenceId => "licenceId",
            Self::BatchId => "batchId",
            Self::Holder => "holder",
            Self::Supplier => "supplier",
            Self::Lab => "lab",
            Self::To => "to",
            Self::From => "from",
            Self::Location => "location",
            Self::By => "by",
            Self::TrimmedBy => "trimmedBy",
            Self::SubmittedBy => "submittedBy",
            Self::PackagedBy => "packagedBy",
            Self::TransferredBy => "transferredBy",
            Self::Inspector => "inspector",
            Self::ReceivedAt => "receivedAt",
            Self::StartedAt => "startedAt",
            Self::HarvestedAt => "harvestedAt",
            Self::SubmittedAt => "submittedAt",
            Self::IssuedAt => "issuedAt",
            Self::PackagedAt => "packagedAt",
            Self::TransferredAt => "transferredAt",
            Self::RenewedAt => "renewedAt",
            Self::AmendedAt => "amendedAt",
            Self::SuspendedAt => "suspendedAt",
            Self::ReinstatedAt => "reinstatedAt",
        }
    }
}
