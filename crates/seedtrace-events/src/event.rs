//! Domain events as a tagged union
//!
//! Upstream feeds deliver events as JSON objects discriminated by a `type`
//! string with a bag of optional fields. Identifiers, actors and timestamps may
//! appear on any kind, so every known record carries [`EventFields`]; the
//! per-kind records add the descriptive fields only their kind uses. Anything
//! else lands in [`DomainEvent::Unknown`] so ingestion is total.

use crate::kind::{EventKind, Field};
use seedtrace_core::serde_helpers::{lenient_string, scalar_to_string};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Read access to named fields of an event record
pub trait EventRecord {
    /// Value of `field`, or `None` when the record does not carry it
    fn field(&self, field: Field) -> Option<&str>;
}

/// Identifier, actor and timestamp fields shared by every known kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    /// `type` as received when it differs from the canonical tag
    #[serde(skip)]
    pub wire_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub licence_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub trimmed_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub packaged_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub transferred_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub lab: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub harvested_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub packaged_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub transferred_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub renewed_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub amended_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub suspended_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub reinstated_at: Option<String>,
}

impl EventRecord for EventFields {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::LicenceId => self.licence_id.as_deref(),
            Field::BatchId => self.batch_id.as_deref(),
            Field::By => self.by.as_deref(),
            Field::TrimmedBy => self.trimmed_by.as_deref(),
            Field::SubmittedBy => self.submitted_by.as_deref(),
            Field::PackagedBy => self.packaged_by.as_deref(),
            Field::TransferredBy => self.transferred_by.as_deref(),
            Field::Inspector => self.inspector.as_deref(),
            Field::Lab => self.lab.as_deref(),
            Field::Supplier => self.supplier.as_deref(),
            Field::ReceivedAt => self.received_at.as_deref(),
            Field::StartedAt => self.started_at.as_deref(),
            Field::HarvestedAt => self.harvested_at.as_deref(),
            Field::SubmittedAt => self.submitted_at.as_deref(),
            Field::IssuedAt => self.issued_at.as_deref(),
            Field::PackagedAt => self.packaged_at.as_deref(),
            Field::TransferredAt => self.transferred_at.as_deref(),
            Field::RenewedAt => self.renewed_at.as_deref(),
            Field::AmendedAt => self.amended_at.as_deref(),
            Field::SuspendedAt => self.suspended_at.as_deref(),
            Field::ReinstatedAt => self.reinstated_at.as_deref(),
            _ => None,
        }
    }
}

/// Licensing lifecycle record (applications, licence actions, fees)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensingRecord {
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl EventRecord for LicensingRecord {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Holder => self.holder.as_deref(),
            _ => self.fields.field(field),
        }
    }
}

/// Farm-side cultivation step (germination through harvest)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultivationStep {
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl EventRecord for CultivationStep {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::To => self.to.as_deref(),
            Field::From => self.from.as_deref(),
            _ => self.fields.field(field),
        }
    }
}

/// Drying and trimming at a processing location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryingRecord {
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl EventRecord for DryingRecord {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Location => self.location.as_deref(),
            _ => self.fields.field(field),
        }
    }
}

/// Custody transfer between licensees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl EventRecord for TransferRecord {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::To => self.to.as_deref(),
            Field::From => self.from.as_deref(),
            _ => self.fields.field(field),
        }
    }
}

/// Event whose `type` is not one of the known kinds
///
/// Keeps the raw tag and every scalar field so classification can still read
/// actors, identifiers and timestamps from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownEvent {
    /// Raw `type` string (empty when absent)
    pub tag: String,
    /// Scalar fields keyed by their JSON names
    pub fields: BTreeMap<String, String>,
}

impl UnknownEvent {
    /// Create unknown event with a raw tag and no fields
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl EventRecord for UnknownEvent {
    fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(field.key()).map(String::as_str)
    }
}

/// A single recorded occurrence in the traceability pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    ApplicationSubmitted(LicensingRecord),
    LicenseIssued(LicensingRecord),
    LicenseRenewed(LicensingRecord),
    LicenseAmended(LicensingRecord),
    LicenseSuspended(LicensingRecord),
    LicenseReinstated(LicensingRecord),
    FeePayment(LicensingRecord),
    SeedReceived(EventFields),
    Germination(CultivationStep),
    Transplant(CultivationStep),
    FlipToFlower(CultivationStep),
    Harvest(CultivationStep),
    Drying(DryingRecord),
    LabSubmission(EventFields),
    CoaIssued(EventFields),
    Packaged(EventFields),
    Transfer(TransferRecord),
    Unknown(UnknownEvent),
}

impl DomainEvent {
    /// Build an event from arbitrary JSON; never fails
    ///
    /// Objects with a known `type` become the matching variant. Everything else
    /// (unknown tags, non-object values) becomes [`DomainEvent::Unknown`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            tracing::debug!("Non-object event record treated as unknown");
            return Self::Unknown(UnknownEvent::default());
        };

        let tag = map.get("type").and_then(scalar_to_string).unwrap_or_default();
        let Some(kind) = EventKind::from_tag(&tag) else {
            tracing::debug!("Unrecognized event type: {:?}", tag);
            return Self::Unknown(unknown_from_map(tag, &map));
        };

        let object = Value::Object(map);
        let mut typed = match kind {
            EventKind::ApplicationSubmitted => record(&object).map(Self::ApplicationSubmitted),
            EventKind::LicenseIssued => record(&object).map(Self::LicenseIssued),
            EventKind::LicenseRenewed => record(&object).map(Self::LicenseRenewed),
            EventKind::LicenseAmended => record(&object).map(Self::LicenseAmended),
            EventKind::LicenseSuspended => record(&object).map(Self::LicenseSuspended),
            EventKind::LicenseReinstated => record(&object).map(Self::LicenseReinstated),
            EventKind::FeePayment => record(&object).map(Self::FeePayment),
            EventKind::SeedReceived => record(&object).map(Self::SeedReceived),
            EventKind::Germination => record(&object).map(Self::Germination),
            EventKind::Transplant => record(&object).map(Self::Transplant),
            EventKind::FlipToFlower => record(&object).map(Self::FlipToFlower),
            EventKind::Harvest => record(&object).map(Self::Harvest),
            EventKind::Drying => record(&object).map(Self::Drying),
            EventKind::LabSubmission => record(&object).map(Self::LabSubmission),
            EventKind::CoaIssued => record(&object).map(Self::CoaIssued),
            EventKind::Packaged => record(&object).map(Self::Packaged),
            EventKind::Transfer => record(&object).map(Self::Transfer),
        };

        if let Some(fields) = typed.as_mut().and_then(Self::fields_mut) {
            if tag != kind.as_str() {
                fields.wire_tag = Some(tag.clone());
            }
        }

        typed.unwrap_or_else(|| {
            tracing::debug!("Event of type {} did not fit its record; kept as unknown", kind);
            match object {
                Value::Object(map) => Self::Unknown(unknown_from_map(tag, &map)),
                _ => Self::Unknown(UnknownEvent::new(tag)),
            }
        })
    }

    /// Known kind of this event, `None` for [`DomainEvent::Unknown`]
    #[must_use]
    pub fn kind(&self) -> Option<EventKind> {
        Some(match self {
            Self::ApplicationSubmitted(_) => EventKind::ApplicationSubmitted,
            Self::LicenseIssued(_) => EventKind::LicenseIssued,
            Self::LicenseRenewed(_) => EventKind::LicenseRenewed,
            Self::LicenseAmended(_) => EventKind::LicenseAmended,
            Self::LicenseSuspended(_) => EventKind::LicenseSuspended,
            Self::LicenseReinstated(_) => EventKind::LicenseReinstated,
            Self::FeePayment(_) => EventKind::FeePayment,
            Self::SeedReceived(_) => EventKind::SeedReceived,
            Self::Germination(_) => EventKind::Germination,
            Self::Transplant(_) => EventKind::Transplant,
            Self::FlipToFlower(_) => EventKind::FlipToFlower,
            Self::Harvest(_) => EventKind::Harvest,
            Self::Drying(_) => EventKind::Drying,
            Self::LabSubmission(_) => EventKind::LabSubmission,
            Self::CoaIssued(_) => EventKind::CoaIssued,
            Self::Packaged(_) => EventKind::Packaged,
            Self::Transfer(_) => EventKind::Transfer,
            Self::Unknown(_) => return None,
        })
    }

    /// Wire `type` string as received
    ///
    /// Known kinds report the spelling they arrived with (`licence-issued`
    /// stays `licence-issued`); hand-built events report the canonical tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Unknown(unknown) => &unknown.tag,
            other => other
                .fields()
                .and_then(|f| f.wire_tag.as_deref())
                .or_else(|| other.kind().map(EventKind::as_str))
                .unwrap_or_default(),
        }
    }

    /// Shared identifier, actor and timestamp fields (`None` for unknown events)
    #[must_use]
    pub fn fields(&self) -> Option<&EventFields> {
        Some(match self {
            Self::ApplicationSubmitted(r)
            | Self::LicenseIssued(r)
            | Self::LicenseRenewed(r)
            | Self::LicenseAmended(r)
            | Self::LicenseSuspended(r)
            | Self::LicenseReinstated(r)
            | Self::FeePayment(r) => &r.fields,
            Self::Germination(r) | Self::Transplant(r) | Self::FlipToFlower(r) | Self::Harvest(r) => {
                &r.fields
            }
            Self::Drying(r) => &r.fields,
            Self::Transfer(r) => &r.fields,
            Self::SeedReceived(f) | Self::LabSubmission(f) | Self::CoaIssued(f) | Self::Packaged(f) => f,
            Self::Unknown(_) => return None,
        })
    }

    fn fields_mut(&mut self) -> Option<&mut EventFields> {
        Some(match self {
            Self::ApplicationSubmitted(r)
            | Self::LicenseIssued(r)
            | Self::LicenseRenewed(r)
            | Self::LicenseAmended(r)
            | Self::LicenseSuspended(r)
            | Self::LicenseReinstated(r)
            | Self::FeePayment(r) => &mut r.fields,
            Self::Germination(r) | Self::Transplant(r) | Self::FlipToFlower(r) | Self::Harvest(r) => {
                &mut r.fields
            }
            Self::Drying(r) => &mut r.fields,
            Self::Transfer(r) => &mut r.fields,
            Self::SeedReceived(f) | Self::LabSubmission(f) | Self::CoaIssued(f) | Self::Packaged(f) => f,
            Self::Unknown(_) => return None,
        })
    }

    fn record(&self) -> &dyn EventRecord {
        match self {
            Self::ApplicationSubmitted(r)
            | Self::LicenseIssued(r)
            | Self::LicenseRenewed(r)
            | Self::LicenseAmended(r)
            | Self::LicenseSuspended(r)
            | Self::LicenseReinstated(r)
            | Self::FeePayment(r) => r,
            Self::Germination(r) | Self::Transplant(r) | Self::FlipToFlower(r) | Self::Harvest(r) => r,
            Self::Drying(r) => r,
            Self::Transfer(r) => r,
            Self::SeedReceived(f) | Self::LabSubmission(f) | Self::CoaIssued(f) | Self::Packaged(f) => f,
            Self::Unknown(r) => r,
        }
    }

    /// Non-empty value of `field`, if this event carries it
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&str> {
        self.record()
            .field(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Batch identifier, if any
    #[inline]
    #[must_use]
    pub fn batch_id(&self) -> Option<&str> {
        self.field(Field::BatchId)
    }

    /// Render back to the JSON shape it was read from
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = match self {
            Self::Unknown(unknown) => unknown
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<String, Value>>(),
            Self::ApplicationSubmitted(r)
            | Self::LicenseIssued(r)
            | Self::LicenseRenewed(r)
            | Self::LicenseAmended(r)
            | Self::LicenseSuspended(r)
            | Self::LicenseReinstated(r)
            | Self::FeePayment(r) => object_of(r),
            Self::Germination(r) | Self::Transplant(r) | Self::FlipToFlower(r) | Self::Harvest(r) => {
                object_of(r)
            }
            Self::Drying(r) => object_of(r),
            Self::Transfer(r) => object_of(r),
            Self::SeedReceived(f) | Self::LabSubmission(f) | Self::CoaIssued(f) | Self::Packaged(f) => {
                object_of(f)
            }
        };
        map.insert("type".to_string(), Value::String(self.tag().to_string()));
        Value::Object(map)
    }
}

fn record<R: DeserializeOwned>(value: &Value) -> Option<R> {
    R::deserialize(value).ok()
}

fn object_of<R: Serialize>(record: &R) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn unknown_from_map(tag: String, map: &Map<String, Value>) -> UnknownEvent {
    let fields = map
        .iter()
        .filter(|(key, _)| key.as_str() != "type")
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect();
    UnknownEvent { tag, fields }
}

impl From<Value> for DomainEvent {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl Serialize for DomainEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DomainEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Parse an event feed document
///
/// A JSON array yields one event per element. Any other document, including
/// malformed JSON, yields an empty list.
#[must_use]
pub fn parse_events(document: &str) -> Vec<DomainEvent> {
    match serde_json::from_str::<Value>(document) {
        Ok(Value::Array(items)) => items.into_iter().map(DomainEvent::from_value).collect(),
        Ok(_) => {
            tracing::debug!("Event feed is not an array; treating as empty");
            Vec::new()
        }
        Err(e) => {
            tracing::debug!("Event feed is not valid JSON ({}); treating as empty", e);
            Vec::new()
        }
    }
}
