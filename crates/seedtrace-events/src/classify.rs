//! Event classification
//!
//! Maps a [`DomainEvent`] to the fields a history table renders. Origin and
//! licensing-actor attribution are driven by [`CLASSIFICATION_TABLE`]: a new
//! event kind is supported by adding one row.

use crate::event::DomainEvent;
use crate::kind::{EventKind, Field};
use crate::username::{resolve_username, DiscriminatorSource};
use seedtrace_core::epoch_millis;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Placeholder for unknown data
pub const PLACEHOLDER: &str = "—";

/// Licensing actor used when a kind has no specific one
pub const DEFAULT_LICENSING_ACTOR: &str = "Licensing Officer";

/// Operator actor used when an event names nobody
pub const DEFAULT_OPERATOR_ACTOR: &str = "Operator User";

/// Type-string fragments that mark an event as licensing
///
/// Substring match on the lowercased tag. Coarse: any future tag containing
/// one of these fragments is classified as licensing.
pub const LICENSING_MARKERS: [&str; 2] = ["licen", "application"];

/// Event category shown in history filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Licence applications and regulator actions
    Licensing,
    /// Everything done by licensed operators
    Operator,
}

impl Category {
    /// Categorize a raw `type` string
    #[must_use]
    pub fn of_tag(tag: &str) -> Self {
        let lowered = tag.to_lowercase();
        if LICENSING_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            Self::Licensing
        } else {
            Self::Operator
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Licensing => "licensing",
            Self::Operator => "operator",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the origin of an event kind is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginRule {
    /// Constant origin
    Fixed(&'static str),
    /// `"{label}: {value}"` from the first present field, else `fallback`
    Labeled {
        fields: &'static [Field],
        label: &'static str,
        fallback: &'static str,
    },
    /// Transfer destination, labelled by the kind of recipient
    TransferDestination,
}

impl OriginRule {
    fn render(&self, event: &DomainEvent) -> String {
        match *self {
            Self::Fixed(origin) => origin.to_string(),
            Self::Labeled {
                fields,
                label,
                fallback,
            } => fields
                .iter()
                .find_map(|f| event.field(*f))
                .map_or_else(|| fallback.to_string(), |value| format!("{label}: {value}")),
            Self::TransferDestination => match event.field(Field::To) {
                Some(to) => {
                    let lowered = to.to_lowercase();
                    if lowered.contains("retail") {
                        format!("Retail: {to}")
                    } else if lowered.contains("pharmacy") {
                        format!("Pharmacy: {to}")
                    } else {
                        format!("Distribution: {to}")
                    }
                }
                None => "Distribution".to_string(),
            },
        }
    }
}

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Kind this row applies to
    pub kind: EventKind,
    /// Origin rendering
    pub origin: OriginRule,
    /// Actor label used when the event is in the licensing category
    pub licensing_actor: Option<&'static str>,
}

impl ClassificationRule {
    const fn new(kind: EventKind, origin: OriginRule) -> Self {
        Self {
            kind,
            origin,
            licensing_actor: None,
        }
    }

    const fn with_licensing_actor(mut self, actor: &'static str) -> Self {
        self.licensing_actor = Some(actor);
        self
    }
}

const LICENSING_AUTHORITY: OriginRule = OriginRule::Fixed("Licensing Authority");
const FARM_FACILITY: OriginRule = OriginRule::Fixed("Farm facility");
const LAB: OriginRule = OriginRule::Labeled {
    fields: &[Field::Lab],
    label: "Lab",
    fallback: "Lab",
};

/// Origin and licensing-actor attribution per event kind
pub static CLASSIFICATION_TABLE: &[ClassificationRule] = &[
    ClassificationRule::new(
        EventKind::ApplicationSubmitted,
        OriginRule::Fixed("Applicant Portal"),
    )
    .with_licensing_actor("Applicant User"),
    ClassificationRule::new(EventKind::LicenseIssued, LICENSING_AUTHORITY),
    ClassificationRule::new(EventKind::LicenseRenewed, LICENSING_AUTHORITY),
    ClassificationRule::new(EventKind::LicenseAmended, LICENSING_AUTHORITY),
    ClassificationRule::new(EventKind::LicenseSuspended, LICENSING_AUTHORITY),
    ClassificationRule::new(EventKind::LicenseReinstated, LICENSING_AUTHORITY),
    ClassificationRule::new(EventKind::FeePayment, OriginRule::Fixed("Finance Department"))
        .with_licensing_actor("Finance Officer"),
    ClassificationRule::new(
        EventKind::SeedReceived,
        OriginRule::Labeled {
            fields: &[Field::Supplier],
            label: "Supplier",
            fallback: "Supplier",
        },
    ),
    ClassificationRule::new(
        EventKind::Germination,
        OriginRule::Fixed("Nursery / Farm facility"),
    ),
    ClassificationRule::new(
        EventKind::Transplant,
        OriginRule::Labeled {
            fields: &[Field::To, Field::From],
            label: "Farm",
            fallback: "Farm facility",
        },
    ),
    ClassificationRule::new(EventKind::FlipToFlower, FARM_FACILITY),
    ClassificationRule::new(EventKind::Harvest, FARM_FACILITY),
    ClassificationRule::new(
        EventKind::Drying,
        OriginRule::Labeled {
            fields: &[Field::Location],
            label: "Processing",
            fallback: "Processing",
        },
    ),
    ClassificationRule::new(EventKind::LabSubmission, LAB),
    ClassificationRule::new(EventKind::CoaIssued, LAB),
    ClassificationRule::new(EventKind::Packaged, OriginRule::Fixed("Processing")),
    ClassificationRule::new(EventKind::Transfer, OriginRule::TransferDestination),
];

/// Look up the table row for a kind
#[must_use]
pub fn rule_for(kind: EventKind) -> Option<&'static ClassificationRule> {
    CLASSIFICATION_TABLE.iter().find(|rule| rule.kind == kind)
}

/// Where an operator actor label comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorSource {
    Direct(Field),
    Tagged(Field, &'static str),
}

/// Operator actor candidates, first present wins
const OPERATOR_ACTOR_CHAIN: [ActorSource; 8] = [
    ActorSource::Direct(Field::By),
    ActorSource::Direct(Field::TrimmedBy),
    ActorSource::Direct(Field::SubmittedBy),
    ActorSource::Direct(Field::PackagedBy),
    ActorSource::Direct(Field::TransferredBy),
    ActorSource::Direct(Field::Inspector),
    ActorSource::Tagged(Field::Lab, "Lab"),
    ActorSource::Tagged(Field::Supplier, "Supplier"),
];

/// Display-ready classification of one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventClassification {
    /// Licensing or operator
    pub category: Category,
    /// Human-readable source of the event
    pub origin: String,
    /// Username of the responsible party
    pub responsible: String,
    /// Actor label before username normalization
    pub actor: String,
    /// Title-cased type label
    pub normalized_label: String,
    /// Sort key in epoch milliseconds
    pub time_key: Option<i64>,
}

/// Classify an event; never fails
///
/// Missing data degrades to placeholders, so every field except `time_key` is
/// always populated.
#[must_use]
pub fn classify(event: &DomainEvent) -> EventClassification {
    let tag = event.tag();
    let category = Category::of_tag(tag);
    let rule = event.kind().and_then(rule_for);

    let origin = rule.map_or_else(|| PLACEHOLDER.to_string(), |r| r.origin.render(event));
    let actor = match category {
        Category::Licensing => rule
            .and_then(|r| r.licensing_actor)
            .unwrap_or(DEFAULT_LICENSING_ACTOR)
            .to_string(),
        Category::Operator => operator_actor(event),
    };

    let time_key = time_key(event);
    let source = DiscriminatorSource {
        licence_id: event.field(Field::LicenceId),
        batch_id: event.field(Field::BatchId),
        time_key,
    };
    let responsible = resolve_username(&actor, &source);

    tracing::trace!(tag, %category, %responsible, "classified event");

    EventClassification {
        category,
        origin,
        responsible,
        actor,
        normalized_label: normalized_label(tag),
        time_key,
    }
}

fn operator_actor(event: &DomainEvent) -> String {
    OPERATOR_ACTOR_CHAIN
        .iter()
        .find_map(|source| match *source {
            ActorSource::Direct(field) => event.field(field).map(str::to_string),
            ActorSource::Tagged(field, tag) => event.field(field).map(|v| format!("{v} ({tag})")),
        })
        .unwrap_or_else(|| DEFAULT_OPERATOR_ACTOR.to_string())
}

/// Sort key of an event
///
/// Takes the first timestamp field present, in [`Field::TIMESTAMPS`] order, and
/// parses it. An unparseable first timestamp yields `None`; later fields are
/// not consulted.
#[must_use]
pub fn time_key(event: &DomainEvent) -> Option<i64> {
    Field::TIMESTAMPS
        .iter()
        .find_map(|f| event.field(*f))
        .and_then(epoch_millis)
}

/// Title-case a type tag for display (`coa-issued` → `Coa Issued`)
#[must_use]
pub fn normalized_label(tag: &str) -> String {
    let words: Vec<String> = tag
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(value: serde_json::Value) -> DomainEvent {
        DomainEvent::from_value(value)
    }

    #[test]
    fn table_covers_every_known_kind_once() {
        for kind in EventKind::ALL {
            let rows = CLASSIFICATION_TABLE.iter().filter(|r| r.kind == kind).count();
            assert_eq!(rows, 1, "{kind} should have exactly one row");
        }
    }

    #[test]
    fn category_heuristic() {
        assert_eq!(Category::of_tag("application-submitted"), Category::Licensing);
        assert_eq!(Category::of_tag("LICENCE-ISSUED"), Category::Licensing);
        assert_eq!(Category::of_tag("license-plate-scan"), Category::Licensing);
        assert_eq!(Category::of_tag("fee-payment"), Category::Operator);
        assert_eq!(Category::of_tag("harvest"), Category::Operator);
        assert_eq!(Category::of_tag(""), Category::Operator);
    }

    #[test]
    fn application_is_attributed_to_applicant() {
        let c = classify(&event(json!({
            "type": "application-submitted",
            "licenceId": "LIC-2025-0042",
            "submittedAt": "2025-01-03T09:00:00Z"
        })));
        assert_eq!(c.category, Category::Licensing);
        assert_eq!(c.origin, "Applicant Portal");
        assert_eq!(c.actor, "Applicant User");
        assert_eq!(c.responsible, "applicant_user_0042");
        assert_eq!(c.normalized_label, "Application Submitted");
        assert_eq!(c.time_key, Some(1_735_894_800_000));
    }

    #[test]
    fn licence_actions_default_to_licensing_officer() {
        let c = classify(&event(json!({"type": "license-suspended", "licenceId": "L-77AB"})));
        assert_eq!(c.origin, "Licensing Authority");
        assert_eq!(c.actor, DEFAULT_LICENSING_ACTOR);
        assert_eq!(c.responsible, "licensing_officer_77ab");
    }

    #[test]
    fn fee_payment_falls_to_operator_category() {
        let c = classify(&event(json!({"type": "fee-payment", "licenceId": "L-1"})));
        assert_eq!(c.category, Category::Operator);
        assert_eq!(c.origin, "Finance Department");
        assert_eq!(c.actor, DEFAULT_OPERATOR_ACTOR);
        assert_eq!(c.responsible, "operator_user_l1");
    }

    #[test]
    fn seed_intake_uses_supplier() {
        let c = classify(&event(json!({"type": "seed-received", "supplier": "Green Genetics"})));
        assert_eq!(c.origin, "Supplier: Green Genetics");
        assert_eq!(c.actor, "Green Genetics (Supplier)");
        assert_eq!(c.responsible, "green_genetics");

        let bare = classify(&event(json!({"type": "seed-received"})));
        assert_eq!(bare.origin, "Supplier");
    }

    #[test]
    fn transplant_prefers_destination() {
        let to = classify(&event(json!({"type": "transplant", "to": "Room B", "from": "Nursery"})));
        assert_eq!(to.origin, "Farm: Room B");
        let from = classify(&event(json!({"type": "transplant", "from": "Nursery"})));
        assert_eq!(from.origin, "Farm: Nursery");
        let none = classify(&event(json!({"type": "transplant"})));
        assert_eq!(none.origin, "Farm facility");
    }

    #[test]
    fn drying_and_lab_origins() {
        assert_eq!(
            classify(&event(json!({"type": "drying", "location": "Dry Room 1"}))).origin,
            "Processing: Dry Room 1"
        );
        assert_eq!(classify(&event(json!({"type": "drying"}))).origin, "Processing");
        assert_eq!(
            classify(&event(json!({"type": "coa-issued", "lab": "Acme Labs"}))).origin,
            "Lab: Acme Labs"
        );
        assert_eq!(classify(&event(json!({"type": "lab-submission"}))).origin, "Lab");
    }

    #[test]
    fn transfer_destination_kinds() {
        let origin = |to: &str| classify(&event(json!({"type": "transfer", "to": to}))).origin;
        assert_eq!(origin("Downtown Retail"), "Retail: Downtown Retail");
        assert_eq!(origin("Main St PHARMACY"), "Pharmacy: Main St PHARMACY");
        assert_eq!(origin("North Hub"), "Distribution: North Hub");
        assert_eq!(
            classify(&event(json!({"type": "transfer"}))).origin,
            "Distribution"
        );
    }

    #[test]
    fn operator_actor_chain_order() {
        let c = classify(&event(json!({
            "type": "drying",
            "trimmedBy": "Trim Crew",
            "by": "Sam Ortiz"
        })));
        assert_eq!(c.actor, "Sam Ortiz");

        let c = classify(&event(json!({"type": "drying", "trimmedBy": "Trim Crew"})));
        assert_eq!(c.actor, "Trim Crew");

        let c = classify(&event(json!({"type": "lab-submission", "lab": "Acme Labs"})));
        assert_eq!(c.actor, "Acme Labs (Lab)");
        assert_eq!(c.responsible, "acme_labs");

        let c = classify(&event(json!({
            "type": "lab-submission",
            "lab": "Acme Labs",
            "submittedBy": "qa_lead"
        })));
        assert_eq!(c.responsible, "qa_lead");
    }

    #[test]
    fn by_is_read_on_every_operator_kind() {
        let transfer = classify(&event(json!({"type": "transfer", "to": "North Hub", "by": "Alex Kim"})));
        assert_eq!(transfer.actor, "Alex Kim");
        assert_eq!(transfer.responsible, "alex_kim");
        assert_eq!(transfer.origin, "Distribution: North Hub");

        let fee = classify(&event(json!({
            "type": "fee-payment",
            "by": "Pat Clerk",
            "batchId": "B-0099",
            "receivedAt": "2025-01-01T00:00:00Z"
        })));
        assert_eq!(fee.category, Category::Operator);
        assert_eq!(fee.actor, "Pat Clerk");
        assert_eq!(fee.responsible, "pat_clerk");

        let packaged = classify(&event(json!({"type": "packaged", "by": "Jordan Lee", "packagedBy": "pk_01"})));
        assert_eq!(packaged.actor, "Jordan Lee");
    }

    #[test]
    fn licence_id_outranks_batch_id_on_operator_kinds() {
        let c = classify(&event(json!({
            "type": "harvest",
            "licenceId": "LIC-7781",
            "batchId": "B-1234"
        })));
        assert_eq!(c.responsible, "operator_user_7781");

        let fee = classify(&event(json!({"type": "fee-payment", "batchId": "B-0099"})));
        assert_eq!(fee.responsible, "operator_user_0099");
    }

    #[test]
    fn received_at_leads_the_time_key_on_every_kind() {
        let coa = event(json!({
            "type": "coa-issued",
            "receivedAt": "2025-01-01T00:00:00Z",
            "issuedAt": "2025-02-01T00:00:00Z"
        }));
        assert_eq!(time_key(&coa), Some(1_735_689_600_000));

        let transfer = event(json!({
            "type": "transfer",
            "transferredAt": "2025-02-01T00:00:00Z",
            "receivedAt": "2025-01-01T00:00:00Z"
        }));
        assert_eq!(time_key(&transfer), Some(1_735_689_600_000));
    }

    #[test]
    fn unknown_kind_uses_placeholders() {
        let c = classify(&event(json!({"type": "inspection", "inspector": "Dana Reyes"})));
        assert_eq!(c.category, Category::Operator);
        assert_eq!(c.origin, PLACEHOLDER);
        assert_eq!(c.responsible, "dana_reyes");
        assert_eq!(c.normalized_label, "Inspection");
    }

    #[test]
    fn unknown_licensing_kind_is_licensing() {
        let c = classify(&event(json!({"type": "license-plate-scan"})));
        assert_eq!(c.category, Category::Licensing);
        assert_eq!(c.origin, PLACEHOLDER);
        assert_eq!(c.actor, DEFAULT_LICENSING_ACTOR);
    }

    #[test]
    fn empty_tag_has_placeholder_label() {
        let c = classify(&event(json!({})));
        assert_eq!(c.normalized_label, PLACEHOLDER);
        assert_eq!(c.origin, PLACEHOLDER);
        assert_eq!(c.time_key, None);
    }

    #[test]
    fn time_key_priority_and_parse_failure() {
        let both = event(json!({
            "type": "harvest",
            "startedAt": "2025-01-01T00:00:00Z",
            "harvestedAt": "2025-02-01T00:00:00Z"
        }));
        assert_eq!(time_key(&both), Some(1_735_689_600_000));

        let bad_first = event(json!({
            "type": "harvest",
            "startedAt": "soon",
            "harvestedAt": "2025-02-01T00:00:00Z"
        }));
        assert_eq!(time_key(&bad_first), None);
    }

    #[test]
    fn discriminator_falls_back_to_time_key() {
        let c = classify(&event(json!({
            "type": "harvest",
            "harvestedAt": "1735689601234"
        })));
        assert_eq!(c.responsible, "operator_user_1234");
    }

    #[test]
    fn labels_title_case() {
        assert_eq!(normalized_label("coa-issued"), "Coa Issued");
        assert_eq!(normalized_label("flip_to_FLOWER"), "Flip To Flower");
    }
}
