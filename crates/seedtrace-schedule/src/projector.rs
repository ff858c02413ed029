//! Projection of plant, harvest and compliance records onto calendar days

use crate::audit::place_catalogue;
use crate::config::ProjectorConfig;
use crate::records::{Harvest, HarvestStatus, Plant};
use crate::types::{ScheduleKind, ScheduledEvent};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use seedtrace_core::{parse_timestamp, shift_days, truncate_to_day};

/// Projects records onto the calendar using a [`ProjectorConfig`]
#[derive(Debug, Clone, Default)]
pub struct ScheduleProjector {
    config: ProjectorConfig,
}

impl ScheduleProjector {
    /// Create projector
    #[must_use]
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Expected harvest and transplant dates for growing plants, plus drying
    /// checks for harvests still drying
    ///
    /// Dates are calendar days in `tz`. Records with missing or unparseable
    /// timestamps are skipped.
    #[must_use]
    pub fn project_cultivation_events<Tz: TimeZone>(
        &self,
        plants: &[Plant],
        harvests: &[Harvest],
        tz: &Tz,
    ) -> Vec<ScheduledEvent> {
        let mut events = Vec::new();

        for plant in plants.iter().filter(|p| !p.harvested) {
            let Some(planted) = plant.planted_at.as_deref().and_then(parse_timestamp) else {
                tracing::debug!("Skipping plant {:?}: no usable plantedAt", plant.id);
                continue;
            };

            let strain = plant.strain.as_deref().unwrap_or("Unknown strain");
            let href = plant.id.as_deref().map(|id| format!("/plants/{id}"));

            if let Some(date) = day_after(planted, self.config.harvest_offset_days, tz) {
                let label = match plant.location.as_deref() {
                    Some(location) => format!("Harvest {strain} ({location})"),
                    None => format!("Harvest {strain}"),
                };
                events.push(with_href(
                    ScheduledEvent::new(date, label, ScheduleKind::Harvest),
                    href.clone(),
                ));
            }

            if let Some(date) = day_after(planted, self.config.transplant_offset_days, tz) {
                events.push(with_href(
                    ScheduledEvent::new(date, format!("Transplant {strain}"), ScheduleKind::Transplant),
                    href,
                ));
            }
        }

        for harvest in harvests
            .iter()
            .filter(|h| h.status == HarvestStatus::Drying)
        {
            let Some(harvested) = harvest.harvested_at.as_deref().and_then(parse_timestamp) else {
                tracing::debug!("Skipping harvest {:?}: no usable harvestedAt", harvest.id);
                continue;
            };
            let Some(date) = day_after(harvested, self.config.drying_check_offset_days, tz) else {
                continue;
            };

            let subject = harvest
                .id
                .as_deref()
                .or(harvest.plant_id.as_deref())
                .unwrap_or("harvest");
            let mut event = ScheduledEvent::new(
                date,
                format!("Drying check {subject}"),
                ScheduleKind::DryingCheck,
            );
            if harvest.yield_grams > 0.0 {
                event = event.with_description(format!("{:.0} g wet weight", harvest.yield_grams));
            }
            let href = harvest.id.as_deref().map(|id| format!("/harvests/{id}"));
            events.push(with_href(event, href));
        }

        tracing::debug!(
            "Projected {} cultivation events from {} plants and {} harvests",
            events.len(),
            plants.len(),
            harvests.len()
        );
        events
    }

    /// Place the audit catalogue relative to the calendar day of `reference`
    #[must_use]
    pub fn project_audit_calendar<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Vec<ScheduledEvent> {
        let day = truncate_to_day(reference);
        let events = place_catalogue(self.config.catalogue(), day);
        tracing::debug!("Projected {} audit events from {}", events.len(), day);
        events
    }
}

/// Calendar day in `tz` that is `days` after `instant`
fn day_after<Tz: TimeZone>(instant: DateTime<Utc>, days: i64, tz: &Tz) -> Option<NaiveDate> {
    let naive = instant.naive_utc();
    let shifted = shift_days(naive.date(), days)?.and_time(naive.time());
    Some(Utc.from_utc_datetime(&shifted).with_timezone(tz).date_naive())
}

fn with_href(event: ScheduledEvent, href: Option<String>) -> ScheduledEvent {
    match href {
        Some(href) => event.with_href(href),
        None => event,
    }
}

/// [`ScheduleProjector::project_cultivation_events`] with default offsets
#[must_use]
pub fn project_cultivation_events<Tz: TimeZone>(
    plants: &[Plant],
    harvests: &[Harvest],
    tz: &Tz,
) -> Vec<ScheduledEvent> {
    ScheduleProjector::default().project_cultivation_events(plants, harvests, tz)
}

/// [`ScheduleProjector::project_audit_calendar`] with the built-in catalogue
#[must_use]
pub fn project_audit_calendar<Tz: TimeZone>(reference: &DateTime<Tz>) -> Vec<ScheduledEvent> {
    ScheduleProjector::default().project_audit_calendar(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditItem, AUDIT_CATALOGUE};
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn find(events: &[ScheduledEvent], kind: ScheduleKind) -> Vec<&ScheduledEvent> {
        events.iter().filter(|e| e.kind == kind).collect()
    }

    #[test]
    fn plant_projects_harvest_and_transplant() {
        let plant = Plant::new("P-1", "2025-01-01T00:00:00Z")
            .with_strain("Blue Dream")
            .with_location("Greenhouse A");
        let events = project_cultivation_events(&[plant], &[], &Utc);

        let harvest = find(&events, ScheduleKind::Harvest);
        assert_eq!(harvest.len(), 1);
        assert_eq!(harvest[0].date, day(2025, 3, 2));
        assert_eq!(harvest[0].label, "Harvest Blue Dream (Greenhouse A)");
        assert_eq!(harvest[0].href.as_deref(), Some("/plants/P-1"));

        let transplant = find(&events, ScheduleKind::Transplant);
        assert_eq!(transplant.len(), 1);
        assert_eq!(transplant[0].date, day(2025, 1, 15));
    }

    #[test]
    fn drying_harvest_projects_check() {
        let harvest = Harvest::new("H-7", HarvestStatus::Drying)
            .with_plant("P-1")
            .with_harvested_at("2025-01-01T00:00:00Z")
            .with_yield(820.0);
        let events = project_cultivation_events(&[], &[harvest], &Utc);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, day(2025, 1, 6));
        assert_eq!(events[0].kind, ScheduleKind::DryingCheck);
        assert_eq!(events[0].description.as_deref(), Some("820 g wet weight"));
    }

    #[test]
    fn harvested_plants_and_dried_harvests_project_nothing() {
        let plant = Plant::new("P-1", "2025-01-01T00:00:00Z").harvested();
        let dried = Harvest::new("H-1", HarvestStatus::Dried).with_harvested_at("2025-01-01");
        let undated = Harvest::new("H-2", HarvestStatus::Drying);
        assert!(project_cultivation_events(&[plant], &[dried, undated], &Utc).is_empty());
    }

    #[test]
    fn unparseable_planted_at_is_skipped() {
        let plant = Plant::new("P-1", "sometime in spring");
        assert!(project_cultivation_events(&[plant], &[], &Utc).is_empty());
    }

    #[test]
    fn dates_follow_the_given_zone() {
        let plant = Plant::new("P-1", "2025-01-01T02:00:00Z");
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let events = project_cultivation_events(&[plant], &[], &pacific);
        let transplant = find(&events, ScheduleKind::Transplant);
        assert_eq!(transplant[0].date, day(2025, 1, 14));
    }

    #[test]
    fn configured_offsets_apply() {
        let projector = ScheduleProjector::new(
            ProjectorConfig::default()
                .with_harvest_offset(70)
                .with_transplant_offset(10),
        );
        let plant = Plant::new("P-1", "2025-01-01");
        let events = projector.project_cultivation_events(&[plant], &[], &Utc);
        assert_eq!(find(&events, ScheduleKind::Harvest)[0].date, day(2025, 3, 12));
        assert_eq!(find(&events, ScheduleKind::Transplant)[0].date, day(2025, 1, 11));
    }

    #[test]
    fn negative_offsets_land_before_the_instant() {
        let projector =
            ScheduleProjector::new(ProjectorConfig::default().with_drying_check_offset(-2));
        let harvest = Harvest::new("H-1", HarvestStatus::Drying).with_harvested_at("2025-03-01T23:30:00Z");
        let events = projector.project_cultivation_events(&[], &[harvest], &Utc);
        assert_eq!(events[0].date, day(2025, 2, 27));

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let harvest = Harvest::new("H-2", HarvestStatus::Drying).with_harvested_at("2025-03-01T23:30:00Z");
        let events = projector.project_cultivation_events(&[], &[harvest], &tokyo);
        assert_eq!(events[0].date, day(2025, 2, 28));
    }

    #[test]
    fn audit_calendar_anchors_on_reference_day() {
        let reference = Utc.with_ymd_and_hms(2025, 3, 1, 18, 45, 0).unwrap();
        let events = project_audit_calendar(&reference);
        assert_eq!(events.len(), AUDIT_CATALOGUE.len());
        let today: Vec<_> = events.iter().filter(|e| e.date == day(2025, 3, 1)).collect();
        assert!(!today.is_empty());
    }

    #[test]
    fn audit_calendar_uses_configured_catalogue() {
        let projector = ScheduleProjector::new(ProjectorConfig::default().with_audit_catalogue(
            vec![AuditItem::new(1, ScheduleKind::Inspection, "Walkthrough").with_href("/x")],
        ));
        let reference = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let events = projector.project_audit_calendar(&reference);
        assert_eq!(
            events,
            vec![ScheduledEvent::new(day(2025, 3, 2), "Walkthrough", ScheduleKind::Inspection)
                .with_href("/x")]
        );
    }
}
