//! Subcommand handlers
//!
//! Each handler returns the text to print so the binary stays a thin shell and
//! tests can drive commands without spawning a process.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use clap::ArgMatches;
use seedtrace_events::{
    average_hours, history, lab_turnaround, parse_events, Category, DomainEvent, HistoryEntry,
    HistoryFilter, PLACEHOLDER,
};
use seedtrace_schedule::{
    window_events, DayKey, Harvest, MonthGrid, Plant, ProjectorConfig, ScheduleProjector,
    ScheduledEvent,
};
use serde::de::DeserializeOwned;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Dispatch the selected subcommand
///
/// `now` supplies both the default reference time and the display time zone.
///
/// # Errors
/// Fails on unreadable input files, malformed record files or config, and
/// invalid `--reference` / `--month` values.
pub fn run<Tz: TimeZone>(matches: &ArgMatches, now: &DateTime<Tz>) -> Result<String> {
    let Some((name, args)) = matches.subcommand() else {
        bail!("no command given");
    };
    tracing::debug!("Running {} command", name);

    match name {
        "classify" => classify(args, &now.timezone()),
        "cultivation" => cultivation(args, &now.timezone()),
        "audit" => audit(args, now),
        "window" => window(args, now),
        "month" => month(args, now),
        "turnaround" => turnaround(args),
        other => bail!("unknown command: {other}"),
    }
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing <{name}> argument"))
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = read_to_string(path)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_events(path: &Path) -> Result<Vec<DomainEvent>> {
    let events = parse_events(&read_to_string(path)?);
    if events.is_empty() {
        tracing::warn!("No events read from {}", path.display());
    }
    Ok(events)
}

fn projector(args: &ArgMatches) -> Result<ScheduleProjector> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => ProjectorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ProjectorConfig::default(),
    };
    Ok(ScheduleProjector::new(config))
}

fn reference<Tz: TimeZone>(args: &ArgMatches, now: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    let Some(raw) = args.get_one::<String>("reference") else {
        return Ok(now.clone());
    };
    let key: DayKey = raw
        .parse()
        .with_context(|| format!("invalid --reference '{raw}'"))?;
    let midnight = key.date().and_time(chrono::NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .with_context(|| format!("{raw} has no midnight in the local time zone"))
}

fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn format_time_key<Tz: TimeZone>(key: Option<i64>, tz: &Tz) -> String {
    key.and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        .map_or_else(
            || PLACEHOLDER.to_string(),
            |instant| {
                instant
                    .with_timezone(tz)
                    .naive_local()
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            },
        )
}

fn classify<Tz: TimeZone>(args: &ArgMatches, tz: &Tz) -> Result<String> {
    let events = read_events(path_arg(args, "events")?)?;
    let rows = history(&events);

    let mut filter = HistoryFilter::new();
    if let Some(category) = args.get_one::<String>("category") {
        filter = filter.with_category(match category.as_str() {
            "licensing" => Category::Licensing,
            _ => Category::Operator,
        });
    }
    if let Some(batch) = args.get_one::<String>("batch") {
        filter = filter.with_batch(batch.clone());
    }
    if let Some(text) = args.get_one::<String>("search") {
        filter = filter.with_search(text.clone());
    }
    let selected: Vec<&HistoryEntry> = filter.apply(&rows);

    if args.get_flag("json") {
        return json(&selected);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{:<16}  {:<9}  {:<21}  {:<10}  {:<30}  RESPONSIBLE",
        "TIME", "CATEGORY", "TYPE", "BATCH", "ORIGIN"
    )?;
    for row in &selected {
        let c = &row.classification;
        writeln!(
            out,
            "{:<16}  {:<9}  {:<21}  {:<10}  {:<30}  {}",
            format_time_key(c.time_key, tz),
            c.category.as_str(),
            c.normalized_label,
            row.batch_id.as_deref().unwrap_or(PLACEHOLDER),
            c.origin,
            c.responsible
        )?;
    }
    writeln!(out, "{} of {} events", selected.len(), rows.len())?;
    Ok(out)
}

fn sorted(mut events: Vec<ScheduledEvent>) -> Vec<ScheduledEvent> {
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.label.cmp(&b.label)));
    events
}

fn event_line(out: &mut String, indent: &str, event: &ScheduledEvent) -> std::fmt::Result {
    writeln!(out, "{indent}{:<17}  {}", event.kind.as_str(), event.label)
}

fn cultivation_events<Tz: TimeZone>(args: &ArgMatches, tz: &Tz) -> Result<Vec<ScheduledEvent>> {
    let plants: Vec<Plant> = read_records(path_arg(args, "plants")?)?;
    let harvests: Vec<Harvest> = read_records(path_arg(args, "harvests")?)?;
    Ok(projector(args)?.project_cultivation_events(&plants, &harvests, tz))
}

fn cultivation<Tz: TimeZone>(args: &ArgMatches, tz: &Tz) -> Result<String> {
    let events = sorted(cultivation_events(args, tz)?);
    if args.get_flag("json") {
        return json(&events);
    }

    let mut out = String::new();
    for event in &events {
        write!(out, "{}  ", event.date)?;
        event_line(&mut out, "", event)?;
    }
    if events.is_empty() {
        writeln!(out, "Nothing to schedule")?;
    }
    Ok(out)
}

fn audit<Tz: TimeZone>(args: &ArgMatches, now: &DateTime<Tz>) -> Result<String> {
    let reference = reference(args, now)?;
    let events = sorted(projector(args)?.project_audit_calendar(&reference));
    if args.get_flag("json") {
        return json(&events);
    }

    let mut out = String::new();
    for event in &events {
        write!(out, "{}  ", event.date)?;
        event_line(&mut out, "", event)?;
        if let Some(description) = &event.description {
            writeln!(out, "{:12}{description}", "")?;
        }
    }
    Ok(out)
}

/// Cultivation plus audit events for the calendar views
fn calendar_events<Tz: TimeZone>(args: &ArgMatches, reference: &DateTime<Tz>) -> Result<Vec<ScheduledEvent>> {
    let mut events = cultivation_events(args, &reference.timezone())?;
    events.extend(projector(args)?.project_audit_calendar(reference));
    Ok(sorted(events))
}

fn window<Tz: TimeZone>(args: &ArgMatches, now: &DateTime<Tz>) -> Result<String> {
    let reference = reference(args, now)?;
    let days = args.get_one::<i64>("days").copied().unwrap_or(7);
    let events = calendar_events(args, &reference)?;
    let buckets = window_events(&events, &reference, days);

    if args.get_flag("json") {
        return json(&buckets);
    }

    let mut out = String::new();
    for bucket in &buckets {
        writeln!(out, "{} {}", bucket.key, bucket.date().format("%a"))?;
        if bucket.is_empty() {
            writeln!(out, "  (nothing scheduled)")?;
        }
        for event in &bucket.events {
            event_line(&mut out, "  ", event)?;
        }
    }
    Ok(out)
}

fn month<Tz: TimeZone>(args: &ArgMatches, now: &DateTime<Tz>) -> Result<String> {
    let first = match args.get_one::<String>("month") {
        Some(raw) => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .with_context(|| format!("invalid --month '{raw}' (expected YYYY-MM)"))?,
        None => {
            let today = now.date_naive();
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .context("current month is out of range")?
        }
    };

    let events = calendar_events(args, now)?;
    let grid = MonthGrid::build(first.year(), first.month(), &events)
        .with_context(|| format!("cannot lay out {}", first.format("%Y-%m")))?;

    if args.get_flag("json") {
        return json(&grid);
    }

    let mut out = String::new();
    writeln!(out, "{:^27}", first.format("%B %Y").to_string())?;
    writeln!(out, "Su  Mo  Tu  We  Th  Fr  Sa")?;
    for week in &grid.weeks {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    return "  .".to_string();
                }
                let marker = if cell.events.is_empty() { ' ' } else { '*' };
                format!("{:>2}{marker}", cell.key.date().day())
            })
            .collect();
        writeln!(out, "{}", cells.join(" ").trim_end())?;
    }

    let listed: Vec<_> = grid.days().filter(|cell| !cell.events.is_empty()).collect();
    if !listed.is_empty() {
        writeln!(out)?;
    }
    for cell in listed {
        for event in &cell.events {
            write!(out, "{}  ", cell.key)?;
            event_line(&mut out, "", event)?;
        }
    }
    Ok(out)
}

fn turnaround(args: &ArgMatches) -> Result<String> {
    let events = read_events(path_arg(args, "events")?)?;
    let rows = lab_turnaround(&events);
    let average = average_hours(&rows);

    if args.get_flag("json") {
        return json(&serde_json::json!({
            "submissions": rows,
            "averageHours": average,
        }));
    }

    let mut out = String::new();
    writeln!(out, "{:<12}  {:<20}  {:<17}  TURNAROUND", "BATCH", "LAB", "SUBMITTED")?;
    for row in &rows {
        let submitted = row
            .submitted_at
            .map_or_else(|| PLACEHOLDER.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        let tat = row
            .hours()
            .map_or_else(|| "pending".to_string(), |h| format!("{h:.1} h"));
        writeln!(
            out,
            "{:<12}  {:<20}  {:<17}  {}",
            row.batch_id.as_deref().unwrap_or(PLACEHOLDER),
            row.lab.as_deref().unwrap_or(PLACEHOLDER),
            submitted,
            tat
        )?;
    }
    match average {
        Some(hours) => writeln!(out, "Average turnaround: {hours:.1} h")?,
        None => writeln!(out, "Average turnaround: n/a")?,
    }
    Ok(out)
}
