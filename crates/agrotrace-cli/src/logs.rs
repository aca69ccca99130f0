// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use agrotrace_app::{
    Activity, ActivityFeed, DUE_SOON_DAYS, FilteredList, HealthRecord, HealthStats, Page,
    ReadingStats, Record, RfidReading, page_count, time_ago,
};
use agrotrace_feed::DataSource;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use time::{Date, PrimitiveDateTime};

use crate::runtime::ListQuery;

/// A generated log, filtered and paged for one run.
pub struct LogView<R> {
    log: FilteredList<R>,
    page: usize,
    page_size: usize,
}

impl<R: Record> LogView<R> {
    pub fn new(records: Vec<R>, page_size: usize) -> Self {
        Self {
            log: FilteredList::with_records(records),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn log(&self) -> &FilteredList<R> {
        &self.log
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Filters the log, then moves to the requested page clamped to the
    /// last one.
    pub fn apply(&mut self, query: &ListQuery) {
        let visible = self
            .log
            .apply_filters(
                query.search.as_deref().unwrap_or_default(),
                query.status,
                query.group.as_deref(),
            )
            .len();
        let last = page_count(visible, self.page_size).max(1);
        self.page = query.page.clamp(1, last);
    }

    pub fn current_page(&self) -> Page<&R> {
        self.log.filtered().page(self.page, self.page_size)
    }

    fn footer(&self, out: &mut String, noun: &str) {
        let page = self.current_page();
        if page.is_empty() {
            let _ = writeln!(out, "no {noun} match the current filters");
        }
        let _ = writeln!(
            out,
            "page {}/{} - showing {} of {} matching, {} in log (generated data)",
            page.page,
            page.pages.max(1),
            page.items.len(),
            page.total,
            self.log.len(),
        );
    }
}

#[derive(Debug, Serialize)]
struct LogReport<'a, S, R> {
    source: &'static str,
    stats: S,
    page: Page<&'a R>,
}

fn encode<S, R>(view: &LogView<R>, stats: S, what: &str) -> Result<String>
where
    S: Serialize,
    R: Record + Serialize,
{
    let report = LogReport {
        source: "generated",
        stats,
        page: view.current_page(),
    };
    serde_json::to_string_pretty(&report).with_context(|| format!("encode {what} report"))
}

fn minute(at: PrimitiveDateTime) -> String {
    format!("{} {:02}:{:02}", at.date(), at.hour(), at.minute())
}

pub fn render_readings(view: &LogView<RfidReading>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<16} {:<12} {:<12} {:<22} {:<9} {:<11} {:>6}",
        "ID", "SCANNED", "RFID", "ANIMAL", "LOCATION", "READER", "STATUS", "SIGNAL"
    );
    for reading in &view.current_page().items {
        let _ = writeln!(
            out,
            "{:<6} {:<16} {:<12} {:<12} {:<22} {:<9} {:<11} {:>5}%",
            reading.id,
            minute(reading.scan_timestamp),
            reading.rfid_code,
            reading.animal_name,
            reading.location,
            reading.reader_id,
            reading.status.label(),
            reading.signal_strength,
        );
    }
    view.footer(&mut out, "readings");
    out
}

pub fn render_reading_stats(log: &FilteredList<RfidReading>) -> String {
    let stats = ReadingStats::from_readings(log.master());
    let top = stats
        .top_locations
        .iter()
        .map(|(location, count)| format!("{location} ({count})"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "readings: {} total, {} ok ({}%), {} weak signal, {} read errors\ntop locations: {}\n",
        stats.total, stats.successful, stats.success_rate, stats.weak_signal, stats.errors, top,
    )
}

pub fn render_readings_json(view: &LogView<RfidReading>) -> Result<String> {
    let stats = ReadingStats::from_readings(view.log().master());
    encode(view, stats, "reading log")
}

pub fn render_health(view: &LogView<HealthRecord>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<10} {:<12} {:<15} {:<22} {:<15} {:<10} {:>6} {}",
        "ID", "DATE", "ANIMAL", "VACCINE", "TREATMENT", "VET", "STATUS", "TEMP", "NEXT"
    );
    for record in &view.current_page().items {
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:<12} {:<15} {:<22} {:<15} {:<10} {:>5.1}C {}",
            record.id,
            record.checkup_date,
            record.animal_name,
            record.vaccine,
            record.treatment,
            record.veterinarian,
            record.status.label(),
            record.temperature,
            record.next_checkup,
        );
    }
    view.footer(&mut out, "checkups");
    out
}

pub fn render_health_stats(log: &FilteredList<HealthRecord>, today: Date) -> String {
    let stats = HealthStats::from_records(log.master(), today);
    format!(
        "health: {} checkups, {} completed ({}%), {} pending, {} urgent, {} scheduled, {} due within {} days\n",
        stats.total,
        stats.completed,
        stats.completion_rate,
        stats.pending,
        stats.urgent,
        stats.scheduled,
        stats.due_soon,
        DUE_SOON_DAYS,
    )
}

pub fn render_health_json(view: &LogView<HealthRecord>, today: Date) -> Result<String> {
    let stats = HealthStats::from_records(view.log().master(), today);
    encode(view, stats, "health log")
}

#[derive(Debug, Serialize)]
struct ActivityLine<'a> {
    #[serde(flatten)]
    entry: &'a Activity,
    time_ago: String,
}

#[derive(Debug, Serialize)]
struct ActivityReport<'a> {
    source: &'static str,
    entries: Vec<ActivityLine<'a>>,
}

pub fn render_activity(feed: &ActivityFeed, source: DataSource, now: PrimitiveDateTime) -> String {
    let mut out = String::new();
    for entry in feed.iter() {
        let _ = write!(
            out,
            "{:>15}  {:<11} {}",
            time_ago(now, entry.timestamp),
            entry.kind.as_str(),
            entry.message
        );
        if !entry.user.is_empty() {
            let _ = write!(out, " ({})", entry.user);
        }
        out.push('\n');
    }
    if feed.is_empty() {
        out.push_str("no recent activity\n");
    }
    let _ = writeln!(out, "{} entries ({} data)", feed.len(), source.as_str());
    out
}

pub fn render_activity_json(
    feed: &ActivityFeed,
    source: DataSource,
    now: PrimitiveDateTime,
) -> Result<String> {
    let report = ActivityReport {
        source: source.as_str(),
        entries: feed
            .iter()
            .map(|entry| ActivityLine {
                entry,
                time_ago: time_ago(now, entry.timestamp),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).context("encode activity report")
}
