// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use agrotrace_app::{
    ActivityFeed, Animal, CheckupStatus, HealthRecord, HealthStatus, HerdStats, Page, ReadStatus,
    RfidReading, RosterCommand, RosterState,
};
use agrotrace_feed::{Client, DataSource, load_activity, load_roster};
use agrotrace_testkit::{HerdFaker, reference_now};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::fmt::Write as _;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::logs::LogView;

/// Scans kept in the generated RFID log.
pub const READING_LOG_SIZE: usize = 200;
/// Checkups kept in the generated health log.
pub const HEALTH_LOG_SIZE: usize = 120;

/// Dataset rendered by one run of the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Roster,
    Readings,
    Health,
    Activity,
}

impl View {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Readings => "readings",
            Self::Health => "health",
            Self::Activity => "activity",
        }
    }

    /// Flag that narrows this view by its group column.
    pub const fn group_flag(self) -> Option<&'static str> {
        match self {
            Self::Roster => Some("--breed"),
            Self::Readings => Some("--location"),
            Self::Health => Some("--vet"),
            Self::Activity => None,
        }
    }

    /// Resolves a `--status` value to the badge class of this view's records.
    pub fn status_class(self, raw: &str) -> Result<&'static str> {
        match self {
            Self::Roster => parse_status_filter(raw).map(HealthStatus::as_str),
            Self::Readings => parse_read_status(raw).map(ReadStatus::as_str),
            Self::Health => parse_checkup_status(raw).map(CheckupStatus::as_str),
            Self::Activity => bail!(
                "--status does not apply to --activity; filter the roster, --readings or --health"
            ),
        }
    }
}

/// Filters and page requested on the command line. `status` is a badge
/// class already checked against the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<&'static str>,
    pub group: Option<String>,
    pub page: usize,
}

#[derive(Debug, Serialize)]
struct RosterReport<'a> {
    source: &'static str,
    stats: HerdStats,
    page: Page<&'a Animal>,
}

/// The loaded herd plus everything derived from it for one run.
pub struct Dashboard {
    roster: RosterState,
    source: DataSource,
    seed: u64,
}

impl Dashboard {
    /// Loads the herd from `client`, or the seeded demo herd when there is
    /// none or the fetch fails.
    pub fn load(client: Option<&Client>, page_size: usize, herd_size: usize, seed: u64) -> Self {
        let (animals, source) = load_roster(client, || HerdFaker::new(seed).herd(herd_size));
        let mut roster = RosterState::new(page_size);
        roster.load(animals);
        tracing::info!(
            source = source.as_str(),
            animals = roster.animals().len(),
            "roster loaded"
        );
        Self {
            roster,
            source,
            seed,
        }
    }

    pub fn roster(&self) -> &RosterState {
        &self.roster
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Clock the roster's scan times are measured against.
    pub fn now(&self) -> PrimitiveDateTime {
        clock(self.source)
    }

    pub fn apply(&mut self, query: &ListQuery) -> Result<()> {
        if let Some(search) = &query.search {
            self.roster.dispatch(RosterCommand::Search(search.clone()))?;
        }
        if let Some(class) = query.status {
            let status = HealthStatus::parse(class);
            self.roster.dispatch(RosterCommand::FilterStatus(status))?;
        }
        if query.group.is_some() {
            self.roster.dispatch(RosterCommand::FilterBreed(query.group.clone()))?;
        }
        while self.roster.page() < query.page {
            if self.roster.dispatch(RosterCommand::NextPage)?.is_empty() {
                tracing::debug!(
                    requested = query.page,
                    last = self.roster.page(),
                    "requested page past the end"
                );
                break;
            }
        }
        Ok(())
    }

    /// RFID scans generated for the loaded herd. The dashboard API has no
    /// reading endpoint, so this log is always generated.
    pub fn reading_log(&self) -> LogView<RfidReading> {
        let readings = HerdFaker::new(self.seed).rfid_readings(self.herd(), READING_LOG_SIZE);
        LogView::new(readings, self.roster.page_size())
    }

    /// Veterinary checkups generated for the loaded herd.
    pub fn health_log(&self) -> LogView<HealthRecord> {
        let records = HerdFaker::new(self.seed).health_records(self.herd(), HEALTH_LOG_SIZE);
        LogView::new(records, self.roster.page_size())
    }

    /// The newest `limit` activity entries from the feed, or generated ones
    /// for the loaded herd. The returned clock matches the entries' source.
    pub fn activity(
        &self,
        client: Option<&Client>,
        limit: usize,
    ) -> (ActivityFeed, DataSource, PrimitiveDateTime) {
        let (entries, source) = load_activity(client, limit, || {
            HerdFaker::new(self.seed).activities(self.herd(), limit)
        });
        let mut feed = ActivityFeed::with_capacity(limit);
        feed.replace(entries);
        (feed, source, clock(source))
    }

    pub fn render_table(&self) -> String {
        let page = self.roster.current_page();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:<12} {:<10} {:>7} {:>7}  {:<17} {}",
            "ID", "RFID", "NAME", "BREED", "AGE", "WEIGHT", "STATUS", "LOCATION"
        );
        for animal in &page.items {
            let weight = animal
                .weight
                .map_or_else(|| "-".to_owned(), |weight| format!("{weight}kg"));
            let _ = writeln!(
                out,
                "{:<10} {:<12} {:<12} {:<10} {:>7} {:>7}  {:<17} {}",
                animal.id,
                animal.rfid,
                animal.name,
                animal.breed,
                animal.age_display(),
                weight,
                animal.status.label(),
                animal.location,
            );
        }
        if page.is_empty() {
            out.push_str("no animals match the current filters\n");
        }
        let _ = writeln!(
            out,
            "page {}/{} - showing {} of {} matching, {} in herd ({} data)",
            page.page,
            page.pages.max(1),
            page.items.len(),
            page.total,
            self.roster.animals().len(),
            self.source.as_str(),
        );
        out
    }

    pub fn render_stats(&self) -> String {
        let stats = self.roster.stats(self.now());
        format!(
            "herd: {} animals, {} healthy ({}%), {} under observation, {} critical, {} in quarantine\n\
             avg weight {:.1}kg, {:.1}% vaccinated, {} scanned in the last 24h\n",
            stats.total,
            stats.healthy,
            stats.healthy_percentage,
            stats.warning,
            stats.critical,
            stats.quarantine,
            stats.avg_weight,
            stats.vaccination_rate,
            stats.recent_scans_24h,
        )
    }

    pub fn render_json(&self) -> Result<String> {
        let report = RosterReport {
            source: self.source.as_str(),
            stats: self.roster.stats(self.now()),
            page: self.roster.current_page(),
        };
        serde_json::to_string_pretty(&report).context("encode roster report")
    }

    fn herd(&self) -> &[Animal] {
        self.roster.animals().master()
    }
}

// Generated data is anchored at the generator's fixed clock; live data is
// measured against the local wall clock, as the dashboard server stamps it.
fn clock(source: DataSource) -> PrimitiveDateTime {
    match source {
        DataSource::Fallback => reference_now(),
        DataSource::Remote => {
            let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
            PrimitiveDateTime::new(now.date(), now.time())
        }
    }
}

/// Accepts a status class (`success`) or its plain name (`healthy`).
pub fn parse_status_filter(raw: &str) -> Result<HealthStatus> {
    let normalized = raw.trim().to_lowercase();
    if let Some(status) = HealthStatus::parse(&normalized) {
        return Ok(status);
    }
    match normalized.as_str() {
        "healthy" => Ok(HealthStatus::Healthy),
        "observation" | "under-observation" => Ok(HealthStatus::Observation),
        "critical" | "treatment" => Ok(HealthStatus::Critical),
        "quarantine" => Ok(HealthStatus::Quarantine),
        _ => bail!(
            "unknown status {raw:?}; use one of healthy, observation, critical, quarantine"
        ),
    }
}

fn parse_read_status(raw: &str) -> Result<ReadStatus> {
    let normalized = raw.trim().to_lowercase();
    if let Some(status) = ReadStatus::parse(&normalized) {
        return Ok(status);
    }
    match normalized.as_str() {
        "ok" => Ok(ReadStatus::Ok),
        "weak" | "weak-signal" => Ok(ReadStatus::WeakSignal),
        "error" | "read-error" => Ok(ReadStatus::ReadError),
        _ => bail!("unknown read status {raw:?}; use one of ok, weak, error"),
    }
}

fn parse_checkup_status(raw: &str) -> Result<CheckupStatus> {
    let normalized = raw.trim().to_lowercase();
    CheckupStatus::parse(&normalized)
        .or_else(|| {
            CheckupStatus::ALL
                .into_iter()
                .find(|status| status.label() == normalized)
        })
        .with_context(|| {
            format!(
                "unknown checkup status {raw:?}; use one of completed, pending, urgent, scheduled"
            )
        })
}
