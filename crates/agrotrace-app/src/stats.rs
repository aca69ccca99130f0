// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::collections::HashMap;
use time::{Date, Duration, PrimitiveDateTime};

use crate::{Animal, CheckupStatus, HealthRecord, HealthStatus, ReadStatus, RfidReading};

const TOP_LOCATIONS: usize = 5;
/// Checkups due within this many days count as upcoming.
pub const DUE_SOON_DAYS: i64 = 30;

/// Herd totals for the dashboard header.
///
/// `avg_weight` only averages animals with a recorded weight, and
/// `recent_scans_24h` counts animals scanned in the 24 hours before `now`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HerdStats {
    pub total: usize,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
    pub quarantine: usize,
    pub healthy_percentage: u32,
    pub avg_weight: f64,
    pub vaccination_rate: f64,
    pub recent_scans_24h: usize,
}

impl HerdStats {
    pub fn from_animals<'a, I>(animals: I, now: PrimitiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Animal>,
    {
        let cutoff = now - Duration::hours(24);
        let mut stats = Self::default();
        let (mut weighed, mut weight_sum, mut vaccinated) = (0_u64, 0_u64, 0_usize);
        for animal in animals {
            stats.total += 1;
            match animal.status {
                HealthStatus::Healthy => stats.healthy += 1,
                HealthStatus::Observation => stats.warning += 1,
                HealthStatus::Critical => stats.critical += 1,
                HealthStatus::Quarantine => stats.quarantine += 1,
            }
            if let Some(weight) = animal.weight {
                weighed += 1;
                weight_sum += u64::from(weight);
            }
            if animal.vaccinated {
                vaccinated += 1;
            }
            if animal.last_scan.is_some_and(|scan| scan > cutoff) {
                stats.recent_scans_24h += 1;
            }
        }
        stats.healthy_percentage = rounded_percentage(stats.healthy, stats.total);
        if weighed > 0 {
            stats.avg_weight = one_decimal(weight_sum as f64 / weighed as f64);
        }
        if stats.total > 0 {
            stats.vaccination_rate = one_decimal(vaccinated as f64 * 100.0 / stats.total as f64);
        }
        stats
    }
}

/// Checkup totals for the health log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub urgent: usize,
    pub scheduled: usize,
    pub completion_rate: u32,
    pub due_soon: usize,
}

impl HealthStats {
    pub fn from_records<'a, I>(records: I, today: Date) -> Self
    where
        I: IntoIterator<Item = &'a HealthRecord>,
    {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            match record.status {
                CheckupStatus::Completed => stats.completed += 1,
                CheckupStatus::Pending => stats.pending += 1,
                CheckupStatus::Urgent => stats.urgent += 1,
                CheckupStatus::Scheduled => stats.scheduled += 1,
            }
            if record.checkup_due_within(today, DUE_SOON_DAYS) {
                stats.due_soon += 1;
            }
        }
        stats.completion_rate = rounded_percentage(stats.completed, stats.total);
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingStats {
    pub total: usize,
    pub successful: usize,
    pub errors: usize,
    pub weak_signal: usize,
    pub success_rate: u32,
    pub top_locations: Vec<(String, usize)>,
}

impl ReadingStats {
    pub fn from_readings<'a, I>(readings: I) -> Self
    where
        I: IntoIterator<Item = &'a RfidReading>,
    {
        let mut stats = Self::default();
        let mut by_location: HashMap<&str, usize> = HashMap::new();
        for reading in readings {
            stats.total += 1;
            match reading.status {
                ReadStatus::Ok => stats.successful += 1,
                ReadStatus::WeakSignal => stats.weak_signal += 1,
                ReadStatus::ReadError => stats.errors += 1,
            }
            *by_location.entry(reading.location.as_str()).or_default() += 1;
        }

        let mut locations = by_location
            .into_iter()
            .map(|(location, count)| (location.to_owned(), count))
            .collect::<Vec<_>>();
        locations.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
        locations.truncate(TOP_LOCATIONS);

        stats.success_rate = rounded_percentage(stats.successful, stats.total);
        stats.top_locations = locations;
        stats
    }
}

fn rounded_percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 100 + total / 2) / total) as u32
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
