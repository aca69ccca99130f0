// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, PrimitiveDateTime};

use crate::forms::AnimalFormInput;
use crate::ids::*;
use crate::record::Record;

time::serde::format_description!(
    naive_iso,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

time::serde::format_description!(
    scan_time,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);

time::serde::format_description!(calendar_day, Date, "[year]-[month]-[day]");

pub const AVATAR_COLORS: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];

pub fn avatar_color(sequence: usize) -> &'static str {
    AVATAR_COLORS[sequence % AVATAR_COLORS.len()]
}

// Status badges arrive either as a bare class string or as the full
// `{name, class, color}` object the dashboard API emits.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBadge {
    Class(String),
    Badge { class: String },
}

impl RawBadge {
    fn into_class(self) -> String {
        match self {
            Self::Class(class) | Self::Badge { class } => class,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Observation,
    Critical,
    Quarantine,
}

impl HealthStatus {
    pub const ALL: [Self; 4] = [
        Self::Healthy,
        Self::Observation,
        Self::Critical,
        Self::Quarantine,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "success",
            Self::Observation => "warning",
            Self::Critical => "danger",
            Self::Quarantine => "info",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Observation => "under observation",
            Self::Critical => "critical",
            Self::Quarantine => "quarantine",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Healthy),
            "warning" => Some(Self::Observation),
            "danger" => Some(Self::Critical),
            "info" => Some(Self::Quarantine),
            _ => None,
        }
    }

    /// Unknown classes read as healthy, the same default the edit form uses.
    pub fn parse_or_healthy(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Healthy)
    }
}

impl Serialize for HealthStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HealthStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawBadge::deserialize(deserializer).map(|raw| Self::parse_or_healthy(&raw.into_class()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    #[serde(default)]
    pub code: String,
    pub rfid: String,
    pub name: String,
    pub breed: String,
    #[serde(default)]
    pub age_months: u32,
    #[serde(default)]
    pub weight: Option<u32>,
    pub status: HealthStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default, with = "naive_iso::option")]
    pub last_scan: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(default)]
    pub observations: String,
    #[serde(default, rename = "avatarColor")]
    pub avatar_color: String,
}

impl Animal {
    pub fn age_display(&self) -> String {
        let years = self.age_months / 12;
        let months = self.age_months % 12;
        if years == 0 {
            format!("{months}m")
        } else {
            format!("{years}y {months}m")
        }
    }
}

impl Record for Animal {
    type Id = AnimalId;
    type Patch = AnimalFormInput;

    fn id(&self) -> &AnimalId {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.rfid.as_str(),
            self.name.as_str(),
            self.breed.as_str(),
            self.location.as_str(),
        ]
    }

    fn status_tag(&self) -> &str {
        self.status.as_str()
    }

    fn group_tag(&self) -> &str {
        &self.breed
    }

    fn apply_patch(&mut self, patch: AnimalFormInput) {
        patch.apply_to(self);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadStatus {
    Ok,
    WeakSignal,
    ReadError,
}

impl ReadStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::WeakSignal => "warning",
            Self::ReadError => "danger",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::WeakSignal => "weak signal",
            Self::ReadError => "read error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Ok),
            "warning" => Some(Self::WeakSignal),
            "danger" => Some(Self::ReadError),
            _ => None,
        }
    }
}

impl Serialize for ReadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let class = RawBadge::deserialize(deserializer)?.into_class();
        Self::parse(&class)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown read status {class:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfidReading {
    pub id: ReadingId,
    pub rfid_code: String,
    pub animal_id: AnimalId,
    pub animal_name: String,
    pub location: String,
    pub reader_id: String,
    pub status: ReadStatus,
    #[serde(default)]
    pub signal_strength: u8,
    #[serde(with = "scan_time")]
    pub scan_timestamp: PrimitiveDateTime,
}

impl Record for RfidReading {
    type Id = ReadingId;
    type Patch = RfidReading;

    fn id(&self) -> &ReadingId {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.rfid_code.as_str(),
            self.animal_name.as_str(),
            self.location.as_str(),
            self.reader_id.as_str(),
        ]
    }

    fn status_tag(&self) -> &str {
        self.status.as_str()
    }

    fn group_tag(&self) -> &str {
        &self.location
    }

    fn apply_patch(&mut self, patch: RfidReading) {
        *self = RfidReading {
            id: self.id.clone(),
            ..patch
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckupStatus {
    Completed,
    Pending,
    Urgent,
    Scheduled,
}

impl CheckupStatus {
    pub const ALL: [Self; 4] = [Self::Completed, Self::Pending, Self::Urgent, Self::Scheduled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "success",
            Self::Pending => "warning",
            Self::Urgent => "danger",
            Self::Scheduled => "info",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Urgent => "urgent",
            Self::Scheduled => "scheduled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl Serialize for CheckupStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckupStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let class = RawBadge::deserialize(deserializer)?.into_class();
        Self::parse(&class)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown checkup status {class:?}")))
    }
}

/// One veterinary visit: vitals, the vaccine and treatment given, and when
/// the animal is due back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: HealthRecordId,
    pub animal_id: AnimalId,
    pub animal_name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(with = "calendar_day")]
    pub checkup_date: Date,
    #[serde(with = "calendar_day")]
    pub next_checkup: Date,
    #[serde(default)]
    pub weight: Option<u32>,
    pub temperature: f64,
    #[serde(default)]
    pub heart_rate: u32,
    #[serde(default)]
    pub respiratory_rate: u32,
    pub status: CheckupStatus,
    pub vaccine: String,
    pub treatment: String,
    pub veterinarian: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub cost: f64,
}

impl HealthRecord {
    /// True when the next checkup is on or before `today + days`, overdue
    /// visits included.
    pub fn checkup_due_within(&self, today: Date, days: i64) -> bool {
        self.next_checkup <= today + Duration::days(days)
    }
}

impl Record for HealthRecord {
    type Id = HealthRecordId;
    type Patch = HealthRecord;

    fn id(&self) -> &HealthRecordId {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.animal_name.as_str(),
            self.vaccine.as_str(),
            self.treatment.as_str(),
            self.veterinarian.as_str(),
            self.diagnosis.as_str(),
        ]
    }

    fn status_tag(&self) -> &str {
        self.status.as_str()
    }

    fn group_tag(&self) -> &str {
        &self.veterinarian
    }

    fn apply_patch(&mut self, patch: HealthRecord) {
        *self = HealthRecord {
            id: self.id.clone(),
            ..patch
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Scan,
    Health,
    Vaccination,
    Movement,
    Weight,
    Treatment,
}

impl ActivityKind {
    pub const ALL: [Self; 6] = [
        Self::Scan,
        Self::Health,
        Self::Vaccination,
        Self::Movement,
        Self::Weight,
        Self::Treatment,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Health => "health",
            Self::Vaccination => "vaccination",
            Self::Movement => "movement",
            Self::Weight => "weight",
            Self::Treatment => "treatment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    #[serde(default)]
    pub user: String,
    #[serde(with = "naive_iso")]
    pub timestamp: PrimitiveDateTime,
}
