// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use agrotrace_app::{
    AVATAR_COLORS, Activity, ActivityKind, Animal, AnimalId, CheckupStatus, HealthRecord,
    HealthStatus, ReadStatus, RfidReading,
};
use time::macros::datetime;
use time::{Duration, PrimitiveDateTime};

const BREEDS: [&str; 7] = [
    "Holstein",
    "Brahman",
    "Angus",
    "Simmental",
    "Charolais",
    "Hereford",
    "Jersey",
];

const PASTURE_LOCATIONS: [&str; 8] = [
    "Sector A - Pastoreo",
    "Sector B - Pastoreo",
    "Sector C - Alimentación",
    "Corral 1",
    "Corral 2",
    "Corral 3",
    "Zona Norte",
    "Zona Sur",
];

const READER_LOCATIONS: [&str; 14] = [
    "Entrada Principal",
    "Sector A - Pastoreo",
    "Sector B - Pastoreo",
    "Corral 1",
    "Corral 2",
    "Corral 3",
    "Establo Norte",
    "Establo Sur",
    "Zona de Alimentación",
    "Zona de Ordeño",
    "Báscula de Pesaje",
    "Clínica Veterinaria",
    "Zona de Cuarentena",
    "Salida/Carga",
];

const READERS: [&str; 8] = [
    "RFID-001", "RFID-002", "RFID-003", "RFID-004", "RFID-005", "RFID-006", "RFID-007", "RFID-008",
];

const NOTES: [&str; 5] = [
    "",
    "no observations",
    "vet check pending",
    "scheduled for vaccination",
    "under follow-up",
];

const STAFF: [&str; 4] = ["Admin", "Veterinario", "Operador", "Sistema"];

const VACCINES: [&str; 8] = [
    "Foot-and-mouth",
    "Brucellosis",
    "Rabies",
    "Anthrax",
    "Clostridial",
    "IBR/BVD",
    "Leptospirosis",
    "Triple",
];

const TREATMENTS: [&str; 9] = [
    "Internal deworming",
    "External deworming",
    "General antibiotic",
    "Vitamins and minerals",
    "Respiratory treatment",
    "Digestive treatment",
    "Wound healing",
    "Tick control",
    "None",
];

const VETERINARIANS: [&str; 5] = [
    "Dr. García",
    "Dra. Martínez",
    "Dr. López",
    "Dra. Fernández",
    "Dr. Rodríguez",
];

const DIAGNOSES: [&str; 6] = [
    "Healthy",
    "Mild parasitosis",
    "Recovering",
    "Routine check",
    "Preventive treatment",
    "Normal",
];

const CHECKUP_NOTES: [&str; 8] = [
    "Optimal condition",
    "Follow up in 15 days",
    "Schedule next vaccination",
    "Weight control advised",
    "No observations",
    "Review feeding",
    "Monitor temperature",
    "",
];

// Cumulative weights out of 100: completed 60, pending 20, urgent 10 and
// the remainder scheduled.
const CHECKUP_WEIGHTS: [(usize, CheckupStatus); 3] = [
    (60, CheckupStatus::Completed),
    (80, CheckupStatus::Pending),
    (90, CheckupStatus::Urgent),
];

// Cumulative weights out of 100 for healthy, observation and critical;
// the remainder is quarantine.
const STATUS_WEIGHTS: [(usize, HealthStatus); 3] = [
    (75, HealthStatus::Healthy),
    (87, HealthStatus::Observation),
    (95, HealthStatus::Critical),
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for herds, RFID readings and activity entries. The same
/// seed always yields the same data, anchored at [`reference_now`].
#[derive(Debug, Clone)]
pub struct HerdFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl HerdFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// Animal number `index`, 1-based, with id `index` and code `AG{index}`.
    pub fn animal(&mut self, index: usize) -> Animal {
        let status = self.health_status();
        let minutes_ago = self.int_range_i64(1, 4_320);
        Animal {
            id: AnimalId::from(index as i64),
            code: format!("AG{index:04}"),
            rfid: format!("RF-{:08X}", self.rng.next_u64() as u32),
            name: format!("Animal-{index:03}"),
            breed: self.pick(&BREEDS).to_owned(),
            age_months: self.int_range_u32(8, 84),
            weight: Some(self.int_range_u32(180, 650)),
            status,
            location: self.pick(&PASTURE_LOCATIONS).to_owned(),
            last_scan: Some(reference_now() - Duration::minutes(minutes_ago)),
            vaccinated: self.rng.bool(),
            observations: self.pick(&NOTES).to_owned(),
            avatar_color: self.pick(&AVATAR_COLORS).to_owned(),
        }
    }

    pub fn herd(&mut self, count: usize) -> Vec<Animal> {
        (1..=count).map(|index| self.animal(index)).collect()
    }

    /// Scans spread over the week before [`reference_now`]. Returns nothing
    /// for an empty herd.
    pub fn rfid_readings(&mut self, animals: &[Animal], count: usize) -> Vec<RfidReading> {
        if animals.is_empty() {
            return Vec::new();
        }
        (1..=count)
            .map(|index| {
                let animal = &animals[self.rng.int_n(animals.len())];
                let status = self.read_status();
                let signal_strength = match status {
                    ReadStatus::Ok => self.int_range_u32(45, 100),
                    ReadStatus::WeakSignal | ReadStatus::ReadError => self.int_range_u32(20, 60),
                };
                let seconds_ago = self.int_range_i64(0, 7 * 86_400 + 86_399);
                RfidReading {
                    id: (index as i64).into(),
                    rfid_code: animal.rfid.clone(),
                    animal_id: animal.id.clone(),
                    animal_name: animal.name.clone(),
                    location: self.pick(&READER_LOCATIONS).to_owned(),
                    reader_id: self.pick(&READERS).to_owned(),
                    status,
                    signal_strength: signal_strength as u8,
                    scan_timestamp: reference_now() - Duration::seconds(seconds_ago),
                }
            })
            .collect()
    }

    /// Activity from the last twelve hours, newest first.
    pub fn activities(&mut self, animals: &[Animal], count: usize) -> Vec<Activity> {
        if animals.is_empty() {
            return Vec::new();
        }
        let mut activities = (1..=count)
            .map(|index| {
                let animal = &animals[self.rng.int_n(animals.len())];
                let kind = ActivityKind::ALL[self.rng.int_n(ActivityKind::ALL.len())];
                let minutes_ago = self.int_range_i64(1, 720);
                Activity {
                    id: format!("act-{index:04}"),
                    kind,
                    message: self.activity_message(kind, animal),
                    user: self.pick(&STAFF).to_owned(),
                    timestamp: reference_now() - Duration::minutes(minutes_ago),
                }
            })
            .collect::<Vec<_>>();
        activities.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        activities
    }

    /// Checkups from the last six months, newest first, each with a next
    /// visit 15 to 90 days after [`reference_now`].
    pub fn health_records(&mut self, animals: &[Animal], count: usize) -> Vec<HealthRecord> {
        if animals.is_empty() {
            return Vec::new();
        }
        let today = reference_now().date();
        let mut records = (1..=count)
            .map(|index| {
                let animal = &animals[self.rng.int_n(animals.len())];
                let status = self.checkup_status();
                let weight_delta = self.int_range_i64(-20, 30);
                HealthRecord {
                    id: (index as i64).into(),
                    animal_id: animal.id.clone(),
                    animal_name: animal.name.clone(),
                    breed: animal.breed.clone(),
                    checkup_date: today - Duration::days(self.int_range_i64(0, 180)),
                    next_checkup: today + Duration::days(self.int_range_i64(15, 90)),
                    weight: animal.weight.map(|weight| {
                        u32::try_from(i64::from(weight) + weight_delta).unwrap_or(weight)
                    }),
                    temperature: f64::from(self.int_range_u32(375, 398)) / 10.0,
                    heart_rate: self.int_range_u32(55, 85),
                    respiratory_rate: self.int_range_u32(20, 40),
                    status,
                    vaccine: self.pick(&VACCINES).to_owned(),
                    treatment: self.pick(&TREATMENTS).to_owned(),
                    veterinarian: self.pick(&VETERINARIANS).to_owned(),
                    diagnosis: self.pick(&DIAGNOSES).to_owned(),
                    observations: self.pick(&CHECKUP_NOTES).to_owned(),
                    cost: f64::from(self.int_range_u32(1_500_000, 8_500_000)) / 100.0,
                }
            })
            .collect::<Vec<_>>();
        records.sort_by(|left, right| right.checkup_date.cmp(&left.checkup_date));
        records
    }

    fn activity_message(&mut self, kind: ActivityKind, animal: &Animal) -> String {
        let name = &animal.name;
        match kind {
            ActivityKind::Scan => {
                format!("RFID scan: {name} at {}", self.pick(&PASTURE_LOCATIONS))
            }
            ActivityKind::Health => format!("Health alert: {name} needs attention"),
            ActivityKind::Vaccination => format!("Vaccination done: {name}"),
            ActivityKind::Movement => {
                format!("Moved: {name} to {}", self.pick(&PASTURE_LOCATIONS))
            }
            ActivityKind::Weight => match animal.weight {
                Some(weight) => format!("Weighed: {name} - {weight}kg"),
                None => format!("Weighed: {name}"),
            },
            ActivityKind::Treatment => format!("Treatment started: {name}"),
        }
    }

    fn health_status(&mut self) -> HealthStatus {
        let roll = self.rng.int_n(100);
        STATUS_WEIGHTS
            .iter()
            .find(|(bound, _)| roll < *bound)
            .map_or(HealthStatus::Quarantine, |(_, status)| *status)
    }

    fn checkup_status(&mut self) -> CheckupStatus {
        let roll = self.rng.int_n(100);
        CHECKUP_WEIGHTS
            .iter()
            .find(|(bound, _)| roll < *bound)
            .map_or(CheckupStatus::Scheduled, |(_, status)| *status)
    }

    fn read_status(&mut self) -> ReadStatus {
        match self.rng.int_n(6) {
            0..=3 => ReadStatus::Ok,
            4 => ReadStatus::ReadError,
            _ => ReadStatus::WeakSignal,
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (self.rng.next_u64() % span) as u32
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// Fixed clock every generated timestamp is measured back from.
pub fn reference_now() -> PrimitiveDateTime {
    datetime!(2026-01-15 12:00)
}

pub fn breeds() -> &'static [&'static str] {
    &BREEDS
}

pub fn pasture_locations() -> &'static [&'static str] {
    &PASTURE_LOCATIONS
}

pub fn veterinarians() -> &'static [&'static str] {
    &VETERINARIANS
}
