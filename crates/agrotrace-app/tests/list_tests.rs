// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use agrotrace_app::{
    Animal, AnimalFormInput, AnimalId, FilteredList, HealthStatus, ListError, ReadStatus,
    ReadingStats, RfidReading, SharedList,
};
use anyhow::Result;
use std::thread;
use time::macros::datetime;

fn animal(id: i64, name: &str, breed: &str, status: HealthStatus) -> Animal {
    tagged(AnimalId::from(id), name, breed, status)
}

fn tagged(id: AnimalId, name: &str, breed: &str, status: HealthStatus) -> Animal {
    AnimalFormInput {
        rfid: format!("RF-{}", name.to_uppercase()),
        name: name.to_owned(),
        breed: breed.to_owned(),
        age_months: 18,
        status,
        location: "Sector A - Pastoreo".to_owned(),
        weight: Some(350),
        observations: String::new(),
    }
    .into_animal(id, "#3B82F6")
}

fn reading(id: i64, location: &str, reader: &str, status: ReadStatus) -> RfidReading {
    RfidReading {
        id: id.into(),
        rfid_code: format!("RF-{id:08X}"),
        animal_id: AnimalId::from(id),
        animal_name: format!("Animal-{id:03}"),
        location: location.to_owned(),
        reader_id: reader.to_owned(),
        status,
        signal_strength: 80,
        scan_timestamp: datetime!(2026-01-12 07:45:10),
    }
}

#[test]
fn dashboard_session_keeps_master_and_view_consistent() -> Result<()> {
    let mut list = FilteredList::new();
    list.set_all(vec![
        animal(1, "Bessie", "Holstein", HealthStatus::Healthy),
        animal(2, "Duke", "Angus", HealthStatus::Critical),
        animal(3, "Daisy", "Holstein", HealthStatus::Observation),
    ]);

    let visible = list.apply_filters("", None, Some("Holstein"));
    assert_eq!(visible.len(), 2);

    list.insert(animal(4, "Clover", "Holstein", HealthStatus::Healthy))?;
    assert_eq!(
        list.filtered().ids(),
        vec![&AnimalId::from(4), &AnimalId::from(1), &AnimalId::from(3)]
    );

    let mut edit = AnimalFormInput::from(&list.master()[1]);
    edit.breed = "Jersey".to_owned();
    list.update_by_id(&AnimalId::from(1), edit)?;
    assert!(!list.filtered().iter().any(|cow| cow.name == "Bessie"));
    assert_eq!(list.len(), 4);

    let error = list
        .remove_by_id(&AnimalId::from(99))
        .expect_err("missing id should fail");
    assert_eq!(error, ListError::NotFound("99".to_owned()));

    list.remove_by_id(&AnimalId::from(3))?;
    let names = list
        .filtered()
        .iter()
        .map(|cow| cow.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Clover"]);
    Ok(())
}

#[test]
fn inserting_existing_string_id_leaves_roster_untouched() -> Result<()> {
    let mut list = FilteredList::with_records(vec![
        tagged(AnimalId::from("A-1"), "Bessie", "Holstein", HealthStatus::Healthy),
        animal(2, "Duke", "Angus", HealthStatus::Critical),
    ]);
    list.apply_filters("", Some("success"), None);
    let master_before = list.master().to_vec();
    let visible_before = list.filtered().to_vec();

    let impostor = tagged(AnimalId::from("A-1"), "Impostor", "Jersey", HealthStatus::Healthy);
    let error = list.insert(impostor).expect_err("A-1 is already in the roster");

    assert_eq!(error, ListError::DuplicateId("A-1".to_owned()));
    assert_eq!(error.to_string(), "record A-1 already exists");
    assert_eq!(list.master(), master_before.as_slice());
    assert_eq!(list.filtered().to_vec(), visible_before);
    let kept = list.get(&AnimalId::from("A-1")).map(|cow| cow.name.as_str());
    assert_eq!(kept, Some("Bessie"));
    Ok(())
}

#[test]
fn reading_log_filters_by_reader_status_and_location() -> Result<()> {
    let mut log = FilteredList::with_records(vec![
        reading(1, "Corral 1", "RFID-001", ReadStatus::Ok),
        reading(2, "Corral 1", "RFID-002", ReadStatus::ReadError),
        reading(3, "Establo Norte", "RFID-002", ReadStatus::WeakSignal),
        reading(4, "Báscula de Pesaje", "RFID-003", ReadStatus::Ok),
    ]);

    assert_eq!(log.apply_filters("rfid-002", None, None).len(), 2);
    assert_eq!(log.apply_filters("rfid-002", Some("danger"), None).len(), 1);
    assert_eq!(log.apply_filters("", None, Some("Corral 1")).len(), 2);
    assert_eq!(log.apply_filters("báscula", None, None).len(), 1);

    let stats = ReadingStats::from_readings(log.master());
    assert_eq!(stats.success_rate, 50);
    assert_eq!(stats.top_locations[0], ("Corral 1".to_owned(), 2));

    let error = log
        .insert(reading(4, "Salida/Carga", "RFID-008", ReadStatus::Ok))
        .expect_err("duplicate reading id should fail");
    assert!(error.to_string().contains("already exists"));
    Ok(())
}

#[test]
fn shared_roster_serializes_concurrent_inserts() {
    let shared = SharedList::new(FilteredList::<Animal>::new());
    shared.with(|list| {
        list.apply_filters("", Some("danger"), None);
    });

    let handles = (0..4_i64)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for offset in 0..25 {
                    let id = worker * 100 + offset;
                    let status = if offset % 5 == 0 {
                        HealthStatus::Critical
                    } else {
                        HealthStatus::Healthy
                    };
                    shared.with(|list| {
                        list.insert(animal(id, &format!("Animal-{id:03}"), "Brahman", status))
                            .map(|view| view.len())
                    })
                    .expect("ids are unique per worker");
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().expect("worker should join");
    }

    shared.with(|list| {
        assert_eq!(list.len(), 100);
        assert_eq!(list.filtered().len(), 20);
    });
}
