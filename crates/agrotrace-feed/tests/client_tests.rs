// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use agrotrace_app::{ActivityKind, AnimalFormInput, AnimalId, HealthStatus};
use agrotrace_feed::{Client, DataSource, load_activity, load_roster};
use anyhow::{Result, anyhow};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: String, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn animal_json(id: usize) -> String {
    format!(
        r##"{{"id": {id}, "code": "AG{id:04}", "rfid": "RF-{id:08X}", "name": "Animal-{id:03}",
            "breed": "Angus", "age_months": 20, "weight": 400,
            "status": {{"name": "Saludable", "class": "success", "color": "green"}},
            "location": "Corral 1", "last_scan": "2026-01-14T08:00:00", "vaccinated": false,
            "avatarColor": "#3B82F6"}}"##
    )
}

fn fallback_herd() -> Vec<agrotrace_app::Animal> {
    vec![
        AnimalFormInput {
            rfid: "RF-FALLBACK".to_owned(),
            name: "Fallback".to_owned(),
            breed: "Jersey".to_owned(),
            age_months: 10,
            status: HealthStatus::Healthy,
            location: "Corral 3".to_owned(),
            weight: None,
            observations: String::new(),
        }
        .into_animal(AnimalId::from(1), "#10B981"),
    ]
}

#[test]
fn unreachable_server_error_names_remediation() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .fetch_animals()
        .expect_err("fetch should fail for unreachable endpoint");
    assert!(error.to_string().contains("feed.enabled = false"));
}

#[test]
fn fetch_animals_walks_every_page() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        for page in 1..=2_usize {
            let request = server.recv().expect("request expected");
            assert_eq!(
                request.url(),
                format!("/api/animals?page={page}&per_page=100")
            );
            let (ids, has_next) = if page == 1 {
                (vec![1, 2], true)
            } else {
                (vec![3], false)
            };
            let data = ids.into_iter().map(animal_json).collect::<Vec<_>>().join(",");
            let body = format!(
                r#"{{"success": true, "data": [{data}],
                    "pagination": {{"page": {page}, "per_page": 100, "total": 3, "pages": 2,
                                    "has_next": {has_next}, "has_prev": {}}}}}"#,
                page > 1
            );
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let animals = client.fetch_animals()?;
    let names = animals
        .iter()
        .map(|animal| animal.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Animal-001", "Animal-002", "Animal-003"]);
    assert_eq!(animals[2].id, AnimalId::from(3));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unsuccessful_envelope_is_an_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = r#"{"success": false, "error": "database offline"}"#.to_owned();
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_animals()
        .expect_err("success=false should fail");
    assert!(error.to_string().contains("database offline"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn http_error_status_surfaces_server_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = r#"{"success": false, "error": "Endpoint no encontrado"}"#.to_owned();
        request
            .respond(json_response(body, 404))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client.fetch_activity(5).expect_err("404 should fail");
    assert_eq!(error.to_string(), "server error (404): Endpoint no encontrado");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_activity_decodes_entries() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/activity/feed?limit=2");
        let body = r#"{"success": true, "data": [
            {"id": "a1", "type": "vaccination", "icon": "syringe", "color": "green",
             "message": "Vacunación completada: Animal-004",
             "timestamp": "2026-01-14T09:30:00.250000", "time_ago": "Hace 5 minutos",
             "user": "Veterinario"},
            {"id": "a2", "type": "scan", "message": "Escaneo RFID: Animal-010 en Corral 1",
             "timestamp": "2026-01-14T09:00:00"}
        ]}"#
        .to_owned();
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let activity = client.fetch_activity(2)?;
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].kind, ActivityKind::Vaccination);
    assert_eq!(activity[0].user, "Veterinario");
    assert!(activity[1].user.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn ping_reports_total_from_pagination() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/animals?page=1&per_page=1");
        let body = format!(
            r#"{{"success": true, "data": [{}],
                "pagination": {{"page": 1, "per_page": 1, "total": 155, "pages": 155,
                                "has_next": true, "has_prev": false}}}}"#,
            animal_json(1)
        );
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    assert_eq!(client.ping()?, 155);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn load_roster_prefers_remote_herd() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = format!(r#"{{"success": true, "data": [{}]}}"#, animal_json(7));
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let (animals, source) = load_roster(Some(&client), fallback_herd);
    assert_eq!(source, DataSource::Remote);
    assert_eq!(animals.len(), 1);
    assert_eq!(animals[0].name, "Animal-007");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn load_roster_falls_back_when_unreachable_or_disabled() -> Result<()> {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))?;
    let (animals, source) = load_roster(Some(&client), fallback_herd);
    assert_eq!(source, DataSource::Fallback);
    assert_eq!(animals[0].name, "Fallback");

    let (animals, source) = load_roster(None, fallback_herd);
    assert_eq!(source, DataSource::Fallback);
    assert_eq!(animals.len(), 1);
    Ok(())
}

#[test]
fn load_activity_uses_feed_then_falls_back_on_server_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("first request expected");
        assert_eq!(request.url(), "/api/activity/feed?limit=3");
        let body = r#"{"success": true, "data": [
            {"id": "a9", "type": "weight", "message": "Pesaje: Animal-021 - 455kg",
             "timestamp": "2026-01-14T10:00:00", "user": "Operador"}
        ]}"#
        .to_owned();
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");

        let request = server.recv().expect("second request expected");
        request
            .respond(json_response("upstream down".to_owned(), 502))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let (entries, source) = load_activity(Some(&client), 3, Vec::new);
    assert_eq!(source, DataSource::Remote);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Weight);

    let (entries, source) = load_activity(Some(&client), 3, Vec::new);
    assert_eq!(source, DataSource::Fallback);
    assert!(entries.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}
