// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use agrotrace_app::{Activity, Animal};
use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Page size requested while walking the animal listing.
pub const FETCH_PAGE_SIZE: usize = 100;
const MAX_PAGES: usize = 1_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalPage {
    pub animals: Vec<Animal>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    pagination: Option<Pagination>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}

/// Blocking client for the dashboard's JSON API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("feed.base_url must not be empty");
        }
        let mut base_url =
            Url::parse(trimmed).with_context(|| format!("parse feed.base_url {trimmed:?}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "feed.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Confirms the API answers and returns the number of animals it reports.
    pub fn ping(&self) -> Result<usize> {
        let page = self.fetch_animals_page(1, 1)?;
        Ok(page
            .pagination
            .map_or(page.animals.len(), |pagination| pagination.total))
    }

    pub fn fetch_animals_page(&self, page: usize, per_page: usize) -> Result<AnimalPage> {
        let mut url = self.endpoint("api/animals")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .append_pair("per_page", &per_page.max(1).to_string());

        let envelope = self.get::<Vec<Animal>>(url, "animal list")?;
        let pagination = envelope.pagination;
        let animals = envelope
            .data
            .ok_or_else(|| anyhow!("animal list response has no data"))?;
        Ok(AnimalPage {
            animals,
            pagination,
        })
    }

    /// Walks every page of the animal listing. A response without
    /// pagination is taken as the whole herd.
    pub fn fetch_animals(&self) -> Result<Vec<Animal>> {
        let mut animals = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch = self.fetch_animals_page(page, FETCH_PAGE_SIZE)?;
            let has_next = batch
                .pagination
                .is_some_and(|pagination| pagination.has_next);
            animals.extend(batch.animals);
            if !has_next {
                tracing::debug!(count = animals.len(), pages = page, "animal feed fetched");
                return Ok(animals);
            }
        }
        bail!("animal list did not end after {MAX_PAGES} pages -- check the server's pagination")
    }

    pub fn fetch_activity(&self, limit: usize) -> Result<Vec<Activity>> {
        let mut url = self.endpoint("api/activity/feed")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.max(1).to_string());

        self.get::<Vec<Activity>>(url, "activity feed")?
            .data
            .ok_or_else(|| anyhow!("activity feed response has no data"))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("build {path} URL from {}", self.base_url))
    }

    fn get<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<Envelope<T>> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let envelope: Envelope<T> = response
            .json()
            .with_context(|| format!("decode {what} response"))?;
        if !envelope.success {
            let detail = envelope.error.as_deref().unwrap_or("no detail given");
            bail!("server rejected {what} request: {detail}");
        }
        Ok(envelope)
    }
}

/// Where a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    Fallback,
}

impl DataSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        }
    }
}

/// Fetches the herd, or builds the fallback herd when there is no client or
/// the fetch fails. The roster is loaded exactly once either way.
pub fn load_roster<F>(client: Option<&Client>, fallback: F) -> (Vec<Animal>, DataSource)
where
    F: FnOnce() -> Vec<Animal>,
{
    fetch_or_fallback(client, "animal feed", Client::fetch_animals, fallback)
}

/// Fetches the newest `limit` activity entries, falling back the same way
/// as [`load_roster`].
pub fn load_activity<F>(
    client: Option<&Client>,
    limit: usize,
    fallback: F,
) -> (Vec<Activity>, DataSource)
where
    F: FnOnce() -> Vec<Activity>,
{
    fetch_or_fallback(
        client,
        "activity feed",
        |client| client.fetch_activity(limit),
        fallback,
    )
}

fn fetch_or_fallback<T, Fetch, Fallback>(
    client: Option<&Client>,
    what: &str,
    fetch: Fetch,
    fallback: Fallback,
) -> (T, DataSource)
where
    Fetch: FnOnce(&Client) -> Result<T>,
    Fallback: FnOnce() -> T,
{
    let Some(client) = client else {
        tracing::debug!("{what} disabled, using fallback data");
        return (fallback(), DataSource::Fallback);
    };

    match fetch(client) {
        Ok(data) => (data, DataSource::Remote),
        Err(error) => {
            tracing::warn!(
                base_url = client.base_url(),
                "{what} unavailable, using fallback data: {error:#}"
            );
            (fallback(), DataSource::Fallback)
        }
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- start the dashboard server or set feed.enabled = false ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::{Client, DataSource, clean_error_response};
    use anyhow::Result;
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn rejects_blank_and_non_http_base_urls() {
        let blank = Client::new("  ", Duration::from_secs(1)).expect_err("blank should fail");
        assert!(blank.to_string().contains("must not be empty"));

        let ftp = Client::new("ftp://herd.local", Duration::from_secs(1))
            .expect_err("ftp should fail");
        assert!(ftp.to_string().contains("http or https"));

        assert!(Client::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn endpoints_keep_base_path_prefix() -> Result<()> {
        let client = Client::new("http://ranch.local/dashboard", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "http://ranch.local/dashboard");
        assert_eq!(
            client.endpoint("api/animals")?.as_str(),
            "http://ranch.local/dashboard/api/animals"
        );
        Ok(())
    }

    #[test]
    fn error_bodies_are_summarized() {
        let json = clean_error_response(
            StatusCode::NOT_FOUND,
            r#"{"success": false, "error": "Endpoint no encontrado"}"#,
        );
        assert_eq!(json.to_string(), "server error (404): Endpoint no encontrado");

        let plain = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(plain.to_string(), "server error (502): upstream down");

        let html = clean_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &"<html><body>{oops}</body></html>".repeat(10),
        );
        assert_eq!(html.to_string(), "server returned 500");
    }

    #[test]
    fn data_source_labels() {
        assert_eq!(DataSource::Remote.as_str(), "remote");
        assert_eq!(DataSource::Fallback.as_str(), "fallback");
    }
}
