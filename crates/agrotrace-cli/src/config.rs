// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "agrotrace";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_VAR: &str = "AGROTRACE_CONFIG_PATH";
const DEFAULT_FEED_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_FEED_TIMEOUT: &str = "5s";
const DEFAULT_HERD_SIZE: usize = 155;
const DEFAULT_DEMO_SEED: u64 = 42;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub list: List,
    #[serde(default)]
    pub demo: Demo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            feed: Feed::default(),
            list: List::default(),
            demo: Demo::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            base_url: Some(DEFAULT_FEED_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_FEED_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct List {
    pub page_size: Option<i64>,
}

impl Default for List {
    fn default() -> Self {
        Self {
            page_size: Some(agrotrace_app::DEFAULT_PAGE_SIZE as i64),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Demo {
    pub herd_size: Option<i64>,
    pub seed: Option<u64>,
}

impl Default for Demo {
    fn default() -> Self {
        Self {
            herd_size: Some(DEFAULT_HERD_SIZE as i64),
            seed: Some(DEFAULT_DEMO_SEED),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_VAR) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set AGROTRACE_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [feed], [list], and [demo]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.feed.base_url
            && base_url.trim().is_empty()
        {
            bail!("feed.base_url in {} must not be empty", path.display());
        }

        if let Some(timeout) = &self.feed.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("feed.timeout in {}", path.display()))?;
            if parsed <= Duration::ZERO {
                bail!(
                    "feed.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(page_size) = self.list.page_size
            && page_size <= 0
        {
            bail!(
                "list.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(herd_size) = self.demo.herd_size
            && herd_size < 0
        {
            bail!(
                "demo.herd_size in {} must be non-negative, got {}",
                path.display(),
                herd_size
            );
        }

        Ok(())
    }

    pub fn feed_enabled(&self) -> bool {
        self.feed.enabled.unwrap_or(true)
    }

    pub fn feed_base_url(&self) -> &str {
        self.feed
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_FEED_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn feed_timeout(&self) -> Result<Duration> {
        parse_duration(self.feed.timeout.as_deref().unwrap_or(DEFAULT_FEED_TIMEOUT))
    }

    pub fn page_size(&self) -> usize {
        self.list
            .page_size
            .and_then(|size| usize::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(agrotrace_app::DEFAULT_PAGE_SIZE)
    }

    pub fn herd_size(&self) -> usize {
        self.demo
            .herd_size
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(DEFAULT_HERD_SIZE)
    }

    pub fn demo_seed(&self) -> u64 {
        self.demo.seed.unwrap_or(DEFAULT_DEMO_SEED)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# agrotrace config\n# Place this file at: {}\n\nversion = 1\n\n[feed]\n# Set to false to always use the generated demo herd.\nenabled = true\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[list]\npage_size = {}\n\n[demo]\n# Herd generated when the feed is disabled or unreachable.\nherd_size = {}\nseed = {}\n",
            path.display(),
            DEFAULT_FEED_BASE_URL,
            DEFAULT_FEED_TIMEOUT,
            agrotrace_app::DEFAULT_PAGE_SIZE,
            DEFAULT_HERD_SIZE,
            DEFAULT_DEMO_SEED,
        )
    }
}

/// Parses `<N>ms`, `<N>s` or `<N>m` into a duration.
fn parse_duration(raw: &str) -> Result<Duration> {
    let trimmed = raw.trim();
    let digits = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (amount, unit) = trimmed.split_at(digits);
    let millis_per_unit: u64 = match unit {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        _ => bail!(
            "invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)"
        ),
    };
    if amount.is_empty() {
        bail!("invalid duration {raw:?}; the unit needs a number in front, for example 5{unit}");
    }

    // `amount` is all digits here, so a parse failure can only be overflow.
    amount
        .parse::<u64>()
        .ok()
        .and_then(|amount| amount.checked_mul(millis_per_unit))
        .map(Duration::from_millis)
        .ok_or_else(|| anyhow!("timeout {raw:?} is too large"))
}
