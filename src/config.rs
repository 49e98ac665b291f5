//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values (provider credentials, API keys) - those
//! never live in the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::CutoffTime;
use crate::error::{ConfigError, Result};
use crate::window::HistoryBounds;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub vessel: VesselConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Secrets may live in a local .env during development.
        let _ = dotenvy::dotenv();

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.tracking.username = std::env::var("TRACKER_USERNAME").ok();
        config.tracking.password = std::env::var("TRACKER_PASSWORD").ok();
        config.geocoding.api_key = std::env::var("GEOCODING_API_KEY").ok();

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.vessel.cruise_id.is_empty() {
            return Err(ConfigError::MissingField {
                field: "vessel.cruise_id",
            }
            .into());
        }
        if self.vessel.time_zone.parse::<Tz>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "vessel.time_zone",
                reason: format!("'{}' is not an IANA time zone", self.vessel.time_zone),
            }
            .into());
        }
        if self.resolution.cutoff_hour > 23 || self.resolution.cutoff_minute > 59 {
            return Err(ConfigError::InvalidValue {
                field: "resolution.cutoff",
                reason: format!(
                    "{:02}:{:02} is not a clock time",
                    self.resolution.cutoff_hour, self.resolution.cutoff_minute
                ),
            }
            .into());
        }
        if self.history.min_hours < 1 || self.history.min_hours > self.history.max_hours {
            return Err(ConfigError::InvalidValue {
                field: "history",
                reason: format!(
                    "window bounds [{}, {}] must satisfy 1 <= min <= max",
                    self.history.min_hours, self.history.max_hours
                ),
            }
            .into());
        }
        if self.tracking.auth_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "tracking.auth_url",
            }
            .into());
        }
        if self.tracking.trail_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "tracking.trail_url",
            }
            .into());
        }
        Ok(())
    }

    /// The vessel's IANA time zone. Validated at load, so a loaded config
    /// cannot fail here; a hand-built one falls back to UTC.
    #[must_use]
    pub fn time_zone(&self) -> Tz {
        self.vessel.time_zone.parse().unwrap_or(chrono_tz::UTC)
    }
}

/// Which vessel this deployment tracks.
#[derive(Debug, Deserialize)]
pub struct VesselConfig {
    /// Schedule-source identifier for the vessel.
    pub cruise_id: String,
    /// IANA time zone the itinerary and cutoff are anchored in.
    pub time_zone: String,
}

/// Sailing-resolution knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionConfig {
    /// Turnaround cutoff, local clock time.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
    #[serde(default = "default_cutoff_minute")]
    pub cutoff_minute: u32,
}

impl ResolutionConfig {
    /// The single authoritative cutoff shared by resolution and window
    /// derivation.
    #[must_use]
    pub const fn cutoff(&self) -> CutoffTime {
        CutoffTime::new(self.cutoff_hour, self.cutoff_minute)
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            cutoff_hour: default_cutoff_hour(),
            cutoff_minute: default_cutoff_minute(),
        }
    }
}

const fn default_cutoff_hour() -> u32 {
    11
}

const fn default_cutoff_minute() -> u32 {
    30
}

/// History-window bounds for the trail query.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_min_hours")]
    pub min_hours: i64,
    #[serde(default = "default_max_hours")]
    pub max_hours: i64,
    #[serde(default = "default_fallback_hours")]
    pub fallback_hours: i64,
}

impl HistoryConfig {
    #[must_use]
    pub const fn bounds(&self) -> HistoryBounds {
        HistoryBounds {
            min_hours: self.min_hours,
            max_hours: self.max_hours,
            fallback_hours: self.fallback_hours,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            min_hours: default_min_hours(),
            max_hours: default_max_hours(),
            fallback_hours: default_fallback_hours(),
        }
    }
}

const fn default_min_hours() -> i64 {
    1
}

const fn default_max_hours() -> i64 {
    24 * 14
}

const fn default_fallback_hours() -> i64 {
    24
}

/// Tracking-provider endpoints and token policy.
/// Credentials are loaded from `TRACKER_USERNAME` / `TRACKER_PASSWORD`
/// env vars at runtime (never from the config file).
#[derive(Debug, Deserialize)]
pub struct TrackingConfig {
    pub auth_url: String,
    pub trail_url: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
    #[serde(skip)]
    pub username: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
}

impl TrackingConfig {
    #[must_use]
    pub const fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_minutes * 60)
    }
}

const fn default_token_ttl_minutes() -> u64 {
    60
}

/// Geocoding endpoint and cache location.
/// The API key is loaded from the `GEOCODING_API_KEY` env var at runtime.
#[derive(Debug, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocode_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_geocode_cache_path")]
    pub cache_path: PathBuf,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocode_endpoint(),
            cache_path: default_geocode_cache_path(),
            api_key: None,
        }
    }
}

fn default_geocode_endpoint() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".into()
}

fn default_geocode_cache_path() -> PathBuf {
    PathBuf::from("data/geocode-cache.json")
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
