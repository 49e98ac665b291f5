//! Satellite-tracking provider client.
//!
//! The provider authenticates with a short-lived bearer token obtained by a
//! form login; tokens go through the [`CredentialCache`] so concurrent
//! trail requests share one login. A 401/403 on the trail endpoint drives
//! the cache's invalidate-and-retry-once path.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cache::CredentialCache;
use crate::domain::TrackPoint;
use crate::error::{Error, Result};

const TOKEN_CACHE_KEY: &str = "tracking-token";

/// The provider's history endpoint expects local timestamps shifted +5h
/// from UTC. The shift is applied in milliseconds-space, so the formatted
/// string is stable across server time zones and DST.
const PROVIDER_UTC_OFFSET_HOURS: i64 = 5;

/// Credentials for the tracking provider's login endpoint.
#[derive(Debug, Clone)]
pub struct TrackerCredentials {
    pub username: String,
    pub password: String,
}

/// HTTP client for the tracking provider's auth and history endpoints.
pub struct TrackingClient {
    client: reqwest::Client,
    auth_url: String,
    trail_url: String,
    credentials: TrackerCredentials,
    token_ttl: Duration,
    cache: Arc<CredentialCache>,
}

impl TrackingClient {
    pub fn new(
        auth_url: impl Into<String>,
        trail_url: impl Into<String>,
        credentials: TrackerCredentials,
        token_ttl: Duration,
        cache: Arc<CredentialCache>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_url: auth_url.into(),
            trail_url: trail_url.into(),
            credentials,
            token_ttl,
            cache,
        }
    }

    /// Fetch the vessel's position trail for the last `history_hours` hours.
    pub async fn trail(&self, history_hours: i64) -> Result<Vec<TrackPoint>> {
        let end = Utc::now();
        let start = end - chrono::Duration::hours(history_hours);
        self.trail_between(start, end).await
    }

    /// Fetch the position trail for an explicit window.
    pub async fn trail_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TrackPoint>> {
        let url = Url::parse_with_params(
            &self.trail_url,
            &[
                ("startDate", format_provider_timestamp(start)),
                ("endDate", format_provider_timestamp(end)),
            ],
        )?;

        debug!(url = %url, "fetching position trail");

        let response = self
            .cache
            .request_with_retry(
                TOKEN_CACHE_KEY,
                self.token_ttl,
                || self.login(),
                |token| {
                    let request = self
                        .client
                        .get(url.clone())
                        .header(header::ACCEPT, "application/json")
                        .bearer_auth(token);
                    async move { Ok(request.send().await?) }
                },
                |response: &reqwest::Response| {
                    matches!(response.status().as_u16(), 401 | 403)
                },
            )
            .await?;

        if !response.status().is_success() {
            return Err(Error::UpstreamStatus {
                provider: "tracking",
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let rows = body.as_array().ok_or(Error::UpstreamBody {
            provider: "tracking",
            reason: "history endpoint did not return an array".into(),
        })?;

        let points = parse_points(rows);
        debug!(count = points.len(), "fetched trail points");
        Ok(points)
    }

    /// Acquire a fresh bearer token from the login endpoint.
    async fn login(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct AuthResponse {
            jwt_token: Option<String>,
        }

        let response = self
            .client
            .post(&self.auth_url)
            .form(&[
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Auth(format!(
                "tracking auth returned status {}",
                response.status().as_u16()
            )));
        }

        let body: AuthResponse = response.json().await?;
        body.jwt_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Auth("tracking auth response missing jwt_token".into()))
    }
}

/// `YYYY-MM-DD HH:MM:SS` in the provider's expected +5h frame.
fn format_provider_timestamp(instant: DateTime<Utc>) -> String {
    let shifted = instant + chrono::Duration::hours(PROVIDER_UTC_OFFSET_HOURS);
    shifted.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Keep rows with finite coordinates, oldest first.
fn parse_points(rows: &[Value]) -> Vec<TrackPoint> {
    let mut points: Vec<TrackPoint> = rows.iter().filter_map(parse_point).collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

fn parse_point(row: &Value) -> Option<TrackPoint> {
    let lat = lenient_f64(row.get("lat")?)?;
    let lng = lenient_f64(row.get("lng")?)?;

    let point = TrackPoint {
        lat,
        lng,
        date: row
            .get("date")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        status: row
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        connected_devices: row
            .get("connected_devices")
            .and_then(lenient_f64)
            .map(|n| n as i64),
    };
    point.is_plottable().then_some(point)
}

/// The provider serializes numbers inconsistently - sometimes as JSON
/// numbers, sometimes as strings.
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
