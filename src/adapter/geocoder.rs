//! Read-through place geocoder.
//!
//! Itinerary rows name ports; the map layer needs coordinates. Lookups go
//! through the append-only [`GeocodeStore`] first and only hit the maps
//! provider on a miss. Failures never propagate: a port that cannot be
//! geocoded simply renders without a pin.

use reqwest::header;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{GeocodeStore, LatLng};

/// Phrases marking a "port" cell that is really a day at sea. Never
/// geocoded and never cached.
const AT_SEA_MARKERS: [&str; 4] = ["at sea", "sea day", "cruising", "sailing"];

/// Maps-provider geocoding client backed by the persistent store.
pub struct Geocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    store: GeocodeStore,
}

impl Geocoder {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, store: GeocodeStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            store,
        }
    }

    /// Resolve a place name to coordinates, memoizing successes.
    ///
    /// Returns `None` for blank or at-sea-like names, cache misses without
    /// an API key, and any provider failure.
    pub async fn locate(&self, place: &str) -> Option<LatLng> {
        let cleaned = place.trim();
        if cleaned.is_empty() || is_at_sea_like(cleaned) {
            return None;
        }

        if let Some(hit) = self.store.get(cleaned) {
            return Some(hit);
        }

        let coords = self.lookup(cleaned).await?;
        if let Err(error) = self.store.put(cleaned, coords) {
            // A failed cache write only costs a repeat lookup later.
            warn!(%error, place = cleaned, "failed to persist geocode result");
        }
        Some(coords)
    }

    async fn lookup(&self, place: &str) -> Option<LatLng> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("geocoding api key not configured");
            return None;
        };

        let url = Url::parse_with_params(&self.endpoint, &[("address", place), ("key", api_key)])
            .map_err(|error| warn!(%error, "bad geocoding endpoint"))
            .ok()?;

        let response = match self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, place, "geocode request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), place, "geocode http error");
            return None;
        }

        let body: GeocodeResponse = match response.json().await {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, place, "geocode response was not valid json");
                return None;
            }
        };

        if body.status != "OK" {
            warn!(
                status = %body.status,
                error_message = body.error_message.as_deref().unwrap_or(""),
                place,
                "geocode lookup failed"
            );
            return None;
        }

        let location = body.results.first()?.geometry.location;
        if !location.lat.is_finite() || !location.lng.is_finite() {
            return None;
        }

        debug!(place, lat = location.lat, lng = location.lng, "geocoded place");
        Some(LatLng {
            lat: location.lat,
            lng: location.lng,
        })
    }
}

fn is_at_sea_like(place: &str) -> bool {
    let lowered = place.to_lowercase();
    AT_SEA_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct Location {
    lat: f64,
    lng: f64,
}
