//! Position-trail domain types.

use serde::Serialize;

/// One historical position report from the satellite-tracking provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub lat: f64,
    pub lng: f64,
    /// Provider-reported timestamp, kept as the provider's own string form.
    pub date: String,
    /// Provider-reported link status (e.g. "online").
    pub status: String,
    pub connected_devices: Option<i64>,
}

impl TrackPoint {
    /// Whether both coordinates are finite numbers a map can plot.
    #[must_use]
    pub fn is_plottable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}
