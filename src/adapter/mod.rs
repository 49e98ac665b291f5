//! Upstream provider clients.

mod geocoder;
mod tracker;

pub use geocoder::Geocoder;
pub use tracker::{TrackerCredentials, TrackingClient};
