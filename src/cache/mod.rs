//! Shared caching infrastructure.
//!
//! - [`CredentialCache`] - in-memory, TTL-driven, retry-once-on-unauthorized
//! - [`GeocodeStore`] - file-backed, append-only place coordinate memo

mod credential;
mod geocode;

pub use credential::CredentialCache;
pub use geocode::{GeocodeStore, LatLng};
