//! Wakeline - sailing-window resolution for a cruise-ship live dashboard.
//!
//! This crate decides which sailing (voyage) is currently active for a
//! vessel given only "now" and a calendar of scraped sailing-date ranges,
//! and derives the dependent time windows (how many hours of position
//! history to request) from that decision.
//!
//! # Architecture
//!
//! Resolution works over month pages served by a [`calendar::CalendarSource`]:
//!
//! - **[`calendar`]** - Date-range label parsing and the schedule-source seam
//! - **[`resolver`]** - Month-probing and the turnaround-day tie-break
//! - **[`window`]** - Clamped history-window derivation with a conservative fallback
//! - **[`cache`]** - Credential cache (TTL + retry-once-on-unauthorized) and
//!   the file-backed geocode memo
//! - **[`adapter`]** - Tracking-provider and geocoding clients built on the caches
//! - **[`service`]** - Route-layer facade producing the dashboard payloads
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files with env-var secrets
//! - [`domain`] - Day keys, sailing ranges, resolution context, track points
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use wakeline::domain::{CutoffTime, ResolutionContext};
//! use wakeline::resolver::SailingResolver;
//!
//! # async fn example(source: impl wakeline::calendar::CalendarSource) {
//! let resolver = SailingResolver::new(source);
//! let ctx = ResolutionContext::capture(chrono_tz::America::New_York, CutoffTime::new(11, 30));
//! let decision = resolver.resolve(&ctx).await;
//! # }
//! ```

pub mod adapter;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod resolver;
pub mod service;
pub mod window;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
