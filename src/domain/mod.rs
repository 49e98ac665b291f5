//! Provider-agnostic domain logic.

mod context;
mod day_key;
mod sailing;
mod track;

// Core domain types
pub use context::{day_start_instant, CutoffTime, ResolutionContext};
pub use day_key::DayKey;
pub use sailing::{DayRange, SailingDecision, SailingId, SailingRange};
pub use track::TrackPoint;
