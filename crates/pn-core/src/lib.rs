//! pn-core: shared foundation for pipenet.
//!
//! Contains:
//! - ids (compact indices for canonical network objects)
//! - numeric (Real, tolerances, lenient number parsing)
//! - time (lenient timestamp parsing)
//! - geometry (planar points, vectors and heading deltas)

pub mod geometry;
pub mod ids;
pub mod numeric;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use geometry::{Point, Vec2, heading_delta_deg};
pub use ids::*;
pub use numeric::*;
pub use time::{TIMESTAMP_UNKNOWN, parse_timestamp_ms};
