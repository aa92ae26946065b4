//! heatline: adaptive time-bucketing for event heatmap timelines.
//!
//! Given the visible time window of an axis, the crate picks the calendar
//! granularity the axis is drawn at, refines it against bucket pixel-width
//! bounds and folds raw events into sparse, per-row normalized buckets.
//! Drawing is left to the host renderer.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{HeatmapConfig, HeatmapPipeline};
pub use error::{BucketError, BucketResult};
