mod config;
mod diagnostics;
mod json_contract;
mod pipeline;

pub use config::{HeatmapConfig, TickCountBreakpoints};
pub use diagnostics::Diagnostic;
pub use json_contract::{HEATMAP_CONFIG_JSON_SCHEMA_V1, HeatmapConfigJsonContractV1};
pub use pipeline::{BucketPlan, HeatmapPipeline, HeatmapRow, PipelineOutput, RowBuckets};
