use serde::{Deserialize, Serialize};

use crate::core::Granularity;

/// Non-fatal condition met while planning or bucketing a render pass.
///
/// The pipeline never fails; it reports these next to its degraded result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Domain missing or malformed; buckets are empty and the granularity
    /// falls back.
    InvalidDomain {
        reason: String,
        fallback: Granularity,
    },
    /// Breakpoint label has no configured tick count.
    UnknownBreakpoint { label: String, tick_count: usize },
}
