use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_TICK_COUNT, SizeConstraint, WeekStart};
use crate::error::{BucketError, BucketResult};

/// Tick counts keyed by responsive breakpoint label.
///
/// Declaration order is preserved so serialized configs round-trip as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickCountBreakpoints(IndexMap<String, usize>);

impl TickCountBreakpoints {
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    #[must_use]
    pub fn with(mut self, label: impl Into<String>, tick_count: usize) -> Self {
        self.0.insert(label.into(), tick_count);
        self
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<usize> {
        self.0.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TickCountBreakpoints {
    fn default() -> Self {
        Self::new()
            .with("xs", 4)
            .with("sm", 6)
            .with("md", 8)
            .with("lg", 10)
            .with("xl", 12)
    }
}

/// Serializable pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    #[serde(default)]
    pub tick_count_breakpoints: TickCountBreakpoints,
    #[serde(default = "default_tick_count")]
    pub default_tick_count: usize,
    #[serde(default)]
    pub size_constraint: SizeConstraint,
    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            tick_count_breakpoints: TickCountBreakpoints::default(),
            default_tick_count: default_tick_count(),
            size_constraint: SizeConstraint::default(),
            week_start: WeekStart::default(),
        }
    }
}

impl HeatmapConfig {
    #[must_use]
    pub fn with_size_constraint(mut self, size_constraint: SizeConstraint) -> Self {
        self.size_constraint = size_constraint;
        self
    }

    #[must_use]
    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    #[must_use]
    pub fn with_tick_count_breakpoints(mut self, breakpoints: TickCountBreakpoints) -> Self {
        self.tick_count_breakpoints = breakpoints;
        self
    }

    pub fn validate(self) -> BucketResult<Self> {
        if self.default_tick_count == 0 {
            return Err(BucketError::InvalidConfig(
                "default_tick_count must be > 0".to_owned(),
            ));
        }
        if let Some((label, _)) = self
            .tick_count_breakpoints
            .iter()
            .find(|(_, count)| *count == 0)
        {
            return Err(BucketError::InvalidConfig(format!(
                "tick count for breakpoint `{label}` must be > 0"
            )));
        }
        self.size_constraint.validate()?;
        Ok(self)
    }

    /// Tick count for a breakpoint label; unknown or absent labels use
    /// `default_tick_count`.
    #[must_use]
    pub fn tick_count_for(&self, breakpoint: Option<&str>) -> usize {
        breakpoint
            .and_then(|label| self.tick_count_breakpoints.get(label))
            .unwrap_or(self.default_tick_count)
    }
}

fn default_tick_count() -> usize {
    DEFAULT_TICK_COUNT
}
