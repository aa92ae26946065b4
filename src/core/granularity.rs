use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BucketError;

/// Calendar granularity, ordered finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Millennium,
}

impl Granularity {
    /// Every granularity, finest first.
    pub const ALL: [Granularity; 10] = [
        Self::Milliseconds,
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
        Self::Decades,
        Self::Millennium,
    ];

    /// Granularities the width refiner may walk through, finest first.
    ///
    /// `Millennium` is reachable through tick detection only.
    pub const REFINEMENT_HIERARCHY: [Granularity; 9] = [
        Self::Milliseconds,
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
        Self::Decades,
    ];

    /// Units probed by closest-unit tick inference, coarsest first.
    pub const TICK_INFERENCE_ORDER: [Granularity; 9] = [
        Self::Millennium,
        Self::Decades,
        Self::Years,
        Self::Months,
        Self::Weeks,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Milliseconds => "milliseconds",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
            Self::Decades => "decades",
            Self::Millennium => "millennium",
        }
    }

    /// Bucket granularity used when the axis ticks at `self`.
    ///
    /// One level finer, except `Milliseconds` which maps onto itself.
    #[must_use]
    pub fn bucket_for_tick(self) -> Self {
        match self {
            Self::Millennium => Self::Decades,
            Self::Decades => Self::Years,
            Self::Years => Self::Months,
            Self::Months => Self::Weeks,
            Self::Weeks => Self::Days,
            Self::Days => Self::Hours,
            Self::Hours => Self::Minutes,
            Self::Minutes => Self::Seconds,
            Self::Seconds | Self::Milliseconds => Self::Milliseconds,
        }
    }

    /// Whether buckets at this granularity are drawn as a heatmap.
    ///
    /// Finer granularities render individual events instead.
    #[must_use]
    pub fn uses_heatmap(self) -> bool {
        matches!(
            self,
            Self::Days | Self::Weeks | Self::Months | Self::Years | Self::Decades
        )
    }

    /// Position inside [`Self::REFINEMENT_HIERARCHY`], if present.
    #[must_use]
    pub fn hierarchy_index(self) -> Option<usize> {
        Self::REFINEMENT_HIERARCHY
            .iter()
            .position(|candidate| *candidate == self)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = BucketError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|granularity| granularity.as_str() == normalized)
            .ok_or_else(|| BucketError::InvalidData(format!("unknown granularity: {input}")))
    }
}
