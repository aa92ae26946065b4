use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BucketError, BucketResult};

/// A point in time. Millisecond resolution is all the engine relies on.
pub type Instant = DateTime<Utc>;

/// Converts unix milliseconds into an instant.
///
/// Returns `None` for non-finite input or values chrono cannot represent.
/// Fractional milliseconds are truncated toward zero.
#[must_use]
pub fn instant_from_unix_millis(millis: f64) -> Option<Instant> {
    if !millis.is_finite() {
        return None;
    }
    let truncated = millis.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(truncated as i64)
}

#[must_use]
pub fn instant_to_unix_millis(instant: Instant) -> f64 {
    instant.timestamp_millis() as f64
}

/// Parses an RFC 3339 timestamp, normalizing any offset to UTC.
#[must_use]
pub fn parse_instant(input: &str) -> Option<Instant> {
    DateTime::parse_from_rfc3339(input.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Visible time window with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeDomain {
    start: Instant,
    end: Instant,
}

impl TimeDomain {
    pub fn new(start: Instant, end: Instant) -> BucketResult<Self> {
        if start >= end {
            return Err(BucketError::invalid_domain(format!(
                "start {start} must precede end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn from_unix_millis(start: f64, end: f64) -> BucketResult<Self> {
        let start = instant_from_unix_millis(start)
            .ok_or_else(|| BucketError::invalid_domain(format!("start {start} is not an instant")))?;
        let end = instant_from_unix_millis(end)
            .ok_or_else(|| BucketError::invalid_domain(format!("end {end} is not an instant")))?;
        Self::new(start, end)
    }

    /// Builds a domain from the raw bounds a host axis reports.
    ///
    /// Only the first two entries are read; extra entries are ignored.
    pub fn from_bounds(bounds: &[Option<Instant>]) -> BucketResult<Self> {
        match bounds {
            [] => Err(BucketError::invalid_domain("domain is missing")),
            [_] => Err(BucketError::invalid_domain(
                "domain needs two bounds, got one",
            )),
            [start, end, ..] => {
                let start =
                    start.ok_or_else(|| BucketError::invalid_domain("start is not an instant"))?;
                let end = end.ok_or_else(|| BucketError::invalid_domain("end is not an instant"))?;
                Self::new(start, end)
            }
        }
    }

    #[must_use]
    pub fn start(self) -> Instant {
        self.start
    }

    #[must_use]
    pub fn end(self) -> Instant {
        self.end
    }

    #[must_use]
    pub fn span(self) -> TimeDelta {
        self.end - self.start
    }

    /// Half-open membership test: `start <= instant < end`.
    #[must_use]
    pub fn contains(self, instant: Instant) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Optional pixel-width bounds for a single bucket.
///
/// Non-finite bounds are ignored by the refiner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeConstraint {
    #[serde(default)]
    pub min_width_px: Option<f64>,
    #[serde(default)]
    pub max_width_px: Option<f64>,
}

impl SizeConstraint {
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_width_px(mut self, min_width_px: f64) -> Self {
        self.min_width_px = Some(min_width_px);
        self
    }

    #[must_use]
    pub fn with_max_width_px(mut self, max_width_px: f64) -> Self {
        self.max_width_px = Some(max_width_px);
        self
    }

    #[must_use]
    pub fn min_width(self) -> Option<f64> {
        self.min_width_px.filter(|value| value.is_finite())
    }

    #[must_use]
    pub fn max_width(self) -> Option<f64> {
        self.max_width_px.filter(|value| value.is_finite())
    }

    /// Strict check used when loading configuration.
    pub fn validate(self) -> BucketResult<Self> {
        for (name, value) in [
            ("min_width_px", self.min_width_px),
            ("max_width_px", self.max_width_px),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(BucketError::InvalidConfig(format!(
                        "{name} must be finite and >= 0"
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_width_px, self.max_width_px) {
            if min > max {
                return Err(BucketError::InvalidConfig(format!(
                    "min_width_px ({min}) must not exceed max_width_px ({max})"
                )));
            }
        }

        Ok(self)
    }
}
