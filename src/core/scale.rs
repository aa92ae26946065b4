use serde::Serialize;

use crate::core::{Instant, TimeDomain, instant_from_unix_millis, instant_to_unix_millis};
use crate::error::{BucketError, BucketResult};

/// Monotonic mapping from instants to pixel offsets.
///
/// Only used to measure candidate bucket widths.
pub trait PixelScale: Send + Sync {
    fn to_pixel(&self, instant: Instant) -> f64;
}

impl<F> PixelScale for F
where
    F: Fn(Instant) -> f64 + Send + Sync,
{
    fn to_pixel(&self, instant: Instant) -> f64 {
        self(instant)
    }
}

/// Linear time scale mapping a domain onto `[range_start, range_end]` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearTimeScale {
    domain: TimeDomain,
    range_start: f64,
    range_end: f64,
}

impl LinearTimeScale {
    pub fn new(domain: TimeDomain, range_start: f64, range_end: f64) -> BucketResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(BucketError::InvalidData(
                "pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain,
            range_start,
            range_end,
        })
    }

    /// Maps the domain onto `[0, width_px]`.
    pub fn with_width(domain: TimeDomain, width_px: f64) -> BucketResult<Self> {
        if !width_px.is_finite() || width_px <= 0.0 {
            return Err(BucketError::InvalidData(
                "pixel width must be finite and > 0".to_owned(),
            ));
        }
        Self::new(domain, 0.0, width_px)
    }

    #[must_use]
    pub fn domain(self) -> TimeDomain {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn instant_to_pixel(self, instant: Instant) -> f64 {
        let start = instant_to_unix_millis(self.domain.start());
        let span = instant_to_unix_millis(self.domain.end()) - start;
        let normalized = (instant_to_unix_millis(instant) - start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Inverse mapping; `None` when the pixel is non-finite or lands outside
    /// the representable range.
    #[must_use]
    pub fn pixel_to_instant(self, pixel: f64) -> Option<Instant> {
        if !pixel.is_finite() || self.range_start == self.range_end {
            return None;
        }
        let start = instant_to_unix_millis(self.domain.start());
        let span = instant_to_unix_millis(self.domain.end()) - start;
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        instant_from_unix_millis(start + normalized * span)
    }
}

impl PixelScale for LinearTimeScale {
    fn to_pixel(&self, instant: Instant) -> f64 {
        self.instant_to_pixel(instant)
    }
}
