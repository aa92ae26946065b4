use tracing::debug;

use crate::core::{Calendar, Granularity, PixelScale, SizeConstraint, TimeDomain};

/// Pixel width of one bucket at `granularity`, measured from the bucket that
/// contains `domain.start`.
///
/// Unrepresentable instants and non-finite pixels measure as zero.
#[must_use]
pub fn bucket_width_px<C, P>(
    domain: TimeDomain,
    granularity: Granularity,
    calendar: &C,
    scale: &P,
) -> f64
where
    C: Calendar + ?Sized,
    P: PixelScale + ?Sized,
{
    let Some(start) = calendar.floor(granularity, domain.start()) else {
        return 0.0;
    };
    let Some(end) = calendar.offset(granularity, start, 1) else {
        return 0.0;
    };

    let width = scale.to_pixel(end) - scale.to_pixel(start);
    if width.is_finite() { width.max(0.0) } else { 0.0 }
}

/// Walks the refinement hierarchy until a bucket fits the size constraint.
pub struct BucketScaleRefiner<'a, C: ?Sized, P: ?Sized> {
    calendar: &'a C,
    scale: &'a P,
}

impl<'a, C, P> BucketScaleRefiner<'a, C, P>
where
    C: Calendar + ?Sized,
    P: PixelScale + ?Sized,
{
    #[must_use]
    pub fn new(calendar: &'a C, scale: &'a P) -> Self {
        Self { calendar, scale }
    }

    #[must_use]
    pub fn width_px(&self, domain: TimeDomain, granularity: Granularity) -> f64 {
        bucket_width_px(domain, granularity, self.calendar, self.scale)
    }

    /// Applies the minimum width first, then the maximum width to whatever the
    /// minimum pass produced.
    ///
    /// An unsatisfiable bound adopts the matching end of the hierarchy. With
    /// no usable bound the granularity is returned untouched, millennium
    /// included; otherwise millennium is replaced by days first.
    #[must_use]
    pub fn refine(
        &self,
        domain: TimeDomain,
        granularity: Granularity,
        constraint: SizeConstraint,
    ) -> Granularity {
        let min_width = constraint.min_width();
        let max_width = constraint.max_width();
        if min_width.is_none() && max_width.is_none() {
            return granularity;
        }

        // Granularities outside the hierarchy start the walk at days.
        let mut refined = if granularity.hierarchy_index().is_some() {
            granularity
        } else {
            Granularity::Days
        };

        if let Some(min_width) = min_width {
            if self.width_px(domain, refined) < min_width {
                refined = self.walk_coarser(domain, refined, min_width);
            }
        }

        if let Some(max_width) = max_width {
            if self.width_px(domain, refined) > max_width {
                refined = self.walk_finer(domain, refined, max_width);
            }
        }

        if refined != granularity {
            debug!(from = %granularity, to = %refined, "refined bucket granularity");
        }
        refined
    }

    fn walk_coarser(&self, domain: TimeDomain, from: Granularity, min_width: f64) -> Granularity {
        let hierarchy = Granularity::REFINEMENT_HIERARCHY;
        hierarchy[hierarchy_start(from) + 1..]
            .iter()
            .copied()
            .find(|candidate| self.width_px(domain, *candidate) >= min_width)
            .unwrap_or(Granularity::Decades)
    }

    fn walk_finer(&self, domain: TimeDomain, from: Granularity, max_width: f64) -> Granularity {
        let hierarchy = Granularity::REFINEMENT_HIERARCHY;
        hierarchy[..hierarchy_start(from)]
            .iter()
            .rev()
            .copied()
            .find(|candidate| self.width_px(domain, *candidate) <= max_width)
            .unwrap_or(Granularity::Milliseconds)
    }
}

fn hierarchy_start(granularity: Granularity) -> usize {
    granularity
        .hierarchy_index()
        .or_else(|| Granularity::Days.hierarchy_index())
        .unwrap_or(4)
}
