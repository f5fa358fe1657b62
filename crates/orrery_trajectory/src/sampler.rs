//! Ephemeris sampling over a fixed-step time range.

use orrery_core::{Aberration, EphemerisToolkit};
use tracing::debug;

use crate::error::SampleError;

/// Sampling interval in ephemeris time (TDB seconds past J2000).
///
/// The i-th timestamp is `start + i * step`; sampling stops at the first
/// timestamp `>= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

/// Largest number of timestamps a range may produce.
pub const MAX_SAMPLES: usize = 1 << 26;

impl TimeRange {
    /// A validated range.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, SampleError> {
        let range = Self { start, end, step };
        range.validate()?;
        Ok(range)
    }

    /// Bounds must be finite, the step finite and positive, and the sample
    /// count at most [`MAX_SAMPLES`].
    pub fn validate(&self) -> Result<(), SampleError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite() && self.step > 0.0)
        {
            return Err(SampleError::InvalidRange {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        let requested = self.estimate();
        if requested > MAX_SAMPLES as f64 {
            return Err(SampleError::TooManySamples {
                requested,
                limit: MAX_SAMPLES,
            });
        }
        Ok(())
    }

    fn estimate(&self) -> f64 {
        if self.start >= self.end {
            0.0
        } else {
            ((self.end - self.start) / self.step).ceil()
        }
    }

    /// Number of timestamps. Zero for invalid ranges.
    pub fn len(&self) -> usize {
        if self.validate().is_err() || self.start >= self.end {
            return 0;
        }
        let mut n = self.estimate() as usize;
        // The division can land one off when `start + i*step` rounds across `end`.
        while n > 0 && self.epoch(n - 1) >= self.end {
            n -= 1;
        }
        while self.epoch(n) < self.end {
            match n.checked_add(1) {
                Some(next) => n = next,
                None => break,
            }
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The i-th timestamp.
    pub fn epoch(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    /// All timestamps in order.
    pub fn epochs(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(|i| self.epoch(i))
    }
}

const PREALLOCATE_LIMIT: usize = 1 << 16;

/// Ordered positions of one body, km.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    body: String,
    points: Vec<[f64; 3]>,
}

impl Trajectory {
    pub fn new(body: impl Into<String>, points: Vec<[f64; 3]>) -> Self {
        Self {
            body: body.into(),
            points,
        }
    }

    /// Body identifier the trajectory was sampled for.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One coordinate series (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, index: usize) -> Vec<f64> {
        self.points.iter().map(|p| p[index]).collect()
    }
}

/// Geometric positions of `body` relative to `observer` in `frame` at every
/// timestamp of `range`.
pub fn sample_trajectory<T: EphemerisToolkit + ?Sized>(
    toolkit: &T,
    body: &str,
    observer: &str,
    frame: &str,
    range: &TimeRange,
) -> Result<Trajectory, SampleError> {
    sample_with_correction(toolkit, body, observer, frame, Aberration::None, range)
}

/// [`sample_trajectory`] with an explicit aberration correction. Light time
/// is discarded.
pub fn sample_with_correction<T: EphemerisToolkit + ?Sized>(
    toolkit: &T,
    body: &str,
    observer: &str,
    frame: &str,
    correction: Aberration,
    range: &TimeRange,
) -> Result<Trajectory, SampleError> {
    range.validate()?;

    let mut points = Vec::with_capacity(range.len().min(PREALLOCATE_LIMIT));
    for epoch in range.epochs() {
        let position = toolkit
            .position(body, epoch, frame, correction, observer)
            .map_err(|source| SampleError::Lookup {
                body: body.to_string(),
                epoch,
                source,
            })?;
        points.push(position.position_km);
    }

    debug!(
        body,
        observer,
        frame,
        %correction,
        samples = points.len(),
        "sampled trajectory"
    );
    Ok(Trajectory::new(body, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(TimeRange::new(0.0, 86_400.0, 14_400.0).unwrap().len(), 6);
        assert_eq!(TimeRange::new(0.0, 86_401.0, 14_400.0).unwrap().len(), 7);
        assert_eq!(TimeRange::new(5.0, 5.0, 1.0).unwrap().len(), 0);
        assert_eq!(TimeRange::new(10.0, 5.0, 1.0).unwrap().len(), 0);
    }

    #[test]
    fn year_at_four_hours() {
        let range = TimeRange::new(0.0, 365.0 * 86_400.0, 4.0 * 3600.0).unwrap();
        assert_eq!(range.len(), 2190);
    }

    #[test]
    fn fractional_steps_respect_end() {
        let range = TimeRange::new(0.0, 1.0, 0.1).unwrap();
        let epochs: Vec<f64> = range.epochs().collect();
        assert!(epochs.iter().all(|&t| t < 1.0));
        assert_eq!(epochs.len(), range.len());
        assert_eq!(epochs.len(), 10);
    }

    #[test]
    fn invalid_ranges() {
        for (start, end, step) in [
            (0.0, 10.0, 0.0),
            (0.0, 10.0, -1.0),
            (0.0, 10.0, f64::NAN),
            (f64::NEG_INFINITY, 10.0, 1.0),
            (0.0, f64::INFINITY, 1.0),
        ] {
            assert!(matches!(
                TimeRange::new(start, end, step),
                Err(SampleError::InvalidRange { .. })
            ));
            assert_eq!(TimeRange { start, end, step }.len(), 0);
        }
    }

    #[test]
    fn oversized_ranges() {
        let huge = TimeRange::new(0.0, 1.0e300, 1.0e-10);
        assert!(matches!(huge, Err(SampleError::TooManySamples { .. })));
        let huge = TimeRange {
            start: 0.0,
            end: 1.0e300,
            step: 1.0e-10,
        };
        assert_eq!(huge.len(), 0);
        assert!(huge.is_empty());

        let at_limit = TimeRange::new(0.0, MAX_SAMPLES as f64, 1.0).unwrap();
        assert_eq!(at_limit.len(), MAX_SAMPLES);
        assert!(TimeRange::new(0.0, MAX_SAMPLES as f64 + 1.0, 1.0).is_err());
    }

    #[test]
    fn trajectory_axes() {
        let t = Trajectory::new("EARTH", vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(t.axis(0), vec![1.0, 4.0]);
        assert_eq!(t.axis(2), vec![3.0, 6.0]);
        assert_eq!(t.body(), "EARTH");
        assert_eq!(t.len(), 2);
    }
}
