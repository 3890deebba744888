//! Pass/fail checks built on the similarity score.

use crate::image::Raster;
use crate::similarity::{compute_similarity_with, SimilarityReport};
use crate::util::{SimError, SimResult};

/// Threshold used when none is given: near-identical, tolerant of minor
/// rendering noise.
pub const DEFAULT_THRESHOLD: f64 = 0.99;

/// A similarity threshold validated to lie in `[-1.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Validates `value`, rejecting NaN and anything outside `[-1.0, 1.0]`.
    pub fn new(value: f64) -> SimResult<Self> {
        if !(-1.0..=1.0).contains(&value) {
            return Err(SimError::InvalidThreshold { threshold: value });
        }
        Ok(Self(value))
    }

    /// Returns the threshold value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

/// Comparison configuration.
#[derive(Clone, Copy, Debug)]
pub struct CompareConfig {
    /// Minimum similarity score for a pair to count as similar.
    pub threshold: f64,
    /// Run channel extraction and correlation on the rayon pool.
    pub parallel: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            parallel: true,
        }
    }
}

/// Image comparator holding a [`CompareConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Comparator {
    cfg: CompareConfig,
}

impl Comparator {
    /// Creates a comparator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: CompareConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CompareConfig {
        &self.cfg
    }

    /// Runs the full comparison and returns per-channel scores.
    ///
    /// Validates the threshold and sizes first, so an `Ok` report always
    /// belongs to a well-formed comparison.
    pub fn compare<A, B>(&self, actual: &A, expected: &B) -> SimResult<SimilarityReport>
    where
        A: Raster + Sync + ?Sized,
        B: Raster + Sync + ?Sized,
    {
        Threshold::new(self.cfg.threshold)?;
        check_sizes(actual, expected)?;
        compute_similarity_with(actual, expected, self.cfg.parallel)
    }

    /// Returns true iff the images have the same size and score at least
    /// the configured threshold.
    ///
    /// Only an invalid threshold produces an error.
    pub fn is_similar<A, B>(&self, actual: &A, expected: &B) -> SimResult<bool>
    where
        A: Raster + Sync + ?Sized,
        B: Raster + Sync + ?Sized,
    {
        match self.assert_similar(actual, expected) {
            Ok(()) => Ok(true),
            Err(SimError::SizeMismatch { .. }) | Err(SimError::BelowThreshold { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Checks similarity and describes the failure if the check does not pass.
    pub fn assert_similar<A, B>(&self, actual: &A, expected: &B) -> SimResult<()>
    where
        A: Raster + Sync + ?Sized,
        B: Raster + Sync + ?Sized,
    {
        let threshold = Threshold::new(self.cfg.threshold)?;
        let report = self.compare(actual, expected)?;
        if report.score >= threshold.value() {
            Ok(())
        } else {
            Err(SimError::BelowThreshold {
                score: report.score,
                threshold: threshold.value(),
                channel: report.worst_channel(),
            })
        }
    }
}

/// Returns true iff `actual` and `expected` have the same size and their
/// similarity is at least `threshold`.
///
/// Errors only with [`SimError::InvalidThreshold`].
pub fn is_similar<A, B>(actual: &A, expected: &B, threshold: f64) -> SimResult<bool>
where
    A: Raster + Sync + ?Sized,
    B: Raster + Sync + ?Sized,
{
    comparator(threshold).is_similar(actual, expected)
}

/// Asserts that `actual` and `expected` have the same size and their
/// similarity is at least `threshold`.
pub fn assert_similar<A, B>(actual: &A, expected: &B, threshold: f64) -> SimResult<()>
where
    A: Raster + Sync + ?Sized,
    B: Raster + Sync + ?Sized,
{
    comparator(threshold).assert_similar(actual, expected)
}

fn comparator(threshold: f64) -> Comparator {
    Comparator::new().with_config(CompareConfig {
        threshold,
        ..CompareConfig::default()
    })
}

fn check_sizes<A, B>(actual: &A, expected: &B) -> SimResult<()>
where
    A: Raster + ?Sized,
    B: Raster + ?Sized,
{
    let actual_size = actual.size();
    let expected_size = expected.size();
    if actual_size != expected_size {
        return Err(SimError::SizeMismatch {
            actual: actual_size,
            expected: expected_size,
        });
    }
    Ok(())
}

/// Panics unless two rasters are visually similar.
///
/// Accepts an optional threshold, defaulting to [`DEFAULT_THRESHOLD`]. The
/// panic message is the [`SimError`] description.
#[macro_export]
macro_rules! assert_images_similar {
    ($actual:expr, $expected:expr $(,)?) => {
        $crate::assert_images_similar!($actual, $expected, $crate::DEFAULT_THRESHOLD)
    };
    ($actual:expr, $expected:expr, $threshold:expr $(,)?) => {
        if let Err(err) = $crate::assert_similar(&$actual, &$expected, $threshold) {
            panic!("{}", err);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{assert_similar, is_similar, CompareConfig, Comparator, Threshold};
    use crate::channel::Channel;
    use crate::image::{Argb, RasterImage};
    use crate::util::{ErrorKind, SimError};

    fn gradient(width: usize) -> RasterImage {
        RasterImage::from_fn(width, 1, |x, _| Argb::new(255, (x * 10) as u8, 0, 0)).unwrap()
    }

    #[test]
    fn threshold_rejects_out_of_range_and_nan() {
        assert!(Threshold::new(-1.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert_eq!(
            Threshold::new(1.5).unwrap_err(),
            SimError::InvalidThreshold { threshold: 1.5 }
        );
        assert_eq!(
            Threshold::new(f64::NAN).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(Threshold::default().value(), 0.99);
    }

    #[test]
    fn invalid_threshold_wins_over_size_mismatch() {
        let a = gradient(3);
        let b = gradient(4);
        let err = is_similar(&a, &b, -1.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = assert_similar(&a, &b, 2.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn below_threshold_reports_score_and_channel() {
        let a = gradient(5);
        let b = RasterImage::from_fn(5, 1, |x, _| Argb::new(255, (40 - x * 10) as u8, 0, 0))
            .unwrap();
        let err = assert_similar(&a, &b, 0.5).unwrap_err();
        match err {
            SimError::BelowThreshold {
                score,
                threshold,
                channel,
            } => {
                assert_eq!(score, -1.0);
                assert_eq!(threshold, 0.5);
                assert_eq!(channel, Channel::Red);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!is_similar(&a, &b, 0.5).unwrap());
        assert!(is_similar(&a, &b, -1.0).unwrap());
    }

    #[test]
    fn comparator_uses_configured_threshold() {
        let a = gradient(4);
        let strict = Comparator::new();
        let lax = Comparator::new().with_config(CompareConfig {
            threshold: -1.0,
            parallel: false,
        });
        let b = RasterImage::from_fn(4, 1, |x, _| Argb::new(255, (x * 10) as u8, 0, x as u8))
            .unwrap();
        assert!(!strict.is_similar(&a, &b).unwrap());
        assert!(lax.is_similar(&a, &b).unwrap());
        assert!(!lax.config().parallel);
    }

    #[test]
    fn macro_passes_for_identical_images() {
        let a = gradient(6);
        crate::assert_images_similar!(a, a.clone());
        crate::assert_images_similar!(a, a.clone(), 1.0);
    }

    #[test]
    #[should_panic(expected = "not the same size")]
    fn macro_panics_on_size_mismatch() {
        crate::assert_images_similar!(gradient(2), gradient(3));
    }
}
