//! Channel-wise similarity aggregation.
//!
//! Both images are split into channel buffers concurrently, the four channel
//! pairs are correlated as independent tasks on the rayon pool, and the
//! worst per-channel score becomes the similarity of the pair. Each task owns
//! a disjoint output slot, so completion order never affects the result.

use crate::channel::{extract_channels, Channel};
use crate::image::Raster;
use crate::kernel::correlate;
use crate::trace::{trace_event, trace_span};
use crate::util::{SimError, SimResult};
use rayon::prelude::*;

/// Per-channel correlation scores for one image pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityReport {
    /// Scores indexed by [`Channel::index`].
    pub channels: [f64; 4],
    /// Minimum of the channel scores, in `[-1.0, 1.0]`.
    pub score: f64,
}

impl SimilarityReport {
    fn from_channels(channels: [f64; 4]) -> Self {
        let score = channels.iter().copied().fold(f64::INFINITY, f64::min);
        Self { channels, score }
    }

    /// Returns the score of a single channel.
    pub fn channel(&self, channel: Channel) -> f64 {
        self.channels[channel.index()]
    }

    /// Returns the first channel whose score equals the aggregate score.
    pub fn worst_channel(&self) -> Channel {
        Channel::ALL
            .iter()
            .copied()
            .find(|&channel| self.channel(channel) == self.score)
            .unwrap_or(Channel::Alpha)
    }
}

/// Computes the similarity of two equally sized images in parallel.
///
/// Returns [`SimError::SizeMismatch`] if the dimensions differ.
pub fn compute_similarity<A, B>(actual: &A, expected: &B) -> SimResult<SimilarityReport>
where
    A: Raster + Sync + ?Sized,
    B: Raster + Sync + ?Sized,
{
    compute_similarity_with(actual, expected, true)
}

/// Computes the similarity of two images, optionally without parallelism.
///
/// The sequential path evaluates the same tasks in channel order and yields
/// identical scores.
pub fn compute_similarity_with<A, B>(
    actual: &A,
    expected: &B,
    parallel: bool,
) -> SimResult<SimilarityReport>
where
    A: Raster + Sync + ?Sized,
    B: Raster + Sync + ?Sized,
{
    similarity_with_scorer(actual, expected, parallel, |_, a, b| correlate(a, b))
}

pub(crate) fn similarity_with_scorer<A, B, F>(
    actual: &A,
    expected: &B,
    parallel: bool,
    scorer: F,
) -> SimResult<SimilarityReport>
where
    A: Raster + Sync + ?Sized,
    B: Raster + Sync + ?Sized,
    F: Fn(Channel, &[u8], &[u8]) -> f64 + Sync,
{
    let actual_size = actual.size();
    let expected_size = expected.size();
    if actual_size != expected_size {
        return Err(SimError::SizeMismatch {
            actual: actual_size,
            expected: expected_size,
        });
    }

    let _guard = trace_span!(
        "compute_similarity",
        width = actual_size.width,
        height = actual_size.height,
        parallel = parallel
    )
    .entered();

    let (set_a, set_b) = if parallel {
        rayon::join(|| extract_channels(actual), || extract_channels(expected))
    } else {
        (extract_channels(actual), extract_channels(expected))
    };

    let score_channel = |channel: Channel| {
        let score = scorer(channel, set_a.get(channel), set_b.get(channel));
        trace_event!("channel_score", channel = channel.name(), score = score);
        score
    };

    let mut channels = [0.0f64; 4];
    if parallel {
        channels
            .par_iter_mut()
            .zip(Channel::ALL.par_iter())
            .for_each(|(slot, &channel)| *slot = score_channel(channel));
    } else {
        for (slot, &channel) in channels.iter_mut().zip(Channel::ALL.iter()) {
            *slot = score_channel(channel);
        }
    }

    let report = SimilarityReport::from_channels(channels);
    trace_event!("similarity", score = report.score);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{compute_similarity, compute_similarity_with, similarity_with_scorer};
    use crate::channel::Channel;
    use crate::image::{Argb, RasterImage, Size};
    use crate::kernel::correlate;
    use crate::util::SimError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    fn random_image(rng: &mut StdRng, width: usize, height: usize) -> RasterImage {
        RasterImage::from_fn(width, height, |_, _| {
            Argb::new(rng.random(), rng.random(), rng.random(), rng.random())
        })
        .unwrap()
    }

    #[test]
    fn identical_solid_images_score_one() {
        let img = RasterImage::filled(8, 8, Argb::new(255, 12, 200, 7)).unwrap();
        let report = compute_similarity(&img, &img.clone()).unwrap();
        assert_eq!(report.channels, [1.0; 4]);
        assert_eq!(report.score, 1.0);
    }

    #[test]
    fn minimum_channel_drives_score() {
        let actual = RasterImage::from_fn(4, 1, |x, _| {
            Argb::new(255, (x * 60) as u8, (x * 60) as u8, (x * 60) as u8)
        })
        .unwrap();
        let expected = RasterImage::from_fn(4, 1, |x, _| {
            Argb::new(255, (x * 60) as u8, (x * 60) as u8, (255 - x * 60) as u8)
        })
        .unwrap();
        let report = compute_similarity(&actual, &expected).unwrap();
        assert_eq!(report.channel(Channel::Alpha), 1.0);
        assert_eq!(report.channel(Channel::Red), 1.0);
        assert_eq!(report.channel(Channel::Blue), -1.0);
        assert_eq!(report.score, -1.0);
        assert_eq!(report.worst_channel(), Channel::Blue);
    }

    #[test]
    fn size_mismatch_skips_scoring() {
        let a = RasterImage::filled(10, 10, Argb::default()).unwrap();
        let b = RasterImage::filled(10, 11, Argb::default()).unwrap();
        let calls = Mutex::new(0usize);
        let err = similarity_with_scorer(&a, &b, true, |_, x, y| {
            *calls.lock().unwrap() += 1;
            correlate(x, y)
        })
        .unwrap_err();
        assert_eq!(
            err,
            SimError::SizeMismatch {
                actual: Size::new(10, 10),
                expected: Size::new(10, 11),
            }
        );
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = random_image(&mut rng, 33, 17);
        let b = random_image(&mut rng, 33, 17);
        let par = compute_similarity_with(&a, &b, true).unwrap();
        let seq = compute_similarity_with(&a, &b, false).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn reduction_ignores_completion_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = random_image(&mut rng, 16, 16);
        let b = RasterImage::from_fn(16, 16, |x, y| {
            let px = a.get(x, y).unwrap();
            Argb::new(px.a, px.r / 2, px.g.saturating_add(9), 255 - px.b)
        })
        .unwrap();
        let baseline = compute_similarity_with(&a, &b, false).unwrap();

        for _ in 0..16 {
            let delays: [u64; 4] = [
                rng.random_range(0..2000),
                rng.random_range(0..2000),
                rng.random_range(0..2000),
                rng.random_range(0..2000),
            ];
            let finished = Mutex::new(Vec::new());
            let report = similarity_with_scorer(&a, &b, true, |channel, x, y| {
                thread::sleep(Duration::from_micros(delays[channel.index()]));
                finished.lock().unwrap().push(channel);
                correlate(x, y)
            })
            .unwrap();
            assert_eq!(report, baseline);
            assert_eq!(finished.lock().unwrap().len(), 4);
        }
    }
}
