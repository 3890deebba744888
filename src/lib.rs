//! imgsim scores the visual similarity of two raster images.
//!
//! Each image is split into alpha, red, green, and blue channels, every
//! channel pair is scored with normalized cross-correlation (in parallel via
//! `rayon`), and the worst channel score is the similarity of the pair. The
//! assertion layer turns that score into a pass/fail check for image-based
//! tests that must tolerate anti-aliasing and compression noise.
//!
//! ```
//! use imgsim::{is_similar, Argb, RasterImage, DEFAULT_THRESHOLD};
//!
//! let img = RasterImage::filled(2, 1, Argb::new(255, 0, 0, 0)).unwrap();
//! assert!(is_similar(&img, &img, DEFAULT_THRESHOLD).unwrap());
//! ```

pub mod assertion;
pub mod channel;
pub mod image;
pub mod kernel;
pub mod similarity;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;

pub use assertion::{
    assert_similar, is_similar, CompareConfig, Comparator, Threshold, DEFAULT_THRESHOLD,
};
pub use channel::{extract_channels, Channel, ChannelSet};
pub use image::{Argb, Raster, RasterImage, Size};
pub use kernel::{correlate, Kernel, Moments};
pub use similarity::{compute_similarity, compute_similarity_with, SimilarityReport};
pub use util::{ErrorKind, SimError, SimResult};
