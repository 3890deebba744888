//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{Argb, Raster, RasterImage, Size};
use crate::util::{SimError, SimResult};
use std::path::Path;

impl Raster for image::RgbaImage {
    fn size(&self) -> Size {
        Size::new(self.width() as usize, self.height() as usize)
    }

    fn pixel(&self, x: usize, y: usize) -> Argb {
        Argb::from_rgba(self.get_pixel(x as u32, y as u32).0)
    }
}

/// Creates an owned raster from an RGBA image buffer.
pub fn raster_from_rgba_image(img: &image::RgbaImage) -> SimResult<RasterImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    RasterImage::from_rgba8(img.as_raw(), width, height)
}

/// Creates an owned raster from a dynamic image, converting it to RGBA8.
pub fn raster_from_dynamic(img: &image::DynamicImage) -> SimResult<RasterImage> {
    let rgba = img.to_rgba8();
    raster_from_rgba_image(&rgba)
}

/// Loads an image from disk and converts it to an owned raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> SimResult<RasterImage> {
    let img = image::open(path).map_err(|err| SimError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic(&img)
}
