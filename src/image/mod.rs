//! Raster image model.
//!
//! The comparison core only needs the dimensions of an image and a way to read
//! one ARGB pixel at a time, which is what the [`Raster`] trait captures.
//! [`RasterImage`] is an owned, row-major implementation of that trait; with
//! the `image-io` feature, `image::RgbaImage` implements it as well.

use crate::util::{SimError, SimResult};
use std::fmt;

#[cfg(feature = "image-io")]
pub mod io;

/// A single pixel with 8-bit alpha, red, green, and blue components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Argb {
    /// Creates a pixel from its components.
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Unpacks a `0xAARRGGBB` color.
    pub const fn from_packed(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the pixel as `0xAARRGGBB`.
    pub const fn to_packed(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Creates a pixel from an `[r, g, b, a]` quadruple.
    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self {
            a: rgba[3],
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
        }
    }
}

/// Image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    /// Creates a size from width and height.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns `width * height`, or `None` on overflow.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

/// Read-only access to a 2D grid of ARGB pixels.
pub trait Raster {
    /// Returns the image dimensions.
    fn size(&self) -> Size;

    /// Returns the pixel at `(x, y)`.
    ///
    /// Callers only pass coordinates with `x < width` and `y < height`.
    fn pixel(&self, x: usize, y: usize) -> Argb;

    /// Returns the image width in pixels.
    fn width(&self) -> usize {
        self.size().width
    }

    /// Returns the image height in pixels.
    fn height(&self) -> usize {
        self.size().height
    }
}

impl<R: Raster + ?Sized> Raster for &R {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn pixel(&self, x: usize, y: usize) -> Argb {
        (**self).pixel(x, y)
    }
}

/// Owned image stored as contiguous row-major pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Vec<Argb>,
    width: usize,
    height: usize,
}

impl RasterImage {
    /// Creates an image from row-major pixels.
    pub fn new(pixels: Vec<Argb>, width: usize, height: usize) -> SimResult<Self> {
        let expected = required_len(width, height)?;
        if pixels.len() != expected {
            return Err(SimError::BufferLengthMismatch {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates an image from packed `0xAARRGGBB` values.
    pub fn from_argb_u32(data: &[u32], width: usize, height: usize) -> SimResult<Self> {
        let pixels = data.iter().copied().map(Argb::from_packed).collect();
        Self::new(pixels, width, height)
    }

    /// Creates an image from interleaved RGBA bytes.
    pub fn from_rgba8(data: &[u8], width: usize, height: usize) -> SimResult<Self> {
        let expected = required_len(width, height)?;
        let bytes = expected
            .checked_mul(4)
            .ok_or(SimError::InvalidDimensions { width, height })?;
        if data.len() != bytes {
            return Err(SimError::BufferLengthMismatch {
                expected: bytes,
                got: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| Argb::from_rgba([px[0], px[1], px[2], px[3]]))
            .collect();
        Self::new(pixels, width, height)
    }

    /// Creates an image where every pixel has the same color.
    pub fn filled(width: usize, height: usize, pixel: Argb) -> SimResult<Self> {
        let len = required_len(width, height)?;
        Self::new(vec![pixel; len], width, height)
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> SimResult<Self>
    where
        F: FnMut(usize, usize) -> Argb,
    {
        let len = required_len(width, height)?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(pixels, width, height)
    }

    /// Returns the row-major pixel buffer.
    pub fn pixels(&self) -> &[Argb] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Argb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

impl Raster for RasterImage {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn pixel(&self, x: usize, y: usize) -> Argb {
        self.pixels[y * self.width + x]
    }
}

fn required_len(width: usize, height: usize) -> SimResult<usize> {
    if width == 0 || height == 0 {
        return Err(SimError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(SimError::InvalidDimensions { width, height })
}
