//! Per-channel decomposition of raster images.

use crate::image::Raster;
use std::fmt;

/// One of the four pixel components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Alpha,
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in extraction order.
    pub const ALL: [Channel; 4] = [Channel::Alpha, Channel::Red, Channel::Green, Channel::Blue];

    /// Returns the position of this channel in [`Channel::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Channel::Alpha => 0,
            Channel::Red => 1,
            Channel::Green => 2,
            Channel::Blue => 3,
        }
    }

    /// Returns the lowercase channel name.
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Alpha => "alpha",
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four intensity buffers of one image, each in row-major pixel order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelSet {
    buffers: [Vec<u8>; 4],
}

impl ChannelSet {
    /// Returns the buffer for `channel`.
    pub fn get(&self, channel: Channel) -> &[u8] {
        &self.buffers[channel.index()]
    }

    /// Returns the number of pixels per buffer.
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    /// Returns true if the buffers hold no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits `image` into alpha, red, green, and blue buffers.
pub fn extract_channels<R: Raster + ?Sized>(image: &R) -> ChannelSet {
    let size = image.size();
    let len = size.width * size.height;
    let mut alpha = Vec::with_capacity(len);
    let mut red = Vec::with_capacity(len);
    let mut green = Vec::with_capacity(len);
    let mut blue = Vec::with_capacity(len);

    for y in 0..size.height {
        for x in 0..size.width {
            let px = image.pixel(x, y);
            alpha.push(px.a);
            red.push(px.r);
            green.push(px.g);
            blue.push(px.b);
        }
    }

    ChannelSet {
        buffers: [alpha, red, green, blue],
    }
}
