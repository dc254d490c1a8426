// THEORY:
// Padding grows a frame to a fixed canvas so downstream consumers can batch
// samples of one size. The original content is anchored at the top-left corner
// and all padding goes to the right and bottom; the content is copied verbatim.
// Added pixels carry `val` in every color channel and are fully opaque.

use crate::core_modules::error::{Result, incompatible_input, invalid_parameter};
use crate::core_modules::frame::{Buffer, Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::pixel::{Channel, filled};
use image::{ImageBuffer, Pixel, imageops};
use log::trace;
use rand::Rng;

/// Pads a frame to exactly `width x height` with the constant `val`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    width: u32,
    height: u32,
    val: Channel,
}

impl Padding {
    pub fn new(width: u32, height: u32, val: Channel) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_parameter!(
                "padding target must be non-empty, got {width}x{height}"
            ));
        }
        Ok(Self { width, height, val })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn val(&self) -> Channel {
        self.val
    }

    fn pad<P: Pixel<Subpixel = u8>>(&self, buffer: &Buffer<P>) -> Buffer<P> {
        let mut canvas = ImageBuffer::from_pixel(self.width, self.height, filled::<P>(self.val));
        imageops::replace(&mut canvas, buffer, 0, 0);
        canvas
    }
}

impl Interfere for Padding {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, _rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        let (width, height) = frame.dimensions();
        if width > self.width || height > self.height {
            return Err(incompatible_input!(
                "cannot pad a {width}x{height} frame down to {}x{}",
                self.width,
                self.height
            ));
        }
        if (width, height) == (self.width, self.height) {
            return Ok(frame.clone());
        }
        trace!(
            "padding {width}x{height} -> {}x{} with {}",
            self.width, self.height, self.val
        );
        Ok(map_layout!(frame, buffer => self.pad(buffer)))
    }
}
