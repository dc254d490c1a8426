// THEORY:
// The `Frame` is the unit of data every interference consumes and produces. It is
// a "dumb" container around an 8-bit `image::ImageBuffer` in one of the four
// layouts an OCR sample realistically arrives in: grayscale, grayscale with
// alpha, RGB and RGBA.
//
// Key architectural principles:
// 1.  **Layout Preservation**: The layout is the enum tag. Interferences are
//     written once, generically over `image::Pixel<Subpixel = u8>`, and the
//     `map_layout!` macro re-wraps the result in the same tag it came from, so
//     an interference can never silently change the channel count.
// 2.  **Codec Boundary**: Decoding and encoding stay outside the crate. Frames
//     convert to and from `DynamicImage`, which is what every codec in the
//     `image` ecosystem hands out.
// 3.  **Immutability**: Interferences borrow a frame and return a new one.

use crate::core_modules::error::{InterferenceError, Result, incompatible_input};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, RgbImage, RgbaImage};

/// An 8-bit image buffer of any pixel layout.
pub type Buffer<P> = ImageBuffer<P, Vec<u8>>;

/// An in-memory 8-bit image, tagged with its channel layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Single luminance channel.
    Gray(GrayImage),
    /// Luminance plus alpha.
    GrayAlpha(GrayAlphaImage),
    /// Three color channels.
    Rgb(RgbImage),
    /// Three color channels plus alpha.
    Rgba(RgbaImage),
}

/// Applies an expression to the buffer inside a `Frame` and re-wraps the
/// result in the same layout. `$body` must evaluate to a buffer of the same
/// pixel type; `?` inside `$body` propagates from the calling function.
macro_rules! map_layout {
    ($frame:expr, $buffer:ident => $body:expr) => {
        match $frame {
            $crate::core_modules::frame::Frame::Gray($buffer) => {
                $crate::core_modules::frame::Frame::Gray($body)
            }
            $crate::core_modules::frame::Frame::GrayAlpha($buffer) => {
                $crate::core_modules::frame::Frame::GrayAlpha($body)
            }
            $crate::core_modules::frame::Frame::Rgb($buffer) => {
                $crate::core_modules::frame::Frame::Rgb($body)
            }
            $crate::core_modules::frame::Frame::Rgba($buffer) => {
                $crate::core_modules::frame::Frame::Rgba($body)
            }
        }
    };
}

pub(crate) use map_layout;

impl Frame {
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Gray(buffer) => buffer.dimensions(),
            Frame::GrayAlpha(buffer) => buffer.dimensions(),
            Frame::Rgb(buffer) => buffer.dimensions(),
            Frame::Rgba(buffer) => buffer.dimensions(),
        }
    }

    /// Number of samples per pixel, alpha included.
    pub fn channel_count(&self) -> u8 {
        match self {
            Frame::Gray(_) => 1,
            Frame::GrayAlpha(_) => 2,
            Frame::Rgb(_) => 3,
            Frame::Rgba(_) => 4,
        }
    }

    /// The raw interleaved samples in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Frame::Gray(buffer) => buffer.as_raw(),
            Frame::GrayAlpha(buffer) => buffer.as_raw(),
            Frame::Rgb(buffer) => buffer.as_raw(),
            Frame::Rgba(buffer) => buffer.as_raw(),
        }
    }

    /// Fails with `IncompatibleInput` when the frame has a zero dimension.
    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(incompatible_input!("frame has empty extent {width}x{height}"));
        }
        Ok(())
    }
}

impl From<GrayImage> for Frame {
    fn from(buffer: GrayImage) -> Self {
        Frame::Gray(buffer)
    }
}

impl From<GrayAlphaImage> for Frame {
    fn from(buffer: GrayAlphaImage) -> Self {
        Frame::GrayAlpha(buffer)
    }
}

impl From<RgbImage> for Frame {
    fn from(buffer: RgbImage) -> Self {
        Frame::Rgb(buffer)
    }
}

impl From<RgbaImage> for Frame {
    fn from(buffer: RgbaImage) -> Self {
        Frame::Rgba(buffer)
    }
}

impl TryFrom<DynamicImage> for Frame {
    type Error = InterferenceError;

    fn try_from(image: DynamicImage) -> Result<Self> {
        match image {
            DynamicImage::ImageLuma8(buffer) => Ok(Frame::Gray(buffer)),
            DynamicImage::ImageLumaA8(buffer) => Ok(Frame::GrayAlpha(buffer)),
            DynamicImage::ImageRgb8(buffer) => Ok(Frame::Rgb(buffer)),
            DynamicImage::ImageRgba8(buffer) => Ok(Frame::Rgba(buffer)),
            other => Err(incompatible_input!(
                "only 8-bit samples are supported, got {:?}",
                other.color()
            )),
        }
    }
}

impl From<Frame> for DynamicImage {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Gray(buffer) => DynamicImage::ImageLuma8(buffer),
            Frame::GrayAlpha(buffer) => DynamicImage::ImageLumaA8(buffer),
            Frame::Rgb(buffer) => DynamicImage::ImageRgb8(buffer),
            Frame::Rgba(buffer) => DynamicImage::ImageRgba8(buffer),
        }
    }
}
