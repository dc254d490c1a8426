// THEORY:
// Gaussian blur simulates defocus and low-resolution capture. The kernel is
// square (r x r) and separable. The frame is lifted to `f32` samples, run through
// `imageproc`'s separable filter and rounded back to 8 bits once at the end,
// which keeps r = 1 a bit-exact identity.
//
// A sigma of zero follows the usual convention of deriving the deviation from
// the kernel size: sigma = 0.3 * ((r - 1) / 2 - 1) + 0.8.
// Samples beyond the border replicate the nearest edge sample.

use crate::core_modules::error::{Result, incompatible_input, invalid_parameter};
use crate::core_modules::frame::{Buffer, Frame, map_layout};
use crate::core_modules::interference::Interfere;
use image::Pixel;
use imageproc::filter::separable_filter_equal;
use imageproc::map::{ChannelMap, WithChannel, map_subpixels};
use log::trace;
use rand::Rng;

/// Convolves a frame with an `r x r` Gaussian kernel of deviation `sigma`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBlur {
    r: u32,
    sigma: f64,
    /// Normalized 1-D kernel of length `r`.
    kernel: Vec<f64>,
}

impl GaussianBlur {
    /// Fails with `InvalidParameter` unless `r` is odd and positive and `sigma`
    /// is finite and non-negative.
    pub fn new(r: u32, sigma: f64) -> Result<Self> {
        if r == 0 || r % 2 == 0 {
            return Err(invalid_parameter!(
                "blur radius must be odd and positive, got {r}"
            ));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(invalid_parameter!(
                "blur sigma must be finite and non-negative, got {sigma}"
            ));
        }
        Ok(Self {
            r,
            sigma,
            kernel: gaussian_kernel(r, sigma),
        })
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }
}

impl Interfere for GaussianBlur {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, _rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        let (width, height) = frame.dimensions();
        if self.r > width || self.r > height {
            return Err(incompatible_input!(
                "blur kernel {0}x{0} does not fit a {width}x{height} frame",
                self.r
            ));
        }
        trace!("gaussian blur r={} sigma={}", self.r, self.sigma);
        let kernel: Vec<f32> = self.kernel.iter().map(|&weight| weight as f32).collect();
        Ok(map_layout!(frame, buffer => convolve(buffer, &kernel)))
    }
}

/// Builds the normalized 1-D Gaussian of length `size`.
pub fn gaussian_kernel(size: u32, sigma: f64) -> Vec<f64> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = f64::from(size / 2);
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let offset = f64::from(i) - half;
            (-(offset * offset) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

fn convolve<P>(buffer: &Buffer<P>, kernel: &[f32]) -> Buffer<P>
where
    P: Pixel<Subpixel = u8> + WithChannel<f32>,
    ChannelMap<P, f32>: WithChannel<u8, Pixel = P>,
{
    let samples = map_subpixels(buffer, |value: u8| f32::from(value));
    let blurred = separable_filter_equal(&samples, kernel);
    map_subpixels(&blurred, |value: f32| value.round().clamp(0.0, 255.0) as u8)
}
