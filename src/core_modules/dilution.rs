// THEORY:
// Dilution fades the whole frame toward a reference value, the way faint ink or
// an overexposed capture looks. One rate is drawn per call and applied to every
// color channel of every pixel: `v + (value - v) * rate`. A rate of 0 leaves
// the frame untouched and a rate of 1 flattens it to `value`. Alpha is kept.

use crate::core_modules::error::{Result, ensure_finite_range, ensure_within};
use crate::core_modules::frame::{Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::pixel::{Channel, Rate, blend};
use crate::core_modules::sampling::uniform_f64;
use image::Pixel;
use log::trace;
use rand::Rng;

/// The default dilution target: white paper.
pub const DEFAULT_DILUTION_VALUE: Channel = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomDilution {
    min_rate: Rate,
    max_rate: Rate,
    value: Channel,
}

impl RandomDilution {
    /// Dilutes toward white.
    pub fn new(min_rate: Rate, max_rate: Rate) -> Result<Self> {
        Self::with_value(min_rate, max_rate, DEFAULT_DILUTION_VALUE)
    }

    pub fn with_value(min_rate: Rate, max_rate: Rate, value: Channel) -> Result<Self> {
        ensure_within("min_rate", min_rate, 0.0, 1.0)?;
        ensure_within("max_rate", max_rate, 0.0, 1.0)?;
        ensure_finite_range("dilution rate", min_rate, max_rate)?;
        Ok(Self {
            min_rate,
            max_rate,
            value,
        })
    }

    pub fn min_rate(&self) -> Rate {
        self.min_rate
    }

    pub fn max_rate(&self) -> Rate {
        self.max_rate
    }

    pub fn value(&self) -> Channel {
        self.value
    }
}

impl Interfere for RandomDilution {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        let rate = uniform_f64(rng, self.min_rate, self.max_rate);
        trace!("random dilution rate={rate} toward {}", self.value);
        if rate == 0.0 {
            return Ok(frame.clone());
        }
        let target = self.value;
        Ok(map_layout!(frame, buffer => {
            let mut out = buffer.clone();
            for pixel in out.pixels_mut() {
                pixel.apply_without_alpha(|v| blend(v, target, rate));
            }
            out
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn text() -> Frame {
        Frame::from(RgbImage::from_fn(10, 6, |x, y| {
            Rgb([(x * 20) as u8, (y * 40) as u8, 30])
        }))
    }

    #[test]
    fn rates_are_validated() {
        assert!(RandomDilution::new(-0.1, 0.5).is_err());
        assert!(RandomDilution::new(0.2, 1.1).is_err());
        assert!(RandomDilution::new(0.6, 0.4).is_err());
        assert!(RandomDilution::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn zero_rate_is_identity() {
        let frame = text();
        let out = RandomDilution::new(0.0, 0.0)
            .unwrap()
            .interfere(&frame, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn full_rate_flattens_to_the_value() {
        let out = RandomDilution::with_value(1.0, 1.0, 230)
            .unwrap()
            .interfere(&text(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(out.as_raw().iter().all(|v| *v == 230));
    }

    #[test]
    fn partial_rate_moves_toward_white() {
        let frame = Frame::from(GrayImage::from_pixel(4, 4, Luma([100])));
        let out = RandomDilution::new(0.5, 0.5)
            .unwrap()
            .interfere(&frame, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(out.as_raw().iter().all(|v| *v == 178));
    }

    #[test]
    fn alpha_is_not_diluted() {
        let frame = Frame::from(GrayAlphaImage::from_pixel(3, 3, LumaA([0, 60])));
        let out = RandomDilution::new(1.0, 1.0)
            .unwrap()
            .interfere(&frame, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let Frame::GrayAlpha(out) = out else {
            panic!("layout changed");
        };
        assert!(out.pixels().all(|p| *p == LumaA([255, 60])));
    }
}
