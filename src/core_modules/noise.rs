// THEORY:
// Salt-and-pepper style noise. Every pixel is an independent Bernoulli trial
// with probability `p`; a pixel that comes up as noise has its color channels
// replaced (never blended) by one brightness drawn uniformly from
// [min_brightness, max_brightness]. Whether the noise reads as background
// speckle or as stray ink is decided purely by that brightness range.

use crate::core_modules::error::{Result, ensure_ordered, ensure_within};
use crate::core_modules::frame::{Buffer, Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::pixel::Channel;
use image::Pixel;
use log::trace;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomNoise {
    /// Probability that any single pixel becomes a noise pixel.
    p: f64,
    min_brightness: Channel,
    max_brightness: Channel,
}

impl RandomNoise {
    pub fn new(p: f64, min_brightness: Channel, max_brightness: Channel) -> Result<Self> {
        ensure_within("noise probability", p, 0.0, 1.0)?;
        ensure_ordered("noise brightness", min_brightness, max_brightness)?;
        Ok(Self {
            p,
            min_brightness,
            max_brightness,
        })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn min_brightness(&self) -> Channel {
        self.min_brightness
    }

    pub fn max_brightness(&self) -> Channel {
        self.max_brightness
    }
}

impl Interfere for RandomNoise {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        trace!(
            "random noise p={} brightness=[{}, {}]",
            self.p, self.min_brightness, self.max_brightness
        );
        Ok(map_layout!(frame, buffer => self.speckle(buffer, rng)))
    }
}

impl RandomNoise {
    fn speckle<P, R>(&self, buffer: &Buffer<P>, rng: &mut R) -> Buffer<P>
    where
        P: Pixel<Subpixel = u8>,
        R: Rng + ?Sized,
    {
        let mut out = buffer.clone();
        if self.p == 0.0 {
            return out;
        }
        for pixel in out.pixels_mut() {
            if rng.gen_bool(self.p) {
                let brightness = rng.gen_range(self.min_brightness..=self.max_brightness);
                pixel.apply_without_alpha(|_| brightness);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::error::InterferenceError;
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn probability_and_brightness_are_validated() {
        assert!(matches!(
            RandomNoise::new(1.5, 0, 10),
            Err(InterferenceError::InvalidParameter(_))
        ));
        assert!(RandomNoise::new(-0.1, 0, 10).is_err());
        assert!(RandomNoise::new(0.5, 20, 10).is_err());
        assert!(RandomNoise::new(0.5, 10, 10).is_ok());
    }

    #[test]
    fn zero_probability_is_identity() {
        let frame = Frame::from(GrayImage::from_fn(12, 9, |x, y| Luma([(x * y) as u8])));
        let noise = RandomNoise::new(0.0, 0, 255).unwrap();
        let out = noise.interfere(&frame, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn certain_noise_replaces_every_pixel() {
        let frame = Frame::from(GrayImage::from_pixel(16, 16, Luma([255])));
        let noise = RandomNoise::new(1.0, 20, 40).unwrap();
        let out = noise.interfere(&frame, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!(out.as_raw().iter().all(|v| (20..=40).contains(v)));
    }

    #[test]
    fn noise_leaves_alpha_alone() {
        let frame = Frame::from(RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 90])));
        let noise = RandomNoise::new(1.0, 0, 0).unwrap();
        let out = noise.interfere(&frame, &mut StdRng::seed_from_u64(5)).unwrap();
        let Frame::Rgba(out) = out else {
            panic!("layout changed");
        };
        assert!(out.pixels().all(|p| *p == Rgba([0, 0, 0, 90])));
    }

    #[test]
    fn noise_rate_tracks_probability() {
        let frame = Frame::from(GrayImage::from_pixel(100, 100, Luma([255])));
        let noise = RandomNoise::new(0.2, 0, 0).unwrap();
        let out = noise.interfere(&frame, &mut StdRng::seed_from_u64(11)).unwrap();
        let speckles = out.as_raw().iter().filter(|v| **v == 0).count();
        assert!((1500..2500).contains(&speckles), "got {speckles}");
    }
}
