// THEORY:
// Random downscaling simulates text captured at a lower resolution. Both axes
// share one scale factor so the aspect ratio is preserved; the target extent is
// rounded and never drops below a single pixel.

use crate::core_modules::error::{Result, ensure_finite_range, invalid_parameter};
use crate::core_modules::frame::{Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::sampling::uniform_f64;
use image::imageops::{self, FilterType};
use log::trace;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomResize {
    min_scale: f64,
    max_scale: f64,
}

impl RandomResize {
    /// Both scales must lie in (0, 1] with `min_scale <= max_scale`.
    pub fn new(min_scale: f64, max_scale: f64) -> Result<Self> {
        for (name, scale) in [("min_scale", min_scale), ("max_scale", max_scale)] {
            if !(scale > 0.0 && scale <= 1.0) {
                return Err(invalid_parameter!("{name} must lie in (0, 1], got {scale}"));
            }
        }
        ensure_finite_range("resize scale", min_scale, max_scale)?;
        Ok(Self {
            min_scale,
            max_scale,
        })
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }
}

/// `round(extent * scale)`, clamped to at least one pixel.
pub fn scaled_extent(extent: u32, scale: f64) -> u32 {
    ((f64::from(extent) * scale).round() as u32).max(1)
}

impl Interfere for RandomResize {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        let scale = uniform_f64(rng, self.min_scale, self.max_scale);
        let (width, height) = frame.dimensions();
        let (target_width, target_height) = (scaled_extent(width, scale), scaled_extent(height, scale));
        trace!("random resize scale={scale} {width}x{height} -> {target_width}x{target_height}");

        if (target_width, target_height) == (width, height) {
            return Ok(frame.clone());
        }
        Ok(map_layout!(frame, buffer => imageops::resize(
            buffer,
            target_width,
            target_height,
            FilterType::Triangle,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA, Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scales_are_validated() {
        assert!(RandomResize::new(0.0, 0.5).is_err());
        assert!(RandomResize::new(0.5, 1.2).is_err());
        assert!(RandomResize::new(0.8, 0.4).is_err());
        assert!(RandomResize::new(f64::NAN, 0.4).is_err());
        assert!(RandomResize::new(0.4, 0.8).is_ok());
    }

    #[test]
    fn fixed_scale_is_deterministic() {
        let frame = Frame::from(RgbImage::from_pixel(101, 40, Rgb([3, 4, 5])));
        let resize = RandomResize::new(0.5, 0.5).unwrap();
        for seed in 0..5 {
            let out = resize
                .interfere(&frame, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(out.dimensions(), (51, 20));
            assert_eq!(out.channel_count(), 3);
        }
    }

    #[test]
    fn extent_never_collapses() {
        assert_eq!(scaled_extent(3, 0.01), 1);
        assert_eq!(scaled_extent(10, 0.25), 3);
    }

    #[test]
    fn unit_scale_is_identity() {
        let frame = Frame::from(GrayAlphaImage::from_pixel(9, 4, LumaA([1, 2])));
        let out = RandomResize::new(1.0, 1.0)
            .unwrap()
            .interfere(&frame, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn random_scale_stays_in_range() {
        let frame = Frame::from(RgbImage::new(200, 100));
        let resize = RandomResize::new(0.3, 0.6).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let (width, height) = resize.interfere(&frame, &mut rng).unwrap().dimensions();
            assert!((60..=120).contains(&width));
            assert!((30..=60).contains(&height));
        }
    }
}
