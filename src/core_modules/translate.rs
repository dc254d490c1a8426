// THEORY:
// Random translation moves the text inside its crop, the way a sloppy
// segmentation step would. The contract is that no ink ever leaves the frame:
// the foreground bounding box is measured first and the displacement is drawn
// from the exact range that keeps the box inside the frame on both axes.
// Everything the content vacates is repainted with the background pixel.

use crate::core_modules::error::Result;
use crate::core_modules::frame::{Buffer, Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::pixel::{Channel, dominant_border_pixel, foreground_bounds};
use crate::core_modules::sampling::uniform_i64;
use image::{ImageBuffer, Pixel};
use log::trace;
use rand::Rng;

/// Per-channel distance from the background under which a pixel counts as paper.
pub const DEFAULT_TOLERANCE: Channel = 16;

/// Shifts the frame content by a random displacement that keeps it in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomTranslate {
    tolerance: Channel,
}

impl RandomTranslate {
    pub fn new(tolerance: Channel) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Channel {
        self.tolerance
    }
}

impl Default for RandomTranslate {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Interfere for RandomTranslate {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        Ok(map_layout!(frame, buffer => translate(buffer, self.tolerance, rng)))
    }
}

fn translate<P, R>(buffer: &Buffer<P>, tolerance: Channel, rng: &mut R) -> Buffer<P>
where
    P: Pixel<Subpixel = u8>,
    R: Rng + ?Sized,
{
    let background = dominant_border_pixel(buffer);
    let Some(bounds) = foreground_bounds(buffer, &background, tolerance) else {
        trace!("random translate: no foreground, frame left as is");
        return buffer.clone();
    };

    let (width, height) = buffer.dimensions();
    let dx = uniform_i64(
        rng,
        -i64::from(bounds.left),
        i64::from(width - 1 - bounds.right),
    );
    let dy = uniform_i64(
        rng,
        -i64::from(bounds.top),
        i64::from(height - 1 - bounds.bottom),
    );
    trace!("random translate dx={dx} dy={dy} content={bounds:?}");

    let mut out = ImageBuffer::from_pixel(width, height, background);
    for y in bounds.top..=bounds.bottom {
        for x in bounds.left..=bounds.right {
            let target_x = (i64::from(x) + dx) as u32;
            let target_y = (i64::from(y) + dy) as u32;
            out.put_pixel(target_x, target_y, *buffer.get_pixel(x, y));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::differs;
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// White page with a 4x3 block of ink at (10, 6).
    fn page() -> GrayImage {
        let mut buffer = GrayImage::from_pixel(30, 20, Luma([255]));
        for y in 6..9 {
            for x in 10..14 {
                buffer.put_pixel(x, y, Luma([(x * 10) as u8]));
            }
        }
        buffer
    }

    fn ink_pixels(buffer: &GrayImage) -> Vec<u8> {
        buffer
            .pixels()
            .filter(|p| differs(*p, &Luma([255]), DEFAULT_TOLERANCE))
            .map(|p| p[0])
            .collect()
    }

    #[test]
    fn content_stays_inside_and_intact() {
        let source = page();
        let frame = Frame::from(source.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let out = RandomTranslate::default().interfere(&frame, &mut rng).unwrap();
            let Frame::Gray(out) = out else {
                panic!("layout changed");
            };
            assert_eq!(out.dimensions(), source.dimensions());
            let mut before = ink_pixels(&source);
            let mut after = ink_pixels(&out);
            before.sort_unstable();
            after.sort_unstable();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn content_actually_moves() {
        let frame = Frame::from(page());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let moved = (0..20)
            .map(|_| RandomTranslate::default().interfere(&frame, &mut rng).unwrap())
            .any(|out| out != frame);
        assert!(moved);
    }

    #[test]
    fn content_touching_every_border_cannot_move() {
        let mut buffer = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));
        buffer.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        buffer.put_pixel(5, 5, Rgba([0, 0, 0, 255]));
        let frame = Frame::from(buffer);
        let out = RandomTranslate::default()
            .interfere(&frame, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn blank_frame_is_returned_unchanged() {
        let frame = Frame::from(GrayImage::from_pixel(8, 8, Luma([200])));
        let out = RandomTranslate::new(0)
            .interfere(&frame, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert_eq!(out, frame);
    }
}
