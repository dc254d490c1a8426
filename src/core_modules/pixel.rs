// THEORY:
// Single-pixel heuristics shared by the interferences. Nothing in here reads
// more than one pixel at a time except `dominant_border_pixel` and
// `foreground_bounds`, which summarize a whole buffer into the two facts the
// geometric interferences need: what the paper looks like, and where the ink is.
//
// Key principles:
// 1) Color vs alpha: brightness operations (noise, dilution, padding fill)
//    touch the color channels only. Alpha passes through untouched, or is
//    fully opaque for freshly synthesized pixels.
// 2) Background is the border mode: scanned text sits on paper that reaches
//    the edge of the crop, so the most frequent border pixel is a robust
//    estimate of the background without any thresholding parameters.

use crate::core_modules::frame::Buffer;
use image::Pixel;
use std::collections::HashMap;

pub type Channel = u8;
pub type Rate = f64;

/// Inclusive bounding box of the foreground content of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl ContentBounds {
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}

/// A pixel whose color channels all equal `value` and whose alpha, if any, is opaque.
pub fn filled<P: Pixel<Subpixel = u8>>(value: Channel) -> P {
    let opaque = [u8::MAX; 4];
    let mut pixel = *P::from_slice(&opaque[..P::CHANNEL_COUNT as usize]);
    pixel.apply_without_alpha(|_| value);
    pixel
}

/// Blends `value` toward `target` by `rate` (0 keeps `value`, 1 yields `target`).
pub fn blend(value: Channel, target: Channel, rate: Rate) -> Channel {
    let value = f64::from(value);
    let blended = value + (f64::from(target) - value) * rate;
    blended.round().clamp(0.0, 255.0) as Channel
}

/// True when any channel of `a` differs from `b` by more than `tolerance`.
pub fn differs<P: Pixel<Subpixel = u8>>(a: &P, b: &P, tolerance: Channel) -> bool {
    a.channels()
        .iter()
        .zip(b.channels())
        .any(|(x, y)| x.abs_diff(*y) > tolerance)
}

/// The most frequent pixel along the outer border of the buffer.
///
/// Ties resolve to the value seen first walking the top row left to right, so
/// the estimate is stable across runs. An empty buffer yields black.
pub fn dominant_border_pixel<P: Pixel<Subpixel = u8>>(buffer: &Buffer<P>) -> P {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return filled(0);
    }

    let mut counts: HashMap<u32, (usize, usize)> = HashMap::new();
    let mut order = 0usize;
    let mut count = |pixel: &P| {
        let entry = counts.entry(pack(pixel)).or_insert((0, order));
        entry.0 += 1;
        order += 1;
    };

    for x in 0..width {
        count(buffer.get_pixel(x, 0));
        if height > 1 {
            count(buffer.get_pixel(x, height - 1));
        }
    }
    for y in 1..height.saturating_sub(1) {
        count(buffer.get_pixel(0, y));
        if width > 1 {
            count(buffer.get_pixel(width - 1, y));
        }
    }

    let key = counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(key, _)| key)
        .unwrap_or_default();
    unpack(key)
}

/// Bounding box of every pixel that differs from `background` by more than
/// `tolerance`, or `None` when the buffer holds nothing but background.
pub fn foreground_bounds<P: Pixel<Subpixel = u8>>(
    buffer: &Buffer<P>,
    background: &P,
    tolerance: Channel,
) -> Option<ContentBounds> {
    let mut bounds: Option<ContentBounds> = None;
    for (x, y, pixel) in buffer.enumerate_pixels() {
        if !differs(pixel, background, tolerance) {
            continue;
        }
        bounds = Some(match bounds {
            None => ContentBounds {
                left: x,
                top: y,
                right: x,
                bottom: y,
            },
            Some(b) => ContentBounds {
                left: b.left.min(x),
                top: b.top.min(y),
                right: b.right.max(x),
                bottom: b.bottom.max(y),
            },
        });
    }
    bounds
}

fn pack<P: Pixel<Subpixel = u8>>(pixel: &P) -> u32 {
    pixel
        .channels()
        .iter()
        .fold(0u32, |acc, &channel| (acc << 8) | u32::from(channel))
}

fn unpack<P: Pixel<Subpixel = u8>>(key: u32) -> P {
    let count = P::CHANNEL_COUNT as usize;
    let mut bytes = [0u8; 4];
    for (i, byte) in bytes[..count].iter_mut().enumerate() {
        *byte = (key >> (8 * (count - 1 - i))) as u8;
    }
    *P::from_slice(&bytes[..count])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba};

    #[test]
    fn filled_keeps_alpha_opaque() {
        let pixel: Rgba<u8> = filled(40);
        assert_eq!(pixel, Rgba([40, 40, 40, 255]));
        let pixel: LumaA<u8> = filled(7);
        assert_eq!(pixel, LumaA([7, 255]));
        let pixel: Luma<u8> = filled(7);
        assert_eq!(pixel, Luma([7]));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(30, 255, 0.0), 30);
        assert_eq!(blend(30, 255, 1.0), 255);
        assert_eq!(blend(0, 100, 0.5), 50);
    }

    #[test]
    fn pack_round_trips_every_layout() {
        let pixel = Rgba([1, 2, 3, 4]);
        assert_eq!(unpack::<Rgba<u8>>(pack(&pixel)), pixel);
        let pixel = Rgb([200, 0, 17]);
        assert_eq!(unpack::<Rgb<u8>>(pack(&pixel)), pixel);
    }

    #[test]
    fn border_mode_ignores_the_interior() {
        let mut buffer = GrayImage::from_pixel(10, 10, Luma([250]));
        for y in 2..8 {
            for x in 2..8 {
                buffer.put_pixel(x, y, Luma([0]));
            }
        }
        assert_eq!(dominant_border_pixel(&buffer), Luma([250]));
    }

    #[test]
    fn foreground_bounds_cover_the_ink() {
        let mut buffer = RgbImage::from_pixel(20, 10, Rgb([255, 255, 255]));
        buffer.put_pixel(3, 4, Rgb([0, 0, 0]));
        buffer.put_pixel(12, 7, Rgb([10, 10, 10]));
        buffer.put_pixel(5, 5, Rgb([250, 250, 250]));
        let background = dominant_border_pixel(&buffer);
        let bounds = foreground_bounds(&buffer, &background, 16).unwrap();
        assert_eq!(
            bounds,
            ContentBounds {
                left: 3,
                top: 4,
                right: 12,
                bottom: 7
            }
        );
        assert_eq!((bounds.width(), bounds.height()), (10, 4));
    }

    #[test]
    fn blank_buffer_has_no_foreground() {
        let buffer = GrayImage::from_pixel(5, 5, Luma([128]));
        assert!(foreground_bounds(&buffer, &Luma([128]), 0).is_none());
    }
}
