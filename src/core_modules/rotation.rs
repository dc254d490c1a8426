// THEORY:
// Random rotation simulates a skewed scan. The output canvas is the bounding box
// of the rotated frame so no corner of the content is clipped, and everything
// the rotated frame does not cover is painted with the estimated background.
// Positive angles rotate anti-clockwise, negative angles clockwise.
//
// The turn is about the centre of the pixel grid, `((w - 1) / 2, (h - 1) / 2)`,
// mapped onto the centre of the output grid. Exact multiples of 90 degrees are
// pixel permutations and go through `imageops` without resampling; every other
// angle is warped bilinearly with an `imageproc` projection.

use crate::core_modules::error::{Result, ensure_finite_range};
use crate::core_modules::frame::{Buffer, Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::pixel::dominant_border_pixel;
use crate::core_modules::sampling::uniform_f64;
use image::{ImageBuffer, Pixel, imageops};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use log::trace;
use rand::Rng;

/// Absorbs floating point error in the bounding box so 90 degree turns are exact.
const EXTENT_EPSILON: f64 = 1e-6;

/// Rotates a frame about its centre by an angle drawn from `[min_angle, max_angle]` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomRotation {
    min_angle: f64,
    max_angle: f64,
}

impl RandomRotation {
    pub fn new(min_angle: f64, max_angle: f64) -> Result<Self> {
        ensure_finite_range("rotation angle", min_angle, max_angle)?;
        Ok(Self {
            min_angle,
            max_angle,
        })
    }

    pub fn min_angle(&self) -> f64 {
        self.min_angle
    }

    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }
}

/// Extent of the axis-aligned box holding a `width x height` frame rotated by `degrees`.
pub fn rotated_extent(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (width, height) = (f64::from(width), f64::from(height));
    let extent = |value: f64| ((value - EXTENT_EPSILON).ceil() as u32).max(1);
    (
        extent(width * cos + height * sin),
        extent(width * sin + height * cos),
    )
}

/// Number of anti-clockwise quarter turns in `degrees`, if it is a whole number of them.
fn quarter_turns(degrees: f64) -> Option<u8> {
    let turns = degrees / 90.0;
    let nearest = turns.round();
    ((turns - nearest).abs() < EXTENT_EPSILON).then(|| nearest.rem_euclid(4.0) as u8)
}

impl Interfere for RandomRotation {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        frame.ensure_not_empty()?;
        let angle = uniform_f64(rng, self.min_angle, self.max_angle);
        trace!("random rotation angle={angle}");
        if angle == 0.0 {
            return Ok(frame.clone());
        }
        Ok(map_layout!(frame, buffer => rotate(buffer, angle)))
    }
}

fn rotate<P>(buffer: &Buffer<P>, degrees: f64) -> Buffer<P>
where
    P: Pixel<Subpixel = u8> + Send + Sync + 'static,
{
    // imageops turns clockwise.
    match quarter_turns(degrees) {
        Some(0) => return buffer.clone(),
        Some(1) => return imageops::rotate270(buffer),
        Some(2) => return imageops::rotate180(buffer),
        Some(3) => return imageops::rotate90(buffer),
        _ => {}
    }

    let background = dominant_border_pixel(buffer);
    let (width, height) = buffer.dimensions();
    let (rotated_width, rotated_height) = rotated_extent(width, height, degrees);
    let centre = |extent: u32| (extent as f32 - 1.0) / 2.0;

    // The y axis points down, so a negative theta turns anti-clockwise on screen.
    let projection = Projection::translate(centre(rotated_width), centre(rotated_height))
        * Projection::rotate(-(degrees.to_radians() as f32))
        * Projection::translate(-centre(width), -centre(height));

    let mut rotated = ImageBuffer::from_pixel(rotated_width, rotated_height, background);
    warp_into(buffer, &projection, Interpolation::Bilinear, background, &mut rotated);
    rotated
}
