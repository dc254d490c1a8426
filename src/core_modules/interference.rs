// THEORY:
// The `Interference` is the single capability this crate is built around: take a
// frame, return a distorted frame. The set of distortions is closed and known up
// front, so it is modelled as an enum over the seven concrete variants and every
// dispatch is an exhaustive `match`. Adding a variant is a compile error until
// every match handles it.
//
// Key architectural principles:
// 1.  **Validated Construction**: Every variant checks its bounds in its
//     constructor. An `Interference` value that exists is always applicable,
//     modulo frames too small for it.
// 2.  **Injected Randomness**: `interfere` takes the generator as an argument.
//     The variant owns only its immutable bounds; seeding the generator makes
//     the whole call deterministic.
// 3.  **Config Boundary**: `InterferenceSpec` is the serializable mirror of the
//     enum (`{"type": ..., "params": {...}}`). It carries raw parameters and
//     only becomes an `Interference` through `build`, which runs the same
//     validation as the constructors.

use crate::core_modules::dilution::{DEFAULT_DILUTION_VALUE, RandomDilution};
use crate::core_modules::error::Result;
use crate::core_modules::frame::Frame;
use crate::core_modules::gaussian_blur::GaussianBlur;
use crate::core_modules::noise::RandomNoise;
use crate::core_modules::padding::Padding;
use crate::core_modules::pixel::Channel;
use crate::core_modules::resize::RandomResize;
use crate::core_modules::rotation::RandomRotation;
use crate::core_modules::translate::{DEFAULT_TOLERANCE, RandomTranslate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A transformation that simulates one kind of visual interference.
pub trait Interfere {
    /// Returns a new, distorted frame. The input is never modified.
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame>;
}

/// The closed set of interference variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Interference {
    GaussianBlur(GaussianBlur),
    RandomTranslate(RandomTranslate),
    RandomNoise(RandomNoise),
    RandomResize(RandomResize),
    Padding(Padding),
    RandomRotation(RandomRotation),
    RandomDilution(RandomDilution),
}

impl Interference {
    /// The variant name as it appears in configuration records.
    pub fn name(&self) -> &'static str {
        match self {
            Interference::GaussianBlur(_) => "GaussianBlur",
            Interference::RandomTranslate(_) => "RandomTranslate",
            Interference::RandomNoise(_) => "RandomNoise",
            Interference::RandomResize(_) => "RandomResize",
            Interference::Padding(_) => "Padding",
            Interference::RandomRotation(_) => "RandomRotation",
            Interference::RandomDilution(_) => "RandomDilution",
        }
    }

    /// The configuration record that rebuilds this interference.
    pub fn spec(&self) -> InterferenceSpec {
        match self {
            Interference::GaussianBlur(blur) => InterferenceSpec::GaussianBlur {
                r: blur.r(),
                sigma: blur.sigma(),
            },
            Interference::RandomTranslate(translate) => InterferenceSpec::RandomTranslate {
                tolerance: translate.tolerance(),
            },
            Interference::RandomNoise(noise) => InterferenceSpec::RandomNoise {
                p: noise.p(),
                min_brightness: noise.min_brightness(),
                max_brightness: noise.max_brightness(),
            },
            Interference::RandomResize(resize) => InterferenceSpec::RandomResize {
                min_scale: resize.min_scale(),
                max_scale: resize.max_scale(),
            },
            Interference::Padding(padding) => InterferenceSpec::Padding {
                width: padding.width(),
                height: padding.height(),
                val: padding.val(),
            },
            Interference::RandomRotation(rotation) => InterferenceSpec::RandomRotation {
                min_angle: rotation.min_angle(),
                max_angle: rotation.max_angle(),
            },
            Interference::RandomDilution(dilution) => InterferenceSpec::RandomDilution {
                min_rate: dilution.min_rate(),
                max_rate: dilution.max_rate(),
                value: dilution.value(),
            },
        }
    }
}

impl Interfere for Interference {
    fn interfere<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Frame> {
        match self {
            Interference::GaussianBlur(blur) => blur.interfere(frame, rng),
            Interference::RandomTranslate(translate) => translate.interfere(frame, rng),
            Interference::RandomNoise(noise) => noise.interfere(frame, rng),
            Interference::RandomResize(resize) => resize.interfere(frame, rng),
            Interference::Padding(padding) => padding.interfere(frame, rng),
            Interference::RandomRotation(rotation) => rotation.interfere(frame, rng),
            Interference::RandomDilution(dilution) => dilution.interfere(frame, rng),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Interference {
                fn from(interference: $variant) -> Self {
                    Interference::$variant(interference)
                }
            }
        )*
    };
}

impl_from_variant!(
    GaussianBlur,
    RandomTranslate,
    RandomNoise,
    RandomResize,
    Padding,
    RandomRotation,
    RandomDilution,
);

fn default_tolerance() -> Channel {
    DEFAULT_TOLERANCE
}

fn default_dilution_value() -> Channel {
    DEFAULT_DILUTION_VALUE
}

/// One `{"type": ..., "params": {...}}` configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", deny_unknown_fields)]
pub enum InterferenceSpec {
    GaussianBlur {
        r: u32,
        sigma: f64,
    },
    RandomTranslate {
        #[serde(default = "default_tolerance")]
        tolerance: Channel,
    },
    RandomNoise {
        p: f64,
        min_brightness: Channel,
        max_brightness: Channel,
    },
    RandomResize {
        min_scale: f64,
        max_scale: f64,
    },
    Padding {
        width: u32,
        height: u32,
        val: Channel,
    },
    RandomRotation {
        min_angle: f64,
        max_angle: f64,
    },
    RandomDilution {
        min_rate: f64,
        max_rate: f64,
        #[serde(default = "default_dilution_value")]
        value: Channel,
    },
}

impl InterferenceSpec {
    /// Validates the parameters and builds the interference.
    pub fn build(&self) -> Result<Interference> {
        let interference = match *self {
            InterferenceSpec::GaussianBlur { r, sigma } => GaussianBlur::new(r, sigma)?.into(),
            InterferenceSpec::RandomTranslate { tolerance } => {
                RandomTranslate::new(tolerance).into()
            }
            InterferenceSpec::RandomNoise {
                p,
                min_brightness,
                max_brightness,
            } => RandomNoise::new(p, min_brightness, max_brightness)?.into(),
            InterferenceSpec::RandomResize {
                min_scale,
                max_scale,
            } => RandomResize::new(min_scale, max_scale)?.into(),
            InterferenceSpec::Padding { width, height, val } => {
                Padding::new(width, height, val)?.into()
            }
            InterferenceSpec::RandomRotation {
                min_angle,
                max_angle,
            } => RandomRotation::new(min_angle, max_angle)?.into(),
            InterferenceSpec::RandomDilution {
                min_rate,
                max_rate,
                value,
            } => RandomDilution::with_value(min_rate, max_rate, value)?.into(),
        };
        Ok(interference)
    }
}

impl TryFrom<InterferenceSpec> for Interference {
    type Error = crate::core_modules::error::InterferenceError;

    fn try_from(spec: InterferenceSpec) -> Result<Self> {
        spec.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::error::InterferenceError;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn every_variant() -> Vec<Interference> {
        vec![
            GaussianBlur::new(3, 0.8).unwrap().into(),
            RandomTranslate::default().into(),
            RandomNoise::new(0.1, 0, 60).unwrap().into(),
            RandomResize::new(0.5, 0.9).unwrap().into(),
            Padding::new(64, 48, 255).unwrap().into(),
            RandomRotation::new(-15.0, 15.0).unwrap().into(),
            RandomDilution::new(0.1, 0.6).unwrap().into(),
        ]
    }

    fn samples() -> Vec<Frame> {
        let mut gray = GrayImage::from_pixel(40, 30, Luma([255]));
        let mut rgba = RgbaImage::from_pixel(40, 30, Rgba([250, 250, 250, 255]));
        for x in 8..30 {
            gray.put_pixel(x, 12, Luma([0]));
            rgba.put_pixel(x, 12, Rgba([0, 0, 0, 255]));
        }
        vec![
            Frame::from(gray),
            Frame::from(RgbImage::from_fn(40, 30, |x, y| Rgb([x as u8, y as u8, 9]))),
            Frame::from(rgba),
        ]
    }

    #[test]
    fn every_variant_preserves_layout() {
        let mut rng = StdRng::seed_from_u64(2024);
        for interference in every_variant() {
            for frame in samples() {
                let out = interference.interfere(&frame, &mut rng).unwrap();
                assert_eq!(out.channel_count(), frame.channel_count(), "{}", interference.name());
                let (width, height) = out.dimensions();
                assert!(width > 0 && height > 0, "{}", interference.name());
            }
        }
    }

    #[test]
    fn spec_rebuilds_the_same_interference() {
        for interference in every_variant() {
            assert_eq!(interference.spec().build().unwrap(), interference);
        }
    }

    #[test]
    fn records_parse_by_variant_name() {
        let spec: InterferenceSpec =
            serde_json::from_str(r#"{"type": "GaussianBlur", "params": {"r": 5, "sigma": 1.5}}"#)
                .unwrap();
        assert_eq!(spec, InterferenceSpec::GaussianBlur { r: 5, sigma: 1.5 });

        let spec: InterferenceSpec =
            serde_json::from_str(r#"{"type": "RandomTranslate", "params": {}}"#).unwrap();
        assert_eq!(
            spec,
            InterferenceSpec::RandomTranslate {
                tolerance: DEFAULT_TOLERANCE
            }
        );
    }

    #[test]
    fn record_serializes_with_type_and_params() {
        let spec = Padding::new(32, 16, 0).unwrap();
        let json = serde_json::to_value(Interference::from(spec).spec()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Padding", "params": {"width": 32, "height": 16, "val": 0}})
        );
    }

    #[test]
    fn build_reports_bad_bounds() {
        let spec = InterferenceSpec::RandomRotation {
            min_angle: 10.0,
            max_angle: -10.0,
        };
        assert!(matches!(
            Interference::try_from(spec),
            Err(InterferenceError::InvalidParameter(_))
        ));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let parsed = serde_json::from_str::<InterferenceSpec>(r#"{"type": "Sharpen", "params": {}}"#);
        assert!(parsed.is_err());
    }
}
