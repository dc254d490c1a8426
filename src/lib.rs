// THEORY:
// This file is the main entry point for the `ocr_interference` library crate.
// It exposes the `Interference` variants, the `Frame` they operate on, the grid
// partitioner for localized interference, and the `InterferencePipeline` that
// composes them from configuration.
//
// The crate consumes frames that are already decoded and produces frames for
// someone else to encode. Randomness is always injected by the caller, so any
// run can be reproduced by seeding the generator.

pub mod core_modules;
pub mod pipeline;

pub use core_modules::chunk::chunk::Chunk;
pub use core_modules::dilution::RandomDilution;
pub use core_modules::error::{InterferenceError, Result};
pub use core_modules::frame::Frame;
pub use core_modules::gaussian_blur::GaussianBlur;
pub use core_modules::grid_manager::{Grid, GridPartitioner, make_grid};
pub use core_modules::interference::{Interfere, Interference, InterferenceSpec};
pub use core_modules::noise::RandomNoise;
pub use core_modules::padding::Padding;
pub use core_modules::resize::RandomResize;
pub use core_modules::rotation::RandomRotation;
pub use core_modules::translate::RandomTranslate;
pub use pipeline::{InterferencePipeline, PipelineConfig};
