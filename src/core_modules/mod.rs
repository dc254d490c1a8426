pub mod chunk;
pub mod dilution;
pub mod error;
pub mod frame;
pub mod gaussian_blur;
pub mod grid_manager;
pub mod interference;
pub mod noise;
pub mod padding;
pub mod pixel;
pub mod resize;
pub mod rotation;
pub mod sampling;
pub mod translate;
