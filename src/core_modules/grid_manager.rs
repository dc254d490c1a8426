// THEORY:
// The grid partitioner slices a frame into a randomized grid of `Chunk`s so an
// interference can be applied locally rather than uniformly: one cell blurred,
// another diluted, a third left clean.
//
// Key architectural principles:
// 1.  **Randomized Layout**: The column and row counts are drawn per call from
//     inclusive ranges fixed at construction.
// 2.  **Integer Slicing**: Cell extent is `width / columns` by `height / rows`.
//     The remainder of the division is dropped from the last column and row, so
//     every cell has the same extent and no two cells overlap.
// 3.  **Row-Major Order**: Chunks are produced row by row, all columns of row 0
//     first. Chunk `i` sits at column `i % columns`, row `i / columns`.
// 4.  **No Reassembly**: The grid hands out copies with their origins. How the
//     transformed cells are stitched back is the caller's decision.

use crate::core_modules::chunk::chunk::Chunk;
use crate::core_modules::error::{Result, ensure_ordered, incompatible_input, invalid_parameter};
use crate::core_modules::frame::{Frame, map_layout};
use crate::core_modules::interference::Interfere;
use crate::core_modules::sampling::uniform_u32;
use image::imageops;
use log::debug;
use rand::Rng;

/// Inclusive `(min, max)` range for a grid count.
pub type CountRange = (u32, u32);

/// Draws grid layouts and cuts frames along them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPartitioner {
    /// Range of the number of columns (along the width).
    x_num: CountRange,
    /// Range of the number of rows (along the height).
    y_num: CountRange,
}

impl GridPartitioner {
    /// Both ranges need `1 <= min <= max`.
    pub fn new(x_num: CountRange, y_num: CountRange) -> Result<Self> {
        for (name, (min, max)) in [("x_num", x_num), ("y_num", y_num)] {
            if min == 0 {
                return Err(invalid_parameter!("{name} must start at 1 or more, got {min}"));
            }
            ensure_ordered(name, min, max)?;
        }
        Ok(Self { x_num, y_num })
    }

    pub fn x_num(&self) -> CountRange {
        self.x_num
    }

    pub fn y_num(&self) -> CountRange {
        self.y_num
    }

    /// Draws a layout and partitions `frame` along it.
    pub fn partition<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> Result<Grid> {
        frame.ensure_not_empty()?;
        let columns = uniform_u32(rng, self.x_num.0, self.x_num.1);
        let rows = uniform_u32(rng, self.y_num.0, self.y_num.1);
        Grid::split(frame, columns, rows)
    }
}

/// A frame cut into `columns x rows` equally sized chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// The number of chunks along the width.
    pub columns: u32,
    /// The number of chunks along the height.
    pub rows: u32,
    /// The width of every chunk in pixels.
    pub chunk_width: u32,
    /// The height of every chunk in pixels.
    pub chunk_height: u32,
    /// The chunks in row-major order.
    pub chunks: Vec<Chunk>,
}

impl Grid {
    /// Cuts `frame` into exactly `columns x rows` chunks.
    pub fn split(frame: &Frame, columns: u32, rows: u32) -> Result<Self> {
        let (width, height) = frame.dimensions();
        if columns == 0 || rows == 0 || columns > width || rows > height {
            return Err(incompatible_input!(
                "cannot cut a {width}x{height} frame into {columns}x{rows} non-empty chunks"
            ));
        }
        let chunk_width = width / columns;
        let chunk_height = height / rows;
        debug!(
            "grid {columns}x{rows} of {chunk_width}x{chunk_height} chunks over {width}x{height}"
        );

        let num_chunks = (columns * rows) as usize;
        let mut chunks = Vec::with_capacity(num_chunks);
        for chunk_index in 0..num_chunks as u32 {
            let column = chunk_index % columns;
            let row = chunk_index / columns;
            let x = column * chunk_width;
            let y = row * chunk_height;
            let cell = map_layout!(frame, buffer => {
                imageops::crop_imm(buffer, x, y, chunk_width, chunk_height).to_image()
            });
            chunks.push(Chunk::new(column, row, x, y, cell));
        }

        Ok(Self {
            columns,
            rows,
            chunk_width,
            chunk_height,
            chunks,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The chunk at `(column, row)`, if inside the grid.
    pub fn get(&self, column: u32, row: u32) -> Option<&Chunk> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.chunks.get((row * self.columns + column) as usize)
    }

    /// The chunk frames in row-major order.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.chunks.iter().map(|chunk| &chunk.frame)
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.chunks.into_iter().map(|chunk| chunk.frame).collect()
    }

    /// Applies `interference` to every chunk independently, keeping order and origins.
    pub fn interfere_each<I, R>(&self, interference: &I, rng: &mut R) -> Result<Vec<Chunk>>
    where
        I: Interfere,
        R: Rng + ?Sized,
    {
        self.chunks
            .iter()
            .map(|chunk| -> Result<Chunk> {
                let frame = interference.interfere(&chunk.frame, rng)?;
                Ok(Chunk::new(chunk.column, chunk.row, chunk.x, chunk.y, frame))
            })
            .collect()
    }
}

/// Partitions `frame` into a grid whose column and row counts are drawn from
/// the inclusive ranges `x_num` and `y_num`, returning the cells row by row.
pub fn make_grid<R: Rng + ?Sized>(
    frame: &Frame,
    x_num: CountRange,
    y_num: CountRange,
    rng: &mut R,
) -> Result<Vec<Frame>> {
    Ok(GridPartitioner::new(x_num, y_num)?
        .partition(frame, rng)?
        .into_frames())
}
