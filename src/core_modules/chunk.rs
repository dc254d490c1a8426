// THEORY:
// The `Chunk` is one cell of a partitioned frame. It is a "dumb" data container:
// its own copy of the pixels plus where those pixels came from (grid column and
// row, and the pixel origin in the source frame). It knows nothing about the
// interference that will be applied to it; keeping the origin lets a caller put
// the cells back together however it sees fit.

pub mod chunk {
    use crate::core_modules::frame::Frame;

    /// A rectangular block of pixels cut out of a larger frame.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Chunk {
        /// The column index of this chunk in its grid.
        pub column: u32,
        /// The row index of this chunk in its grid.
        pub row: u32,
        /// The x coordinate of the chunk's top-left pixel in the source frame.
        pub x: u32,
        /// The y coordinate of the chunk's top-left pixel in the source frame.
        pub y: u32,
        /// The chunk's pixels.
        pub frame: Frame,
    }

    impl Chunk {
        pub fn new(column: u32, row: u32, x: u32, y: u32, frame: Frame) -> Self {
            Self {
                column,
                row,
                x,
                y,
                frame,
            }
        }

        pub fn width(&self) -> u32 {
            self.frame.width()
        }

        pub fn height(&self) -> u32 {
            self.frame.height()
        }
    }
}
