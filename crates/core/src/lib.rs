//! Primitive types shared by the preview generation crates.

mod color;
pub use color::*;

mod grid;
pub use grid::*;

mod pixels;
pub use pixels::*;

mod terrain;
pub use terrain::*;

mod png;
pub use self::png::*;
