pub mod color;
pub mod geometry;
