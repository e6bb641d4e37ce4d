//! Error types for atlas building, geometry compilation and rasterization.
//!
//! Configuration problems surface as [`AtlasError`] or [`GeometryError`]
//! at the call that introduced them. [`RasterError`] is per-glyph and is
//! absorbed by the atlas builder: a glyph that fails to rasterize simply
//! has no layout entry and renders blank.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtlasError {
    #[error("Grid size must be non-zero")]
    ZeroGridSize,
    #[error("Atlas size {atlas_size} is not a multiple of grid size {grid_size}")]
    UnalignedAtlas { atlas_size: u32, grid_size: u32 },
    #[error("Grid size {grid_size} exceeds atlas size {atlas_size}")]
    GridLargerThanAtlas { atlas_size: u32, grid_size: u32 },
    #[error("Font size must be a positive finite number, got {0}")]
    InvalidFontSize(f32),
    #[error("SDF radius must be a positive finite number, got {0}")]
    InvalidSdfRadius(f32),
    #[error("Character set is empty")]
    EmptyCharacterSet,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Font size must be a positive finite number, got {0}")]
    InvalidFontSize(f32),
    #[error("Caret width must be a non-negative finite number, got {0}")]
    InvalidCaretWidth(f32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("Character {0:?} is not supported by the font")]
    Unsupported(char),
    #[error("Shaping produced no glyph for {0:?}")]
    NoGlyph(char),
    #[error("Bitmap for {ch:?} holds {actual} bytes, expected {expected}")]
    TruncatedBitmap {
        ch: char,
        expected: usize,
        actual: usize,
    },
}
