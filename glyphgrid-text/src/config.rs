//! Atlas and font configuration.
//!
//! Everything here is plain data with sensible defaults. Validation is
//! explicit: the builder calls [`AtlasConfig::validate`] and
//! [`FontSpec::validate`] before packing and fails fast instead of clamping.

use crate::error::AtlasError;

/// Default atlas texture width and height in pixels.
pub const DEFAULT_ATLAS_SIZE: u32 = 1024;
/// Default grid cell size in pixels.
pub const DEFAULT_GRID_SIZE: u32 = 64;

/// Distance-field generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SdfParams {
    /// Empty border (pixels) around each glyph bitmap.
    pub buffer: u32,
    /// Distance in pixels covered by the full 0..255 value range.
    pub radius: f32,
    /// Fraction of the range reserved for the inside of the glyph.
    pub cutoff: f32,
}

impl Default for SdfParams {
    fn default() -> Self {
        Self {
            buffer: 1,
            radius: 2.5,
            cutoff: 0.25,
        }
    }
}

/// Fixed geometry of the atlas bitmap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasConfig {
    /// Atlas width = height in pixels.
    pub atlas_size: u32,
    /// Grid cell width = height in pixels.
    pub grid_size: u32,
    /// Distance-field parameters passed to the rasterizer.
    pub sdf: SdfParams,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            atlas_size: DEFAULT_ATLAS_SIZE,
            grid_size: DEFAULT_GRID_SIZE,
            sdf: SdfParams::default(),
        }
    }
}

impl AtlasConfig {
    /// Config with the given atlas and grid sizes and default SDF params.
    pub fn new(atlas_size: u32, grid_size: u32) -> Self {
        Self {
            atlas_size,
            grid_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), AtlasError> {
        if self.grid_size == 0 {
            return Err(AtlasError::ZeroGridSize);
        }
        if self.grid_size > self.atlas_size {
            return Err(AtlasError::GridLargerThanAtlas {
                atlas_size: self.atlas_size,
                grid_size: self.grid_size,
            });
        }
        if self.atlas_size % self.grid_size != 0 {
            return Err(AtlasError::UnalignedAtlas {
                atlas_size: self.atlas_size,
                grid_size: self.grid_size,
            });
        }
        if !(self.sdf.radius.is_finite() && self.sdf.radius > 0.0) {
            return Err(AtlasError::InvalidSdfRadius(self.sdf.radius));
        }
        Ok(())
    }

    /// Cells per atlas row (and column).
    pub fn cells_per_row(&self) -> u32 {
        self.atlas_size / self.grid_size.max(1)
    }

    /// Total number of cells the atlas can hold.
    pub fn capacity(&self) -> usize {
        let n = self.cells_per_row() as usize;
        n * n
    }

    /// Largest glyph extent (before SDF padding) that still fits a cell.
    pub fn max_glyph_extent(&self) -> u32 {
        self.grid_size.saturating_sub(2 * self.sdf.buffer)
    }
}

/// Font used to rasterize an atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name, or one of the generic `sans-serif`, `serif`, `monospace`.
    pub family: String,
    /// Rasterization size in pixels (independent of the display size).
    pub size: f32,
    /// Font weight (100–900). 400 = normal, 700 = bold.
    pub weight: u16,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: String::from("Courier New"),
            size: 60.0,
            weight: 700,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn validate(&self) -> Result<(), AtlasError> {
        if self.size.is_finite() && self.size > 0.0 {
            Ok(())
        } else {
            Err(AtlasError::InvalidFontSize(self.size))
        }
    }
}
