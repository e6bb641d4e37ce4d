//! Atlas builder: packs distance-field glyphs into one square bitmap.
//!
//! Uses a uniform grid: the atlas is split into `grid_size` square cells
//! which are handed out in row-major order (left to right, then top to
//! bottom). Every distinct character gets at most one cell; repeats reuse
//! the cell assigned on first sight without touching the rasterizer.
//!
//! Two things can leave a character without a cell, and neither is an
//! error:
//!
//! - the rasterizer fails for it (the cell stays free for the next one);
//! - every cell is already taken (overflow).
//!
//! Such characters are absent from the [`AtlasLayout`] and compile to
//! invisible quads.

use std::collections::HashSet;

use log::{debug, warn};

use crate::config::{AtlasConfig, FontSpec};
use crate::error::AtlasError;
use crate::layout::{AtlasBitmap, AtlasLayout, AtlasLayoutEntry, BuildReport, FontAtlas};
use crate::raster::{GlyphRasterizer, RasterRequest};

/// Row-major iterator over cell origins that fit entirely in the atlas.
#[derive(Clone, Debug)]
struct GridCells {
    atlas_size: u32,
    grid_size: u32,
    x: u32,
    y: u32,
}

impl GridCells {
    fn new(atlas_size: u32, grid_size: u32) -> Self {
        Self {
            atlas_size,
            grid_size,
            x: 0,
            y: 0,
        }
    }
}

impl Iterator for GridCells {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.grid_size == 0 || self.y + self.grid_size > self.atlas_size {
            return None;
        }
        let cell = (self.x, self.y);
        self.x += self.grid_size;
        if self.x + self.grid_size > self.atlas_size {
            self.x = 0;
            self.y += self.grid_size;
        }
        Some(cell)
    }
}

/// Builds [`FontAtlas`]es for a fixed [`AtlasConfig`].
#[derive(Clone, Debug)]
pub struct AtlasBuilder {
    config: AtlasConfig,
}

impl AtlasBuilder {
    /// Validate `config` and create a builder for it.
    pub fn new(config: AtlasConfig) -> Result<Self, AtlasError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Rasterize and pack `chars` for `font`.
    ///
    /// `chars` is consumed in order; duplicates are allowed and resolve to
    /// the cell of their first occurrence. Fails only on invalid input
    /// (empty character sequence, bad font size), never on a single glyph.
    pub fn build<R, I>(&self, rasterizer: &mut R, chars: I, font: &FontSpec) -> Result<FontAtlas, AtlasError>
    where
        R: GlyphRasterizer + ?Sized,
        I: IntoIterator<Item = char>,
    {
        font.validate()?;

        let AtlasConfig {
            atlas_size,
            grid_size,
            sdf,
        } = self.config;
        let request = RasterRequest::new(font, sdf, self.config.max_glyph_extent());

        let mut bitmap = AtlasBitmap::new(atlas_size);
        let mut layout = AtlasLayout::new(atlas_size, grid_size);
        let mut report = BuildReport::default();
        let mut rejected: HashSet<char> = HashSet::new();
        let mut overflowed: HashSet<char> = HashSet::new();

        let mut cells = GridCells::new(atlas_size, grid_size);
        let mut next_cell = cells.next();
        let mut seen_any = false;

        for ch in chars {
            seen_any = true;
            if layout.contains(ch) || rejected.contains(&ch) || overflowed.contains(&ch) {
                report.duplicates += 1;
                continue;
            }

            let Some((x, y)) = next_cell else {
                overflowed.insert(ch);
                continue;
            };

            let glyph = match rasterizer
                .rasterize(ch, &request)
                .and_then(|glyph| glyph.check(ch).map(|()| glyph))
            {
                Ok(glyph) => glyph,
                Err(err) => {
                    debug!("no glyph for {ch:?}: {err}");
                    rejected.insert(ch);
                    continue;
                }
            };

            let (width, height) = bitmap.blit(x, y, grid_size, grid_size, &glyph);
            if width < glyph.width || height < glyph.height {
                debug!(
                    "glyph {ch:?} clipped from {}x{} to {width}x{height}",
                    glyph.width, glyph.height
                );
            }

            layout.insert(
                ch,
                AtlasLayoutEntry {
                    x,
                    y,
                    width,
                    height,
                    top_offset: glyph.top_offset,
                },
            );
            next_cell = cells.next();
        }

        if !seen_any {
            return Err(AtlasError::EmptyCharacterSet);
        }

        report.packed = layout.len();
        report.rejected = rejected.len();
        report.overflowed = overflowed.len();

        if report.overflowed > 0 {
            warn!(
                "atlas full ({} cells): {} character(s) left unmapped for {:?}",
                self.config.capacity(),
                report.overflowed,
                font.family
            );
        }
        debug!("built atlas for {:?} @ {}px: {report:?}", font.family, font.size);

        Ok(FontAtlas {
            bitmap,
            layout,
            report,
        })
    }
}

// ===================================================================
// Tests
// ===================================================================
