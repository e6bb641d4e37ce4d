//! Atlas data model: glyph bitmaps, the atlas bitmap and its layout table.
//!
//! ```text
//! GlyphBitmap ──(packed by AtlasBuilder)──► AtlasBitmap
//!                                           AtlasLayout { char → AtlasLayoutEntry }
//! ```
//!
//! An [`AtlasBitmap`] and its [`AtlasLayout`] are produced and retired
//! together as a [`FontAtlas`]. Both are read-only once built.

use indexmap::IndexMap;

use crate::error::RasterError;

/// A single rasterized distance-field glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major distance-field intensities, `width * height` bytes.
    pub data: Vec<u8>,
    /// Vertical baseline correction in pixels (distance from the baseline
    /// up to the top of the glyph).
    pub top_offset: i32,
}

impl GlyphBitmap {
    pub fn new(width: u32, height: u32, data: Vec<u8>, top_offset: i32) -> Self {
        Self {
            width,
            height,
            data,
            top_offset,
        }
    }

    /// An all-zero bitmap, used for glyphs without ink (e.g. space).
    pub fn blank(width: u32, height: u32, top_offset: i32) -> Self {
        Self::new(width, height, vec![0; (width as usize) * (height as usize)], top_offset)
    }

    /// Check that `data` holds at least `width * height` bytes.
    pub fn check(&self, ch: char) -> Result<(), RasterError> {
        let expected = (self.width as usize) * (self.height as usize);
        if self.data.len() < expected {
            return Err(RasterError::TruncatedBitmap {
                ch,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// Where a character lives in the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayoutEntry {
    /// Cell origin in atlas pixels (always a multiple of the grid size).
    pub x: u32,
    pub y: u32,
    /// Glyph extent inside the cell, `<= grid_size`.
    pub width: u32,
    pub height: u32,
    pub top_offset: i32,
}

/// How a character resolves against a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphMapping<'a> {
    Mapped(&'a AtlasLayoutEntry),
    /// Not rasterizable, or the atlas overflowed.
    Unmapped,
}

/// Character → cell table for one atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasLayout {
    entries: IndexMap<char, AtlasLayoutEntry>,
    atlas_size: u32,
    grid_size: u32,
}

impl AtlasLayout {
    pub(crate) fn new(atlas_size: u32, grid_size: u32) -> Self {
        Self {
            entries: IndexMap::new(),
            atlas_size,
            grid_size,
        }
    }

    pub(crate) fn insert(&mut self, ch: char, entry: AtlasLayoutEntry) {
        self.entries.insert(ch, entry);
    }

    pub fn get(&self, ch: char) -> Option<&AtlasLayoutEntry> {
        self.entries.get(&ch)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.entries.contains_key(&ch)
    }

    pub fn resolve(&self, ch: char) -> GlyphMapping<'_> {
        match self.entries.get(&ch) {
            Some(entry) => GlyphMapping::Mapped(entry),
            None => GlyphMapping::Unmapped,
        }
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &AtlasLayoutEntry)> + '_ {
        self.entries.iter().map(|(ch, entry)| (*ch, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn atlas_size(&self) -> u32 {
        self.atlas_size
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }
}

/// Single-channel `size × size` pixel buffer backing the atlas texture.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasBitmap {
    size: u32,
    data: Vec<u8>,
}

impl AtlasBitmap {
    pub(crate) fn new(size: u32) -> Self {
        Self {
            size,
            data: vec![0; (size as usize) * (size as usize)],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major pixels, row 0 at the top.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.data.get((y as usize) * (self.size as usize) + x as usize).copied()
    }

    /// Copy `glyph` to `(x, y)`, clipping anything outside `clip_w × clip_h`
    /// from the origin and anything outside the bitmap.
    ///
    /// Returns the number of columns and rows actually written.
    pub(crate) fn blit(
        &mut self,
        x: u32,
        y: u32,
        clip_w: u32,
        clip_h: u32,
        glyph: &GlyphBitmap,
    ) -> (u32, u32) {
        let cols = glyph
            .width
            .min(clip_w)
            .min(self.size.saturating_sub(x));
        let rows = glyph
            .height
            .min(clip_h)
            .min(self.size.saturating_sub(y));

        let stride = self.size as usize;
        let src_stride = glyph.width as usize;
        for row in 0..rows as usize {
            let src = row * src_stride;
            let dst = (y as usize + row) * stride + x as usize;
            self.data[dst..dst + cols as usize]
                .copy_from_slice(&glyph.data[src..src + cols as usize]);
        }
        (cols, rows)
    }
}

impl std::fmt::Debug for AtlasBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasBitmap")
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Counters collected while packing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Characters that received a cell.
    pub packed: usize,
    /// Repeated characters that reused an existing cell (or rejection).
    pub duplicates: usize,
    /// Distinct characters the rasterizer failed on.
    pub rejected: usize,
    /// Distinct characters left out because every cell was taken.
    pub overflowed: usize,
}

/// An atlas bitmap together with its layout table.
#[derive(Clone, Debug)]
pub struct FontAtlas {
    pub bitmap: AtlasBitmap,
    pub layout: AtlasLayout,
    pub report: BuildReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_bitmap() {
        let glyph = GlyphBitmap::blank(3, 2, 5);
        assert_eq!(glyph.data.len(), 6);
        assert!(glyph.data.iter().all(|&b| b == 0));
        assert!(glyph.check('x').is_ok());
    }

    #[test]
    fn test_truncated_bitmap_detected() {
        let glyph = GlyphBitmap::new(4, 4, vec![1; 10], 0);
        assert_eq!(
            glyph.check('q'),
            Err(RasterError::TruncatedBitmap {
                ch: 'q',
                expected: 16,
                actual: 10
            })
        );
    }

    #[test]
    fn test_blit_copies_rows() {
        let mut bitmap = AtlasBitmap::new(4);
        let glyph = GlyphBitmap::new(2, 2, vec![1, 2, 3, 4], 0);
        let written = bitmap.blit(2, 2, 2, 2, &glyph);
        assert_eq!(written, (2, 2));
        assert_eq!(bitmap.pixel(2, 2), Some(1));
        assert_eq!(bitmap.pixel(3, 2), Some(2));
        assert_eq!(bitmap.pixel(2, 3), Some(3));
        assert_eq!(bitmap.pixel(3, 3), Some(4));
        assert_eq!(bitmap.pixel(0, 0), Some(0));
        assert_eq!(bitmap.pixel(4, 0), None);
    }

    #[test]
    fn test_blit_clips_to_cell_and_bounds() {
        let mut bitmap = AtlasBitmap::new(4);
        let glyph = GlyphBitmap::new(3, 3, vec![9; 9], 0);
        // Cell is 2×2; glyph is 3×3.
        assert_eq!(bitmap.blit(2, 0, 2, 2, &glyph), (2, 2));
        assert_eq!(bitmap.pixel(1, 0), Some(0));
        assert_eq!(bitmap.pixel(2, 2), Some(0));
        // Clip limit larger than what remains of the bitmap.
        assert_eq!(bitmap.blit(3, 3, 8, 8, &glyph), (1, 1));
        assert_eq!(bitmap.pixel(3, 3), Some(9));
    }

    #[test]
    fn test_layout_resolve() {
        let mut layout = AtlasLayout::new(4, 2);
        let entry = AtlasLayoutEntry {
            x: 2,
            y: 0,
            width: 1,
            height: 2,
            top_offset: 1,
        };
        layout.insert('B', entry);
        assert_eq!(layout.resolve('B'), GlyphMapping::Mapped(&entry));
        assert_eq!(layout.resolve('C'), GlyphMapping::Unmapped);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.atlas_size(), 4);
        assert_eq!(layout.grid_size(), 2);
    }
}
