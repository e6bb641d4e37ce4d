//! CPU-side preparation of the atlas texture.
//!
//! Glyph UVs use a bottom-left origin (`v = 1 - y / size`) while wgpu
//! textures start at the top row, so the bitmap is uploaded upside down.
//! Mip levels are produced here with a 2×2 box filter because wgpu has no
//! built-in mipmap generation.

use glyphgrid_text::AtlasBitmap;

/// Single-channel atlas data, one buffer per mip level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasTexture {
    size: u32,
    levels: Vec<Vec<u8>>,
}

impl AtlasTexture {
    /// Flip `bitmap` vertically and build its full mip chain.
    pub fn from_bitmap(bitmap: &AtlasBitmap) -> Self {
        let size = bitmap.size();
        let row = size as usize;
        let base: Vec<u8> = bitmap
            .data()
            .chunks_exact(row.max(1))
            .rev()
            .flatten()
            .copied()
            .collect();

        let mut levels = vec![base];
        let mut side = size;
        while side > 1 {
            let Some(prev) = levels.last() else { break };
            let next = downsample(prev, side);
            side = (side / 2).max(1);
            levels.push(next);
        }

        Self { size, levels }
    }

    /// Width and height of level 0.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn mip_level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Side length of mip `level`.
    pub fn level_size(&self, level: u32) -> u32 {
        (self.size >> level).max(1)
    }

    pub fn level(&self, level: u32) -> Option<&[u8]> {
        self.levels.get(level as usize).map(Vec::as_slice)
    }

    pub fn levels(&self) -> impl Iterator<Item = (u32, u32, &[u8])> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, data)| (i as u32, self.level_size(i as u32), data.as_slice()))
    }
}

/// Halve a `side × side` level, averaging each 2×2 block. Odd edges reuse
/// the last row/column.
fn downsample(src: &[u8], side: u32) -> Vec<u8> {
    let side = side as usize;
    let half = (side / 2).max(1);
    let at = |x: usize, y: usize| src[y.min(side - 1) * side + x.min(side - 1)] as u32;

    let mut out = Vec::with_capacity(half * half);
    for y in 0..half {
        for x in 0..half {
            let (sx, sy) = (x * 2, y * 2);
            let sum = at(sx, sy) + at(sx + 1, sy) + at(sx, sy + 1) + at(sx + 1, sy + 1);
            out.push(((sum + 2) / 4) as u8);
        }
    }
    out
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_text::{AtlasBuilder, AtlasConfig, FontSpec, GlyphBitmap, RasterError, RasterRequest};

    /// 4×4 atlas with a single 2×2 cell in the top-left holding `value`.
    fn atlas_with_top_left(value: u8) -> AtlasBitmap {
        let builder = AtlasBuilder::new(AtlasConfig::new(4, 2)).unwrap();
        let mut raster = |_ch: char, _req: &RasterRequest<'_>| -> Result<GlyphBitmap, RasterError> {
            Ok(GlyphBitmap::new(2, 2, vec![value; 4], 0))
        };
        builder
            .build(&mut raster, "A".chars(), &FontSpec::default())
            .unwrap()
            .bitmap
    }

    #[test]
    fn test_rows_are_flipped() {
        let bitmap = atlas_with_top_left(200);
        let texture = AtlasTexture::from_bitmap(&bitmap);
        let base = texture.level(0).unwrap();
        assert_eq!(base.len(), 16);
        // Bitmap rows 0..2 become texture rows 2..4.
        assert_eq!(&base[0..4], &[0, 0, 0, 0]);
        assert_eq!(&base[8..12], &[200, 200, 0, 0]);
        assert_eq!(&base[12..16], &[200, 200, 0, 0]);
    }

    #[test]
    fn test_mip_chain_down_to_one() {
        let bitmap = atlas_with_top_left(200);
        let texture = AtlasTexture::from_bitmap(&bitmap);
        assert_eq!(texture.mip_level_count(), 3);
        assert_eq!(texture.level_size(1), 2);
        assert_eq!(texture.level_size(2), 1);
        assert_eq!(texture.level(1).unwrap(), &[0, 0, 200, 0]);
        assert_eq!(texture.level(2).unwrap(), &[50]);
        assert!(texture.level(3).is_none());
    }

    #[test]
    fn test_levels_iterator_sizes() {
        let texture = AtlasTexture::from_bitmap(&atlas_with_top_left(10));
        let sizes: Vec<(u32, u32, usize)> =
            texture.levels().map(|(i, side, data)| (i, side, data.len())).collect();
        assert_eq!(sizes, vec![(0, 4, 16), (1, 2, 4), (2, 1, 1)]);
    }

    #[test]
    fn test_downsample_rounds() {
        assert_eq!(downsample(&[1, 2, 3, 4], 2), vec![3]);
        assert_eq!(downsample(&[255, 255, 255, 254], 2), vec![255]);
    }

    #[test]
    fn test_downsample_odd_side() {
        // 3×3 → 1×1 from the top-left 2×2 block.
        let src = [4, 8, 100, 12, 16, 100, 100, 100, 100];
        assert_eq!(downsample(&src, 3), vec![10]);
    }
}
