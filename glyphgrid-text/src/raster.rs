//! Glyph rasterization: one character in, one distance-field bitmap out.
//!
//! The atlas builder only sees the [`GlyphRasterizer`] trait. The shipped
//! implementation, [`CosmicSdfRasterizer`], shapes the character with
//! `cosmic-text`, renders its coverage mask through the `SwashCache`, and
//! converts it into a distance field with [`crate::sdf::distance_field`].
//!
//! Closures of the form `FnMut(char, &RasterRequest) -> Result<GlyphBitmap,
//! RasterError>` also implement the trait, which keeps tests independent of
//! installed system fonts.

use cosmic_text::{
    Attrs, Buffer, CacheKey, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent,
    Weight,
};
use log::trace;

use crate::config::{FontSpec, SdfParams};
use crate::error::RasterError;
use crate::layout::GlyphBitmap;
use crate::sdf::distance_field;

/// Everything a rasterizer needs to draw one glyph.
#[derive(Clone, Copy, Debug)]
pub struct RasterRequest<'a> {
    pub family: &'a str,
    /// Rasterization size in pixels.
    pub font_size: f32,
    pub weight: u16,
    pub sdf: SdfParams,
    /// Largest glyph extent (before SDF padding); larger ink is cropped.
    pub max_extent: u32,
}

impl<'a> RasterRequest<'a> {
    pub fn new(font: &'a FontSpec, sdf: SdfParams, max_extent: u32) -> Self {
        Self {
            family: &font.family,
            font_size: font.size,
            weight: font.weight,
            sdf,
            max_extent,
        }
    }
}

/// Turns a character into a distance-field bitmap.
///
/// A failure means "this character has no glyph"; callers must not treat
/// it as fatal.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, ch: char, request: &RasterRequest<'_>) -> Result<GlyphBitmap, RasterError>;
}

impl<F> GlyphRasterizer for F
where
    F: FnMut(char, &RasterRequest<'_>) -> Result<GlyphBitmap, RasterError>,
{
    fn rasterize(&mut self, ch: char, request: &RasterRequest<'_>) -> Result<GlyphBitmap, RasterError> {
        self(ch, request)
    }
}

/// Map a family name onto a cosmic-text family, honoring the CSS generics.
fn family_from_name(name: &str) -> Family<'_> {
    let first = name
        .split(',')
        .next()
        .unwrap_or(name)
        .trim()
        .trim_matches('"')
        .trim_matches('\'');
    match first {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        concrete => Family::Name(concrete),
    }
}

/// Alpha coverage of a swash image, one byte per pixel.
fn coverage_of(content: SwashContent, data: &[u8], pixels: usize) -> Vec<u8> {
    match content {
        SwashContent::Mask => data.iter().copied().take(pixels).collect(),
        // Four bytes per pixel; use the alpha channel.
        SwashContent::Color => data.chunks_exact(4).map(|px| px[3]).take(pixels).collect(),
        SwashContent::SubpixelMask => data
            .chunks_exact(4)
            .map(|px| ((u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2])) / 3) as u8)
            .take(pixels)
            .collect(),
    }
}

/// Crop a `width × height` coverage buffer to its top-left `w × h` corner.
fn crop(coverage: &[u8], width: usize, w: usize, h: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(w * h);
    for row in 0..h {
        let start = row * width;
        out.extend((0..w).map(|col| coverage.get(start + col).copied().unwrap_or(0)));
    }
    out
}

/// Rasterizer backed by cosmic-text's `FontSystem` and `SwashCache`.
pub struct CosmicSdfRasterizer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
}

impl Default for CosmicSdfRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicSdfRasterizer {
    /// Create a rasterizer with system font discovery.
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    /// Shape `ch` alone and return the cache key of its first glyph.
    fn shape(&mut self, ch: char, request: &RasterRequest<'_>) -> Option<CacheKey> {
        let metrics = Metrics::new(request.font_size, request.font_size * 1.2);
        let attrs = Attrs::new()
            .family(family_from_name(request.family))
            .weight(Weight(request.weight));

        let mut utf8 = [0u8; 4];
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            attrs,
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let key = buffer
            .layout_runs()
            .flat_map(|run| run.glyphs.iter())
            .map(|glyph| glyph.physical((0.0, 0.0), 1.0).cache_key)
            .next();
        key
    }
}

impl GlyphRasterizer for CosmicSdfRasterizer {
    fn rasterize(&mut self, ch: char, request: &RasterRequest<'_>) -> Result<GlyphBitmap, RasterError> {
        if ch.is_control() {
            return Err(RasterError::Unsupported(ch));
        }

        let cache_key = self.shape(ch, request).ok_or(RasterError::NoGlyph(ch))?;
        if cache_key.glyph_id == 0 {
            // .notdef: the font has no glyph for this character.
            return Err(RasterError::Unsupported(ch));
        }

        let pad = 2 * request.sdf.buffer;
        let image = self.swash_cache.get_image(&mut self.font_system, cache_key);
        let (placement, coverage) = match image {
            Some(img) if img.placement.width > 0 && img.placement.height > 0 => {
                let pixels = (img.placement.width as usize) * (img.placement.height as usize);
                (img.placement, coverage_of(img.content, &img.data, pixels))
            }
            // Whitespace and other ink-less glyphs still occupy a cell.
            _ => return Ok(GlyphBitmap::blank(pad, pad, 0)),
        };

        let src_w = placement.width as usize;
        let w = placement.width.min(request.max_extent) as usize;
        let h = placement.height.min(request.max_extent) as usize;
        let coverage = if w == src_w && h == placement.height as usize {
            coverage
        } else {
            trace!("cropping {ch:?} from {}x{} to {w}x{h}", placement.width, placement.height);
            crop(&coverage, src_w, w, h)
        };

        let field = distance_field(&coverage, w as u32, h as u32, &request.sdf);
        Ok(GlyphBitmap::new(field.width, field.height, field.data, placement.top))
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(font: &FontSpec) -> RasterRequest<'_> {
        RasterRequest::new(font, SdfParams::default(), 62)
    }

    #[test]
    fn test_family_from_name() {
        assert_eq!(family_from_name("serif"), Family::Serif);
        assert_eq!(family_from_name("monospace"), Family::Monospace);
        assert_eq!(family_from_name("\"Courier New\", monospace"), Family::Name("Courier New"));
        assert_eq!(family_from_name("Arial"), Family::Name("Arial"));
    }

    #[test]
    fn test_coverage_from_mask_and_color() {
        assert_eq!(coverage_of(SwashContent::Mask, &[1, 2, 3, 4], 3), vec![1, 2, 3]);
        let rgba = [10, 20, 30, 40, 50, 60, 70, 80];
        assert_eq!(coverage_of(SwashContent::Color, &rgba, 2), vec![40, 80]);
        assert_eq!(coverage_of(SwashContent::SubpixelMask, &rgba, 2), vec![20, 60]);
    }

    #[test]
    fn test_crop() {
        let src = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert_eq!(crop(&src, 3, 2, 2), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_closure_rasterizer() {
        let font = FontSpec::default();
        let mut calls = 0;
        let mut raster = |ch: char, req: &RasterRequest<'_>| {
            calls += 1;
            assert_eq!(req.family, "Courier New");
            if ch == 'x' {
                Err(RasterError::Unsupported(ch))
            } else {
                Ok(GlyphBitmap::blank(2, 2, 1))
            }
        };
        assert!(raster.rasterize('a', &request(&font)).is_ok());
        assert_eq!(raster.rasterize('x', &request(&font)), Err(RasterError::Unsupported('x')));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_control_character_rejected() {
        let mut raster = CosmicSdfRasterizer::new();
        let font = FontSpec::new("monospace", 32.0);
        assert_eq!(
            raster.rasterize('\u{7}', &request(&font)),
            Err(RasterError::Unsupported('\u{7}'))
        );
    }

    #[test]
    fn test_cosmic_rasterizes_letter() {
        let mut raster = CosmicSdfRasterizer::new();
        // Skip gracefully on machines without any fonts.
        if raster.font_system.db().faces().count() == 0 {
            return;
        }
        let font = FontSpec::new("sans-serif", 48.0);
        let glyph = raster
            .rasterize('A', &request(&font))
            .expect("'A' should rasterize with system fonts");
        assert!(glyph.width > 2 && glyph.height > 2);
        assert!(glyph.width <= 64 && glyph.height <= 64);
        assert!(glyph.top_offset > 0);
        assert!(glyph.data.iter().any(|&v| v > 191), "glyph should have ink");
    }

    #[test]
    fn test_cosmic_space_is_blank() {
        let mut raster = CosmicSdfRasterizer::new();
        if raster.font_system.db().faces().count() == 0 {
            return;
        }
        let font = FontSpec::new("sans-serif", 48.0);
        if let Ok(glyph) = raster.rasterize(' ', &request(&font)) {
            assert!(glyph.data.iter().all(|&v| v == 0));
        }
    }
}
