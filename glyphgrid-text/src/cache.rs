//! Atlas cache: owns the current font atlas and recently built ones.
//!
//! Building an atlas rasterizes every glyph of the character set, so
//! switching back and forth between fonts is worth caching. The cache
//! keeps built atlases in an LRU keyed by font, and a single *current*
//! slot that is swapped whenever a different font is selected. A
//! generation counter bumps on every swap so renderers know when to
//! re-upload the texture.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, info};
use lru::LruCache;

use crate::atlas::AtlasBuilder;
use crate::charset::CharacterSet;
use crate::config::FontSpec;
use crate::error::AtlasError;
use crate::layout::FontAtlas;
use crate::raster::GlyphRasterizer;

/// Cache key: family, raster size bits, weight.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct AtlasKey {
    family: String,
    size_bits: u32,
    weight: u16,
}

impl From<&FontSpec> for AtlasKey {
    fn from(font: &FontSpec) -> Self {
        Self {
            family: font.family.clone(),
            size_bits: font.size.to_bits(),
            weight: font.weight,
        }
    }
}

/// LRU of built atlases plus the currently selected one.
pub struct AtlasCache<R> {
    builder: AtlasBuilder,
    rasterizer: R,
    charset: CharacterSet,
    atlases: LruCache<AtlasKey, Arc<FontAtlas>>,
    current: Option<(AtlasKey, Arc<FontAtlas>)>,
    generation: u64,
}

impl<R: GlyphRasterizer> AtlasCache<R> {
    /// Cache holding up to `capacity` atlases (at least one).
    pub fn new(builder: AtlasBuilder, rasterizer: R, charset: CharacterSet, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            builder,
            rasterizer,
            charset,
            atlases: LruCache::new(capacity),
            current: None,
            generation: 0,
        }
    }

    /// Make `font` current, building its atlas if it is not cached.
    ///
    /// Selecting the font that is already current is a no-op and does not
    /// bump the generation.
    pub fn select(&mut self, font: &FontSpec) -> Result<Arc<FontAtlas>, AtlasError> {
        let key = AtlasKey::from(font);
        if let Some((current_key, atlas)) = &self.current {
            if *current_key == key {
                return Ok(Arc::clone(atlas));
            }
        }

        let atlas = match self.atlases.get(&key) {
            Some(atlas) => {
                debug!("atlas cache hit for {:?}", font.family);
                Arc::clone(atlas)
            }
            None => {
                let atlas = Arc::new(self.builder.build(
                    &mut self.rasterizer,
                    self.charset.iter(),
                    font,
                )?);
                info!(
                    "built atlas for {:?}: {} glyphs, {} rejected, {} overflowed",
                    font.family, atlas.report.packed, atlas.report.rejected, atlas.report.overflowed
                );
                self.atlases.put(key.clone(), Arc::clone(&atlas));
                atlas
            }
        };

        self.current = Some((key, Arc::clone(&atlas)));
        self.generation += 1;
        Ok(atlas)
    }

    /// The current atlas, if any font has been selected.
    pub fn current(&self) -> Option<&Arc<FontAtlas>> {
        self.current.as_ref().map(|(_, atlas)| atlas)
    }

    /// Incremented every time the current atlas is swapped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of cached atlases.
    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }
}

// ===================================================================
// Tests
// ===================================================================
