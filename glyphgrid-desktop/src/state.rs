//! Application state: owns the editor, the atlas cache and the GPU side.
//!
//! [`Session`] is everything that does not touch the GPU: text + cursor,
//! font selection, viewport, and the vertex list derived from them. It is
//! generic over the rasterizer so tests can run without system fonts.
//! [`AppState`] adds the device, renderer and atlas uploads on top.

use log::{debug, info};
use thiserror::Error;

use glyphgrid_render::{
    build_vertices, AtlasTexture, FrameStats, GlyphVertex, GpuContext, GpuError, RenderError,
    Renderer, Viewport, ViewportEvent,
};
use glyphgrid_text::{
    caret_quad, compile, AtlasBuilder, AtlasCache, AtlasConfig, AtlasError, CharacterSet,
    CosmicSdfRasterizer, EditEvent, FontAtlas, FontSpec, GeometryError, GlyphRasterizer,
    TextEditor,
};

/// Families offered by Tab, in order.
pub const FONT_FAMILIES: [&str; 5] = ["Arial", "Times New Roman", "Verdana", "Tahoma", "Courier New"];
const DEFAULT_FAMILY: usize = 4;
pub const DEFAULT_FONT_SIZE: f32 = 32.0;
pub const MIN_FONT_SIZE: f32 = 1.0;
pub const MAX_FONT_SIZE: f32 = 256.0;
pub const DEFAULT_TEXT: &str = "The quick brown fox jumps over the lazy dog";
/// Caret width in model units.
const CARET_WIDTH: f32 = 0.5;
/// Atlases kept around for quick family switching.
const ATLAS_CACHE_CAPACITY: usize = 4;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Atlas error: {0}")]
    Atlas(#[from] AtlasError),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// GPU-independent editing session.
pub struct Session<R> {
    cache: AtlasCache<R>,
    editor: TextEditor,
    viewport: Viewport,
    family: usize,
    font_size: f32,
    vertices: Vec<GlyphVertex>,
    dirty: bool,
}

impl<R: GlyphRasterizer> Session<R> {
    /// Session over the Latin-1 block with the default font selected.
    pub fn new(rasterizer: R) -> Result<Self, AtlasError> {
        let builder = AtlasBuilder::new(AtlasConfig::default())?;
        let cache = AtlasCache::new(builder, rasterizer, CharacterSet::latin1(), ATLAS_CACHE_CAPACITY);

        let mut session = Self {
            cache,
            editor: TextEditor::new(DEFAULT_TEXT),
            viewport: Viewport::new(),
            family: DEFAULT_FAMILY,
            font_size: DEFAULT_FONT_SIZE,
            vertices: Vec::new(),
            dirty: true,
        };
        let font = session.font_spec();
        session.cache.select(&font)?;
        Ok(session)
    }

    /// Atlas font for the current family (raster size and weight are fixed).
    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: FONT_FAMILIES[self.family].to_owned(),
            ..FontSpec::default()
        }
    }

    pub fn family(&self) -> &'static str {
        FONT_FAMILIES[self.family]
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn atlas(&self) -> Option<&FontAtlas> {
        self.cache.current().map(|atlas| atlas.as_ref())
    }

    /// Bumps whenever the current atlas is replaced.
    pub fn atlas_generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn edit(&mut self, event: EditEvent) {
        let cursor = self.editor.cursor();
        if self.editor.apply(event) || self.editor.cursor() != cursor {
            self.dirty = true;
        }
    }

    /// Move `step` entries through [`FONT_FAMILIES`], wrapping around.
    pub fn cycle_family(&mut self, step: isize) -> Result<(), AtlasError> {
        let count = FONT_FAMILIES.len() as isize;
        let next = (self.family as isize + step).rem_euclid(count) as usize;
        let previous = std::mem::replace(&mut self.family, next);
        let font = self.font_spec();
        if let Err(err) = self.cache.select(&font) {
            self.family = previous;
            return Err(err);
        }
        info!("font family: {}", self.family());
        self.dirty = true;
        Ok(())
    }

    /// Add `delta` to the display font size, clamped to
    /// `[MIN_FONT_SIZE, MAX_FONT_SIZE]`.
    pub fn adjust_font_size(&mut self, delta: f32) {
        let size = (self.font_size + delta).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        if size != self.font_size {
            debug!("font size: {size}");
            self.font_size = size;
            self.dirty = true;
        }
    }

    /// Wheel input in browser-style pixels.
    pub fn zoom(&mut self, wheel_pixels: f32) {
        self.viewport.apply(ViewportEvent::Zoom(wheel_pixels / 100.0));
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.viewport.apply(ViewportEvent::Pan { dx, dy });
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Current vertices, recompiled if the text, cursor or font changed.
    pub fn vertices(&mut self) -> Result<&[GlyphVertex], GeometryError> {
        if self.dirty {
            let vertices = match self.cache.current() {
                Some(atlas) => {
                    let run = compile(self.editor.text(), self.font_size, &atlas.layout)?;
                    let caret = caret_quad(self.editor.len(), self.editor.cursor(), self.font_size, CARET_WIDTH)?;
                    build_vertices(&run, Some(&caret))
                }
                None => Vec::new(),
            };
            self.vertices = vertices;
            self.dirty = false;
        }
        Ok(&self.vertices)
    }
}

/// Session plus GPU resources.
pub struct AppState {
    pub gpu: GpuContext,
    pub renderer: Renderer,
    pub session: Session<CosmicSdfRasterizer>,
    uploaded_generation: Option<u64>,
}

impl AppState {
    pub fn new(gpu: GpuContext) -> Result<Self, AppError> {
        let session = Session::new(CosmicSdfRasterizer::new())?;
        let atlas_size = session.atlas().map_or(AtlasConfig::default().atlas_size, |a| a.bitmap.size());
        let renderer = Renderer::new(&gpu, atlas_size);

        Ok(Self {
            gpu,
            renderer,
            session,
            uploaded_generation: None,
        })
    }

    /// Upload the atlas if it changed, then draw one frame.
    pub fn render_frame(&mut self) -> Result<FrameStats, AppError> {
        let generation = self.session.atlas_generation();
        if self.uploaded_generation != Some(generation) {
            if let Some(atlas) = self.session.atlas() {
                self.renderer.upload_atlas(&self.gpu, &AtlasTexture::from_bitmap(&atlas.bitmap));
                debug!("uploaded atlas generation {generation}");
            }
            self.uploaded_generation = Some(generation);
        }

        let (width, height) = self.gpu.surface_size();
        let camera = self.session.viewport().camera(width as f32, height as f32);
        let vertices = self.session.vertices()?;
        self.renderer.prepare(&self.gpu, vertices, &camera);
        Ok(self.renderer.render_to_surface(&self.gpu)?)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_text::{GlyphBitmap, RasterError, RasterRequest, VERTICES_PER_QUAD};

    type Raster = Box<dyn FnMut(char, &RasterRequest<'_>) -> Result<GlyphBitmap, RasterError>>;

    fn session() -> Session<Raster> {
        let raster: Raster = Box::new(|ch, _req| {
            if ch.is_control() {
                Err(RasterError::Unsupported(ch))
            } else {
                Ok(GlyphBitmap::blank(4, 4, 0))
            }
        });
        Session::new(raster).unwrap()
    }

    #[test]
    fn test_defaults() {
        let mut s = session();
        assert_eq!(s.family(), "Courier New");
        assert_eq!(s.font_size(), 32.0);
        assert_eq!(s.editor().text(), DEFAULT_TEXT);
        assert_eq!(s.atlas_generation(), 1);
        let glyphs = DEFAULT_TEXT.chars().count();
        assert_eq!(s.vertices().unwrap().len(), (glyphs + 1) * VERTICES_PER_QUAD);
    }

    #[test]
    fn test_cycle_family_wraps_and_swaps_atlas() {
        let mut s = session();
        s.cycle_family(1).unwrap();
        assert_eq!(s.family(), "Arial");
        assert_eq!(s.atlas_generation(), 2);
        s.cycle_family(-2).unwrap();
        assert_eq!(s.family(), "Tahoma");
        assert_eq!(s.atlas_generation(), 3);
    }

    #[test]
    fn test_font_size_clamped() {
        let mut s = session();
        s.adjust_font_size(1000.0);
        assert_eq!(s.font_size(), MAX_FONT_SIZE);
        s.adjust_font_size(-1000.0);
        assert_eq!(s.font_size(), MIN_FONT_SIZE);
    }

    #[test]
    fn test_edit_recompiles() {
        let mut s = session();
        s.edit(EditEvent::Replace("ab".into()));
        assert_eq!(s.vertices().unwrap().len(), 3 * VERTICES_PER_QUAD);
        s.edit(EditEvent::End);
        let caret_x = s.vertices().unwrap()[2 * VERTICES_PER_QUAD].position[0];
        // Caret right edge at (−1 + 2) * 32 + 0.25.
        assert!((caret_x - 32.25).abs() < 1e-4);
    }

    #[test]
    fn test_vertices_follow_font_size() {
        let mut s = session();
        s.edit(EditEvent::Replace("a".into()));
        let before = s.vertices().unwrap()[0].position;
        s.adjust_font_size(32.0);
        let after = s.vertices().unwrap()[0].position;
        assert_eq!(after[0], before[0] * 2.0);
    }

    #[test]
    fn test_zoom_and_pan() {
        let mut s = session();
        s.zoom(100.0);
        assert_eq!(s.viewport().scale(), 2.0);
        s.pan(10.0, 0.0);
        assert_eq!(s.viewport().translate(), [-5.0, 0.0]);
        s.reset_view();
        assert_eq!(s.viewport().scale(), 1.0);
    }

    #[test]
    fn test_app_state_headless_skips() {
        // Needs a surface and system fonts; only construction is checked.
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            if let Ok(mut app) = AppState::new(gpu) {
                assert!(matches!(
                    app.render_frame(),
                    Err(AppError::Render(RenderError::NoSurface))
                ));
            }
        }
    }
}
