//! # glyphgrid-text
//!
//! Core of glyphgrid: builds signed-distance-field glyph atlases and
//! compiles single-line text into textured quads, with cursor tracking for
//! live editing.
//!
//! ## Architecture
//!
//! ```text
//! CharacterSet + FontSpec
//!     │
//!     ▼
//! AtlasBuilder ── GlyphRasterizer (cosmic-text + SDF) ──► FontAtlas
//!     │                                                   { AtlasBitmap, AtlasLayout }
//!     ▼
//! compile(text, font_size, &layout) ──► TextRun { Vec<GlyphQuad>, Alignment }
//!                                              │
//! TextEditor { text, CursorState } ──► caret_quad()
//!                                              ▼
//!                                   GPU backend (glyphgrid-render)
//! ```
//!
//! - **`atlas`**: grid packing with deduplication and silent overflow.
//! - **`geometry`**: per-character quads, UV mapping, caret quad.
//! - **`cursor`**: clamped cursor state and edit events.
//! - **`raster`** / **`sdf`**: glyph rasterization and distance transform.
//! - **`cache`**: LRU of built atlases with a swappable current atlas.

pub mod atlas;
pub mod cache;
pub mod charset;
pub mod config;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod raster;
pub mod sdf;

// Re-exports for ergonomic use.
pub use atlas::AtlasBuilder;
pub use cache::AtlasCache;
pub use charset::CharacterSet;
pub use config::{AtlasConfig, FontSpec, SdfParams};
pub use cursor::{CursorState, EditEvent, TextEditor};
pub use error::{AtlasError, GeometryError, RasterError};
pub use geometry::{caret_quad, compile, Alignment, CaretQuad, GlyphQuad, TextRun, VERTICES_PER_QUAD};
pub use layout::{
    AtlasBitmap, AtlasLayout, AtlasLayoutEntry, BuildReport, FontAtlas, GlyphBitmap, GlyphMapping,
};
pub use raster::{CosmicSdfRasterizer, GlyphRasterizer, RasterRequest};
