// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font: atlas plus metrics

use crate::alloc::{heap, Allocator};
use crate::atlas::{build_atlas, Atlas};
use crate::metrics::{derive_metrics, FontMetrics};
use crate::raster::{RasterConfig, Rasterizer};
use crate::{AtlasBitmap, Diagnostics, GlyphTable, RangeSet, Result};
use std::fmt;
use std::sync::Arc;

/// Configuration for building an atlas
///
/// The default selects Basic Latin and Latin-1 Supplement, without flipping,
/// allocating from the global heap and with no diagnostic sinks.
#[derive(Clone)]
pub struct FontConfig {
    /// Candidate codepoints
    pub ranges: RangeSet,
    /// Reverse rows of each glyph (for bottom-up texture origins)
    pub flip: bool,
    /// Memory source for all buffers of the build
    pub allocator: Arc<dyn Allocator>,
    pub diagnostics: Diagnostics,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            ranges: RangeSet::latin(),
            flip: false,
            allocator: heap(),
            diagnostics: Diagnostics::default(),
        }
    }
}

impl FontConfig {
    /// Set candidate ranges
    pub fn with_ranges(mut self, ranges: RangeSet) -> Self {
        self.ranges = ranges;
        self
    }

    /// Set row flipping
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Set the allocator
    pub fn with_allocator(mut self, allocator: Arc<dyn Allocator>) -> Self {
        self.allocator = allocator;
        self
    }

    /// Set diagnostic sinks
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl fmt::Debug for FontConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontConfig")
            .field("ranges", &self.ranges)
            .field("flip", &self.flip)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

/// A font ready for rendering: glyph atlas plus metrics
///
/// Glyph lookups made through a `Font` report failures to the diagnostics
/// of the [`FontConfig`] it was built with.
#[derive(Debug)]
pub struct Font {
    atlas: Atlas,
    metrics: FontMetrics,
    diagnostics: Diagnostics,
}

impl Font {
    /// Build from a rasterizer
    ///
    /// `declared_width` is a lower bound on the average character width (use
    /// 0 if none is known).
    pub fn build<R: Rasterizer + ?Sized>(
        rasterizer: &mut R,
        raster_config: &RasterConfig,
        config: &FontConfig,
        declared_width: u32,
    ) -> Result<Self> {
        let metrics = derive_metrics(rasterizer, raster_config, declared_width);
        let atlas = build_atlas(rasterizer, config)?;
        log::debug!(
            "Font::build: {} glyphs, cell {}×{}",
            atlas.glyphs.len(),
            metrics.average_width,
            metrics.height,
        );
        Ok(Font {
            atlas,
            metrics,
            diagnostics: config.diagnostics.clone(),
        })
    }

    /// Load from font data
    #[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
    pub fn from_memory(data: impl Into<Vec<u8>>, pixel_size: f32, config: &FontConfig) -> Result<Self> {
        let source = crate::fonts::FontSource::from_memory(data, 0);
        Self::from_source(source, RasterConfig::new(pixel_size), 0, config)
    }

    /// Load from a font file
    #[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
    pub fn from_file(path: impl AsRef<std::path::Path>, pixel_size: f32, config: &FontConfig) -> Result<Self> {
        let source = reported(config, crate::fonts::FontSource::from_file(path, 0))?;
        Self::from_source(source, RasterConfig::new(pixel_size), 0, config)
    }

    /// Load a system font by family spec
    ///
    /// See [`FamilySpec`](crate::fonts::FamilySpec) for the syntax of `spec`.
    #[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
    pub fn from_family(spec: &str, config: &FontConfig) -> Result<Self> {
        let mut matcher = crate::fonts::FontdbMatcher::system();
        Self::from_family_with(&mut matcher, spec, config)
    }

    /// Load a font by family spec using the given matcher
    #[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
    pub fn from_family_with<M: crate::fonts::FontMatcher + ?Sized>(
        matcher: &mut M,
        spec: &str,
        config: &FontConfig,
    ) -> Result<Self> {
        let spec: crate::fonts::FamilySpec = reported(config, spec.parse())?;
        let source = reported(config, matcher.match_family(&spec))?;
        Self::from_source(source, spec.raster_config(), spec.char_width, config)
    }

    #[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
    fn from_source(
        source: crate::fonts::FontSource,
        raster_config: RasterConfig,
        declared_width: u32,
        config: &FontConfig,
    ) -> Result<Self> {
        let mut rasterizer = reported(config, crate::raster::default_rasterizer(source, raster_config))?;
        Self::build(&mut *rasterizer, &raster_config, config, declared_width)
    }

    /// Access the glyph table
    #[inline]
    pub fn glyphs(&self) -> &GlyphTable {
        &self.atlas.glyphs
    }

    /// Access the atlas bitmap
    #[inline]
    pub fn bitmap(&self) -> &AtlasBitmap {
        &self.atlas.bitmap
    }

    /// Get the atlas image: `(width, height, coverage)`
    pub fn image(&self) -> (u32, u32, &[u8]) {
        let bitmap = &self.atlas.bitmap;
        (bitmap.width(), bitmap.height(), bitmap.data())
    }

    /// Access metrics
    #[inline]
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Resolve atlas indices for codepoints
    ///
    /// See [`GlyphTable::find_glyphs`].
    pub fn find_glyphs(&self, codepoints: &[u32], replacement: u32) -> Result<Vec<u32>> {
        self.atlas
            .glyphs
            .find_glyphs_with(codepoints, replacement, &self.diagnostics)
    }

    /// Resolve atlas indices for UTF-8 input
    ///
    /// See [`GlyphTable::find_glyphs_utf8`].
    pub fn find_glyphs_utf8(&self, utf8: &[u8], replacement: u32, max_codepoints: usize) -> Result<Vec<u32>> {
        self.atlas
            .glyphs
            .find_glyphs_utf8_with(utf8, replacement, max_codepoints, &self.diagnostics)
    }

    /// Take the atlas, discarding metrics
    pub fn into_atlas(self) -> Atlas {
        self.atlas
    }
}

#[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
#[track_caller]
fn reported<T>(config: &FontConfig, result: Result<T>) -> Result<T> {
    if let Err(ref err) = result {
        log::error!("Font: {err}");
        config.diagnostics.report(err.kind(), err.to_string());
    }
    result
}
