// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph rastering
//!
//! The atlas builder does not raster glyphs itself; it drives a
//! [`Rasterizer`], one codepoint at a time. Backends are provided for
//! `ab_glyph` and `fontdue` (depending on enabled features); any other
//! implementation of the trait may be used with [`crate::build_atlas`] or
//! [`crate::Font::build`].
//!
//! All units are pixels. Bitmaps are 8-bit coverage, row major, with no
//! padding between rows. Vertical bearings follow the "y-up" convention:
//! `top` is the distance from the baseline up to the first bitmap row.

use crate::metrics::Transform;
use thiserror::Error;

#[cfg(feature = "ab_glyph")]
mod ab;
#[cfg(feature = "fontdue")]
mod fdue;

#[cfg(feature = "ab_glyph")]
pub use ab::AbGlyphRasterizer;
#[cfg(feature = "fontdue")]
pub use fdue::FontdueRasterizer;

/// Rasterizer failure for a single codepoint
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    /// The font has no glyph for this codepoint
    #[error("no glyph for codepoint")]
    Missing,
    /// The backend failed
    #[error("{0}")]
    Failed(String),
}

/// Line metrics of a face at the configured size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceMetrics {
    /// Distance between consecutive baselines
    pub height: f32,
    /// Distance from baseline to the top of the tallest glyphs (positive)
    pub ascent: f32,
    /// Distance from baseline to the bottom of the lowest glyphs (negative)
    pub descent: f32,
}

/// Size of a glyph bitmap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapSize {
    pub width: u32,
    pub height: u32,
}

/// A rastered glyph
///
/// The bitmap is owned by the rasterizer and only valid until its next call;
/// it is mutable so that callers may transform it in place (e.g. flip rows)
/// before copying it out.
#[derive(Debug)]
pub struct GlyphImage<'a> {
    pub size: BitmapSize,
    /// Coverage, length `size.width * size.height`
    pub data: &'a mut [u8],
    pub advance_x: f32,
    pub advance_y: f32,
    /// Distance from baseline to top row (y-up)
    pub top: i32,
    /// Distance from pen position to left column
    pub left: i32,
}

/// A glyph rastering service
pub trait Rasterizer {
    /// Line metrics of the face
    fn face_metrics(&self) -> FaceMetrics;

    /// Get bitmap dimensions without producing pixels
    fn measure(&mut self, codepoint: u32) -> Result<BitmapSize, RasterError>;

    /// Raster a glyph
    fn raster(&mut self, codepoint: u32) -> Result<GlyphImage<'_>, RasterError>;
}

/// Raster configuration
///
/// Sizes are in pixels per Em. The horizontal size is `pixel_size * aspect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterConfig {
    pub pixel_size: f32,
    pub aspect: f32,
    /// Synthetic transform (oblique / stretch)
    ///
    /// Backends apply the scaling components; shear is not supported by the
    /// bundled backends but does affect the derived line height.
    pub transform: Transform,
}

impl RasterConfig {
    /// Construct with the given size, unit aspect and no transform
    pub fn new(pixel_size: f32) -> Self {
        RasterConfig {
            pixel_size,
            aspect: 1.0,
            transform: Transform::IDENTITY,
        }
    }

    /// Horizontal size in pixels per Em
    #[inline]
    pub fn size_x(&self) -> f32 {
        self.pixel_size * self.aspect
    }

    /// Vertical size in pixels per Em
    #[inline]
    pub fn size_y(&self) -> f32 {
        self.pixel_size
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig::new(crate::fonts::DEFAULT_PIXEL_SIZE)
    }
}

/// Codepoint → `char`
///
/// Surrogates and out-of-range values have no glyph.
#[allow(unused)]
pub(crate) fn to_char(codepoint: u32) -> Result<char, RasterError> {
    char::from_u32(codepoint).ok_or(RasterError::Missing)
}

/// Read line metrics with `ttf-parser`, scaled to `dpem` pixels per Em
#[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
pub(crate) fn read_face_metrics(data: &[u8], index: u32, dpem: f32) -> crate::Result<FaceMetrics> {
    let face = ttf_parser::Face::parse(data, index)
        .map_err(|err| crate::Error::RasterizerUnavailable(format!("font load error: {err}")))?;
    let dpu = crate::conv::DPU::new(dpem, face.units_per_em());
    Ok(FaceMetrics {
        height: dpu.i16_to_px(face.height()),
        ascent: dpu.i16_to_px(face.ascender()),
        descent: dpu.i16_to_px(face.descender()),
    })
}

/// Construct the default rasterizer for a font source
///
/// Uses `ab_glyph` if enabled, otherwise `fontdue`.
#[cfg(any(feature = "ab_glyph", feature = "fontdue"))]
pub fn default_rasterizer(
    source: crate::fonts::FontSource,
    config: RasterConfig,
) -> crate::Result<Box<dyn Rasterizer>> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "ab_glyph")] {
            Ok(Box::new(AbGlyphRasterizer::new(source, config)?))
        } else {
            Ok(Box::new(FontdueRasterizer::new(source, config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_sizes() {
        let mut config = RasterConfig::new(20.0);
        config.aspect = 0.5;
        assert_eq!(config.size_x(), 10.0);
        assert_eq!(config.size_y(), 20.0);
    }

    #[test]
    fn surrogate_has_no_char() {
        assert_eq!(to_char(0xD800), Err(RasterError::Missing));
        assert_eq!(to_char(0x110000), Err(RasterError::Missing));
        assert_eq!(to_char(0x41), Ok('A'));
    }
}
