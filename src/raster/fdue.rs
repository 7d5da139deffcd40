// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Rastering via `fontdue`

use super::{read_face_metrics, to_char, BitmapSize, FaceMetrics, GlyphImage, RasterConfig};
use super::{RasterError, Rasterizer};
use crate::fonts::FontSource;
use crate::{Error, Result};
use easy_cast::*;
use fontdue::{Font, FontSettings};

/// A [`Rasterizer`] using `fontdue`
///
/// `fontdue` only supports uniform scaling: the horizontal aspect and the
/// horizontal transform component are ignored.
pub struct FontdueRasterizer {
    font: Font,
    px: f32,
    metrics: FaceMetrics,
    slot: Vec<u8>,
}

impl FontdueRasterizer {
    /// Load a font face
    pub fn new(source: FontSource, config: RasterConfig) -> Result<Self> {
        let metrics = read_face_metrics(&source.data, source.index, config.size_y())?;
        let px = config.size_y() * config.transform.yy;
        let settings = FontSettings {
            collection_index: source.index,
            scale: px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(source.data, settings)
            .map_err(|err| Error::RasterizerUnavailable(format!("font load error: {err}")))?;
        Ok(FontdueRasterizer {
            font,
            px,
            metrics,
            slot: Vec::new(),
        })
    }

    fn index(&self, codepoint: u32) -> Result<u16, RasterError> {
        match self.font.lookup_glyph_index(to_char(codepoint)?) {
            0 => Err(RasterError::Missing),
            index => Ok(index),
        }
    }
}

impl Rasterizer for FontdueRasterizer {
    fn face_metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn measure(&mut self, codepoint: u32) -> Result<BitmapSize, RasterError> {
        let metrics = self.font.metrics_indexed(self.index(codepoint)?, self.px);
        Ok(BitmapSize {
            width: metrics.width.cast(),
            height: metrics.height.cast(),
        })
    }

    fn raster(&mut self, codepoint: u32) -> Result<GlyphImage<'_>, RasterError> {
        let (metrics, data) = self.font.rasterize_indexed(self.index(codepoint)?, self.px);
        self.slot = data;

        let height: i32 = metrics.height.cast();
        Ok(GlyphImage {
            size: BitmapSize {
                width: metrics.width.cast(),
                height: metrics.height.cast(),
            },
            data: &mut self.slot[..],
            advance_x: metrics.advance_width,
            advance_y: metrics.advance_height,
            top: metrics.ymin + height,
            left: metrics.xmin,
        })
    }
}
