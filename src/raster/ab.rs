// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Rastering via `ab_glyph`

use super::{read_face_metrics, to_char, BitmapSize, FaceMetrics, GlyphImage, RasterConfig};
use super::{RasterError, Rasterizer};
use crate::conv::round_i32;
use crate::fonts::FontSource;
use crate::{Error, Result};
use ab_glyph::{Font, FontVec, OutlinedGlyph, PxScale, ScaleFont};
use easy_cast::*;

/// A [`Rasterizer`] using `ab_glyph`
pub struct AbGlyphRasterizer {
    font: FontVec,
    scale: PxScale,
    metrics: FaceMetrics,
    // Reused for each rastered glyph
    slot: Vec<u8>,
}

impl AbGlyphRasterizer {
    /// Load a font face
    pub fn new(source: FontSource, config: RasterConfig) -> Result<Self> {
        let metrics = read_face_metrics(&source.data, source.index, config.size_y())?;
        let FontSource { data, index } = source;
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|err| Error::RasterizerUnavailable(format!("font load error: {err}")))?;

        // ab_glyph scales by line height, not by Em:
        let units_per_em = font
            .units_per_em()
            .ok_or_else(|| Error::RasterizerUnavailable("font has no units per Em".into()))?;
        let em_to_height = font.height_unscaled() / units_per_em;
        let t = config.transform;
        let scale = PxScale {
            x: config.size_x() * t.xx * em_to_height,
            y: config.size_y() * t.yy * em_to_height,
        };

        Ok(AbGlyphRasterizer {
            font,
            scale,
            metrics,
            slot: Vec::new(),
        })
    }

    fn outline(&self, codepoint: u32) -> Result<(ab_glyph::GlyphId, Option<OutlinedGlyph>), RasterError> {
        let id = self.font.glyph_id(to_char(codepoint)?);
        // GlyphId 0 is the 'missing glyph'
        if id.0 == 0 {
            return Err(RasterError::Missing);
        }
        let glyph = id.with_scale(self.scale);
        Ok((id, self.font.outline_glyph(glyph)))
    }
}

fn bitmap_size(outline: &OutlinedGlyph) -> BitmapSize {
    let bounds = outline.px_bounds();
    let size = bounds.max - bounds.min;
    BitmapSize {
        width: u32::conv_trunc(size.x),
        height: u32::conv_trunc(size.y),
    }
}

impl Rasterizer for AbGlyphRasterizer {
    fn face_metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn measure(&mut self, codepoint: u32) -> Result<BitmapSize, RasterError> {
        let (_, outline) = self.outline(codepoint)?;
        // No outline (e.g. space): nothing to draw
        Ok(outline.as_ref().map(bitmap_size).unwrap_or_default())
    }

    fn raster(&mut self, codepoint: u32) -> Result<GlyphImage<'_>, RasterError> {
        let (id, outline) = self.outline(codepoint)?;
        let advance_x = self.font.as_scaled(self.scale).h_advance(id);

        self.slot.clear();
        let (size, top, left) = match outline {
            Some(outline) => {
                let bounds = outline.px_bounds();
                let size = bitmap_size(&outline);
                self.slot.resize(usize::conv(size.width * size.height), 0);
                let slot = &mut self.slot;
                outline.draw(|x, y, c| {
                    // Convert to u8 with saturating conversion, rounding down:
                    slot[usize::conv((y * size.width) + x)] = (c * 256.0) as u8;
                });
                // ab_glyph coordinates are y-down
                (size, round_i32(-bounds.min.y), round_i32(bounds.min.x))
            }
            None => (BitmapSize::default(), 0, 0),
        };

        Ok(GlyphImage {
            size,
            data: &mut self.slot[..],
            advance_x,
            advance_y: 0.0,
            top,
            left,
        })
    }
}
