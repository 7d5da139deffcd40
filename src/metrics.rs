// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Aggregate font metrics

use crate::conv::{round_i32, round_u32};
use crate::raster::{RasterConfig, Rasterizer};

/// A 2×2 transform applied to glyph outlines
///
/// Maps `(x, y)` to `(xx·x + xy·y, yx·x + yy·y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub xx: f32,
    pub xy: f32,
    pub yx: f32,
    pub yy: f32,
}

impl Transform {
    /// The identity transform
    pub const IDENTITY: Transform = Transform {
        xx: 1.0,
        xy: 0.0,
        yx: 0.0,
        yy: 1.0,
    };

    /// Construct a transform
    #[inline]
    pub fn new(xx: f32, xy: f32, yx: f32, yy: f32) -> Self {
        Transform { xx, xy, yx, yy }
    }

    /// True if this is the identity
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Transform a vector
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.xx * x + self.xy * y, self.yx * x + self.yy * y)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

/// Codepoints probed to estimate the average advance, with their column count
///
/// Taken from rxvt-unicode's font extent test: some Latin letters, digits and
/// punctuation, a few accented and Arabic letters, two CJK ideographs (which
/// occupy two columns) and the replacement character.
const EXTENT_PROBES: [(u32, u32); 21] = [
    (0x30, 1), // '0'
    (0x31, 1), // '1'
    (0x38, 1), // '8'
    (0x61, 1), // 'a'
    (0x64, 1), // 'd'
    (0x78, 1), // 'x'
    (0x6D, 1), // 'm'
    (0x79, 1), // 'y'
    (0x67, 1), // 'g'
    (0x57, 1), // 'W'
    (0x58, 1), // 'X'
    (0x27, 1), // '\''
    (0x5F, 1), // '_'
    (0x00CD, 1),
    (0x00D5, 1),
    (0x0114, 1),
    (0x0177, 1),
    (0x0643, 2),
    (0x304C, 2),
    (0x672C, 2),
    (0xFFFD, 2),
];

/// Aggregate metrics of a font at a fixed size
///
/// All values are in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    /// Line height (baseline to baseline)
    pub height: u32,
    /// Estimated advance of a single-column character
    pub average_width: u32,
    /// Baseline to top (positive)
    pub ascent: i32,
    /// Baseline to bottom (usually negative)
    pub descent: i32,
    /// Horizontal size in pixels per Em
    pub size_x: u32,
    /// Vertical size in pixels per Em
    pub size_y: u32,
}

impl FontMetrics {
    /// Get `(height, average_width, size_x, size_y)`
    pub fn sizes(&self) -> (u32, u32, u32, u32) {
        (self.height, self.average_width, self.size_x, self.size_y)
    }

    /// Get `(height, ascent, descent)`
    pub fn measures(&self) -> (u32, i32, i32) {
        (self.height, self.ascent, self.descent)
    }
}

/// Derive [`FontMetrics`]
///
/// Line height is read from the face; under a non-identity transform the
/// vertical metric vector is transformed instead. Many fonts declare their
/// average width unreliably, so it is estimated by probing a fixed set of
/// characters and keeping the widest single-column advance. A non-zero
/// `declared_width` acts as a lower bound on this estimate.
pub fn derive_metrics<R: Rasterizer + ?Sized>(
    rasterizer: &mut R,
    config: &RasterConfig,
    declared_width: u32,
) -> FontMetrics {
    let face = rasterizer.face_metrics();
    let height = if config.transform.is_identity() {
        face.height
    } else {
        config.transform.apply(0.0, face.height).1
    };

    let mut average_width = declared_width;
    for (c, cols) in EXTENT_PROBES {
        // Probe characters missing from the font are ignored
        let Ok(image) = rasterizer.raster(c) else {
            continue;
        };
        let advance = round_u32(image.advance_x).max(image.size.width);
        let advance = advance.div_ceil(cols);
        average_width = average_width.max(advance);
    }
    log::debug!("derive_metrics: height={height}, average_width={average_width}");

    FontMetrics {
        height: round_u32(height),
        average_width,
        ascent: round_i32(face.ascent),
        descent: round_i32(face.descent),
        size_x: round_u32(config.size_x()),
        size_y: round_u32(config.size_y()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BitmapSize, FaceMetrics, GlyphImage, RasterError};

    /// Single-column glyphs advance 7; ideographs 15 with 16 pixel bitmaps
    struct Probe {
        buf: Vec<u8>,
    }

    impl Rasterizer for Probe {
        fn face_metrics(&self) -> FaceMetrics {
            FaceMetrics {
                height: 20.0,
                ascent: 15.4,
                descent: -4.6,
            }
        }

        fn measure(&mut self, _: u32) -> Result<BitmapSize, RasterError> {
            unimplemented!()
        }

        fn raster(&mut self, c: u32) -> Result<GlyphImage<'_>, RasterError> {
            let (advance_x, width) = match c {
                0xFFFD => return Err(RasterError::Missing),
                0x304C | 0x672C => (15.0, 16),
                _ => (7.0, 6),
            };
            self.buf.clear();
            self.buf.resize(width as usize, 0);
            Ok(GlyphImage {
                size: BitmapSize { width, height: 1 },
                data: &mut self.buf[..],
                advance_x,
                advance_y: 0.0,
                top: 1,
                left: 0,
            })
        }
    }

    #[test]
    fn identity_metrics() {
        let mut r = Probe { buf: vec![] };
        let m = derive_metrics(&mut r, &RasterConfig::new(16.0), 0);
        assert_eq!(m.height, 20);
        assert_eq!(m.ascent, 15);
        assert_eq!(m.descent, -5);
        // ideographs: max(15, 16) / 2 = 8 > 7
        assert_eq!(m.average_width, 8);
        assert_eq!(m.sizes(), (20, 8, 16, 16));
    }

    #[test]
    fn transformed_height() {
        let mut r = Probe { buf: vec![] };
        let mut config = RasterConfig::new(16.0);
        config.transform = Transform::new(1.0, 0.2, 0.0, 1.5);
        let m = derive_metrics(&mut r, &config, 0);
        assert_eq!(m.height, 30);
        assert_eq!(m.measures(), (30, 15, -5));
    }

    #[test]
    fn declared_width_is_lower_bound() {
        let mut r = Probe { buf: vec![] };
        let m = derive_metrics(&mut r, &RasterConfig::new(16.0), 12);
        assert_eq!(m.average_width, 12);
    }

    #[test]
    fn transform_apply() {
        let t = Transform::new(1.0, 0.25, 0.0, 2.0);
        assert_eq!(t.apply(0.0, 8.0), (2.0, 16.0));
        assert!(!t.is_identity());
        assert!(Transform::default().is_identity());
    }
}
