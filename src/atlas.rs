// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Atlas construction
//!
//! All glyphs of an atlas share a single row: glyph images are placed side by
//! side, separated by one column of padding (avoiding bleed under linear
//! filtering). The atlas is as tall as the tallest glyph; shorter glyphs leave
//! zero coverage below.
//!
//! Building takes two passes over the candidate codepoints. The first only
//! measures glyphs in order to size the atlas; the second rasters and copies
//! them. Thus the atlas bitmap is allocated exactly once.

use crate::alloc::Buffer;
use crate::bitmap::{flip_rows, AtlasBitmap};
use crate::conv::{round_u32, sat_i16, sat_u16, to_usize};
use crate::raster::{BitmapSize, Rasterizer};
use crate::{Error, FontConfig, Glyph, GlyphTable, Result};

/// A glyph table with its atlas bitmap
#[derive(Debug)]
pub struct Atlas {
    pub glyphs: GlyphTable,
    pub bitmap: AtlasBitmap,
}

/// Outcome of the measuring pass
struct Extent {
    /// Bit `i` is set if the `i`-th candidate may be rastered
    passed: Buffer<u64>,
    count: usize,
    max_width: u32,
    max_height: u32,
    /// Total width including padding
    width: u32,
}

fn measure<R: Rasterizer + ?Sized>(rasterizer: &mut R, config: &FontConfig) -> Result<Extent> {
    let candidates = config.ranges.len();
    let mut passed = Buffer::<u64>::new(&config.allocator, candidates.div_ceil(64))?;

    let mut count = 0;
    let (mut max_width, mut max_height) = (0, 0);
    let mut total: u64 = 0;
    for (i, c) in config.ranges.codepoints().enumerate() {
        let BitmapSize { width, height } = match rasterizer.measure(c) {
            Ok(size) => size,
            Err(err) => {
                config.diagnostics.unsupported_char(c, &err.to_string());
                continue;
            }
        };
        passed[i / 64] |= 1 << (i % 64);
        count += 1;
        max_width = max_width.max(width);
        max_height = max_height.max(height);
        total += u64::from(width) + 1;
    }

    // No padding after the last glyph
    let width = total.saturating_sub(1);
    let width = u32::try_from(width).map_err(|_| Error::AllocationFailure {
        bytes: usize::try_from(width.saturating_mul(max_height.into())).unwrap_or(usize::MAX),
    })?;

    Ok(Extent {
        passed,
        count,
        max_width,
        max_height,
        width,
    })
}

/// Build an atlas
///
/// The rasterizer is called twice for each candidate codepoint of
/// `config.ranges`: once to measure and, if successful, once to raster.
/// Codepoints which cannot be measured are reported to the
/// [`UnsupportedChar`](crate::UnsupportedChar) sink and excluded.
///
/// Each glyph's rows are reversed before packing if `config.flip` is set.
///
/// On failure, all memory allocated by the build is released.
pub fn build_atlas<R: Rasterizer + ?Sized>(rasterizer: &mut R, config: &FontConfig) -> Result<Atlas> {
    let result = build(rasterizer, config);
    if let Err(ref err) = result {
        log::error!("build_atlas: {err}");
        config.diagnostics.report(err.kind(), err.to_string());
    }
    result
}

fn build<R: Rasterizer + ?Sized>(rasterizer: &mut R, config: &FontConfig) -> Result<Atlas> {
    let extent = measure(rasterizer, config)?;
    log::debug!(
        "build_atlas: {} of {} codepoints; atlas size {}×{}",
        extent.count,
        config.ranges.len(),
        extent.width,
        extent.max_height,
    );

    let alloc = &config.allocator;
    let scratch_len = if config.flip { to_usize(extent.max_width) } else { 0 };
    let mut scratch = Buffer::<u8>::new(alloc, scratch_len)?;
    let mut bitmap = AtlasBitmap::new(alloc, extent.width, extent.max_height)?;
    let mut glyphs = Buffer::<Glyph>::new(alloc, extent.count)?;

    let mut n = 0;
    let mut x = 0;
    for (i, c) in config.ranges.codepoints().enumerate() {
        if extent.passed[i / 64] & (1 << (i % 64)) == 0 {
            continue;
        }

        let fail = |reason: &str| Error::RasterizerCallFailed {
            codepoint: c,
            reason: reason.to_string(),
        };
        let image = rasterizer.raster(c).map_err(|err| fail(&err.to_string()))?;
        let BitmapSize { width, height } = image.size;
        let (w, h) = (to_usize(width), to_usize(height));

        // The measuring pass bounds every write:
        if width > extent.max_width
            || height > extent.max_height
            || u64::from(x) + u64::from(width) > u64::from(extent.width)
        {
            return Err(fail("glyph is larger than when measured"));
        }
        if image.data.len() < w * h {
            return Err(fail("bitmap is shorter than its dimensions"));
        }

        if config.flip {
            flip_rows(image.data, w, h, &mut scratch);
        }
        bitmap.blit(x, image.data, width, height);

        glyphs[n] = Glyph {
            codepoint: c,
            top: sat_i16(image.top),
            left: sat_i16(image.left),
            width: sat_u16(width),
            height: sat_u16(height),
            advance_x: sat_u16(round_u32(image.advance_x)),
            advance_y: sat_u16(round_u32(image.advance_y)),
            offset_x: x,
        };
        n += 1;
        x = x.saturating_add(width + 1);
    }
    debug_assert_eq!(n, extent.count);

    Ok(Atlas {
        glyphs: GlyphTable(glyphs),
        bitmap,
    })
}
