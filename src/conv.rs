// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Atlas offsets and glyph indices are represented as `u32` instead of `usize`
//! in order to match what renderers upload to the GPU (we do not expect an
//! atlas anywhere close to `u32::MAX` pixels wide).
//!
//! Glyph records store bearings and sizes in 16 bits; rasterizer output is
//! narrowed with the saturating conversions below.

use easy_cast::Cast;

/// Convert `usize` → `u32`
///
/// This is a "safer" wrapper around `as` ensuring (on debug builds) that the
/// input value may be represented correctly by `u32`.
#[inline]
pub fn to_u32(x: usize) -> u32 {
    x.cast()
}

/// Convert `u32` → `usize`
///
/// This is a "safer" wrapper around `as` ensuring that the operation is
/// zero-extension.
#[inline]
pub fn to_usize(x: u32) -> usize {
    x.cast()
}

/// Narrow `u32` → `u16`, saturating
#[inline]
pub fn sat_u16(x: u32) -> u16 {
    u16::try_from(x).unwrap_or(u16::MAX)
}

/// Narrow `i32` → `i16`, saturating
#[inline]
pub fn sat_i16(x: i32) -> i16 {
    x.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}

/// Round a pixel measure to the nearest integer, saturating
///
/// `NaN` maps to zero.
#[inline]
pub fn round_i32(x: f32) -> i32 {
    // float → int `as` casts saturate
    x.round() as i32
}

/// Round a pixel measure to the nearest non-negative integer, saturating
#[inline]
pub fn round_u32(x: f32) -> u32 {
    x.round() as u32
}

/// Scale factor: pixels per font unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DPU(pub f32);

impl DPU {
    /// Construct from a size in pixels per Em and the font's units per Em
    pub fn new(dpem: f32, units_per_em: u16) -> Self {
        DPU(dpem / f32::from(units_per_em.max(1)))
    }

    pub(crate) fn i16_to_px(self, x: i16) -> f32 {
        f32::from(x) * self.0
    }
}
