// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph metrics table

use crate::alloc::{heap, Buffer};
use crate::Result;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Metrics and atlas position of one glyph
///
/// All values are in pixels. The glyph's image occupies columns
/// `offset_x .. offset_x + width` and rows `0 .. height` of the
/// [`AtlasBitmap`](crate::AtlasBitmap).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Glyph {
    pub codepoint: u32,
    /// Distance from baseline up to the top row
    pub top: i16,
    /// Distance from pen position to the left column
    pub left: i16,
    pub width: u16,
    pub height: u16,
    pub advance_x: u16,
    pub advance_y: u16,
    /// Horizontal offset within the atlas
    pub offset_x: u32,
}

/// Glyph table, ordered by codepoint
///
/// The index of a glyph in this table is its atlas index.
#[derive(Debug)]
pub struct GlyphTable(pub(crate) Buffer<Glyph>);

impl GlyphTable {
    /// Construct from a list of glyphs
    ///
    /// Glyphs should be sorted by codepoint, otherwise lookups will not find
    /// all entries. Memory is accounted with the default allocator.
    pub fn from_glyphs(glyphs: Vec<Glyph>) -> Result<Self> {
        Buffer::from_vec(&heap(), glyphs).map(GlyphTable)
    }

    /// Access glyphs as a slice
    #[inline]
    pub fn as_slice(&self) -> &[Glyph] {
        &self.0
    }
}

impl Deref for GlyphTable {
    type Target = [Glyph];

    #[inline]
    fn deref(&self) -> &[Glyph] {
        &self.0
    }
}
