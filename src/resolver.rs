// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Codepoint → atlas index resolution

use crate::conv::to_u32;
use crate::utf8::Utf8Decoder;
use crate::{Diagnostics, Error, ErrorKind, Glyph, GlyphTable, Result};

/// Below this window length, search linearly
const LINEAR_WINDOW: usize = 8;

/// Find the index of `c` in a codepoint-sorted slice of glyphs
pub fn find_glyph(glyphs: &[Glyph], c: u32) -> Option<usize> {
    let mut pos = 0;
    let mut len = glyphs.len();
    while len > LINEAR_WINDOW {
        let step = len / 2;
        if glyphs[pos + step].codepoint > c {
            len = step;
        } else {
            pos += step;
            len -= step;
        }
    }

    let end = pos + len;
    while pos < end && glyphs[pos].codepoint < c {
        pos += 1;
    }

    (pos < end && glyphs[pos].codepoint == c).then_some(pos)
}

/// Resolves codepoints, substituting a replacement on miss
///
/// The replacement is looked up at most once.
struct Substitute<'a> {
    glyphs: &'a [Glyph],
    replacement: u32,
    index: Option<u32>,
    diagnostics: &'a Diagnostics,
}

impl<'a> Substitute<'a> {
    fn new(glyphs: &'a [Glyph], replacement: u32, diagnostics: &'a Diagnostics) -> Self {
        Substitute {
            glyphs,
            replacement,
            index: None,
            diagnostics,
        }
    }

    fn resolve(&mut self, c: u32) -> Result<u32> {
        if let Some(index) = find_glyph(self.glyphs, c) {
            return Ok(to_u32(index));
        }
        if let Some(index) = self.index {
            return Ok(index);
        }

        match find_glyph(self.glyphs, self.replacement) {
            Some(index) => {
                let index = to_u32(index);
                self.index = Some(index);
                Ok(index)
            }
            None => {
                let err = Error::Unsupported {
                    codepoint: c,
                    replacement: self.replacement,
                };
                self.diagnostics.report(ErrorKind::Unsupported, err.to_string());
                Err(err)
            }
        }
    }
}

impl GlyphTable {
    /// Find the atlas index of codepoint `c`
    #[inline]
    pub fn find_glyph(&self, c: u32) -> Option<usize> {
        find_glyph(self, c)
    }

    /// Resolve atlas indices for a sequence of codepoints
    ///
    /// Codepoints without a glyph resolve to the glyph of `replacement`. If
    /// this is needed but also missing, the call fails with
    /// [`Error::Unsupported`].
    pub fn find_glyphs(&self, codepoints: &[u32], replacement: u32) -> Result<Vec<u32>> {
        self.find_glyphs_with(codepoints, replacement, &Diagnostics::default())
    }

    /// As [`Self::find_glyphs`], reporting failure to `diagnostics`
    pub fn find_glyphs_with(
        &self,
        codepoints: &[u32],
        replacement: u32,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<u32>> {
        let mut subst = Substitute::new(self, replacement, diagnostics);
        codepoints.iter().map(|c| subst.resolve(*c)).collect()
    }

    /// Resolve atlas indices for UTF-8 input
    ///
    /// Decodes at most `max_codepoints` codepoints, stopping early at a NUL
    /// byte or the end of `utf8`. The number of codepoints decoded is the
    /// length of the result. Missing glyphs are replaced as in
    /// [`Self::find_glyphs`]. Malformed input fails with
    /// [`Error::BadEncoding`].
    pub fn find_glyphs_utf8(
        &self,
        utf8: &[u8],
        replacement: u32,
        max_codepoints: usize,
    ) -> Result<Vec<u32>> {
        self.find_glyphs_utf8_with(utf8, replacement, max_codepoints, &Diagnostics::default())
    }

    /// As [`Self::find_glyphs_utf8`], reporting failure to `diagnostics`
    pub fn find_glyphs_utf8_with(
        &self,
        utf8: &[u8],
        replacement: u32,
        max_codepoints: usize,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<u32>> {
        let mut subst = Substitute::new(self, replacement, diagnostics);
        let mut indices = Vec::with_capacity(utf8.len().min(max_codepoints));
        for item in Utf8Decoder::new(utf8).take(max_codepoints) {
            match item {
                Ok((_, c)) => indices.push(subst.resolve(c)?),
                Err(err) => {
                    diagnostics.report(ErrorKind::BadEncoding, err.to_string());
                    return Err(err.into());
                }
            }
        }
        Ok(indices)
    }
}
