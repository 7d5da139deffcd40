// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font sources and selection
//!
//! A [`FontSource`] is the raw data of a font file plus a face index (for
//! collections). Sources may be loaded directly from memory or a file, or
//! selected by family name through a [`FontMatcher`].
//!
//! ### Font sizes
//!
//! Sizes given to this library are in pixels per Em, except for the `size`
//! key of a [`FamilySpec`] which is in points:
//!
//! -   1 *Point* = 1/72 inch
//! -   DPP (Dots Per Point): `dpp = dpi / 72`; we assume the "standard" DPI
//!     of 96, thus `dpp = 96 / 72`
//! -   DPEM (Dots Per Em): `dpem = point_size × dpp`

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

mod matcher;
mod spec;

pub use fontdb::{Style, Weight};
pub use matcher::{FontMatcher, FontdbMatcher};
pub use spec::{FamilyName, FamilySpec};

/// Pixels per point at 96 DPI
pub const DPP: f32 = 96.0 / 72.0;

/// Default size in points
pub const DEFAULT_PT_SIZE: f32 = 12.0;

/// Default size in pixels per Em
pub const DEFAULT_PIXEL_SIZE: f32 = DEFAULT_PT_SIZE * DPP;

/// The contents of a font file
#[derive(Clone, PartialEq, Eq)]
pub struct FontSource {
    pub data: Vec<u8>,
    /// Face index within a font collection (otherwise 0)
    pub index: u32,
}

impl FontSource {
    /// Construct from font data
    pub fn from_memory(data: impl Into<Vec<u8>>, index: u32) -> Self {
        FontSource {
            data: data.into(),
            index,
        }
    }

    /// Read a font file
    pub fn from_file(path: impl AsRef<Path>, index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|err| Error::FontSourceNotFound(format!("{}: {err}", path.display())))?;
        log::debug!("loaded {} bytes from {}", data.len(), path.display());
        Ok(FontSource { data, index })
    }
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSource")
            .field("len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}
