// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! KAS glyph atlas library
//!
//! This library builds a single-row texture atlas of glyph coverage images for
//! a font at a fixed size, and resolves codepoints (or UTF-8 text) to indices
//! into the atlas' glyph table.
//!
//! Building is driven by a [`raster::Rasterizer`]; backends using `ab_glyph`
//! and `fontdue` are available (depending on features). A [`Font`] combines
//! an [`Atlas`] with [`FontMetrics`] derived from the face.
//!
//! ```no_run
//! # fn main() -> kas_atlas::Result<()> {
//! use kas_atlas::{Font, FontConfig};
//!
//! let font = Font::from_family("monospace:size=12", &FontConfig::default())?;
//! let indices = font.find_glyphs_utf8(b"Hello", 0xFFFD, 64)?;
//! let (width, height, coverage) = font.image();
//! # let _ = (indices, width, height, coverage);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(doc_cfg, feature(doc_cfg))]

pub mod alloc;
mod atlas;
mod bitmap;
pub mod conv;
mod error;
mod font;
pub mod fonts;
mod glyph;
pub mod metrics;
mod ranges;
pub mod raster;
mod report;
mod resolver;
pub mod utf8;

pub use alloc::{Allocator, Buffer, Heap};
pub use atlas::{build_atlas, Atlas};
pub use bitmap::{flip_rows, AtlasBitmap};
pub use error::{BadEncoding, Error, ErrorKind, Result};
pub use font::{Font, FontConfig};
pub use glyph::{Glyph, GlyphTable};
pub use metrics::{FontMetrics, Transform};
pub use ranges::{CodepointRange, RangeError, RangeSet};
pub use report::{Diagnostic, Diagnostics, Reporter, UnsupportedChar};
pub use resolver::find_glyph;
pub use utf8::Utf8Decoder;
