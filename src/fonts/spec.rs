// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Family specifications
//!
//! A subset of the fontconfig name syntax is supported:
//!
//! ```none
//! family[,family...][:key=value...]
//! ```
//!
//! Keys:
//!
//! -   `size`: size in points
//! -   `pixelsize`: size in pixels per Em (overrides `size`)
//! -   `aspect`: horizontal stretch factor
//! -   `matrix`: four numbers `xx xy yx yy` for synthetic oblique / stretch
//! -   `charwidth`: declared cell width in pixels
//! -   `weight`: a number (100 - 900) or a name such as `bold`
//! -   `slant` (or `style`): `roman`, `italic` or `oblique`

use super::{DEFAULT_PIXEL_SIZE, DPP};
use crate::metrics::Transform;
use crate::raster::RasterConfig;
use crate::{Error, Result};
use fontdb::{Style, Weight};
use std::str::FromStr;

/// A family name
///
/// Generic names (`serif`, `sans-serif`, `monospace`, `cursive`, `fantasy`)
/// are recognised case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FamilyName {
    Named(String),
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl FamilyName {
    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "serif" => FamilyName::Serif,
            "sans-serif" | "sans" => FamilyName::SansSerif,
            "monospace" | "mono" => FamilyName::Monospace,
            "cursive" => FamilyName::Cursive,
            "fantasy" => FamilyName::Fantasy,
            _ => FamilyName::Named(name.to_string()),
        }
    }
}

/// Selection criteria for a font
#[derive(Clone, Debug, PartialEq)]
pub struct FamilySpec {
    /// Families in order of preference; if empty, sans-serif is used
    pub families: Vec<FamilyName>,
    pub weight: Weight,
    pub style: Style,
    /// Size in pixels per Em
    pub pixel_size: f32,
    pub aspect: f32,
    pub transform: Transform,
    /// Declared cell width (0 if not given)
    pub char_width: u32,
}

impl Default for FamilySpec {
    fn default() -> Self {
        FamilySpec {
            families: vec![],
            weight: Weight::NORMAL,
            style: Style::Normal,
            pixel_size: DEFAULT_PIXEL_SIZE,
            aspect: 1.0,
            transform: Transform::IDENTITY,
            char_width: 0,
        }
    }
}

impl FamilySpec {
    /// Get the raster configuration implied by this spec
    pub fn raster_config(&self) -> RasterConfig {
        RasterConfig {
            pixel_size: self.pixel_size,
            aspect: self.aspect,
            transform: self.transform,
        }
    }
}

fn positive(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|x| x.is_finite() && *x > 0.0)
}

fn parse_weight(value: &str) -> Option<Weight> {
    Some(match value.to_ascii_lowercase().as_str() {
        "thin" => Weight::THIN,
        "extralight" | "ultralight" => Weight::EXTRA_LIGHT,
        "light" => Weight::LIGHT,
        "regular" | "normal" | "book" => Weight::NORMAL,
        "medium" => Weight::MEDIUM,
        "semibold" | "demibold" => Weight::SEMIBOLD,
        "bold" => Weight::BOLD,
        "extrabold" | "ultrabold" => Weight::EXTRA_BOLD,
        "black" | "heavy" => Weight::BLACK,
        other => Weight(other.parse::<u16>().ok().filter(|w| (1..=1000).contains(w))?),
    })
}

fn parse_matrix(value: &str) -> Option<Transform> {
    let mut parts = value.split_whitespace().map(|s| s.parse::<f32>().ok());
    let mut next = || parts.next().flatten().filter(|x| x.is_finite());
    let t = Transform::new(next()?, next()?, next()?, next()?);
    next().is_none().then_some(t)
}

impl FromStr for FamilySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::FontSourceNotFound(format!("invalid font name \"{s}\": {reason}"));

        let mut parts = s.split(':');
        let mut spec = FamilySpec::default();
        if let Some(names) = parts.next() {
            spec.families = names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(FamilyName::parse)
                .collect();
        }

        let mut pixel_size = None;
        let mut pt_size = None;
        for part in parts {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid(&format!("expected key=value, found \"{part}\"")))?;
            let bad_value = || invalid(&format!("bad value for {key}: \"{value}\""));
            match key.trim() {
                "size" => pt_size = Some(positive(value).ok_or_else(bad_value)?),
                "pixelsize" => pixel_size = Some(positive(value).ok_or_else(bad_value)?),
                "aspect" => spec.aspect = positive(value).ok_or_else(bad_value)?,
                "matrix" => spec.transform = parse_matrix(value).ok_or_else(bad_value)?,
                "charwidth" => {
                    spec.char_width = value.trim().parse().map_err(|_| bad_value())?;
                }
                "weight" => spec.weight = parse_weight(value.trim()).ok_or_else(bad_value)?,
                "slant" | "style" => {
                    spec.style = match value.trim().to_ascii_lowercase().as_str() {
                        "roman" | "normal" => Style::Normal,
                        "italic" => Style::Italic,
                        "oblique" => Style::Oblique,
                        _ => return Err(bad_value()),
                    };
                }
                other => return Err(invalid(&format!("unknown key \"{other}\""))),
            }
        }

        if let Some(px) = pixel_size.or(pt_size.map(|pt| pt * DPP)) {
            spec.pixel_size = px;
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_only() {
        let spec: FamilySpec = "DejaVu Sans Mono, monospace".parse().unwrap();
        assert_eq!(
            spec.families,
            [
                FamilyName::Named("DejaVu Sans Mono".into()),
                FamilyName::Monospace
            ]
        );
        assert_eq!(spec.pixel_size, DEFAULT_PIXEL_SIZE);
        assert!(spec.transform.is_identity());

        let spec: FamilySpec = "".parse().unwrap();
        assert!(spec.families.is_empty());
    }

    #[test]
    fn sizes() {
        let spec: FamilySpec = "Monospace:size=24".parse().unwrap();
        assert_eq!(spec.families, [FamilyName::Monospace]);
        assert_eq!(spec.pixel_size, 32.0);

        let spec: FamilySpec = "Serif:pixelsize=20:size=24:aspect=0.5".parse().unwrap();
        assert_eq!(spec.pixel_size, 20.0);
        let config = spec.raster_config();
        assert_eq!(config.size_x(), 10.0);
        assert_eq!(config.size_y(), 20.0);
    }

    #[test]
    fn style_keys() {
        let spec: FamilySpec = "Sans:weight=bold:slant=italic:charwidth=9:matrix=1 0.2 0 1"
            .parse()
            .unwrap();
        assert_eq!(spec.families, [FamilyName::SansSerif]);
        assert_eq!(spec.weight, Weight::BOLD);
        assert_eq!(spec.style, Style::Italic);
        assert_eq!(spec.char_width, 9);
        assert_eq!(spec.transform, Transform::new(1.0, 0.2, 0.0, 1.0));

        let spec: FamilySpec = "x:weight=350".parse().unwrap();
        assert_eq!(spec.weight, Weight(350));
    }

    #[test]
    fn invalid() {
        for s in [
            "Mono:size",
            "Mono:size=-4",
            "Mono:size=big",
            "Mono:matrix=1 0 0",
            "Mono:matrix=1 0 0 1 5",
            "Mono:weight=2000",
            "Mono:slant=sideways",
            "Mono:colour=red",
        ] {
            let err = s.parse::<FamilySpec>().unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::FontSourceNotFound, "{s}");
        }
    }
}
