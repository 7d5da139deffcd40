// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font matching by family name

use super::{FamilyName, FamilySpec, FontSource};
use crate::{Error, Result};
use fontdb::{Database, Family, Query, Stretch};
use log::{debug, info};

/// A service resolving a [`FamilySpec`] to a font
pub trait FontMatcher {
    /// Find the best match for `spec`
    fn match_family(&mut self, spec: &FamilySpec) -> Result<FontSource>;
}

/// A [`FontMatcher`] using `fontdb`
pub struct FontdbMatcher {
    db: Database,
}

impl FontdbMatcher {
    /// Construct over system fonts
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        info!("Found {} fonts", db.len());
        FontdbMatcher { db }
    }

    /// Construct over the given database
    pub fn with_database(db: Database) -> Self {
        FontdbMatcher { db }
    }

    /// Access the database
    ///
    /// This may be used to load extra fonts or to set the names used for
    /// generic families.
    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.db
    }
}

impl FontMatcher for FontdbMatcher {
    fn match_family(&mut self, spec: &FamilySpec) -> Result<FontSource> {
        if self.db.is_empty() {
            return Err(Error::RasterizerUnavailable("font database is empty".into()));
        }

        let mut families: Vec<Family<'_>> = spec
            .families
            .iter()
            .map(|name| match name {
                FamilyName::Named(name) => Family::Name(name),
                FamilyName::Serif => Family::Serif,
                FamilyName::SansSerif => Family::SansSerif,
                FamilyName::Monospace => Family::Monospace,
                FamilyName::Cursive => Family::Cursive,
                FamilyName::Fantasy => Family::Fantasy,
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: spec.weight,
            stretch: Stretch::Normal,
            style: spec.style,
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| Error::FontSourceNotFound(format!("no font matches {:?}", spec.families)))?;

        if let Some(face) = self.db.face(id) {
            if let Some((name, _)) = face.families.first() {
                debug!("match: {name} (index {})", face.index);
            }
        }

        self.db
            .with_face_data(id, |data, index| FontSource::from_memory(data, index))
            .ok_or_else(|| Error::FontSourceNotFound(format!("failed to load data for {:?}", spec.families)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn empty_database() {
        let mut matcher = FontdbMatcher::with_database(Database::new());
        let spec: FamilySpec = "Monospace:size=12".parse().unwrap();
        let err = matcher.match_family(&spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RasterizerUnavailable);
    }

    #[test]
    fn unparseable_data_matches_nothing() {
        let mut matcher = FontdbMatcher::with_database(Database::new());
        // Not a font: fontdb ignores it
        matcher.database_mut().load_font_data(vec![0u8; 64]);
        assert!(matcher.database_mut().is_empty());
    }
}
