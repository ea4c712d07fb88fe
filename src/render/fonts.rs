//! Locating a TrueType font for rasterized labels and CJK UI text.
//!
//! System fonts are looked up by family name through `fontdb`. A font file
//! configured in the settings always wins.

use ab_glyph::FontVec;
use fontdb::{Database, Family, Query};
use std::path::Path;

use super::RenderError;
use crate::i18n::Locale;

/// Families covering Chinese, in preference order
const CJK_FAMILIES: &[&str] = &[
    "Noto Sans CJK SC",
    "Noto Sans CJK",
    "Source Han Sans SC",
    "Microsoft YaHei",
    "微软雅黑",
    "PingFang SC",
    "WenQuanYi Micro Hei",
];

/// Latin families good enough for digits and unit symbols
const LATIN_FAMILIES: &[&str] = &["DejaVu Sans", "Noto Sans", "Liberation Sans", "Arial", "Helvetica", "Segoe UI"];

/// Family lookups in preference order for the given locale
pub fn family_preference(locale: Locale) -> Vec<Family<'static>> {
    let cjk = CJK_FAMILIES.iter().copied().map(Family::Name);
    let latin = LATIN_FAMILIES.iter().copied().map(Family::Name);
    match locale {
        Locale::Zh => cjk.chain(std::iter::once(Family::SansSerif)).chain(latin).collect(),
        // CJK fonts still render digits, keep them as a last resort
        Locale::En => std::iter::once(Family::SansSerif).chain(latin).chain(cjk).collect(),
    }
}

/// Raw face data pulled out of the font database
#[derive(Clone)]
pub struct SystemFont {
    pub bytes: Vec<u8>,
    /// Face index inside a `.ttc` collection
    pub index: u32,
    pub family: String,
}

impl std::fmt::Debug for SystemFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFont")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Database of the fonts installed on this machine
pub fn system_fonts() -> Database {
    let mut db = Database::new();
    db.load_system_fonts();
    db
}

/// Regular face of `family`, if the database has one
pub fn query_family(db: &Database, family: Family<'_>) -> Option<SystemFont> {
    let id = db.query(&Query {
        families: &[family],
        ..Query::default()
    })?;
    let name = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    db.with_face_data(id, |data, index| SystemFont {
        bytes: data.to_vec(),
        index,
        family: name,
    })
}

/// First installed CJK font, for egui's fallback family
pub fn find_cjk_font(db: &Database) -> Option<SystemFont> {
    CJK_FAMILIES.iter().find_map(|name| query_family(db, Family::Name(*name)))
}

/// A parsed font together with where it came from
pub struct LabelFont {
    pub font: FontVec,
    pub source: String,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").field("source", &self.source).finish()
    }
}

impl LabelFont {
    /// Parse the first face of a font file
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let source = path.display().to_string();
        let font = FontVec::try_from_vec_and_index(bytes, 0).map_err(|_| RenderError::InvalidFont(source.clone()))?;
        Ok(Self { font, source })
    }

    /// Parse a face handed out by the font database
    pub fn from_system(font: SystemFont) -> Result<Self, RenderError> {
        let parsed = FontVec::try_from_vec_and_index(font.bytes, font.index)
            .map_err(|_| RenderError::InvalidFont(font.family.clone()))?;
        Ok(Self {
            font: parsed,
            source: font.family,
        })
    }
}

/// First family in `families` that the database has and that parses
pub fn find_label_font(db: &Database, families: &[Family<'_>]) -> Option<LabelFont> {
    families.iter().find_map(|family| {
        let system = query_family(db, *family)?;
        match LabelFont::from_system(system) {
            Ok(font) => Some(font),
            Err(e) => {
                bevy::log::debug!("Skipping font candidate: {}", e);
                None
            }
        }
    })
}

/// Resolve the label font: the configured file if it loads, otherwise the
/// best installed system family. `None` when nothing usable exists.
pub fn load_label_font(configured: Option<&Path>, locale: Locale) -> Option<LabelFont> {
    if let Some(path) = configured {
        match LabelFont::load(path) {
            Ok(font) => return Some(font),
            Err(e) => bevy::log::warn!("Configured label font unusable: {}", e),
        }
    }

    let font = find_label_font(&system_fonts(), &family_preference(locale))?;
    bevy::log::debug!("Using label font {}", font.source);
    Some(font)
}
