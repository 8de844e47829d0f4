use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use folio_canvas::{FontSpec, FontStyle};

use super::metrics::{FaceMetrics, FixedPitchMetrics, FontMetrics};

/// Where document fonts come from.
///
/// Only plain data lives here; [`FontConfig::resolve`] turns it into a
/// font database once, which every render then shares.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files supplied in memory.
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families standing in for the CSS generic families.
    pub generic_families: GenericFamilyMap,
    /// Whether to scan the system font directories (default: true).
    pub load_system_fonts: bool,
    /// Extra directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// Raw font file data registered alongside the scanned fonts.
#[derive(Clone, Debug)]
pub struct CustomFont {
    /// TTF/OTF bytes, shared between configs.
    pub data: Arc<Vec<u8>>,
    /// Family to report instead of the one in the font's name table.
    pub family_name: Option<String>,
}

/// Candidate families for each CSS generic family, best first.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
    pub cursive: Vec<String>,
    pub fantasy: Vec<String>,
}

impl GenericFamilyMap {
    /// Candidates covering the common desktop and Linux font sets.
    pub fn defaults() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            serif: names(&["Times New Roman", "Times", "Liberation Serif", "DejaVu Serif"]),
            sans_serif: names(&["Helvetica", "Arial", "Liberation Sans", "DejaVu Sans"]),
            monospace: names(&["Courier New", "Courier", "Liberation Mono", "DejaVu Sans Mono"]),
            cursive: names(&["Comic Sans MS", "Apple Chancery"]),
            fantasy: names(&["Impact", "Papyrus"]),
        }
    }
}

impl FontConfig {
    /// Scan and register fonts. This is the expensive step, do it once.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// A [`FontConfig`] turned into a queryable font database.
pub struct ResolvedFontConfig {
    fontdb: fontdb::Database,
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Self {
        Self {
            fontdb: font_config_to_fontdb(config),
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Metrics for the first face matching `font`, or fixed-pitch metrics
    /// when no face matches.
    pub fn metrics_for(&self, font: &FontSpec) -> Box<dyn FontMetrics> {
        let families: Vec<fontdb::Family> = font
            .families
            .iter()
            .map(String::as_str)
            .map(family)
            .collect();
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(font.weight),
            stretch: fontdb::Stretch::Normal,
            style: match font.style {
                FontStyle::Normal => fontdb::Style::Normal,
                FontStyle::Italic => fontdb::Style::Italic,
                FontStyle::Oblique => fontdb::Style::Oblique,
            },
        };

        let face = self.fontdb.query(&query).and_then(|id| {
            self.fontdb
                .with_face_data(id, |data, index| FaceMetrics::from_data(data.to_vec(), index))
                .flatten()
        });
        match face {
            Some(metrics) => Box::new(metrics),
            None => {
                log::debug!(
                    target: "render",
                    "no font face for {:?}, using fixed-pitch metrics",
                    font.families
                );
                Box::new(FixedPitchMetrics)
            }
        }
    }
}

/// Map a family name from a font shorthand to a fontdb family.
fn family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

/// Build a [`fontdb::Database`] from `config`.
pub fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    if config.load_system_fonts {
        db.load_system_fonts();
    }
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }

    for font in &config.custom_fonts {
        let before: HashSet<fontdb::ID> = db.faces().map(|face| face.id).collect();
        db.load_font_data(font.data.as_ref().clone());
        if let Some(name) = &font.family_name {
            rename_new_faces(&mut db, &before, name);
        }
    }

    apply_generic_families(&mut db, &config.generic_families);
    log::debug!(target: "render", "font database holds {} faces", db.len());
    db
}

/// Give every face not in `before` the family `name`.
fn rename_new_faces(db: &mut fontdb::Database, before: &HashSet<fontdb::ID>, name: &str) {
    let added: Vec<fontdb::FaceInfo> = db
        .faces()
        .filter(|face| !before.contains(&face.id))
        .cloned()
        .collect();
    for mut face in added {
        db.remove_face(face.id);
        face.families = vec![(name.to_string(), fontdb::Language::English_UnitedStates)];
        db.push_face_info(face);
    }
}

/// Point each generic family at the first available candidate.
fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let pick = |candidates: &[String]| candidates.iter().find(|c| available.contains(*c)).cloned();

    if let Some(name) = pick(&families.serif) {
        db.set_serif_family(name);
    }
    if let Some(name) = pick(&families.sans_serif) {
        db.set_sans_serif_family(name);
    }
    if let Some(name) = pick(&families.monospace) {
        db.set_monospace_family(name);
    }
    if let Some(name) = pick(&families.cursive) {
        db.set_cursive_family(name);
    }
    if let Some(name) = pick(&families.fantasy) {
        db.set_fantasy_family(name);
    }
}
