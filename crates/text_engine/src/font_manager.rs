//! Font manager
//!
//! Central service for typeface lookup. Lookups go to the system font source
//! through font-kit; results land in an internally synchronized cache keyed
//! by family, weight, and style, so independent conversions can share one
//! manager. A family with no match on the system falls through a fixed
//! substitution list and finally to a faceless entry that still measures
//! (by estimation) and never fails.
//!
//! The manager is an injected service instance, not process-global state;
//! layout and rendering receive it explicitly.

use crate::{FaceId, FontId, FontStyle, FontWeight, LoadedFace};
use font_kit::family_name::FamilyName;
use font_kit::properties::{Properties, Style, Weight};
use font_kit::source::SystemSource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

/// Families tried, in order, when a requested family is not installed
const SUBSTITUTION_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
];

/// Families probed for per-codepoint glyph fallback
const CODEPOINT_FALLBACK_FAMILIES: &[&str] = &[
    "Arial",
    "DejaVu Sans",
    "Noto Sans",
    "Noto Sans CJK SC",
    "Noto Sans Symbols",
    "Noto Color Emoji",
    "Symbola",
];

pub struct FontManager {
    default_family: String,
    faces: RwLock<HashMap<FontId, Arc<LoadedFace>>>,
    next_face_id: AtomicU32,
}

impl FontManager {
    pub fn new() -> Self {
        Self::with_default_family("Arial")
    }

    pub fn with_default_family(default_family: impl Into<String>) -> Self {
        Self {
            default_family: default_family.into(),
            faces: RwLock::new(HashMap::new()),
            next_face_id: AtomicU32::new(1),
        }
    }

    pub fn default_family(&self) -> &str {
        &self.default_family
    }

    /// The face used when nothing more specific applies
    pub fn default_typeface(&self) -> Arc<LoadedFace> {
        let family = self.default_family.clone();
        self.typeface(&family, false, false)
    }

    /// Get a typeface for a family and style, loading and caching it on
    /// first use. Falls through requested family, substitution families,
    /// and the default family; never fails.
    pub fn typeface(&self, family: &str, bold: bool, italic: bool) -> Arc<LoadedFace> {
        let font_id = FontId::new(family)
            .with_weight(if bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            })
            .with_style(if italic {
                FontStyle::Italic
            } else {
                FontStyle::Normal
            });

        if let Some(cached) = self.faces.read().unwrap().get(&font_id) {
            return Arc::clone(cached);
        }

        let loaded = self.load_with_substitution(&font_id);

        let mut cache = self.faces.write().unwrap();
        // another conversion may have raced the load; first insert wins
        Arc::clone(
            cache
                .entry(font_id)
                .or_insert_with(|| Arc::new(loaded)),
        )
    }

    /// Candidate families for per-codepoint glyph fallback, deduplicated
    /// against the given primary family.
    pub fn fallback_families(&self, primary_family: &str) -> Vec<String> {
        CODEPOINT_FALLBACK_FAMILIES
            .iter()
            .filter(|f| !f.eq_ignore_ascii_case(primary_family))
            .map(|f| f.to_string())
            .collect()
    }

    fn load_with_substitution(&self, font_id: &FontId) -> LoadedFace {
        let mut family = font_id.family.clone();
        let mut data = load_system_font(&font_id.family, font_id.weight, font_id.style);

        if data.is_none() {
            let candidates = SUBSTITUTION_FAMILIES
                .iter()
                .map(|f| f.to_string())
                .chain(std::iter::once(self.default_family.clone()));
            for candidate in candidates {
                if candidate.eq_ignore_ascii_case(&font_id.family) {
                    continue;
                }
                if let Some(found) = load_system_font(&candidate, font_id.weight, font_id.style) {
                    tracing::debug!(
                        requested = %font_id.family,
                        substituted = %candidate,
                        "font substituted"
                    );
                    family = candidate;
                    data = Some(found);
                    break;
                }
            }
        }

        if data.is_none() {
            tracing::debug!(requested = %font_id.family, "no system font found, using estimated metrics");
        }

        LoadedFace {
            id: FaceId(self.next_face_id.fetch_add(1, Ordering::Relaxed)),
            requested_family: font_id.family.clone(),
            family,
            weight: font_id.weight,
            style: font_id.style,
            data,
        }
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

fn load_system_font(family: &str, weight: FontWeight, style: FontStyle) -> Option<Arc<Vec<u8>>> {
    if family.is_empty() {
        return None;
    }

    let mut properties = Properties::new();
    properties.weight = match weight {
        FontWeight::Bold => Weight::BOLD,
        FontWeight::Normal => Weight::NORMAL,
    };
    properties.style = match style {
        FontStyle::Italic => Style::Italic,
        FontStyle::Normal => Style::Normal,
    };

    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::Title(family.to_string())], &properties)
        .ok()?;
    let font = handle.load().ok()?;
    font.copy_font_data()
}
