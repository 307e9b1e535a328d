//! Text shaping and measurement
//!
//! `TextMeasurer` is the seam between layout and glyph-level concerns: given
//! text, a typeface, and a size it answers advance widths and font metrics,
//! and it can name a fallback face for a codepoint the primary face lacks.
//! Layout never looks inside a font.
//!
//! `TextShaper` is the production implementation: rustybuzz shaping over the
//! faces loaded by the `FontManager`, with per-codepoint fallback splitting.
//! Faces without font data are measured with estimated character widths so
//! a fontless environment still lays out deterministically.

use crate::{FaceId, FaceMetrics, FontManager, FontMetrics, LoadedFace};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The shaping/measurement collaborator interface consumed by layout.
pub trait TextMeasurer {
    /// Advance width of `text` drawn with `face` at `size_pt`
    fn measure(&self, text: &str, face: &LoadedFace, size_pt: f32) -> f32;

    /// Scaled font metrics for `face` at `size_pt`
    fn metrics(&self, face: &LoadedFace, size_pt: f32) -> FontMetrics;

    /// A face that has a glyph for `codepoint`, when the primary face lacks
    /// one and some known fallback family covers it
    fn fallback_for(&self, codepoint: char, primary: &LoadedFace) -> Option<Arc<LoadedFace>>;
}

/// A parsed rustybuzz face kept alive alongside its backing data.
struct CachedFace {
    // holds the allocation the 'static face borrows from
    _data: Arc<Vec<u8>>,
    face: rustybuzz::Face<'static>,
}

/// Production text measurer backed by rustybuzz.
pub struct TextShaper {
    fonts: Arc<FontManager>,
    face_cache: RwLock<HashMap<FaceId, Option<Arc<CachedFace>>>>,
    metric_cache: RwLock<HashMap<FaceId, FaceMetrics>>,
}

impl TextShaper {
    pub fn new(fonts: Arc<FontManager>) -> Self {
        Self {
            fonts,
            face_cache: RwLock::new(HashMap::new()),
            metric_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn font_manager(&self) -> &Arc<FontManager> {
        &self.fonts
    }

    fn cached_face(&self, face: &LoadedFace) -> Option<Arc<CachedFace>> {
        if let Some(entry) = self.face_cache.read().unwrap().get(&face.id) {
            return entry.clone();
        }

        let parsed = face.data.as_ref().and_then(|data| {
            let data = Arc::clone(data);
            // SAFETY: the Arc lives in the CachedFace next to the Face, so
            // the borrowed slice outlives every use of the Face.
            let static_data: &'static [u8] =
                unsafe { std::mem::transmute::<&[u8], &'static [u8]>(data.as_slice()) };
            rustybuzz::Face::from_slice(static_data, 0)
                .map(|rb_face| Arc::new(CachedFace { _data: data, face: rb_face }))
        });

        let mut cache = self.face_cache.write().unwrap();
        cache.entry(face.id).or_insert(parsed).clone()
    }

    fn face_metrics(&self, face: &LoadedFace) -> FaceMetrics {
        if let Some(metrics) = self.metric_cache.read().unwrap().get(&face.id) {
            return *metrics;
        }

        let metrics = match self.cached_face(face) {
            Some(cached) => FaceMetrics {
                units_per_em: cached.face.units_per_em() as u16,
                ascender: cached.face.ascender(),
                descender: cached.face.descender(),
                line_gap: cached.face.line_gap(),
            },
            None => FaceMetrics::default(),
        };

        let mut cache = self.metric_cache.write().unwrap();
        *cache.entry(face.id).or_insert(metrics)
    }

    fn covers(&self, face: &LoadedFace, codepoint: char) -> bool {
        match self.cached_face(face) {
            Some(cached) => cached.face.glyph_index(codepoint).is_some(),
            // faceless measurement estimates everything
            None => true,
        }
    }

    /// Width of a segment drawn entirely with one face
    fn segment_width(&self, text: &str, face: &LoadedFace, size_pt: f32) -> f32 {
        match self.cached_face(face) {
            Some(cached) => {
                let units_per_em = cached.face.units_per_em() as f32;
                let scale = size_pt / units_per_em;

                let mut buffer = rustybuzz::UnicodeBuffer::new();
                buffer.push_str(text);
                let output = rustybuzz::shape(&cached.face, &[], buffer);

                let total: i32 = output
                    .glyph_positions()
                    .iter()
                    .map(|pos| pos.x_advance)
                    .sum();
                total as f32 * scale
            }
            None => {
                let scale = size_pt / 1000.0;
                text.chars()
                    .map(|c| estimate_char_width(c, 1000) as f32 * scale)
                    .sum()
            }
        }
    }

    /// Split text into maximal segments whose characters share one face,
    /// switching faces only where the current face lacks a glyph.
    fn split_font_runs(&self, text: &str, primary: &LoadedFace) -> Vec<(Arc<LoadedFace>, String)> {
        let primary = Arc::new(primary.clone());
        let mut runs: Vec<(Arc<LoadedFace>, String)> = Vec::new();
        let mut current = Arc::clone(&primary);
        let mut buffer = String::new();

        for c in text.chars() {
            let face = if self.covers(&current, c) {
                Arc::clone(&current)
            } else {
                self.fallback_for(c, &current)
                    .unwrap_or_else(|| Arc::clone(&current))
            };

            if face.id != current.id && !buffer.is_empty() {
                runs.push((Arc::clone(&current), std::mem::take(&mut buffer)));
            }
            current = face;
            buffer.push(c);
        }

        if !buffer.is_empty() {
            runs.push((current, buffer));
        }

        runs
    }
}

impl TextMeasurer for TextShaper {
    fn measure(&self, text: &str, face: &LoadedFace, size_pt: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        self.split_font_runs(text, face)
            .iter()
            .map(|(seg_face, segment)| self.segment_width(segment, seg_face, size_pt))
            .sum()
    }

    fn metrics(&self, face: &LoadedFace, size_pt: f32) -> FontMetrics {
        self.face_metrics(face).scaled(size_pt)
    }

    fn fallback_for(&self, codepoint: char, primary: &LoadedFace) -> Option<Arc<LoadedFace>> {
        for family in self.fonts.fallback_families(&primary.family) {
            let candidate =
                self.fonts
                    .typeface(&family, primary.weight == crate::FontWeight::Bold, false);
            if !candidate.has_data() {
                continue;
            }
            if self.covers(&candidate, codepoint) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Estimated advance width in font units for faceless measurement
fn estimate_char_width(c: char, units_per_em: i32) -> i32 {
    let em = units_per_em;
    match c {
        ' ' | 'i' | 'l' | 'j' | 't' | 'f' | 'r' | '!' | '|' | '\'' | '`' | '.' | ',' | ':'
        | ';' => em * 30 / 100,
        'I' | '1' => em * 35 / 100,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => em * 90 / 100,
        'A'..='Z' => em * 70 / 100,
        'a'..='z' => em * 55 / 100,
        '0'..='9' => em * 60 / 100,
        // CJK is full-width
        '\u{4E00}'..='\u{9FFF}' | '\u{3000}'..='\u{303F}' => em,
        // zero-width characters
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{00AD}' => 0,
        '\u{00A0}' => em * 30 / 100,
        _ => em * 60 / 100,
    }
}

// =============================================================================
// Deterministic measurer for tests
// =============================================================================

/// A `TextMeasurer` with fixed per-character width and fixed metrics,
/// independent of any installed fonts. Layout tests use this so geometry
/// assertions hold on any machine.
#[derive(Debug, Clone)]
pub struct FixedMeasurer {
    /// Advance per character as a fraction of the font size
    pub char_width_em: f32,
    /// Ascent as a (positive) fraction of the font size; stored negated
    pub ascent_em: f32,
    /// Descent as a fraction of the font size
    pub descent_em: f32,
    /// Leading as a fraction of the font size
    pub leading_em: f32,
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self {
            char_width_em: 0.5,
            ascent_em: 0.8,
            descent_em: 0.2,
            leading_em: 0.0,
        }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, text: &str, _face: &LoadedFace, size_pt: f32) -> f32 {
        text.chars().count() as f32 * size_pt * self.char_width_em
    }

    fn metrics(&self, _face: &LoadedFace, size_pt: f32) -> FontMetrics {
        FontMetrics {
            ascent: -size_pt * self.ascent_em,
            descent: size_pt * self.descent_em,
            leading: size_pt * self.leading_em,
        }
    }

    fn fallback_for(&self, _codepoint: char, _primary: &LoadedFace) -> Option<Arc<LoadedFace>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaceId;

    fn faceless(id: u32) -> LoadedFace {
        LoadedFace {
            id: FaceId(id),
            requested_family: "Test".into(),
            family: "Test".into(),
            weight: crate::FontWeight::Normal,
            style: crate::FontStyle::Normal,
            data: None,
        }
    }

    #[test]
    fn test_faceless_measure_is_deterministic() {
        let shaper = TextShaper::new(Arc::new(FontManager::new()));
        let face = faceless(1);

        let once = shaper.measure("Hello", &face, 12.0);
        let twice = shaper.measure("Hello", &face, 12.0);
        assert_eq!(once, twice);
        assert!(once > 0.0);
        // doubling the size doubles the width
        let double = shaper.measure("Hello", &face, 24.0);
        assert!((double - once * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_text_measures_zero() {
        let shaper = TextShaper::new(Arc::new(FontManager::new()));
        assert_eq!(shaper.measure("", &faceless(1), 12.0), 0.0);
    }

    #[test]
    fn test_faceless_metrics_use_defaults() {
        let shaper = TextShaper::new(Arc::new(FontManager::new()));
        let metrics = shaper.metrics(&faceless(1), 10.0);
        assert_eq!(metrics.ascent, -8.0);
        assert_eq!(metrics.descent, 2.0);
        assert_eq!(metrics.line_height(), 10.0);
    }

    #[test]
    fn test_fixed_measurer_geometry() {
        let measurer = FixedMeasurer::default();
        let face = faceless(1);
        assert_eq!(measurer.measure("abcd", &face, 10.0), 20.0);
        let metrics = measurer.metrics(&face, 10.0);
        assert_eq!(metrics.ascent, -8.0);
        assert_eq!(metrics.descent, 2.0);
    }
}
