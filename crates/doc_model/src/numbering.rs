//! Multi-level list numbering
//!
//! Numbering has two halves: immutable definitions (abstract templates and
//! the instances that reference them, loaded once per document) and the live
//! counter engine that replays them in document order. Counters are keyed by
//! *abstract* id, so multiple instances sharing one abstract definition
//! continue the same sequence; a start override belongs to one
//! `(instance, level)` pair and is consumed exactly once.
//!
//! The resolver mutates shared counters and must be called once per
//! paragraph in strict document order. It is owned by a single document
//! session and is not shareable across conversions.

use crate::{
    Alignment, Element, ListMarker, MarkerSuffix, ParagraphPropertySet, RunPropertySet,
    StyleResolver,
};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Number formats
// =============================================================================

/// Number format for one list level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    #[default]
    Decimal,
    /// Zero-padded two-digit decimal: 01, 02, ...
    DecimalZero,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    /// Level text is a literal bullet glyph
    Bullet,
    /// No marker text
    None,
}

impl NumberFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "decimalZero" => Self::DecimalZero,
            "lowerLetter" => Self::LowerLetter,
            "upperLetter" => Self::UpperLetter,
            "lowerRoman" => Self::LowerRoman,
            "upperRoman" => Self::UpperRoman,
            "bullet" => Self::Bullet,
            "none" => Self::None,
            _ => Self::Decimal,
        }
    }

    /// Format a counter value. Formats that cannot represent the value
    /// (non-positive alpha/roman input) fall back to plain decimal text.
    pub fn format(&self, value: i64) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::DecimalZero => format!("{:02}", value),
            Self::LowerLetter => format_alpha(value),
            Self::UpperLetter => format_alpha(value).to_uppercase(),
            Self::LowerRoman => format_roman(value),
            Self::UpperRoman => format_roman(value).to_uppercase(),
            Self::Bullet | Self::None => String::new(),
        }
    }
}

/// 1-indexed base-26 letters: 1 -> a, 26 -> z, 27 -> aa
fn format_alpha(value: i64) -> String {
    if value <= 0 {
        return value.to_string();
    }

    let mut chars = Vec::new();
    let mut current = value;
    while current > 0 {
        current -= 1;
        chars.push((b'a' + (current % 26) as u8) as char);
        current /= 26;
    }
    chars.into_iter().rev().collect()
}

/// Greedy subtractive-pair roman numerals, lowercase
fn format_roman(value: i64) -> String {
    if value <= 0 {
        return value.to_string();
    }

    const NUMERALS: [(i64, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut result = String::new();
    let mut remaining = value;
    for (number, numeral) in NUMERALS {
        while remaining >= number {
            result.push_str(numeral);
            remaining -= number;
        }
    }
    result
}

// =============================================================================
// Definitions
// =============================================================================

/// One level (0-8) of an abstract numbering definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingLevelDefinition {
    pub level_index: i64,
    pub number_format: NumberFormat,
    /// Template with `%1`..`%9` placeholders referencing level counters
    pub level_text: String,
    pub suffix: MarkerSuffix,
    pub alignment: Alignment,
    pub start_number: i64,
    /// Indentation fragment injected into the owning paragraph
    pub paragraph_properties: Option<ParagraphPropertySet>,
    /// Formatting fragment for the marker itself
    pub run_properties: Option<RunPropertySet>,
}

impl NumberingLevelDefinition {
    pub fn from_element(level: &Element) -> Self {
        let level_index = level.int_attr("ilvl").unwrap_or(0);
        let number_format = level
            .find("numFmt")
            .and_then(|el| el.attr("val"))
            .map(NumberFormat::parse)
            .unwrap_or_default();
        let level_text = level
            .find("lvlText")
            .and_then(|el| el.attr("val"))
            .unwrap_or("%1.")
            .to_string();
        let suffix = match level.find("suff").and_then(|el| el.attr("val")) {
            Some("space") => MarkerSuffix::Space,
            Some("nothing") => MarkerSuffix::Nothing,
            _ => MarkerSuffix::Tab,
        };
        let alignment = match level.find("lvlJc").and_then(|el| el.attr("val")) {
            Some("center") => Alignment::Center,
            Some("right") => Alignment::Right,
            _ => Alignment::Left,
        };
        let start_number = level
            .find("start")
            .and_then(|el| el.int_attr("val"))
            .unwrap_or(1);

        let paragraph_properties = level
            .find("pPr")
            .map(|ppr| ParagraphPropertySet::from_element(Some(ppr)));
        let run_properties = level
            .find("rPr")
            .map(|rpr| RunPropertySet::from_element(Some(rpr)));

        Self {
            level_index,
            number_format,
            level_text,
            suffix,
            alignment,
            start_number,
            paragraph_properties,
            run_properties,
        }
    }

    fn with_start_override(&self, start_override: Option<i64>) -> Self {
        match start_override {
            Some(start) => Self {
                start_number: start,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// A reusable multi-level list template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractNumberingDefinition {
    pub id: i64,
    pub levels: HashMap<i64, NumberingLevelDefinition>,
}

impl AbstractNumberingDefinition {
    pub fn from_element(abstract_num: &Element) -> Self {
        let id = abstract_num.int_attr("abstractNumId").unwrap_or(0);
        let mut levels = HashMap::new();
        for level_el in abstract_num.find_all("lvl") {
            let def = NumberingLevelDefinition::from_element(level_el);
            levels.insert(def.level_index, def);
        }
        Self { id, levels }
    }
}

/// An instance-specific adjustment to one level of an abstract definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingLevelOverride {
    pub level: i64,
    pub start_override: Option<i64>,
    pub level_definition: Option<NumberingLevelDefinition>,
}

/// One usable numbering id referencing an abstract definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingInstanceDefinition {
    pub id: i64,
    pub abstract_id: i64,
    overrides: HashMap<i64, NumberingLevelOverride>,
}

impl NumberingInstanceDefinition {
    pub fn from_element(instance: &Element) -> Option<Self> {
        let id = instance.int_attr("numId")?;
        let abstract_id = instance.find("abstractNumId")?.int_attr("val")?;

        let mut overrides = HashMap::new();
        for override_el in instance.find_all("lvlOverride") {
            let Some(level) = override_el.int_attr("ilvl") else {
                continue;
            };
            let start_override = override_el
                .find("startOverride")
                .and_then(|el| el.int_attr("val"));
            let level_definition = override_el
                .find("lvl")
                .map(NumberingLevelDefinition::from_element);
            overrides.insert(
                level,
                NumberingLevelOverride {
                    level,
                    start_override,
                    level_definition,
                },
            );
        }

        Some(Self {
            id,
            abstract_id,
            overrides,
        })
    }

    /// The effective definition for a level: a full override definition if
    /// the instance carries one, else the abstract level with any start
    /// override folded in.
    pub fn resolve_level(
        &self,
        definitions: &NumberingDefinitions,
        level: i64,
    ) -> Option<NumberingLevelDefinition> {
        let abstract_def = definitions.abstract_definition(self.abstract_id)?;
        let base_level = abstract_def.levels.get(&level);

        if let Some(level_override) = self.overrides.get(&level) {
            if let Some(ref definition) = level_override.level_definition {
                return Some(definition.with_start_override(level_override.start_override));
            }
            return base_level.map(|base| base.with_start_override(level_override.start_override));
        }

        base_level.cloned()
    }

    pub fn start_override(&self, level: i64) -> Option<i64> {
        self.overrides.get(&level).and_then(|ov| ov.start_override)
    }
}

/// All numbering definitions of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberingDefinitions {
    abstracts: HashMap<i64, AbstractNumberingDefinition>,
    instances: HashMap<i64, NumberingInstanceDefinition>,
}

impl NumberingDefinitions {
    /// Load from the numbering part; an absent part yields empty definitions
    /// and every lookup recovers to "no marker".
    pub fn load(numbering_part: Option<&Element>) -> Self {
        let mut definitions = Self::default();
        let Some(root) = numbering_part else {
            return definitions;
        };

        for abstract_el in root.find_all("abstractNum") {
            let def = AbstractNumberingDefinition::from_element(abstract_el);
            definitions.abstracts.insert(def.id, def);
        }
        for instance_el in root.find_all("num") {
            if let Some(def) = NumberingInstanceDefinition::from_element(instance_el) {
                definitions.instances.insert(def.id, def);
            }
        }

        definitions
    }

    pub fn instance(&self, num_id: i64) -> Option<&NumberingInstanceDefinition> {
        self.instances.get(&num_id)
    }

    pub fn abstract_definition(&self, abstract_id: i64) -> Option<&AbstractNumberingDefinition> {
        self.abstracts.get(&abstract_id)
    }
}

// =============================================================================
// Counter state
// =============================================================================

/// One live counter: current value, whether it has ever produced a value,
/// and an optional one-shot forced start queued by an instance override.
#[derive(Debug, Clone, Default)]
pub struct NumberingCounter {
    pub current: i64,
    pub has_value: bool,
    pending_start: Option<i64>,
}

impl NumberingCounter {
    /// Advance: a queued forced start wins, a never-set counter initializes
    /// to the configured start, otherwise increment.
    pub fn next(&mut self, start: i64) -> i64 {
        if let Some(forced) = self.pending_start.take() {
            self.current = forced;
            self.has_value = true;
            return self.current;
        }

        if !self.has_value {
            self.current = start;
            self.has_value = true;
            return self.current;
        }

        self.current += 1;
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.has_value = false;
    }

    pub fn force_start(&mut self, start: i64) {
        self.pending_start = Some(start);
        self.has_value = false;
    }
}

/// Per-abstract-id counters, one map entry per level in use
#[derive(Debug, Clone, Default)]
pub struct NumberingCounterState {
    counters: HashMap<i64, NumberingCounter>,
}

impl NumberingCounterState {
    pub fn counter(&mut self, level: i64) -> &mut NumberingCounter {
        self.counters.entry(level).or_default()
    }

    pub fn try_counter(&self, level: i64) -> Option<&NumberingCounter> {
        self.counters.get(&level)
    }

    /// Invalidate every counter strictly deeper than `level`; a shallower
    /// item restarts all nested sequences below it.
    pub fn reset_deeper_than(&mut self, level: i64) {
        for (key, counter) in self.counters.iter_mut() {
            if *key > level {
                counter.reset();
            }
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// The stateful numbering engine for one document session.
pub struct NumberingResolver {
    definitions: NumberingDefinitions,
    /// Abstract id -> live counters
    states: HashMap<i64, NumberingCounterState>,
    /// `(instance id, level)` pairs whose start override has been consumed
    applied_start_overrides: HashSet<(i64, i64)>,
    placeholder_pattern: Regex,
}

impl NumberingResolver {
    pub fn new(definitions: NumberingDefinitions) -> Self {
        Self {
            definitions,
            states: HashMap::new(),
            applied_start_overrides: HashSet::new(),
            placeholder_pattern: Regex::new("%[1-9]").expect("placeholder pattern is valid"),
        }
    }

    /// Resolve one paragraph's marker and inject the level's indentation
    /// fragment into its paragraph properties.
    ///
    /// Must be called once per paragraph in strict document order.
    pub fn resolve(
        &mut self,
        paragraph: &Element,
        base_paragraph_props: &mut ParagraphPropertySet,
        styles: &StyleResolver,
    ) -> Option<ListMarker> {
        let num_pr = paragraph.find("pPr").and_then(|ppr| ppr.find("numPr"));
        let mut num_id = num_pr
            .and_then(|np| np.find("numId"))
            .and_then(|el| el.int_attr("val"));
        let mut level = num_pr
            .and_then(|np| np.find("ilvl"))
            .and_then(|el| el.int_attr("val"));

        if num_id.is_none() {
            num_id = base_paragraph_props.numbering_id;
        }
        if level.is_none() {
            level = base_paragraph_props.numbering_level;
        }

        let num_id = num_id?;
        let effective_level = level.unwrap_or(0);

        let instance = self.definitions.instance(num_id)?.clone();
        let level_def = instance.resolve_level(&self.definitions, effective_level)?;

        let state = self.states.entry(instance.abstract_id).or_default();
        state.reset_deeper_than(effective_level);

        if let Some(start_override) = instance.start_override(effective_level) {
            if self
                .applied_start_overrides
                .insert((instance.id, effective_level))
            {
                state.counter(effective_level).force_start(start_override);
            }
        }

        let value = state.counter(effective_level).next(level_def.start_number);

        if let Some(ref level_props) = level_def.paragraph_properties {
            base_paragraph_props.apply(level_props);
        }

        let text = self.build_level_text(&instance, &level_def);
        let formatting = match level_def.run_properties {
            Some(ref set) => styles.run_formatting(set),
            None => styles.default_run_formatting(),
        };

        tracing::debug!(
            num_id = instance.id,
            level = effective_level,
            value,
            text = %text,
            "resolved list marker"
        );

        Some(ListMarker {
            text,
            formatting,
            alignment: level_def.alignment,
            suffix: level_def.suffix,
        })
    }

    fn build_level_text(
        &self,
        instance: &NumberingInstanceDefinition,
        level_def: &NumberingLevelDefinition,
    ) -> String {
        if level_def.number_format == NumberFormat::Bullet {
            return normalize_bullet_text(&level_def.level_text);
        }
        if level_def.number_format == NumberFormat::None {
            return String::new();
        }

        let state = self.states.get(&instance.abstract_id);

        self.placeholder_pattern
            .replace_all(&level_def.level_text, |caps: &regex_lite::Captures<'_>| {
                let placeholder = caps.get(0).map(|m| m.as_str()).unwrap_or("%1");
                let referenced = (placeholder.as_bytes()[1] - b'1') as i64;

                let counter = state.and_then(|s| s.try_counter(referenced));
                let Some(counter) = counter.filter(|c| c.has_value) else {
                    return String::new();
                };

                let format = instance
                    .resolve_level(&self.definitions, referenced)
                    .map(|def| def.number_format)
                    .unwrap_or(level_def.number_format);
                format.format(counter.current)
            })
            .into_owned()
    }
}

/// Map the well-known private-use bullet glyphs to their Unicode
/// equivalents; anything else passes through verbatim.
fn normalize_bullet_text(text: &str) -> String {
    if text.is_empty() {
        return "\u{2022}".to_string();
    }

    text.chars()
        .map(|c| match c {
            '\u{F0B7}' => '\u{2022}', // bullet
            '\u{F0D8}' => '\u{25C6}', // diamond
            '\u{F0A7}' => '\u{25AA}', // square
            other => other,
        })
        .collect()
}
