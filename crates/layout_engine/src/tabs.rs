//! Tab stop resolution primitives
//!
//! Pure helpers for the tab machinery: picking the governing stop, the
//! repeating default stride, and back-computing where look-ahead content
//! must start so its right edge or decimal point lands on the stop.

use doc_model::{TabAlignment, TabLeader, TabStop};

/// The stop a tab resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabResolution {
    /// Target position, absolute from the paragraph margin
    pub target_absolute_pt: f32,
    pub leader: TabLeader,
    pub alignment: TabAlignment,
    /// Whether this came from the default stride rather than a custom stop
    pub from_default: bool,
}

/// Look-ahead measurement of the content between a tab and the next tab or
/// the paragraph end
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentMeasurement {
    pub total_width_pt: f32,
    /// Width of the content before the decimal separator (equals
    /// `total_width_pt` when no separator is present)
    pub width_before_decimal_pt: f32,
    pub has_decimal: bool,
}

/// Right, center, and decimal stops need the width of the following content
pub fn needs_look_ahead(alignment: TabAlignment) -> bool {
    matches!(
        alignment,
        TabAlignment::Right | TabAlignment::Center | TabAlignment::Decimal
    )
}

/// Where the look-ahead content must start for its anchor to land on the
/// stop: right edge for right stops, midpoint for center stops, the decimal
/// separator for decimal stops.
pub fn compute_desired_start(
    relative_target_pt: f32,
    alignment: TabAlignment,
    measurement: &SegmentMeasurement,
) -> f32 {
    match alignment {
        TabAlignment::Right => relative_target_pt - measurement.total_width_pt,
        TabAlignment::Center => relative_target_pt - measurement.total_width_pt / 2.0,
        TabAlignment::Decimal if measurement.has_decimal => {
            relative_target_pt - measurement.width_before_decimal_pt
        }
        TabAlignment::Decimal => relative_target_pt - measurement.total_width_pt,
        _ => relative_target_pt,
    }
}

/// The next default stop strictly beyond `current_absolute_pt`, on the
/// repeating stride.
pub fn default_tab_target(current_absolute_pt: f32, interval_pt: f32) -> f32 {
    let interval = if interval_pt <= 0.0 { 36.0 } else { interval_pt };
    ((current_absolute_pt / interval).floor() + 1.0) * interval
}

/// First custom stop strictly beyond the caret, skipping (and reporting)
/// bar stops along the way.
pub fn next_custom_stop<'a>(
    stops: &'a [TabStop],
    current_absolute_pt: f32,
    mut on_bar_stop: impl FnMut(&'a TabStop),
) -> Option<&'a TabStop> {
    for stop in stops {
        if stop.position_pt <= current_absolute_pt + 0.01 {
            continue;
        }
        if stop.alignment == TabAlignment::Bar {
            on_bar_stop(stop);
            continue;
        }
        return Some(stop);
    }
    None
}

/// Glyph repeated to fill a leader span, if the leader draws one
pub fn leader_glyph(leader: TabLeader) -> Option<&'static str> {
    match leader {
        TabLeader::None => None,
        TabLeader::Dots => Some("."),
        TabLeader::Dashes => Some("-"),
        TabLeader::Underscore | TabLeader::Heavy => Some("_"),
    }
}
