//! Line placement: alignment and justification
//!
//! Placement is resolved per line after breaking: left/center/right shift
//! the line start by a share of the slack, while the justifying modes
//! distribute the slack evenly across the line's stretchable segments
//! (runs of pure whitespace). Justified exempts the paragraph's final
//! line; distributed stretches it too.

use crate::LayoutLine;
use doc_model::Alignment;

/// Resolved horizontal placement for one line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinePlacement {
    /// Shift of the line's start X within its budget
    pub start_offset_pt: f32,
    /// Extra advance inserted after each stretchable segment
    pub extra_per_gap_pt: f32,
}

/// Compute the placement of a line under a paragraph alignment.
///
/// `is_last_line` refers to the paragraph's final line, which "justified"
/// leaves ragged. With zero stretchable segments both justifying modes add
/// no spacing regardless of slack.
pub fn place_line(line: &LayoutLine, alignment: Alignment, is_last_line: bool) -> LinePlacement {
    let slack = (line.available_width_pt - line.width_pt).max(0.0);
    let gaps = line
        .runs
        .iter()
        .filter(|run| run.is_whitespace)
        .count();

    match alignment {
        Alignment::Left => LinePlacement::default(),
        Alignment::Center => LinePlacement {
            start_offset_pt: slack / 2.0,
            extra_per_gap_pt: 0.0,
        },
        Alignment::Right => LinePlacement {
            start_offset_pt: slack,
            extra_per_gap_pt: 0.0,
        },
        Alignment::Justified => {
            if is_last_line || gaps == 0 {
                LinePlacement::default()
            } else {
                LinePlacement {
                    start_offset_pt: 0.0,
                    extra_per_gap_pt: slack / gaps as f32,
                }
            }
        }
        Alignment::Distributed => {
            if gaps == 0 {
                LinePlacement::default()
            } else {
                LinePlacement {
                    start_offset_pt: 0.0,
                    extra_per_gap_pt: slack / gaps as f32,
                }
            }
        }
    }
}
