//! Widget geometry — map placeholder matches to canvas coordinates.
//!
//! Text extraction reports span positions in top-left-origin coordinates;
//! drawing canvases use bottom-left origin. The functions here perform the
//! coordinate flip (`page_height - y0 - line_height`) and apply the
//! empirical [`FieldCalibration`] spacing constants. All of them are pure:
//! identical inputs always yield identical geometry.

use crate::calibration::FieldCalibration;
use crate::geometry::BBox;
use crate::locate::{PlaceholderKind, PlaceholderMatch, locate};
use crate::span::Span;

/// Computed placement for one form-field widget, in bottom-left-origin
/// canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidgetRect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A planned form field: what to paint and where.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldWidget {
    pub kind: PlaceholderKind,
    pub rect: WidgetRect,
}

/// Compute checkbox placement for a glyph at `char_offset` within a span.
///
/// The horizontal position uses the 1-based character index of the glyph
/// (`char_offset + 1`), minus the glyph's left-side bearing. The vertical
/// position flips the span's top edge into bottom-up coordinates with the
/// fixed line-height compensation.
pub fn checkbox_rect(
    bbox: &BBox,
    char_offset: usize,
    page_height: f64,
    cal: &FieldCalibration,
) -> WidgetRect {
    let index = (char_offset + 1) as f64;
    WidgetRect {
        x: bbox.x0 + index * cal.checkbox_char_width - cal.checkbox_left_bearing,
        y: page_height - bbox.y0 - cal.line_height,
        width: cal.checkbox_size,
        height: cal.checkbox_size,
    }
}

/// Compute text-field placement for an underscore run.
///
/// Returns `None` when the computed width is not positive — a degenerate
/// match that the locator's `len >= 1` guarantee should rule out, checked
/// here anyway so no zero-width widget is ever painted.
pub fn text_field_rect(
    bbox: &BBox,
    m: &PlaceholderMatch,
    page_height: f64,
    cal: &FieldCalibration,
) -> Option<WidgetRect> {
    let width = m.len as f64 * cal.textfield_char_width;
    if width <= 0.0 {
        return None;
    }
    Some(WidgetRect {
        x: bbox.x0
            + (m.char_offset as f64 * cal.textfield_char_spacing).round()
            + cal.textfield_char_offset,
        y: page_height - bbox.y0 - cal.line_height - 2.0,
        width,
        height: cal.textfield_height,
    })
}

/// Locate every placeholder in a span and map each to widget geometry.
///
/// Widgets come back in span traversal (ascending offset) order. Spans
/// without placeholders produce an empty plan.
pub fn plan_span(span: &Span, page_height: f64, cal: &FieldCalibration) -> Vec<FieldWidget> {
    locate(&span.text)
        .iter()
        .filter_map(|m| {
            let rect = match m.kind {
                PlaceholderKind::Checkbox => {
                    Some(checkbox_rect(&span.bbox, m.char_offset, page_height, cal))
                }
                PlaceholderKind::TextField => text_field_rect(&span.bbox, m, page_height, cal),
            }?;
            Some(FieldWidget { kind: m.kind, rect })
        })
        .collect()
}
