//! Empirical placement constants for widget geometry.

/// Placement constants mapping character positions in a span to page
/// coordinates, all in PDF points.
///
/// These values are calibrated empirically against the small set of font
/// sizes the source documents use in practice; they are *not* derived from
/// actual font metrics and are a known source of misalignment for atypical
/// fonts. Output compatibility depends on the exact values, so recalibrate
/// here for other font families rather than adjusting call sites.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldCalibration {
    /// Horizontal advance per character when positioning checkboxes.
    pub checkbox_char_width: f64,
    /// Left-side bearing compensation subtracted from the checkbox x
    /// position, matching the glyph's bearing in the expected source font.
    pub checkbox_left_bearing: f64,
    /// Checkbox widget edge length (widgets are square).
    pub checkbox_size: f64,
    /// Average character advance used to position text fields; the
    /// per-match offset is multiplied by this and rounded.
    pub textfield_char_spacing: f64,
    /// Left-bearing compensation added to the text-field x position.
    pub textfield_char_offset: f64,
    /// Width contributed by each underscore of a run.
    pub textfield_char_width: f64,
    /// Text-field widget height.
    pub textfield_height: f64,
    /// Font size of text typed into a text field.
    pub textfield_font_size: f64,
    /// Fixed vertical compensation applied in the coordinate flip. An
    /// approximation, not a value read from font metrics.
    pub line_height: f64,
}

impl Default for FieldCalibration {
    fn default() -> Self {
        Self {
            checkbox_char_width: 2.0,
            checkbox_left_bearing: 5.0,
            checkbox_size: 10.0,
            textfield_char_spacing: 5.3,
            textfield_char_offset: 5.0,
            textfield_char_width: 4.0,
            textfield_height: 15.0,
            textfield_font_size: 8.0,
            line_height: 10.0,
        }
    }
}
