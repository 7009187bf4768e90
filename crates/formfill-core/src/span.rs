use crate::geometry::BBox;

/// A contiguous run of text sharing one font/position context, as produced
/// by text extraction.
///
/// Spans are read-only input to the overlay pipeline: the placeholder
/// locator scans `text`, and the widget geometry reads `bbox.x0` / `bbox.y0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The extracted text content.
    pub text: String,
    /// Bounding box in top-left-origin coordinates.
    pub bbox: BBox,
}

impl Span {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}
