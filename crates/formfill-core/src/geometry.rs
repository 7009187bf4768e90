/// Bounding box in page-top-left-origin coordinates.
///
/// This is the coordinate system text extraction reports in: `y0` is the
/// distance of the top edge from the top of the page, and y grows downward.
/// Drawing canvases use the opposite (bottom-left origin) convention; the
/// conversion happens in [`crate::widget`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    /// Left edge.
    pub x0: f64,
    /// Top edge (distance from the top of the page).
    pub y0: f64,
    /// Right edge.
    pub x1: f64,
    /// Bottom edge (distance from the top of the page).
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}
