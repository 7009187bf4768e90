//! Source document access — open a PDF and expose pages, sizes, and spans.

use formfill_core::{BBox, FormError, Span};

use crate::extract;

/// A source PDF opened for placeholder scanning.
///
/// Wraps a parsed [`lopdf::Document`] and caches the ordered page object
/// ids. The original bytes are retained so the merged composition mode can
/// re-load the document as its output base.
pub struct SourcePdf {
    inner: lopdf::Document,
    page_ids: Vec<lopdf::ObjectId>,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for SourcePdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourcePdf")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl SourcePdf {
    /// Open a source document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Parse`] if the bytes are not a valid PDF and
    /// [`FormError::PasswordRequired`] if the document is encrypted —
    /// encrypted sources are rejected outright, there is no password path.
    pub fn open(bytes: Vec<u8>) -> Result<Self, FormError> {
        let inner = lopdf::Document::load_mem(&bytes)
            .map_err(|e| FormError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(FormError::PasswordRequired);
        }

        // get_pages returns a BTreeMap keyed by 1-based page number, so
        // values() is already in page order.
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        Ok(Self {
            inner,
            page_ids,
            bytes,
        })
    }

    /// Open a source document from a file path.
    ///
    /// Convenience wrapper around [`SourcePdf::open`] that reads the file
    /// into memory first.
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, FormError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| FormError::Io(e.to_string()))?;
        Self::open(bytes)
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// The raw bytes this document was opened from.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn page_id(&self, index: usize) -> Result<lopdf::ObjectId, FormError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(FormError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })
    }

    /// Media box of a page, in raw PDF coordinates as stored (`x0, y0`
    /// lower-left, `x1, y1` upper-right).
    ///
    /// The page-drawing coordinate flip uses `media_box.y1`, matching the
    /// reference behavior of flipping against the media box's upper edge.
    pub fn media_box(&self, index: usize) -> Result<BBox, FormError> {
        let page_id = self.page_id(index)?;
        let obj = resolve_inherited(&self.inner, page_id, b"MediaBox")?
            .ok_or_else(|| FormError::Parse("MediaBox not found on page or ancestors".into()))?;
        let array = obj
            .as_array()
            .map_err(|e| FormError::Parse(format!("MediaBox is not an array: {e}")))?;
        bbox_from_array(array)
    }

    /// Extract the text spans of a page, flattened in content-stream order.
    ///
    /// Span bounding boxes are reported in top-left-origin coordinates (the
    /// flip against the page's media-box top edge happens here, so callers
    /// see the extractor convention the geometry mapping expects).
    pub fn spans(&self, index: usize) -> Result<Vec<Span>, FormError> {
        let page_id = self.page_id(index)?;
        let page_height = self.media_box(index)?.y1;
        extract::page_spans(&self.inner, page_id, page_height)
    }
}

/// Extract a [`BBox`] from a lopdf array of 4 numbers `[x0, y0, x1, y1]`.
fn bbox_from_array(array: &[lopdf::Object]) -> Result<BBox, FormError> {
    if array.len() != 4 {
        return Err(FormError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    Ok(BBox::new(
        object_to_f64(&array[0])?,
        object_to_f64(&array[1])?,
        object_to_f64(&array[2])?,
        object_to_f64(&array[3])?,
    ))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, FormError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(*f as f64),
        _ => Err(FormError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Look up a key in the page dictionary, walking up the page tree via
/// /Parent if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, FormError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| FormError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| FormError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}
