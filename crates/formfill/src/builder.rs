//! Overlay builder — drives the per-page pipeline.
//!
//! Each page moves through extract → locate & paint → serialize → merge,
//! strictly in that order. Pages are independent of each other; the only
//! shared state is the output document, which is appended to by explicit
//! page index. With the `parallel` feature the per-page work fans out over
//! rayon while merging stays sequential and index-ordered.

use formfill_core::{
    Composition, FieldCalibration, FormError, PlaceholderKind, checkbox_rect, locate,
    text_field_rect,
};
use log::debug;

use crate::assemble::OutputDocument;
use crate::canvas::OverlayCanvas;
use crate::document::SourcePdf;

/// Builds an interactive-form output document from a static source PDF.
///
/// # Example
///
/// ```ignore
/// let source = SourcePdf::open_file("Example.pdf")?;
/// let output = OverlayBuilder::new().build(&source)?;
/// output.save_file("Example-overlay.pdf")?;
/// ```
pub struct OverlayBuilder {
    calibration: FieldCalibration,
    composition: Composition,
}

impl OverlayBuilder {
    pub fn new() -> Self {
        Self {
            calibration: FieldCalibration::default(),
            composition: Composition::default(),
        }
    }

    /// Replace the placement calibration (e.g. recalibrated constants for
    /// another font family).
    pub fn with_calibration(mut self, calibration: FieldCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Choose the output composition strategy.
    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    /// Run the whole pipeline: one overlay page per source page, merged
    /// into an output document in source page order.
    ///
    /// Any failure to produce or merge a page's overlay is fatal to the
    /// run — there is no partial-document recovery.
    pub fn build(&self, source: &SourcePdf) -> Result<OutputDocument, FormError> {
        let page_count = source.page_count();
        debug!("number of pages: {page_count}");

        let mut output = match self.composition {
            Composition::OverlayOnly => OutputDocument::new(),
            Composition::MergedWithSource => OutputDocument::from_source(source)?,
        };

        for (index, bytes) in self.render_pages(source, page_count)? {
            match output.insert_overlay_page(&bytes, index) {
                Ok(()) => debug!("page {} merged", index + 1),
                Err(FormError::PageOutOfRange { .. })
                    if self.composition == Composition::MergedWithSource =>
                {
                    // Structural mismatch: fewer output slots than overlay
                    // pages. Stop early instead of failing the run.
                    debug!("page {} has no merge target; stopping early", index + 1);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        debug!("all pages processed");
        Ok(output)
    }

    /// Convenience entry point: open `input`, build, write to `output`.
    pub fn run(
        &self,
        input: impl AsRef<std::path::Path>,
        output: impl AsRef<std::path::Path>,
    ) -> Result<(), FormError> {
        let source = SourcePdf::open_file(input)?;
        self.build(&source)?.save_file(output)
    }

    #[cfg(not(feature = "parallel"))]
    fn render_pages(
        &self,
        source: &SourcePdf,
        page_count: usize,
    ) -> Result<Vec<(usize, Vec<u8>)>, FormError> {
        (0..page_count)
            .map(|index| Ok((index, self.render_page(source, index)?)))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn render_pages(
        &self,
        source: &SourcePdf,
        page_count: usize,
    ) -> Result<Vec<(usize, Vec<u8>)>, FormError> {
        use rayon::prelude::*;

        let mut pages: Vec<(usize, Vec<u8>)> = (0..page_count)
            .into_par_iter()
            .map(|index| Ok((index, self.render_page(source, index)?)))
            .collect::<Result<_, FormError>>()?;
        // Completion order is nondeterministic; merge order must not be.
        pages.sort_by_key(|(index, _)| *index);
        Ok(pages)
    }

    /// Extract, locate, paint, and serialize one page's overlay.
    fn render_page(&self, source: &SourcePdf, index: usize) -> Result<Vec<u8>, FormError> {
        let media_box = source.media_box(index)?;
        // The flip is against the media box's upper edge, matching the
        // reference behavior.
        let page_height = media_box.y1;
        debug!(
            "processing page {} (size {} x {})",
            index + 1,
            media_box.x1,
            media_box.y1
        );

        let spans = source.spans(index)?;
        let mut canvas = OverlayCanvas::new(media_box.x1, media_box.y1, index);

        for span in &spans {
            for m in locate(&span.text) {
                let placeholder: String =
                    span.text.chars().skip(m.char_offset).take(m.len).collect();
                debug!(
                    "{}: {placeholder:?} in span at ({}, {})",
                    m.kind, span.bbox.x0, span.bbox.y0
                );

                match m.kind {
                    PlaceholderKind::Checkbox => {
                        let rect = checkbox_rect(
                            &span.bbox,
                            m.char_offset,
                            page_height,
                            &self.calibration,
                        );
                        debug!("checkbox position: ({}, {})", rect.x, rect.y);
                        canvas.checkbox(&rect);
                    }
                    PlaceholderKind::TextField => {
                        // None means degenerate zero-width geometry; skip.
                        if let Some(rect) =
                            text_field_rect(&span.bbox, &m, page_height, &self.calibration)
                        {
                            debug!(
                                "text field position: ({}, {}), width {}",
                                rect.x, rect.y, rect.width
                            );
                            canvas.text_field(&rect, self.calibration.textfield_font_size);
                        }
                    }
                }
            }
        }

        debug!("page {}: {} widgets painted", index + 1, canvas.widget_count());
        canvas.save()
    }
}

impl Default for OverlayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
