//! Output document assembly — merge serialized overlay pages into the
//! cumulative output.
//!
//! A page reaches its terminal state here: the standalone overlay PDF
//! bytes produced by the canvas are re-parsed, renumbered past the output
//! document's current id range, and inserted at an explicit page index.
//! Insertion by index (never by completion order) is what keeps output
//! page ordering identical to the source under the optional parallel
//! build.

use formfill_core::{Composition, FormError};
use lopdf::{Object, ObjectId, dictionary};

use crate::document::SourcePdf;

/// The output document being built, one overlay page at a time.
pub struct OutputDocument {
    doc: lopdf::Document,
    composition: Composition,
    /// Page object ids in output order: overlay pages (overlay-only) or
    /// the source's own pages (merged).
    page_ids: Vec<ObjectId>,
    /// Widget annotation ids accumulated from every merged overlay page;
    /// becomes the output AcroForm's /Fields array.
    field_ids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Start an empty overlay-only output.
    pub fn new() -> Self {
        Self {
            doc: lopdf::Document::with_version("1.5"),
            composition: Composition::OverlayOnly,
            page_ids: Vec::new(),
            field_ids: Vec::new(),
        }
    }

    /// Start a merged output from a re-load of the source bytes, so output
    /// pages keep the original page content underneath the widgets.
    pub fn from_source(source: &SourcePdf) -> Result<Self, FormError> {
        let doc = lopdf::Document::load_mem(source.bytes())
            .map_err(|e| FormError::Parse(format!("failed to re-load source PDF: {e}")))?;
        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        Ok(Self {
            doc,
            composition: Composition::MergedWithSource,
            page_ids,
            field_ids: Vec::new(),
        })
    }

    /// The composition strategy this output was created with.
    pub fn composition(&self) -> Composition {
        self.composition
    }

    /// Number of pages currently in the output.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Re-parse one overlay page's bytes and insert it at `index`.
    ///
    /// In overlay-only mode the overlay page becomes the output page at
    /// that index. In merged mode its widget annotations are re-parented
    /// onto the source page already at that index; an `index` past the
    /// source page count returns [`FormError::PageOutOfRange`] without
    /// modifying the document, which the builder treats as the stop signal
    /// for a structural mismatch.
    pub fn insert_overlay_page(&mut self, bytes: &[u8], index: usize) -> Result<(), FormError> {
        if self.composition == Composition::MergedWithSource && index >= self.page_ids.len() {
            return Err(FormError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            });
        }

        let mut overlay = lopdf::Document::load_mem(bytes)
            .map_err(|e| FormError::Serialize(format!("failed to re-parse overlay page: {e}")))?;
        overlay.renumber_objects_with(self.max_object_number() + 1);

        let overlay_page_id = *overlay
            .get_pages()
            .values()
            .next()
            .ok_or_else(|| FormError::Serialize("overlay document has no page".into()))?;
        let catalog_id = overlay_trailer_root(&overlay)?;
        let pages_id = overlay_pages_node(&overlay, catalog_id)?;
        let annot_ids = page_annot_ids(&overlay, overlay_page_id);
        let orphan_ids = overlay_page_resources(&overlay, overlay_page_id);

        self.doc.objects.extend(std::mem::take(&mut overlay.objects));
        // Keep id allocation ahead of the merged range so later add_object
        // calls cannot collide with overlay objects.
        self.doc.max_id = self.max_object_number();
        // The overlay's own document skeleton never joins the output tree.
        self.doc.objects.remove(&catalog_id);
        self.doc.objects.remove(&pages_id);

        match self.composition {
            Composition::OverlayOnly => {
                let at = index.min(self.page_ids.len());
                self.page_ids.insert(at, overlay_page_id);
            }
            Composition::MergedWithSource => {
                // The widgets survive on the source page; the overlay page
                // itself and everything only it referenced are dropped.
                self.doc.objects.remove(&overlay_page_id);
                for id in orphan_ids {
                    self.doc.objects.remove(&id);
                }
                append_page_annots(&mut self.doc, self.page_ids[index], &annot_ids)?;
            }
        }
        self.field_ids.extend(annot_ids);
        Ok(())
    }

    /// Serialize the finished output to bytes.
    pub fn to_bytes(mut self) -> Result<Vec<u8>, FormError> {
        self.finalize();
        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| FormError::Serialize(format!("failed to serialize output PDF: {e}")))?;
        Ok(buf)
    }

    /// Serialize the finished output to a file.
    pub fn save_file(self, path: impl AsRef<std::path::Path>) -> Result<(), FormError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| FormError::Io(format!("failed to write output PDF: {e}")))?;
        Ok(())
    }

    /// Attach the document skeleton: page tree (overlay-only) and the
    /// catalog-level AcroForm listing every merged widget.
    fn finalize(&mut self) {
        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let acroform = dictionary! {
            "Fields" => self
                .field_ids
                .iter()
                .map(|id| Object::Reference(*id))
                .collect::<Vec<Object>>(),
            "DA" => Object::String(b"/Helv 0 Tf 0 g".to_vec(), lopdf::StringFormat::Literal),
            "DR" => dictionary! {
                "Font" => dictionary! { "Helv" => Object::Reference(font_id) },
            },
            "NeedAppearances" => true,
        };

        match self.composition {
            Composition::OverlayOnly => {
                let kids: Vec<Object> = self
                    .page_ids
                    .iter()
                    .map(|id| Object::Reference(*id))
                    .collect();
                let pages_id = self.doc.add_object(dictionary! {
                    "Type" => "Pages",
                    "Kids" => kids,
                    "Count" => Object::Integer(self.page_ids.len() as i64),
                });
                for &page_id in &self.page_ids {
                    if let Ok(page_obj) = self.doc.get_object_mut(page_id) {
                        if let Ok(dict) = page_obj.as_dict_mut() {
                            dict.set("Parent", Object::Reference(pages_id));
                        }
                    }
                }
                let catalog_id = self.doc.add_object(dictionary! {
                    "Type" => "Catalog",
                    "Pages" => Object::Reference(pages_id),
                    "AcroForm" => Object::Dictionary(acroform),
                });
                self.doc.trailer.set("Root", Object::Reference(catalog_id));
            }
            Composition::MergedWithSource => {
                // Pre-existing source form fields are not preserved (an
                // explicit non-goal); any source AcroForm is replaced.
                let catalog = self
                    .doc
                    .trailer
                    .get(b"Root")
                    .and_then(Object::as_reference)
                    .ok()
                    .and_then(|root_id| self.doc.get_object_mut(root_id).ok())
                    .and_then(|obj| obj.as_dict_mut().ok());
                if let Some(catalog) = catalog {
                    catalog.set("AcroForm", Object::Dictionary(acroform));
                }
            }
        }
    }

    fn max_object_number(&self) -> u32 {
        self.doc
            .objects
            .keys()
            .map(|id| id.0)
            .max()
            .unwrap_or(self.doc.max_id)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn overlay_trailer_root(overlay: &lopdf::Document) -> Result<ObjectId, FormError> {
    overlay
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| FormError::Serialize(format!("overlay has no catalog: {e}")))
}

fn overlay_pages_node(
    overlay: &lopdf::Document,
    catalog_id: ObjectId,
) -> Result<ObjectId, FormError> {
    overlay
        .get_object(catalog_id)
        .and_then(|o| o.as_dict())
        .and_then(|dict| dict.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| FormError::Serialize(format!("overlay has no page tree: {e}")))
}

/// Widget annotation ids listed in a page's /Annots array.
fn page_annot_ids(doc: &lopdf::Document, page_id: ObjectId) -> Vec<ObjectId> {
    doc.get_object(page_id)
        .and_then(|o| o.as_dict())
        .and_then(|dict| dict.get(b"Annots"))
        .and_then(Object::as_array)
        .map(|annots| {
            annots
                .iter()
                .filter_map(|obj| obj.as_reference().ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Objects only the overlay page references (its content stream and the
/// Helvetica resource) — removed together with the page in merged mode so
/// nothing unreachable lingers in the output.
fn overlay_page_resources(doc: &lopdf::Document, page_id: ObjectId) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    let Ok(page) = doc.get_object(page_id).and_then(|o| o.as_dict()) else {
        return ids;
    };
    if let Ok(contents_id) = page.get(b"Contents").and_then(Object::as_reference) {
        ids.push(contents_id);
    }
    if let Ok(font_id) = page
        .get(b"Resources")
        .and_then(Object::as_dict)
        .and_then(|res| res.get(b"Font"))
        .and_then(Object::as_dict)
        .and_then(|fonts| fonts.get(b"Helv"))
        .and_then(Object::as_reference)
    {
        ids.push(font_id);
    }
    ids
}

/// Extend a page's /Annots array with widget references, following one
/// level of indirection and creating the array when absent.
fn append_page_annots(
    doc: &mut lopdf::Document,
    page_id: ObjectId,
    annot_ids: &[ObjectId],
) -> Result<(), FormError> {
    let refs: Vec<Object> = annot_ids.iter().map(|id| Object::Reference(*id)).collect();

    let indirect_annots = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .ok()
        .and_then(|page| match page.get(b"Annots") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        });

    if let Some(array_id) = indirect_annots {
        let array = doc
            .get_object_mut(array_id)
            .and_then(|o| o.as_array_mut())
            .map_err(|e| FormError::Parse(format!("page /Annots is not an array: {e}")))?;
        array.extend(refs);
        return Ok(());
    }

    let page = doc
        .get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| FormError::Parse(format!("failed to get page dictionary: {e}")))?;
    match page.get_mut(b"Annots") {
        Ok(Object::Array(array)) => array.extend(refs),
        _ => page.set("Annots", Object::Array(refs)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::OverlayCanvas;
    use formfill_core::WidgetRect;
    use lopdf::{Stream, dictionary};

    fn overlay_bytes(page_index: usize, widgets: usize) -> Vec<u8> {
        let mut canvas = OverlayCanvas::new(612.0, 792.0, page_index);
        for i in 0..widgets {
            canvas.text_field(
                &WidgetRect {
                    x: 10.0 + i as f64,
                    y: 700.0,
                    width: 16.0,
                    height: 15.0,
                },
                8.0,
            );
        }
        canvas.save().unwrap()
    }

    /// Minimal single-page source document with a content stream.
    fn source_pdf() -> SourcePdf {
        let mut doc = lopdf::Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = Stream::new(
            dictionary! {},
            b"BT /F1 12 Tf 72 720 Td (Name: ____) Tj ET".to_vec(),
        );
        let content_id = doc.add_object(content);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        });
        if let Ok(dict) = doc.get_object_mut(page_id).and_then(|o| o.as_dict_mut()) {
            dict.set("Parent", Object::Reference(pages_id));
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        SourcePdf::open(buf).unwrap()
    }

    #[test]
    fn overlay_only_preserves_page_order() {
        let mut out = OutputDocument::new();
        out.insert_overlay_page(&overlay_bytes(0, 1), 0).unwrap();
        out.insert_overlay_page(&overlay_bytes(1, 2), 1).unwrap();
        assert_eq!(out.page_count(), 2);

        let bytes = out.to_bytes().unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);

        // Page 1 carries one widget, page 2 two — ordering is observable.
        let counts: Vec<usize> = doc
            .get_pages()
            .values()
            .map(|id| page_annot_ids(&doc, *id).len())
            .collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn overlay_only_output_has_acroform() {
        let mut out = OutputDocument::new();
        out.insert_overlay_page(&overlay_bytes(0, 2), 0).unwrap();
        let bytes = out.to_bytes().unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();

        let root_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let catalog = doc.get_object(root_id).unwrap().as_dict().unwrap();
        let acroform = catalog.get(b"AcroForm").unwrap().as_dict().unwrap();
        assert_eq!(acroform.get(b"Fields").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn merged_reparents_widgets_onto_source_page() {
        let source = source_pdf();
        let mut out = OutputDocument::from_source(&source).unwrap();
        out.insert_overlay_page(&overlay_bytes(0, 1), 0).unwrap();

        let bytes = out.to_bytes().unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let page_id = *doc.get_pages().values().next().unwrap();
        let annots = page_annot_ids(&doc, page_id);
        assert_eq!(annots.len(), 1);

        // Source content is still there.
        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("Name: ____"));
    }

    #[test]
    fn merged_rejects_out_of_range_index() {
        let source = source_pdf();
        let mut out = OutputDocument::from_source(&source).unwrap();
        let err = out.insert_overlay_page(&overlay_bytes(1, 1), 1).unwrap_err();
        assert_eq!(err, FormError::PageOutOfRange { index: 1, count: 1 });
        // The guard fires before any mutation.
        assert_eq!(out.page_count(), 1);
    }

    #[test]
    fn garbage_overlay_bytes_are_a_serialize_error() {
        let mut out = OutputDocument::new();
        let err = out.insert_overlay_page(b"not a pdf", 0).unwrap_err();
        assert!(matches!(err, FormError::Serialize(_)));
    }
}
