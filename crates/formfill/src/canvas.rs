//! Overlay canvas — paint form-field widgets and serialize a standalone
//! one-page PDF.
//!
//! The canvas is the drawing-library analog in the pipeline: the builder
//! hands it widget rectangles in bottom-left-origin coordinates and the
//! canvas produces the overlay bytes that assembly later re-parses and
//! merges. Widgets are AcroForm widget annotations; appearance streams are
//! delegated to the viewer via `NeedAppearances`.

use formfill_core::{FormError, WidgetRect};
use lopdf::{Object, Stream, StringFormat, dictionary};

/// An in-progress page-sized overlay.
///
/// Painting order is span/match traversal order; it has no visual effect
/// since widgets do not overlap in well-formed input.
pub struct OverlayCanvas {
    width: f64,
    height: f64,
    page_index: usize,
    widgets: Vec<lopdf::Dictionary>,
    text_fields: usize,
    checkboxes: usize,
}

impl OverlayCanvas {
    /// Create a fresh canvas for the page at `page_index` (0-based), sized
    /// to the page's media box.
    pub fn new(width: f64, height: f64, page_index: usize) -> Self {
        Self {
            width,
            height,
            page_index,
            widgets: Vec::new(),
            text_fields: 0,
            checkboxes: 0,
        }
    }

    /// Number of widgets painted so far.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Paint a checkbox widget: square, solid 1pt black border, check-style
    /// button glyph, transparent interior, initially off.
    pub fn checkbox(&mut self, rect: &WidgetRect) {
        self.checkboxes += 1;
        let name = format!("p{}.check{}", self.page_index + 1, self.checkboxes);
        self.widgets.push(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Btn",
            "T" => Object::String(name.into_bytes(), StringFormat::Literal),
            "Rect" => rect_array(rect),
            "F" => Object::Integer(4),
            "V" => "Off",
            "AS" => "Off",
            "BS" => dictionary! { "W" => Object::Integer(1), "S" => "S" },
            "MK" => dictionary! {
                "BC" => black_rgb(),
                // ZapfDingbats check mark caption.
                "CA" => Object::String(b"4".to_vec(), StringFormat::Literal),
            },
        });
    }

    /// Paint a text-field widget: solid 1pt black border, no default text,
    /// typed text rendered in Helvetica at `font_size`.
    pub fn text_field(&mut self, rect: &WidgetRect, font_size: f64) {
        self.text_fields += 1;
        let name = format!("p{}.text{}", self.page_index + 1, self.text_fields);
        let da = format!("/Helv {font_size} Tf 0 g");
        self.widgets.push(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::String(name.into_bytes(), StringFormat::Literal),
            "Rect" => rect_array(rect),
            "F" => Object::Integer(4),
            "DA" => Object::String(da.into_bytes(), StringFormat::Literal),
            "BS" => dictionary! { "W" => Object::Integer(1), "S" => "S" },
            "MK" => dictionary! {
                "BC" => black_rgb(),
            },
        });
    }

    /// Serialize the canvas as a complete standalone one-page PDF.
    ///
    /// The document carries its own page tree, an empty content stream, and
    /// a catalog-level AcroForm listing every painted widget, so the bytes
    /// are independently viewable before being merged into the output.
    pub fn save(&self) -> Result<Vec<u8>, FormError> {
        let mut doc = lopdf::Document::with_version("1.5");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let annot_ids: Vec<lopdf::ObjectId> = self
            .widgets
            .iter()
            .map(|widget| doc.add_object(widget.clone()))
            .collect();
        let annot_refs: Vec<Object> = annot_ids.iter().map(|id| Object::Reference(*id)).collect();

        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));

        let media_box = vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(self.width as f32),
            Object::Real(self.height as f32),
        ];
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box,
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "Helv" => Object::Reference(font_id) },
            },
            "Annots" => annot_refs.clone(),
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        });
        if let Ok(page_obj) = doc.get_object_mut(page_id) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        let acroform = dictionary! {
            "Fields" => annot_refs,
            "DA" => Object::String(b"/Helv 0 Tf 0 g".to_vec(), StringFormat::Literal),
            "DR" => dictionary! {
                "Font" => dictionary! { "Helv" => Object::Reference(font_id) },
            },
            "NeedAppearances" => true,
        };
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
            "AcroForm" => Object::Dictionary(acroform),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| FormError::Serialize(format!("failed to serialize overlay page: {e}")))?;
        Ok(buf)
    }
}

fn rect_array(rect: &WidgetRect) -> Vec<Object> {
    vec![
        Object::Real(rect.x as f32),
        Object::Real(rect.y as f32),
        Object::Real((rect.x + rect.width) as f32),
        Object::Real((rect.y + rect.height) as f32),
    ]
}

fn black_rgb() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(0),
    ])
}
