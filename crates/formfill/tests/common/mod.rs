//! Shared fixture builders: construct small PDFs in memory with lopdf.

use lopdf::{Object, Stream, dictionary};

/// Build a single-page 612x792 PDF whose page has the given content stream.
pub fn pdf_with_content(content: &[u8]) -> Vec<u8> {
    pdf_with_page_contents(&[content])
}

/// Build one 612x792 page per content stream.
pub fn pdf_with_page_contents(contents: &[&[u8]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let stream = Stream::new(dictionary! {}, content.to_vec());
        let content_id = doc.add_object(stream);

        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    });

    for &page_id in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(page_id) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Content stream drawing `text` at baseline (x, y) in 12pt type.
pub fn text_at(text: &str, x: f64, y: f64) -> Vec<u8> {
    format!("BT /F1 12 Tf {x} {y} Td ({text}) Tj ET").into_bytes()
}

/// Collect the /Annots reference targets of every page, in page order.
pub fn annots_per_page(doc: &lopdf::Document) -> Vec<Vec<lopdf::Dictionary>> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            let page = doc.get_object(*page_id).unwrap().as_dict().unwrap();
            match page.get(b"Annots") {
                Ok(Object::Array(refs)) => refs
                    .iter()
                    .map(|r| {
                        doc.get_object(r.as_reference().unwrap())
                            .unwrap()
                            .as_dict()
                            .unwrap()
                            .clone()
                    })
                    .collect(),
                _ => Vec::new(),
            }
        })
        .collect()
}

/// Read a name entry (e.g. /FT) from a widget dictionary as bytes.
pub fn name_of(dict: &lopdf::Dictionary, key: &[u8]) -> Vec<u8> {
    match dict.get(key) {
        Ok(Object::Name(name)) => name.clone(),
        other => panic!("expected name for {key:?}, got {other:?}"),
    }
}

/// Read a numeric entry from a /Rect-style array.
pub fn rect_values(dict: &lopdf::Dictionary) -> Vec<f64> {
    dict.get(b"Rect")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|obj| match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(f) => *f as f64,
            other => panic!("expected number in /Rect, got {other:?}"),
        })
        .collect()
}
