//! Span extraction — a minimal text walk over page content streams.
//!
//! This is deliberately not a full content-stream interpreter: the overlay
//! math only consumes each span's text and its top-left corner, so the walk
//! tracks just the text-positioning state (`BT/ET`, `Tf`, `Td/TD/Tm/T*/TL`)
//! and the CTM stack (`q/Q/cm`), and emits one span per text-showing
//! operator. Glyph widths are estimated, not measured; the resulting boxes
//! are approximate by design.
//!
//! Extraction is best-effort: pages whose content cannot be decoded yield
//! zero spans rather than failing the run.

use formfill_core::{BBox, FormError, Span};
use lopdf::content::{Content, Operation};

use crate::document::object_to_f64;

/// Default ascent above the baseline, as a fraction of font size
/// (750/1000 text-space units).
const DEFAULT_ASCENT: f64 = 0.75;

/// Estimated advance per character, as a fraction of font size, used when
/// sizing span boxes and moving the text matrix after a show operation.
const DEFAULT_ADVANCE: f64 = 0.5;

/// Extract the text spans of one page, in content-stream order.
pub(crate) fn page_spans(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
    page_height: f64,
) -> Result<Vec<Span>, FormError> {
    let data = match doc.get_page_content(page_id) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("no readable content stream for page {page_id:?}: {e}");
            return Ok(Vec::new());
        }
    };
    let content = match Content::decode(&data) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("failed to decode content stream for page {page_id:?}: {e}");
            return Ok(Vec::new());
        }
    };

    let mut walker = TextWalker::new(page_height);
    for op in &content.operations {
        walker.handle(op);
    }
    Ok(walker.spans)
}

/// Transformation matrix `[a, b, c, d, e, f]` mapping
/// `(x, y) -> (a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(tx: f64, ty: f64) -> Matrix {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn origin(&self) -> (f64, f64) {
        (self.0[4], self.0[5])
    }

    /// Magnitude of the transformed unit x vector.
    fn scale_x(&self) -> f64 {
        self.0[0].hypot(self.0[1])
    }

    /// Magnitude of the transformed unit y vector.
    fn scale_y(&self) -> f64 {
        self.0[2].hypot(self.0[3])
    }
}

/// Text-positioning state machine over one page's operations.
struct TextWalker {
    page_height: f64,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    /// Text matrix and text line matrix; live only between BT and ET.
    tm: Matrix,
    tlm: Matrix,
    font_size: f64,
    leading: f64,
    in_text: bool,
    spans: Vec<Span>,
}

impl TextWalker {
    fn new(page_height: f64) -> Self {
        Self {
            page_height,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font_size: 0.0,
            leading: 0.0,
            in_text: false,
            spans: Vec::new(),
        }
    }

    fn handle(&mut self, op: &Operation) {
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.in_text = true;
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                // Operands are [font name, size]; only the size matters here.
                if let Some(size) = op.operands.get(1).and_then(|o| object_to_f64(o).ok()) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = number_operand(&op.operands, 0) {
                    self.leading = leading;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) =
                    (number_operand(&op.operands, 0), number_operand(&op.operands, 1))
                {
                    self.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) =
                    (number_operand(&op.operands, 0), number_operand(&op.operands, 1))
                {
                    self.leading = -ty;
                    self.move_text_position(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(text) = op.operands.first().and_then(string_operand) {
                    self.show_text(&text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(text) = op.operands.first().and_then(string_operand) {
                    self.show_text(&text);
                }
            }
            "\"" => {
                // Word and character spacing operands are ignored; only the
                // line move and the string affect span positions.
                self.next_line();
                if let Some(text) = op.operands.get(2).and_then(string_operand) {
                    self.show_text(&text);
                }
            }
            "TJ" => {
                // Strings within one TJ concatenate into a single span;
                // kerning numbers do not shift the span origin.
                if let Some(lopdf::Object::Array(items)) = op.operands.first() {
                    let text: String = items.iter().filter_map(string_operand).collect();
                    self.show_text(&text);
                }
            }
            _ => {}
        }
    }

    fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.tlm = Matrix::translate(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Emit a span at the current text position and advance the text matrix.
    fn show_text(&mut self, text: &str) {
        if !self.in_text || text.is_empty() {
            return;
        }

        let char_count = text.chars().count() as f64;
        let device = self.tm.then(&self.ctm);
        let (x, baseline) = device.origin();
        let size = self.font_size * device.scale_y();
        let ascent = DEFAULT_ASCENT * size;
        let width = DEFAULT_ADVANCE * self.font_size * char_count * device.scale_x();

        // Flip the baseline into top-left-origin coordinates.
        let top = self.page_height - (baseline + ascent);
        let bbox = BBox::new(x, top, x + width, top + size);
        self.spans.push(Span::new(text, bbox));

        // Advance in text space for subsequent show operations.
        let advance = DEFAULT_ADVANCE * self.font_size * char_count;
        self.tm = Matrix::translate(advance, 0.0).then(&self.tm);
    }
}

fn number_operand(operands: &[lopdf::Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(|o| object_to_f64(o).ok())
}

fn matrix_operands(operands: &[lopdf::Object]) -> Option<Matrix> {
    if operands.len() != 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = object_to_f64(obj).ok()?;
    }
    Some(Matrix(m))
}

fn string_operand(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::String(bytes, _) => Some(decode_text(bytes)),
        _ => None,
    }
}

/// Decode a PDF string operand to text: UTF-16BE when BOM-prefixed, UTF-8
/// when valid, byte-per-character Latin-1 otherwise.
fn decode_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else if let Ok(s) = std::str::from_utf8(bytes) {
        s.to_string()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
