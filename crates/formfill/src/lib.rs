//! formfill: Convert static PDFs with placeholder glyphs into fillable forms.
//!
//! Scans a source document for textual placeholders — runs of underscores
//! for fill-in blanks, `□` glyphs for checkboxes — and produces an output
//! document with interactive AcroForm widgets positioned over the detected
//! glyphs.
//!
//! # Architecture
//!
//! - **formfill-core**: placeholder location and widget geometry (pure)
//! - **formfill** (this crate): lopdf-backed span extraction, overlay
//!   canvas painting, and output document assembly
//!
//! # Example
//!
//! ```ignore
//! use formfill::{OverlayBuilder, SourcePdf};
//!
//! let source = SourcePdf::open_file("Example.pdf")?;
//! let output = OverlayBuilder::new().build(&source)?;
//! output.save_file("Example-overlay.pdf")?;
//! ```

mod assemble;
mod builder;
mod canvas;
mod document;
mod extract;

pub use assemble::OutputDocument;
pub use builder::OverlayBuilder;
pub use canvas::OverlayCanvas;
pub use document::SourcePdf;

pub use formfill_core::{
    BBox, Composition, FieldCalibration, FieldWidget, FormError, PlaceholderKind,
    PlaceholderMatch, Span, WidgetRect, locate, plan_span,
};
