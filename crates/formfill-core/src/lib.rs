//! formfill-core: Backend-independent placeholder detection and widget geometry.
//!
//! This crate provides the data types (BBox, Span, PlaceholderMatch,
//! WidgetRect) and the algorithms (placeholder location, coordinate-flip
//! geometry mapping) used by formfill-rs. It never touches a PDF byte —
//! document parsing and widget painting live in the `formfill` crate.

mod calibration;
mod composition;
mod error;
mod geometry;
mod locate;
mod span;
mod widget;

pub use calibration::FieldCalibration;
pub use composition::Composition;
pub use error::FormError;
pub use geometry::BBox;
pub use locate::{PlaceholderKind, PlaceholderMatch, locate};
pub use span::Span;
pub use widget::{FieldWidget, WidgetRect, checkbox_rect, plan_span, text_field_rect};
