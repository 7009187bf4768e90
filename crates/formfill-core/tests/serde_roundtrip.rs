//! Round-trip serialization tests for the serde feature.

#![cfg(feature = "serde")]

use formfill_core::{
    BBox, Composition, FieldCalibration, PlaceholderKind, Span, locate, plan_span,
};

#[test]
fn span_roundtrip() {
    let span = Span::new("Name: ____", BBox::new(10.0, 20.0, 100.0, 30.0));
    let json = serde_json::to_string(&span).unwrap();
    let back: Span = serde_json::from_str(&json).unwrap();
    assert_eq!(back, span);
}

#[test]
fn match_roundtrip() {
    let matches = locate("x __ □");
    let json = serde_json::to_string(&matches).unwrap();
    let back: Vec<formfill_core::PlaceholderMatch> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, matches);
}

#[test]
fn widget_plan_roundtrip() {
    let span = Span::new("Agree? □", BBox::new(10.0, 50.0, 80.0, 60.0));
    let widgets = plan_span(&span, 792.0, &FieldCalibration::default());
    let json = serde_json::to_string(&widgets).unwrap();
    let back: Vec<formfill_core::FieldWidget> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, widgets);
    assert_eq!(back[0].kind, PlaceholderKind::Checkbox);
}

#[test]
fn composition_roundtrip() {
    let json = serde_json::to_string(&Composition::MergedWithSource).unwrap();
    let back: Composition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Composition::MergedWithSource);
}
