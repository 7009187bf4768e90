//! Placeholder Locator — find placeholder glyph patterns in span text.
//!
//! Two patterns exist: a greedy run of one-or-more underscores marks a
//! text-field blank, and the `□` glyph (U+25A1) marks a checkbox. The
//! locator scans a span's text once and returns a single match sequence
//! sorted by character offset, decoupling finding from counting.

use std::sync::LazyLock;

use regex::Regex;

/// Maximal run of underscores: one text field per run.
static TEXT_FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("underscore run pattern compiles"));

/// A single checkbox glyph. Consecutive glyphs are *not* merged into a run;
/// each occurrence yields its own match.
static CHECKBOX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{25A1}").expect("checkbox glyph pattern compiles"));

/// The kind of placeholder a match represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaceholderKind {
    /// A run of underscores to be replaced by a text input field.
    TextField,
    /// A `□` glyph to be replaced by a checkbox.
    Checkbox,
}

impl PlaceholderKind {
    /// The PDF field-type name (`/FT` entry) a widget of this kind carries.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            Self::TextField => "Tx",
            Self::Checkbox => "Btn",
        }
    }
}

impl std::fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextField => write!(f, "text field"),
            Self::Checkbox => write!(f, "checkbox"),
        }
    }
}

/// A located placeholder occurrence within one span's text.
///
/// Ephemeral: exists only while the owning span is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceholderMatch {
    /// What kind of placeholder matched.
    pub kind: PlaceholderKind,
    /// Character (not byte) index of the match start within the span text.
    pub char_offset: usize,
    /// Characters consumed by the match. Always 1 for checkboxes.
    pub len: usize,
}

/// Find all placeholder occurrences in `text`.
///
/// Both patterns are evaluated independently over the same text with a
/// non-overlapping leftmost-first scan, then merged into one sequence in
/// ascending `char_offset` order — the ordering the geometry computation
/// relies on. The glyph sets are disjoint, so no character can satisfy
/// both patterns (assumed, not enforced).
///
/// Pure function of the input string; no side effects.
pub fn locate(text: &str) -> Vec<PlaceholderMatch> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();

    for m in TEXT_FIELD_PATTERN.find_iter(text) {
        matches.push(PlaceholderMatch {
            kind: PlaceholderKind::TextField,
            char_offset: char_offset_at(text, m.start()),
            len: m.as_str().chars().count(),
        });
    }

    for m in CHECKBOX_PATTERN.find_iter(text) {
        matches.push(PlaceholderMatch {
            kind: PlaceholderKind::Checkbox,
            char_offset: char_offset_at(text, m.start()),
            len: 1,
        });
    }

    matches.sort_by_key(|m| m.char_offset);
    matches
}

/// Convert a byte offset reported by the regex engine into a character
/// offset, so multi-byte text preceding a match does not skew positions.
fn char_offset_at(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
