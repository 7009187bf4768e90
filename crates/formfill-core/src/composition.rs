/// Output composition strategy.
///
/// Decides what each output page is built from. The overlay-only variant
/// reproduces the reference behavior: the output is a standalone artifact
/// whose pages carry only the new widgets, not the source page's visual
/// background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Composition {
    /// Each output page contains only the painted widgets.
    #[default]
    OverlayOnly,
    /// Each output page is the source page with the widgets attached on
    /// top, preserving the original page content.
    MergedWithSource,
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverlayOnly => write!(f, "overlay-only"),
            Self::MergedWithSource => write!(f, "merged-with-source"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_overlay_only() {
        assert_eq!(Composition::default(), Composition::OverlayOnly);
    }

    #[test]
    fn display_names() {
        assert_eq!(Composition::OverlayOnly.to_string(), "overlay-only");
        assert_eq!(
            Composition::MergedWithSource.to_string(),
            "merged-with-source"
        );
    }
}
