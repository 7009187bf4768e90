use std::path::PathBuf;

use clap::Parser;

/// Create a fillable PDF form from a static PDF.
///
/// Underscore runs (`____`) in the source become text fields and `□`
/// glyphs become checkboxes, positioned over the original glyphs in a new
/// output document.
#[derive(Debug, Parser)]
#[command(name = "formfill", about, version)]
pub struct Cli {
    /// Path to the input PDF file
    #[arg(value_name = "INPUT_PDF", default_value = "Example.pdf")]
    pub input_pdf_path: PathBuf,

    /// Path to the output PDF file
    #[arg(value_name = "OUTPUT_PDF", default_value = "Example-overlay.pdf")]
    pub output_pdf_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_arguments() {
        let cli = Cli::parse_from(["formfill"]);
        assert_eq!(cli.input_pdf_path, PathBuf::from("Example.pdf"));
        assert_eq!(cli.output_pdf_path, PathBuf::from("Example-overlay.pdf"));
    }

    #[test]
    fn positional_arguments_override_defaults() {
        let cli = Cli::parse_from(["formfill", "in.pdf", "out.pdf"]);
        assert_eq!(cli.input_pdf_path, PathBuf::from("in.pdf"));
        assert_eq!(cli.output_pdf_path, PathBuf::from("out.pdf"));
    }

    #[test]
    fn input_alone_keeps_default_output() {
        let cli = Cli::parse_from(["formfill", "in.pdf"]);
        assert_eq!(cli.input_pdf_path, PathBuf::from("in.pdf"));
        assert_eq!(cli.output_pdf_path, PathBuf::from("Example-overlay.pdf"));
    }
}
