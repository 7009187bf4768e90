mod cli;

use clap::Parser;
use cli::Cli;
use formfill::{OverlayBuilder, SourcePdf};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(code) = run(&cli) {
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<(), i32> {
    let source = SourcePdf::open_file(&cli.input_pdf_path).map_err(|e| {
        eprintln!("Error opening {}: {e}", cli.input_pdf_path.display());
        1
    })?;
    log::debug!("opened {}", cli.input_pdf_path.display());

    let output = OverlayBuilder::new().build(&source).map_err(|e| {
        eprintln!("Error building overlay: {e}");
        1
    })?;

    output.save_file(&cli.output_pdf_path).map_err(|e| {
        eprintln!("Error writing {}: {e}", cli.output_pdf_path.display());
        1
    })?;

    println!("Overlay PDF saved at: {}", cli.output_pdf_path.display());
    Ok(())
}
