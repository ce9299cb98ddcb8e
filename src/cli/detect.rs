use anyhow::Result;
use std::path::PathBuf;

use fra_ingest::pipeline::ImportPipeline;

use super::{load_config, read_input};

/// Print the parser that would claim a file
pub fn run(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let (filename, bytes) = read_input(&file)?;
    let pipeline = ImportPipeline::with_config(config);

    match pipeline.detect(&filename, &bytes) {
        Some(parser) => {
            println!("File:   {}", file.display());
            println!("Parser: {}", parser.name());
            println!("Generic: {}", parser.is_generic());
            Ok(())
        }
        None => {
            eprintln!("No parser could handle this file format: {}", file.display());
            eprintln!("Registered parsers:");
            for parser in pipeline.registry().parsers() {
                eprintln!("  {:<12} {}", parser.name(), parser.supported_extensions().join(" "));
            }
            std::process::exit(1);
        }
    }
}
