use anyhow::Result;
use log::info;
use std::path::PathBuf;

use fra_ingest::pipeline::ImportPipeline;

use super::{load_config, read_input};

/// Parse and validate an FRA file, printing the validation report
pub fn run(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let (filename, bytes) = read_input(&file)?;

    info!("FRA Validator");
    info!("File: {}", file.display());

    let pipeline = ImportPipeline::with_config(config);
    let Some((parser, parse)) = pipeline.parse(&filename, &bytes) else {
        eprintln!("No parser could handle this file format");
        std::process::exit(1);
    };
    info!("Parser: {} ({})", parser.name(), parse.status);
    for warning in &parse.warnings {
        println!("Parse warning: {warning}");
    }

    let Some(data) = parse.data.as_ref() else {
        eprintln!("Parse failed: {}", parse.errors.join("; "));
        std::process::exit(1);
    };

    let report = pipeline.validate(data);

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if !report.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
