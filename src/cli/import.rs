use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use fra_ingest::pipeline::ImportPipeline;

use super::{load_config, read_input};

/// Run one file through the import pipeline and print its summary
pub fn run(
    file: PathBuf,
    config_path: Option<PathBuf>,
    resample: Option<usize>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(points) = resample {
        if points < 2 {
            anyhow::bail!("--resample needs at least 2 points, got {points}");
        }
        config.normalization.resample = true;
        config.normalization.target_points = points;
    }

    let (filename, bytes) = read_input(&file)?;
    info!("Importing {} ({} bytes)", file.display(), bytes.len());

    let pipeline = ImportPipeline::with_config(config);
    let outcome = pipeline.run(&filename, &bytes);
    let summary = outcome.summary();

    let json = if pretty {
        summary.to_json_pretty()
    } else {
        summary.to_json()
    }
    .context("Failed to serialize import summary")?;
    println!("{json}");

    let Some(data) = outcome.data() else {
        std::process::exit(1);
    };

    if let Some(output) = output {
        let json = data.to_json().context("Failed to serialize normalized data")?;
        std::fs::write(&output, json)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote {} points to {}", data.len(), output.display());
    }

    Ok(())
}
