#![no_main]

use fra_ingest::pipeline::ImportPipeline;
use libfuzzer_sys::fuzz_target;

const FILENAMES: [&str; 6] = [
    "sweep.csv",
    "sweep.txt",
    "sweep.tsv",
    "export.xml",
    "export.frax",
    "export.fra",
];

fuzz_target!(|data: &[u8]| {
    // Every extension routes the bytes to a different set of parsers.
    // Malformed input must end in an outcome, never a panic.
    let pipeline = ImportPipeline::default();
    for filename in FILENAMES {
        let outcome = pipeline.run(filename, data);
        let _ = outcome.summary().to_json();
    }
});
