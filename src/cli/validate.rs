use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

#[cfg(feature = "colorized_output")]
use console::style;

use seqxml::seqxml::{SeqXmlError, SeqXmlReader};

use super::Config;

/// Validate that every record of a SeqXML file parses
pub fn run(file: PathBuf, config: Config) -> Result<()> {
    info!("SeqXML Validator");
    info!("File: {}", file.display());

    match check(&file, &config) {
        Ok(records) => {
            #[cfg(feature = "colorized_output")]
            println!(
                "{}: {} records in {}",
                style("Validation PASSED").green().bold(),
                records,
                file.display()
            );

            #[cfg(not(feature = "colorized_output"))]
            println!("Validation PASSED: {} records in {}", records, file.display());

            Ok(())
        }
        Err((records, e)) => {
            #[cfg(feature = "colorized_output")]
            eprintln!(
                "{} after {} records: [{:?}] {}",
                style("Validation FAILED").red().bold(),
                records,
                e.category(),
                e
            );

            #[cfg(not(feature = "colorized_output"))]
            eprintln!(
                "Validation FAILED after {} records: [{:?}] {}",
                records,
                e.category(),
                e
            );

            std::process::exit(1);
        }
    }
}

/// Count the records of `file`; on failure, the records read before it
fn check(file: &Path, config: &Config) -> Result<usize, (usize, SeqXmlError)> {
    let reader = SeqXmlReader::open(file, config.reader_config()).map_err(|e| (0, e))?;
    let mut records = 0;
    for record in reader.records() {
        record.map_err(|e| (records, e))?;
        records += 1;
    }
    Ok(records)
}
