use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use seqxml::seqxml::SeqXmlReader;

use super::Config;

/// Per-file statistics gathered by `info`
#[derive(Debug, Default)]
struct RecordSummary {
    records: usize,
    residues: usize,
    molecule_types: BTreeMap<String, usize>,
}

/// Display information about a SeqXML file
pub fn run(file: PathBuf, config: Config) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let reader = SeqXmlReader::open(&file, config.reader_config())
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let document = reader.metadata().clone();

    let mut summary = RecordSummary::default();
    for record in reader.records() {
        let record = record.with_context(|| {
            format!(
                "Failed to read record #{} of {}",
                summary.records + 1,
                file.display()
            )
        })?;
        summary.records += 1;
        summary.residues += record.seq.len();
        let molecule_type = record.molecule_type().unwrap_or("<none>").to_string();
        *summary.molecule_types.entry(molecule_type).or_default() += 1;
    }

    let fields = [
        ("Version", Some(document.version.to_string())),
        ("Source", document.source),
        ("Source version", document.source_version),
        ("Species", document.species_name),
        ("NCBI taxonomy id", document.ncbi_taxid),
    ];

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", style("SeqXML File Information").bold().cyan());
        println!("{}", style("=======================").cyan());
        println!("{}: {}", style("File").bold(), file.display());
        println!();
        for (label, value) in &fields {
            if let Some(value) = value {
                println!("  {}: {}", style(label).bold(), value);
            }
        }
        println!();
        println!("{}:", style("Records").bold());
        println!("  Entries: {}", style(summary.records).green());
        println!("  Residues: {}", style(summary.residues).green());
        for (molecule_type, count) in &summary.molecule_types {
            println!("  {}: {}", molecule_type, style(count).green());
        }
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("SeqXML File Information");
        println!("=======================");
        println!("File: {}", file.display());
        println!();
        for (label, value) in &fields {
            if let Some(value) = value {
                println!("  {}: {}", label, value);
            }
        }
        println!();
        println!("Records:");
        println!("  Entries: {}", summary.records);
        println!("  Residues: {}", summary.residues);
        for (molecule_type, count) in &summary.molecule_types {
            println!("  {}: {}", molecule_type, count);
        }
    }

    Ok(())
}
