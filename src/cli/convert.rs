use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

use seqxml::seqxml::{SeqXmlReader, SeqXmlWriter, WriterConfig};

use super::Config;

/// Document-level metadata for the output; each flag overrides the config file
/// and the input document
#[derive(Args, Debug, Default)]
pub struct DocumentOverrides {
    /// Source program or database
    #[arg(long)]
    source: Option<String>,

    /// Version or release of the source
    #[arg(long)]
    source_version: Option<String>,

    /// Scientific name of the species of all entries
    #[arg(long)]
    species: Option<String>,

    /// NCBI taxonomy id of all entries
    #[arg(long)]
    taxid: Option<String>,

    /// Pretty-print with this many spaces per level
    #[arg(long)]
    indent: Option<usize>,
}

impl DocumentOverrides {
    fn apply(self, mut config: WriterConfig) -> WriterConfig {
        if let Some(source) = self.source {
            config.source = Some(source);
        }
        if let Some(source_version) = self.source_version {
            config.source_version = Some(source_version);
        }
        if let Some(species) = self.species {
            config.species = Some(species);
        }
        if let Some(taxid) = self.taxid {
            config.ncbi_tax_id = Some(taxid.into());
        }
        if let Some(indent) = self.indent {
            config.indent = Some(indent);
        }
        config
    }
}

/// Rewrite a SeqXML file as SeqXML 0.4
pub fn run(
    input: PathBuf,
    output: PathBuf,
    config: Config,
    overrides: DocumentOverrides,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let start = Instant::now();
    let reader = SeqXmlReader::open(&input, config.reader_config())
        .with_context(|| format!("Failed to open {}", input.display()))?;
    info!(
        "Converting seqXML {} document {} -> {}",
        reader.version(),
        input.display(),
        output.display()
    );

    let writer_config = config.apply_writer(WriterConfig::from_document(reader.metadata()))?;
    let writer_config = overrides.apply(writer_config);

    let mut writer = SeqXmlWriter::create(&output, writer_config)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_header().context("Failed to write document header")?;
    for record in reader.records() {
        let record = record.with_context(|| {
            format!(
                "Failed to read record #{} of {}",
                writer.records_written() + 1,
                input.display()
            )
        })?;
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write record '{}'", record.id))?;
    }
    writer.write_footer().context("Failed to finish output")?;

    println!(
        "Converted {} records in {:.2?}",
        writer.records_written(),
        start.elapsed()
    );
    Ok(())
}
