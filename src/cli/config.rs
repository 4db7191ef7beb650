//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in a
//! config file; command-line flags take precedence over it:
//!
//! ```toml
//! # seqxml.toml
//! [reader]
//! block_size = 65536
//!
//! [writer]
//! source = "UniProt"
//! source_version = "2024_01"
//! species = "Homo sapiens"
//! ncbi_tax_id = 9606
//! indent = 2
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use seqxml::seqxml::{ReaderConfig, WriterConfig};

/// Root configuration structure for seqxml.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Input settings.
    #[serde(default)]
    pub reader: ReaderSection,

    /// Output settings for the convert command.
    #[serde(default)]
    pub writer: WriterSection,
}

/// `[reader]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ReaderSection {
    /// Bytes read from the input per chunk.
    pub block_size: Option<usize>,
}

/// `[writer]` table.
#[derive(Debug, Default, Deserialize)]
pub struct WriterSection {
    /// Document source.
    pub source: Option<String>,

    /// Document source version.
    pub source_version: Option<String>,

    /// Document species name.
    pub species: Option<String>,

    /// Document NCBI taxonomy id, as a string or an integer.
    pub ncbi_tax_id: Option<toml::Value>,

    /// Indentation width for pretty-printed output.
    pub indent: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if one was given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Reader settings.
    pub fn reader_config(&self) -> ReaderConfig {
        let config = ReaderConfig::default();
        match self.reader.block_size {
            Some(block_size) => config.with_block_size(block_size),
            None => config,
        }
    }

    /// Apply `[writer]` values on top of `base`.
    pub fn apply_writer(&self, mut base: WriterConfig) -> Result<WriterConfig> {
        let section = &self.writer;
        if let Some(source) = &section.source {
            base.source = Some(source.clone());
        }
        if let Some(source_version) = &section.source_version {
            base.source_version = Some(source_version.clone());
        }
        if let Some(species) = &section.species {
            base.species = Some(species.clone());
        }
        if let Some(tax_id) = &section.ncbi_tax_id {
            let tax_id = match tax_id {
                toml::Value::String(s) => serde_json::Value::from(s.as_str()),
                toml::Value::Integer(i) => serde_json::Value::from(*i),
                other => anyhow::bail!(
                    "ncbi_tax_id must be a string or an integer, found {}",
                    other.type_str()
                ),
            };
            base.ncbi_tax_id = Some(tax_id);
        }
        if let Some(indent) = section.indent {
            base.indent = Some(indent);
        }
        Ok(base)
    }
}
