use serde_json::Value;

use crate::seqxml::DocumentInfo;

/// Document-wide settings for the SeqXML writer.
///
/// Source, species and taxonomy set here are written on the root element and
/// act as defaults: entries whose annotations match them do not repeat them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriterConfig {
    /// Source program or database, e.g. "UniProt"
    pub source: Option<String>,

    /// Version or release of the source
    pub source_version: Option<String>,

    /// Scientific name of the species of all entries
    pub species: Option<String>,

    /// NCBI taxonomy id of all entries; must be a string or an integer
    pub ncbi_tax_id: Option<Value>,

    /// Indent nested elements by this many spaces (compact output when `None`)
    pub indent: Option<usize>,
}

impl WriterConfig {
    /// Set the document source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the document source version
    pub fn with_source_version(mut self, source_version: impl Into<String>) -> Self {
        self.source_version = Some(source_version.into());
        self
    }

    /// Set the document species
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Set the document taxonomy id
    pub fn with_ncbi_tax_id(mut self, tax_id: impl Into<Value>) -> Self {
        self.ncbi_tax_id = Some(tax_id.into());
        self
    }

    /// Pretty-print with the given indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Reuse the document-level metadata of a parsed document
    pub fn from_document(document: &DocumentInfo) -> Self {
        Self {
            source: document.source.clone(),
            source_version: document.source_version.clone(),
            species: document.species_name.clone(),
            ncbi_tax_id: document.ncbi_taxid.clone().map(Value::String),
            indent: None,
        }
    }
}
