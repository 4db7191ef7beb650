//! Sequence record model
//!
//! A [`SeqRecord`] is one sequence plus its metadata: identifier, residues,
//! free-text description, database cross-references and an ordered map of
//! annotations. Annotation values are JSON values so that both the parser
//! (which produces strings and lists of strings) and callers assembling
//! records by hand (integers, floats, nulls) share one representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered annotation map
pub type Annotations = serde_json::Map<String, Value>;

/// Annotation key holding the molecule type ("DNA", "genomic DNA", "mRNA", ...)
pub const MOLECULE_TYPE: &str = "molecule_type";

/// Annotation key holding the scientific species name
pub const ORGANISM: &str = "organism";

/// Annotation key holding the NCBI taxonomy identifier
pub const NCBI_TAXID: &str = "ncbi_taxid";

/// Annotation key holding the source database of the entry
pub const SOURCE: &str = "source";

/// Annotations stored in entry attributes and the species element rather than
/// as properties
pub const RESERVED_ANNOTATIONS: [&str; 3] = [ORGANISM, NCBI_TAXID, SOURCE];

/// Placeholder identifier used by records that were never given one
pub const UNKNOWN_ID: &str = "<unknown id>";

/// Placeholder description used by records that were never given one
pub const UNKNOWN_DESCRIPTION: &str = "<unknown description>";

/// A biological sequence with its identifier and annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeqRecord {
    /// Entry identifier
    pub id: String,

    /// Raw residues
    pub seq: Vec<u8>,

    /// Free-text description
    pub description: Option<String>,

    /// Cross-references of the form `source:id`
    pub dbxrefs: Vec<String>,

    /// Named annotations, in order of first insertion
    pub annotations: Annotations,
}

impl SeqRecord {
    /// Create a record with an identifier and sequence
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            seq: seq.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a cross-reference (ignored if already present)
    pub fn with_dbxref(mut self, dbxref: impl Into<String>) -> Self {
        self.add_dbxref(dbxref);
        self
    }

    /// Set an annotation, replacing any previous value
    pub fn with_annotation(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.annotations.insert(name.into(), value.into());
        self
    }

    /// Append a cross-reference unless it is already present.
    ///
    /// Returns `true` if the cross-reference was added.
    pub fn add_dbxref(&mut self, dbxref: impl Into<String>) -> bool {
        let dbxref = dbxref.into();
        if self.dbxrefs.contains(&dbxref) {
            return false;
        }
        self.dbxrefs.push(dbxref);
        true
    }

    /// Append a value to a list-valued annotation, creating the list if needed.
    ///
    /// A missing value is stored as `null`. If the annotation already holds a
    /// scalar it is turned into a list first.
    pub fn push_annotation(&mut self, name: &str, value: Option<String>) {
        let value = value.map(Value::String).unwrap_or(Value::Null);
        match self.annotations.get_mut(name) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, value]);
            }
            None => {
                self.annotations
                    .insert(name.to_string(), Value::Array(vec![value]));
            }
        }
    }

    /// Molecule type annotation, if it is a string
    pub fn molecule_type(&self) -> Option<&str> {
        self.annotations.get(MOLECULE_TYPE).and_then(Value::as_str)
    }

    /// Organism annotation, if it is a string
    pub fn organism(&self) -> Option<&str> {
        self.annotations.get(ORGANISM).and_then(Value::as_str)
    }

    /// Taxonomy identifier annotation, if it is a string
    pub fn ncbi_taxid(&self) -> Option<&str> {
        self.annotations.get(NCBI_TAXID).and_then(Value::as_str)
    }

    /// Source annotation, if it is a string
    pub fn source(&self) -> Option<&str> {
        self.annotations.get(SOURCE).and_then(Value::as_str)
    }

    /// Sequence as text, if it is valid UTF-8
    pub fn seq_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.seq).ok()
    }
}
