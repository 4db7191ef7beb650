//! Version-dependent grammar of SeqXML
//!
//! The four published versions differ only in a handful of attribute rules and,
//! for 0.1, in the element names used inside an entry. Everything version
//! specific lives here so the parser and writer can stay table driven.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SeqXmlError;

/// Namespace of the `xsi:noNamespaceSchemaLocation` attribute
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Name of the document root element
pub const ROOT_ELEMENT: &str = "seqXML";

/// Name of the entry element
pub const ENTRY_ELEMENT: &str = "entry";

/// Supported SeqXML versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeqXmlVersion {
    /// Version 0.1
    #[serde(rename = "0.1")]
    V0_1,
    /// Version 0.2
    #[serde(rename = "0.2")]
    V0_2,
    /// Version 0.3
    #[serde(rename = "0.3")]
    V0_3,
    /// Version 0.4
    #[serde(rename = "0.4")]
    V0_4,
}

impl SeqXmlVersion {
    /// Newest supported version; always used when writing
    pub const LATEST: SeqXmlVersion = SeqXmlVersion::V0_4;

    /// All supported versions, oldest first
    pub const ALL: [SeqXmlVersion; 4] = [
        SeqXmlVersion::V0_1,
        SeqXmlVersion::V0_2,
        SeqXmlVersion::V0_3,
        SeqXmlVersion::V0_4,
    ];

    /// Version string as written in the `seqXMLversion` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            SeqXmlVersion::V0_1 => "0.1",
            SeqXmlVersion::V0_2 => "0.2",
            SeqXmlVersion::V0_3 => "0.3",
            SeqXmlVersion::V0_4 => "0.4",
        }
    }

    /// Canonical schema location for this version
    pub fn schema_url(self) -> String {
        format!("http://www.seqxml.org/{}/seqxml.xsd", self.as_str())
    }

    /// Whether `speciesName`/`ncbiTaxID` may appear on the root element
    pub fn allows_root_species(self) -> bool {
        self == SeqXmlVersion::V0_4
    }

    /// Whether an entry may override the document `source`
    pub fn allows_entry_source(self) -> bool {
        matches!(self, SeqXmlVersion::V0_3 | SeqXmlVersion::V0_4)
    }

    /// Whether cross-reference elements must carry a `type` attribute
    pub fn requires_dbref_type(self) -> bool {
        matches!(self, SeqXmlVersion::V0_2 | SeqXmlVersion::V0_3)
    }

    /// Element table used inside an entry
    fn field_table(self) -> &'static [(&'static str, FieldKind)] {
        match self {
            SeqXmlVersion::V0_1 => FIELDS_V0_1,
            _ => FIELDS,
        }
    }

    /// Look up which entry field an element name denotes
    pub fn field_kind(self, local_name: &str) -> Option<FieldKind> {
        self.field_table()
            .iter()
            .find(|(name, _)| *name == local_name)
            .map(|(_, kind)| *kind)
    }

    /// Element name of a field kind in this version
    pub fn field_element(self, kind: FieldKind) -> &'static str {
        self.field_table()
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

impl fmt::Display for SeqXmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeqXmlVersion {
    type Err = SeqXmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeqXmlVersion::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SeqXmlError::UnsupportedVersion(s.to_string()))
    }
}

/// Coarse molecule classification of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoleculeKind {
    /// Deoxyribonucleic acid
    Dna,
    /// Ribonucleic acid
    Rna,
    /// Amino acid sequence
    Protein,
}

impl MoleculeKind {
    /// Coarse molecule type text stored in the `molecule_type` annotation
    pub fn as_str(self) -> &'static str {
        match self {
            MoleculeKind::Dna => "DNA",
            MoleculeKind::Rna => "RNA",
            MoleculeKind::Protein => "protein",
        }
    }

    /// Classify a (possibly refined) molecule type such as "genomic DNA" or "mRNA".
    ///
    /// "DNA" is checked before "RNA", which is checked before "protein".
    pub fn from_molecule_type(molecule_type: &str) -> Option<Self> {
        [MoleculeKind::Dna, MoleculeKind::Rna, MoleculeKind::Protein]
            .into_iter()
            .find(|kind| molecule_type.contains(kind.as_str()))
    }

    /// Sequence element name used by the writer (version 0.2 onwards)
    pub fn element_name(self) -> &'static str {
        SeqXmlVersion::LATEST.field_element(FieldKind::Sequence(self))
    }
}

impl fmt::Display for MoleculeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of child element an entry may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `species` element with `name` and `ncbiTaxID`
    Species,
    /// `description` element with text content
    Description,
    /// Sequence element with residues as text content
    Sequence(MoleculeKind),
    /// Database cross-reference (`DBRef`, `alternativeID` in 0.1)
    CrossReference,
    /// `property` element with `name` and optional `value`
    Property,
}

const FIELDS_V0_1: &[(&str, FieldKind)] = &[
    ("species", FieldKind::Species),
    ("description", FieldKind::Description),
    ("dnaSeq", FieldKind::Sequence(MoleculeKind::Dna)),
    ("rnaSeq", FieldKind::Sequence(MoleculeKind::Rna)),
    ("aaSeq", FieldKind::Sequence(MoleculeKind::Protein)),
    ("alternativeID", FieldKind::CrossReference),
    ("property", FieldKind::Property),
];

const FIELDS: &[(&str, FieldKind)] = &[
    ("species", FieldKind::Species),
    ("description", FieldKind::Description),
    ("DNAseq", FieldKind::Sequence(MoleculeKind::Dna)),
    ("RNAseq", FieldKind::Sequence(MoleculeKind::Rna)),
    ("AAseq", FieldKind::Sequence(MoleculeKind::Protein)),
    ("DBRef", FieldKind::CrossReference),
    ("property", FieldKind::Property),
];

/// Check that a taxonomy id is an optionally signed run of digits.
///
/// Only the form is checked, so ids beyond any machine integer still pass and
/// the original text is kept by the caller.
pub(crate) fn check_tax_id(value: &str) -> Result<(), SeqXmlError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SeqXmlError::InvalidTaxId(value.to_string()));
    }
    Ok(())
}
