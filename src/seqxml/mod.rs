//! # SeqXML Module
//!
//! Streaming parsing and writing of SeqXML, the XML exchange format for
//! biological sequences (<http://www.seqxml.org>).
//!
//! ## Design Goals
//!
//! - **Streaming**: Records are handed out as soon as they are complete
//! - **Incremental**: Input is consumed in fixed-size blocks, never whole
//! - **Strict**: Every structural or content violation is a typed error
//! - **Versioned**: Reads 0.1 through 0.4, writes 0.4
//!
//! ## SeqXML Structure
//!
//! ```text
//! seqXML (seqXMLversion, source?, sourceVersion?, speciesName?, ncbiTaxID?)
//! └── entry* (id, source?)
//!     ├── species? (name, ncbiTaxID)
//!     ├── description?
//!     ├── DNAseq | RNAseq | AAseq
//!     ├── DBRef* (source, id, type?)
//!     └── property* (name, value?)
//! ```
//!
//! In version 0.1 the sequence elements are `dnaSeq`, `rnaSeq` and `aaSeq`
//! and cross-references are `alternativeID`.
//!
//! ## Pipeline
//!
//! [`XmlTokenizer`] turns bytes into [`XmlEvent`]s, the [`ContentHandler`]
//! state machine turns events into [`SeqRecord`](crate::record::SeqRecord)s,
//! and [`SeqXmlReader`] drives both and releases finished records.

mod error;
mod handler;
mod reader;
mod tokenizer;
mod version;
mod writer;

pub use error::{ErrorCategory, SeqXmlError};
pub use handler::{ContentHandler, DocumentInfo};
pub use reader::{parse_str, ReaderConfig, RecordIterator, SeqXmlReader, DEFAULT_BLOCK_SIZE};
pub use tokenizer::{QualifiedName, XmlEvent, XmlTokenizer};
pub use version::{
    FieldKind, MoleculeKind, SeqXmlVersion, ENTRY_ELEMENT, ROOT_ELEMENT, XSI_NAMESPACE,
};
pub use writer::{SeqXmlWriter, WriterConfig, WriterPhase};
