//! # seqxml - Streaming SeqXML Reader and Writer
//!
//! `seqxml` reads and writes SeqXML, the XML exchange format for DNA, RNA and
//! protein sequences together with their species, descriptions, database
//! cross-references and free-form properties.
//!
//! ## Key Features
//!
//! - **Incremental Parsing**: Input is consumed in blocks and each record is
//!   handed out as soon as it is complete, so memory use does not grow with
//!   the size of the document.
//!
//! - **All Published Versions**: Documents declaring versions 0.1 through 0.4
//!   are read with the element names and attribute rules of their version.
//!
//! - **Strict Validation**: Unknown elements, misplaced attributes, missing
//!   sequences and schema mismatches are reported as typed errors.
//!
//! - **Round-Trip Writer**: Records are written as SeqXML 0.4, with document
//!   defaults for source and species factored out of the entries.
//!
//! ## Quick Start - Reading
//!
//! ```rust,no_run
//! use seqxml::seqxml::{ReaderConfig, SeqXmlReader};
//!
//! let reader = SeqXmlReader::open("proteins.xml", ReaderConfig::default())?;
//! println!("seqXML {}", reader.metadata().version);
//!
//! for record in reader.records() {
//!     let record = record?;
//!     println!("{}\t{} residues", record.id, record.seq.len());
//! }
//! # Ok::<(), seqxml::seqxml::SeqXmlError>(())
//! ```
//!
//! ## Quick Start - Writing
//!
//! ```rust,no_run
//! use seqxml::record::{SeqRecord, MOLECULE_TYPE};
//! use seqxml::seqxml::{SeqXmlWriter, WriterConfig};
//!
//! let records = vec![
//!     SeqRecord::new("P12345", "MKVLAAGIV")
//!         .with_description("Example protein")
//!         .with_dbxref("UniProtKB:P12345")
//!         .with_annotation(MOLECULE_TYPE, "protein"),
//! ];
//!
//! let config = WriterConfig::default()
//!     .with_source("UniProt")
//!     .with_species("Homo sapiens")
//!     .with_ncbi_tax_id(9606);
//! let mut writer = SeqXmlWriter::create("out.xml", config)?;
//! writer.write_file(&records)?;
//! # Ok::<(), seqxml::seqxml::SeqXmlError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`record`]: The sequence record type shared by reader and writer
//! - [`seqxml`]: Tokenizer adapter, parse state machine, reader and writer

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod record;
pub mod seqxml;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::record::{Annotations, SeqRecord};
    pub use crate::seqxml::{
        parse_str, ErrorCategory, ReaderConfig, SeqXmlError, SeqXmlReader, SeqXmlVersion,
        SeqXmlWriter, WriterConfig,
    };
}
