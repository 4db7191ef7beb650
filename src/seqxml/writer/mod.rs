//! # SeqXML Writer
//!
//! [`SeqXmlWriter`] serializes [`SeqRecord`]s as a SeqXML 0.4 document.
//!
//! A document is written in three phases: the header (root element with the
//! document metadata), any number of records, and the footer. Calling the
//! methods out of order fails with [`SeqXmlError::InvalidState`].
//!
//! Each record is fully validated before any of its elements are emitted, so
//! a rejected record leaves no partial entry in the output.
//!
//! ```rust
//! use seqxml::record::{SeqRecord, MOLECULE_TYPE};
//! use seqxml::seqxml::{SeqXmlWriter, WriterConfig};
//!
//! let record = SeqRecord::new("seq1", "ACGT").with_annotation(MOLECULE_TYPE, "DNA");
//!
//! let mut writer = SeqXmlWriter::new(Vec::new(), WriterConfig::default().with_source("demo"));
//! writer.write_file([&record])?;
//! let xml = String::from_utf8(writer.into_inner()).unwrap();
//! assert!(xml.contains("<DNAseq>ACGT</DNAseq>"));
//! # Ok::<(), seqxml::seqxml::SeqXmlError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use super::version::{check_tax_id, MoleculeKind, SeqXmlVersion, ENTRY_ELEMENT, ROOT_ELEMENT, XSI_NAMESPACE};
use super::SeqXmlError;
use crate::record::{
    SeqRecord, MOLECULE_TYPE, NCBI_TAXID, ORGANISM, RESERVED_ANNOTATIONS, SOURCE,
    UNKNOWN_DESCRIPTION, UNKNOWN_ID,
};

pub use config::WriterConfig;

mod config;

#[cfg(test)]
mod tests;

/// Progress of a document being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    /// Nothing written yet
    Created,
    /// Root element open; records may be written
    HeaderWritten,
    /// Root element closed
    Finished,
}

/// Streaming SeqXML writer
pub struct SeqXmlWriter<W: Write> {
    writer: Writer<W>,
    config: WriterConfig,
    /// Document taxonomy id as text, validated by `write_header`
    tax_id: Option<String>,
    phase: WriterPhase,
    records_written: usize,
}

impl SeqXmlWriter<BufWriter<File>> {
    /// Create a new file and write to it
    pub fn create<P: AsRef<Path>>(path: P, config: WriterConfig) -> Result<Self, SeqXmlError> {
        let file = File::create(path.as_ref())?;
        debug!("Writing seqXML to {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file), config))
    }
}

impl<W: Write> SeqXmlWriter<W> {
    /// Create a writer over a sink
    pub fn new(sink: W, config: WriterConfig) -> Self {
        let writer = match config.indent {
            Some(indent) => Writer::new_with_indent(sink, b' ', indent),
            None => Writer::new(sink),
        };
        Self {
            writer,
            config,
            tax_id: None,
            phase: WriterPhase::Created,
            records_written: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> WriterPhase {
        self.phase
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Writer settings
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write the XML declaration and open the root element
    pub fn write_header(&mut self) -> Result<(), SeqXmlError> {
        self.expect_phase(WriterPhase::Created, "write_header")?;

        let tax_id = match &self.config.ncbi_tax_id {
            Some(value) => tax_id_text("ncbiTaxID", value)?,
            None => None,
        };

        let version = SeqXmlVersion::LATEST;
        let schema = version.schema_url();
        let mut root = BytesStart::new(ROOT_ELEMENT);
        root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        root.push_attribute(("xsi:noNamespaceSchemaLocation", schema.as_str()));
        root.push_attribute(("seqXMLversion", version.as_str()));
        if let Some(source) = &self.config.source {
            root.push_attribute(("source", source.as_str()));
        }
        if let Some(source_version) = &self.config.source_version {
            root.push_attribute(("sourceVersion", source_version.as_str()));
        }
        if let Some(species) = &self.config.species {
            root.push_attribute(("speciesName", species.as_str()));
        }
        if let Some(tax_id) = &tax_id {
            root.push_attribute(("ncbiTaxID", tax_id.as_str()));
        }

        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.writer.write_event(Event::Start(root))?;
        self.tax_id = tax_id;
        self.phase = WriterPhase::HeaderWritten;
        Ok(())
    }

    /// Write one record as an entry element
    pub fn write_record(&mut self, record: &SeqRecord) -> Result<(), SeqXmlError> {
        self.expect_phase(WriterPhase::HeaderWritten, "write_record")?;
        let events = render_record(&self.config, self.tax_id.as_deref(), record)?;
        for event in events {
            self.writer.write_event(event)?;
        }
        self.records_written += 1;
        Ok(())
    }

    /// Close the root element and flush the sink
    pub fn write_footer(&mut self) -> Result<(), SeqXmlError> {
        self.expect_phase(WriterPhase::HeaderWritten, "write_footer")?;
        self.writer
            .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
        self.writer.get_mut().flush()?;
        self.phase = WriterPhase::Finished;
        info!("Wrote {} seqXML records", self.records_written);
        Ok(())
    }

    /// Write a complete document: header, all records and footer.
    ///
    /// Returns the number of records written.
    pub fn write_file<'a, I>(&mut self, records: I) -> Result<usize, SeqXmlError>
    where
        I: IntoIterator<Item = &'a SeqRecord>,
    {
        self.write_header()?;
        for record in records {
            self.write_record(record)?;
        }
        self.write_footer()?;
        Ok(self.records_written)
    }

    /// Return the underlying sink
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn expect_phase(&self, expected: WriterPhase, operation: &str) -> Result<(), SeqXmlError> {
        if self.phase != expected {
            return Err(SeqXmlError::InvalidState(format!(
                "{} requires phase {:?}, writer is in phase {:?}",
                operation, expected, self.phase
            )));
        }
        Ok(())
    }
}

/// Taxonomy id as text; accepts strings and integers only
fn tax_id_text(field: &str, value: &Value) -> Result<Option<String>, SeqXmlError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            check_tax_id(s)?;
            Ok(Some(s.clone()))
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        _ => Err(SeqXmlError::type_mismatch(field, "string or integer")),
    }
}

/// Property value text for scalar annotation values
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        _ => None,
    }
}

fn text_element(name: &'static str, text: &str) -> [Event<'static>; 3] {
    [
        Event::Start(BytesStart::new(name)),
        Event::Text(BytesText::new(text).into_owned()),
        Event::End(BytesEnd::new(name)),
    ]
}

fn property(name: &str, value: Option<&str>) -> Event<'static> {
    let mut element = BytesStart::new("property");
    element.push_attribute(("name", name));
    if let Some(value) = value {
        element.push_attribute(("value", value));
    }
    Event::Empty(element)
}

/// Validate a record and turn it into the events of one entry element
fn render_record(
    config: &WriterConfig,
    document_tax_id: Option<&str>,
    record: &SeqRecord,
) -> Result<Vec<Event<'static>>, SeqXmlError> {
    if record.id.is_empty() || record.id == UNKNOWN_ID {
        return Err(SeqXmlError::MissingIdentifier);
    }

    let mut entry = BytesStart::new(ENTRY_ELEMENT);
    entry.push_attribute(("id", record.id.as_str()));
    match record.annotations.get(SOURCE) {
        None | Some(Value::Null) => {}
        Some(Value::String(source)) => {
            if config.source.as_deref() != Some(source.as_str()) {
                entry.push_attribute(("source", source.as_str()));
            }
        }
        Some(_) => return Err(SeqXmlError::type_mismatch(SOURCE, "string")),
    }

    let mut events = vec![Event::Start(entry)];

    if let Some(species) = render_species(config, document_tax_id, record)? {
        events.push(species);
    }

    if let Some(description) = &record.description {
        if !description.is_empty() && description != UNKNOWN_DESCRIPTION {
            events.extend(text_element("description", description));
        }
    }

    if record.seq.is_empty() {
        return Err(SeqXmlError::EmptySequence(record.id.clone()));
    }
    let kind = match record.annotations.get(MOLECULE_TYPE) {
        None | Some(Value::Null) => {
            return Err(SeqXmlError::InvalidMoleculeType(format!(
                "molecule_type is not defined for record '{}'",
                record.id
            )))
        }
        Some(Value::String(molecule_type)) => MoleculeKind::from_molecule_type(molecule_type)
            .ok_or_else(|| {
                SeqXmlError::InvalidMoleculeType(format!(
                    "unknown molecule_type '{}' for record '{}'",
                    molecule_type, record.id
                ))
            })?,
        Some(_) => return Err(SeqXmlError::type_mismatch(MOLECULE_TYPE, "string")),
    };
    let seq = std::str::from_utf8(&record.seq)?;
    events.extend(text_element(kind.element_name(), seq));

    for dbxref in &record.dbxrefs {
        let (source, id) = match dbxref.split_once(':') {
            Some((source, id)) if !source.is_empty() => (source, id),
            _ => return Err(SeqXmlError::InvalidDbxref(dbxref.clone())),
        };
        let mut element = BytesStart::new("DBRef");
        element.push_attribute(("source", source));
        element.push_attribute(("id", id));
        events.push(Event::Empty(element));
    }

    for (name, value) in &record.annotations {
        if RESERVED_ANNOTATIONS.contains(&name.as_str()) {
            continue;
        }
        match value {
            Value::Null => events.push(property(name, None)),
            Value::Array(values) => {
                for value in values {
                    if value.is_null() {
                        events.push(property(name, None));
                        continue;
                    }
                    let text = scalar_text(value).ok_or_else(|| {
                        SeqXmlError::type_mismatch(
                            &format!("annotation '{}'", name),
                            "string, number, boolean or a list of those",
                        )
                    })?;
                    events.push(property(name, Some(&text)));
                }
            }
            Value::Object(_) => {
                return Err(SeqXmlError::type_mismatch(
                    &format!("annotation '{}'", name),
                    "string, number, boolean or a list of those",
                ))
            }
            scalar => {
                let text = scalar_text(scalar).unwrap_or_default();
                events.push(property(name, Some(&text)));
            }
        }
    }

    events.push(Event::End(BytesEnd::new(ENTRY_ELEMENT)));
    Ok(events)
}

/// Species element, written only when it differs from the document default
fn render_species(
    config: &WriterConfig,
    document_tax_id: Option<&str>,
    record: &SeqRecord,
) -> Result<Option<Event<'static>>, SeqXmlError> {
    let tax_id = match record.annotations.get(NCBI_TAXID) {
        None => None,
        Some(Value::Array(values)) => match values.as_slice() {
            [] => None,
            [value] => tax_id_text(NCBI_TAXID, value)?,
            _ => return Err(SeqXmlError::MultipleTaxIds(Value::Array(values.clone()).to_string())),
        },
        Some(value) => tax_id_text(NCBI_TAXID, value)?,
    };
    let Some(tax_id) = tax_id.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let organism = match record.annotations.get(ORGANISM) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(organism)) => organism,
        Some(_) => return Err(SeqXmlError::type_mismatch(ORGANISM, "string")),
    };

    if config.species.as_deref() == Some(organism.as_str())
        && document_tax_id == Some(tax_id.as_str())
    {
        return Ok(None);
    }

    let mut species = BytesStart::new("species");
    species.push_attribute(("name", organism.as_str()));
    species.push_attribute(("ncbiTaxID", tax_id.as_str()));
    Ok(Some(Event::Empty(species)))
}
