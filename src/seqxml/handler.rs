//! Push-driven SeqXML state machine
//!
//! [`ContentHandler`] receives tokenizer events one at a time and validates
//! them against the grammar of the declared version. Entries are appended to a
//! caller-owned queue when they open and filled in as their fields arrive, so
//! the newest record in the queue may still be incomplete.
//!
//! ```text
//! AwaitingRoot --<seqXML>--> AwaitingEntry --<entry>--> InEntry --</entry>--> AwaitingEntry
//!                                  |                     |  ^
//!                             </seqXML>            <field>  </field>
//!                                  v                     v  |
//!                                 Done                  InEntry(field open)
//! ```

use std::collections::VecDeque;

use log::{debug, trace};
use serde::Serialize;

use super::tokenizer::{QualifiedName, XmlEvent};
use super::version::{
    check_tax_id, FieldKind, MoleculeKind, SeqXmlVersion, ENTRY_ELEMENT, ROOT_ELEMENT, XSI_NAMESPACE,
};
use super::SeqXmlError;
use crate::record::{SeqRecord, MOLECULE_TYPE, NCBI_TAXID, ORGANISM, RESERVED_ANNOTATIONS, SOURCE};

/// Document-level metadata taken from the root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// Declared format version
    pub version: SeqXmlVersion,
    /// Source database or program
    pub source: Option<String>,
    /// Version or release of the source
    pub source_version: Option<String>,
    /// Species of all entries (0.4 only)
    pub species_name: Option<String>,
    /// NCBI taxonomy identifier of all entries (0.4 only), as written
    pub ncbi_taxid: Option<String>,
}

#[derive(Debug)]
enum ParseState {
    AwaitingRoot,
    AwaitingEntry,
    InEntry(EntryState),
    Done,
}

#[derive(Debug, Default)]
struct EntryState {
    sequence_seen: bool,
    field: Option<OpenField>,
}

#[derive(Debug)]
struct OpenField {
    element: &'static str,
    state: FieldState,
}

#[derive(Debug)]
enum FieldState {
    Species,
    Description { text: String },
    Sequence { kind: MoleculeKind, text: String },
    CrossReference { dbxref: String, text: String },
    Property,
}

impl OpenField {
    /// Character data buffer, if this field accepts text
    fn accumulator(&mut self) -> Option<&mut String> {
        match &mut self.state {
            FieldState::Description { text }
            | FieldState::Sequence { text, .. }
            | FieldState::CrossReference { text, .. } => Some(text),
            FieldState::Species | FieldState::Property => None,
        }
    }
}

/// Validating SeqXML event handler
#[derive(Debug)]
pub struct ContentHandler {
    state: ParseState,
    document: Option<DocumentInfo>,
}

impl Default for ContentHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHandler {
    /// Create a handler waiting for the root element
    pub fn new() -> Self {
        Self {
            state: ParseState::AwaitingRoot,
            document: None,
        }
    }

    /// Document metadata, available once the root element was read
    pub fn document(&self) -> Option<&DocumentInfo> {
        self.document.as_ref()
    }

    /// Whether the root element has been closed
    pub fn is_done(&self) -> bool {
        matches!(self.state, ParseState::Done)
    }

    /// Whether an entry is currently open
    pub fn entry_open(&self) -> bool {
        matches!(self.state, ParseState::InEntry(_))
    }

    /// Name of the innermost open element, for diagnostics
    pub fn open_element(&self) -> &'static str {
        match &self.state {
            ParseState::AwaitingRoot => "document",
            ParseState::AwaitingEntry => ROOT_ELEMENT,
            ParseState::InEntry(entry) => entry
                .field
                .as_ref()
                .map(|f| f.element)
                .unwrap_or(ENTRY_ELEMENT),
            ParseState::Done => "document",
        }
    }

    /// Process one tokenizer event.
    ///
    /// New entries are pushed to the back of `records`; the back record is the
    /// one being populated while an entry is open.
    pub fn handle(
        &mut self,
        event: XmlEvent,
        records: &mut VecDeque<SeqRecord>,
    ) -> Result<(), SeqXmlError> {
        trace!("{:?}", event);
        match event {
            XmlEvent::Start { name, attributes } => self.start_element(name, attributes, records),
            XmlEvent::End { name } => self.end_element(name, records),
            XmlEvent::Characters(data) => self.characters(data),
            XmlEvent::Eof => Ok(()),
        }
    }

    fn start_element(
        &mut self,
        name: QualifiedName,
        attributes: Vec<(QualifiedName, String)>,
        records: &mut VecDeque<SeqRecord>,
    ) -> Result<(), SeqXmlError> {
        match &mut self.state {
            ParseState::AwaitingRoot => {
                let document = start_root(&name, attributes)?;
                debug!(
                    "seqXML version {} (source: {:?})",
                    document.version, document.source
                );
                self.document = Some(document);
                self.state = ParseState::AwaitingEntry;
            }
            ParseState::AwaitingEntry => {
                let document = self.document.as_ref().ok_or(SeqXmlError::MissingVersion)?;
                let record = start_entry(document, &name, attributes)?;
                trace!("opened entry '{}'", record.id);
                records.push_back(record);
                self.state = ParseState::InEntry(EntryState::default());
            }
            ParseState::InEntry(entry) => {
                if let Some(open) = &entry.field {
                    return Err(SeqXmlError::UnexpectedElement {
                        expected: format!("</{}>", open.element),
                        found: name.to_string(),
                    });
                }
                let version = self
                    .document
                    .as_ref()
                    .map(|d| d.version)
                    .ok_or(SeqXmlError::MissingVersion)?;
                let record = records.back_mut().ok_or_else(|| {
                    SeqXmlError::UnexpectedElement {
                        expected: format!("<{}>", ENTRY_ELEMENT),
                        found: name.to_string(),
                    }
                })?;
                let open = start_field(version, entry.sequence_seen, &name, attributes, record)?;
                entry.field = Some(open);
            }
            ParseState::Done => return Err(SeqXmlError::TrailingContent),
        }
        Ok(())
    }

    fn end_element(
        &mut self,
        name: QualifiedName,
        records: &mut VecDeque<SeqRecord>,
    ) -> Result<(), SeqXmlError> {
        match &mut self.state {
            ParseState::AwaitingRoot => Err(SeqXmlError::UnexpectedEnd {
                expected: ROOT_ELEMENT.to_string(),
                found: name.to_string(),
            }),
            ParseState::AwaitingEntry => {
                expect_end(&name, ROOT_ELEMENT)?;
                self.state = ParseState::Done;
                Ok(())
            }
            ParseState::InEntry(entry) => {
                let record = records.back_mut().ok_or_else(|| SeqXmlError::UnexpectedEnd {
                    expected: ROOT_ELEMENT.to_string(),
                    found: name.to_string(),
                })?;
                match entry.field.take() {
                    Some(open) => {
                        expect_end(&name, open.element)?;
                        if matches!(open.state, FieldState::Sequence { .. }) {
                            entry.sequence_seen = true;
                        }
                        end_field(open, record)
                    }
                    None => {
                        expect_end(&name, ENTRY_ELEMENT)?;
                        let blank = record.seq.iter().all(u8::is_ascii_whitespace);
                        if !entry.sequence_seen || blank {
                            return Err(SeqXmlError::MissingSequence(record.id.clone()));
                        }
                        trace!("closed entry '{}'", record.id);
                        self.state = ParseState::AwaitingEntry;
                        Ok(())
                    }
                }
            }
            ParseState::Done => Err(SeqXmlError::TrailingContent),
        }
    }

    fn characters(&mut self, data: String) -> Result<(), SeqXmlError> {
        if let ParseState::InEntry(EntryState {
            field: Some(open), ..
        }) = &mut self.state
        {
            let element = open.element;
            return match open.accumulator() {
                Some(buffer) => {
                    buffer.push_str(&data);
                    Ok(())
                }
                None => ignore_blank(element, data),
            };
        }
        ignore_blank(self.open_element(), data)
    }
}

/// Stray whitespace is tolerated anywhere; anything else is an error
fn ignore_blank(element: &str, data: String) -> Result<(), SeqXmlError> {
    if data.trim().is_empty() {
        Ok(())
    } else {
        Err(SeqXmlError::UnexpectedData {
            element: element.to_string(),
            data,
        })
    }
}

fn expect_end(name: &QualifiedName, expected: &str) -> Result<(), SeqXmlError> {
    if let Some(namespace) = &name.namespace {
        return Err(SeqXmlError::UnexpectedNamespace {
            name: format!("</{}>", name.local),
            namespace: namespace.clone(),
        });
    }
    if name.local != expected {
        return Err(SeqXmlError::UnexpectedEnd {
            expected: expected.to_string(),
            found: name.local.clone(),
        });
    }
    Ok(())
}

fn expect_unqualified(name: &QualifiedName) -> Result<(), SeqXmlError> {
    match &name.namespace {
        Some(namespace) => Err(SeqXmlError::UnexpectedNamespace {
            name: name.local.clone(),
            namespace: namespace.clone(),
        }),
        None => Ok(()),
    }
}

/// Split attributes into unqualified ones, rejecting any namespaced attribute
fn plain_attributes(
    element: &str,
    attributes: Vec<(QualifiedName, String)>,
) -> Result<Vec<(String, String)>, SeqXmlError> {
    attributes
        .into_iter()
        .map(|(key, value)| match key.namespace {
            None => Ok((key.local, value)),
            Some(namespace) => Err(SeqXmlError::UnexpectedNamespace {
                name: format!("attribute '{}' of {}", key.local, element),
                namespace,
            }),
        })
        .collect()
}

fn start_root(
    name: &QualifiedName,
    attributes: Vec<(QualifiedName, String)>,
) -> Result<DocumentInfo, SeqXmlError> {
    expect_unqualified(name)?;
    if name.local != ROOT_ELEMENT {
        return Err(SeqXmlError::UnexpectedElement {
            expected: format!("<{}>", ROOT_ELEMENT),
            found: name.local.clone(),
        });
    }

    let mut version = None;
    let mut source = None;
    let mut source_version = None;
    let mut species_name = None;
    let mut ncbi_taxid = None;
    let mut schema = None;

    for (key, value) in attributes {
        match key.namespace.as_deref() {
            None => match key.local.as_str() {
                "seqXMLversion" => version = Some(value),
                "source" => source = Some(value),
                "sourceVersion" => source_version = Some(value),
                "speciesName" => species_name = Some(value),
                "ncbiTaxID" => {
                    check_tax_id(&value)?;
                    ncbi_taxid = Some(value);
                }
                other => return Err(SeqXmlError::unexpected_attribute(ROOT_ELEMENT, other)),
            },
            Some(XSI_NAMESPACE) => match key.local.as_str() {
                "noNamespaceSchemaLocation" => schema = Some(value),
                other => {
                    return Err(SeqXmlError::unexpected_attribute(
                        ROOT_ELEMENT,
                        &format!("xsi:{}", other),
                    ))
                }
            },
            Some(namespace) => {
                return Err(SeqXmlError::UnexpectedNamespace {
                    name: format!("attribute '{}' of {}", key.local, ROOT_ELEMENT),
                    namespace: namespace.to_string(),
                })
            }
        }
    }

    let version: SeqXmlVersion = version.ok_or(SeqXmlError::MissingVersion)?.parse()?;

    if let Some(schema) = schema {
        if schema != version.schema_url() {
            return Err(SeqXmlError::SchemaMismatch {
                schema,
                version: version.to_string(),
            });
        }
    }

    if !version.allows_root_species() {
        let present = [
            ("speciesName", species_name.is_some()),
            ("ncbiTaxID", ncbi_taxid.is_some()),
        ];
        if let Some((attribute, _)) = present.iter().find(|(_, present)| *present) {
            return Err(SeqXmlError::VersionIncompatible {
                element: ROOT_ELEMENT.to_string(),
                attribute: attribute.to_string(),
                version: version.to_string(),
            });
        }
    }

    Ok(DocumentInfo {
        version,
        source,
        source_version,
        species_name,
        ncbi_taxid,
    })
}

fn start_entry(
    document: &DocumentInfo,
    name: &QualifiedName,
    attributes: Vec<(QualifiedName, String)>,
) -> Result<SeqRecord, SeqXmlError> {
    expect_unqualified(name)?;
    if name.local != ENTRY_ELEMENT {
        return Err(SeqXmlError::UnexpectedElement {
            expected: format!("<{}>", ENTRY_ELEMENT),
            found: name.local.clone(),
        });
    }

    let mut id = None;
    let mut source = document.source.clone();
    for (key, value) in plain_attributes(ENTRY_ELEMENT, attributes)? {
        match key.as_str() {
            "id" => id = Some(value),
            "source" if document.version.allows_entry_source() => source = Some(value),
            "source" => {
                return Err(SeqXmlError::VersionIncompatible {
                    element: ENTRY_ELEMENT.to_string(),
                    attribute: "source".to_string(),
                    version: document.version.to_string(),
                })
            }
            _ => return Err(SeqXmlError::unexpected_attribute(ENTRY_ELEMENT, &key)),
        }
    }

    let id = id.ok_or_else(|| SeqXmlError::missing_attribute(ENTRY_ELEMENT, "id"))?;
    if id.is_empty() {
        return Err(SeqXmlError::MissingIdentifier);
    }

    let mut record = SeqRecord::new(id, Vec::new());
    if let Some(species) = &document.species_name {
        record.annotations.insert(ORGANISM.to_string(), species.clone().into());
    }
    if let Some(taxid) = &document.ncbi_taxid {
        record.annotations.insert(NCBI_TAXID.to_string(), taxid.clone().into());
    }
    if let Some(source) = source {
        record.annotations.insert(SOURCE.to_string(), source.into());
    }
    Ok(record)
}

fn start_field(
    version: SeqXmlVersion,
    sequence_seen: bool,
    name: &QualifiedName,
    attributes: Vec<(QualifiedName, String)>,
    record: &mut SeqRecord,
) -> Result<OpenField, SeqXmlError> {
    expect_unqualified(name)?;
    let kind = version
        .field_kind(&name.local)
        .ok_or_else(|| SeqXmlError::UnexpectedElement {
            expected: format!("a field of entry '{}'", record.id),
            found: name.local.clone(),
        })?;
    let element = version.field_element(kind);
    let attributes = plain_attributes(element, attributes)?;

    let state = match kind {
        FieldKind::Species => {
            start_species(element, attributes, record)?;
            FieldState::Species
        }
        FieldKind::Description => {
            reject_attributes(element, &attributes)?;
            FieldState::Description {
                text: String::new(),
            }
        }
        FieldKind::Sequence(kind) => {
            if sequence_seen {
                return Err(SeqXmlError::UnexpectedElement {
                    expected: format!("at most one sequence in entry '{}'", record.id),
                    found: element.to_string(),
                });
            }
            reject_attributes(element, &attributes)?;
            FieldState::Sequence {
                kind,
                text: String::new(),
            }
        }
        FieldKind::CrossReference => FieldState::CrossReference {
            dbxref: start_cross_reference(version, element, attributes)?,
            text: String::new(),
        },
        FieldKind::Property => {
            start_property(element, attributes, record)?;
            FieldState::Property
        }
    };
    Ok(OpenField { element, state })
}

fn reject_attributes(element: &str, attributes: &[(String, String)]) -> Result<(), SeqXmlError> {
    match attributes.first() {
        Some((key, _)) => Err(SeqXmlError::unexpected_attribute(element, key)),
        None => Ok(()),
    }
}

fn start_species(
    element: &str,
    attributes: Vec<(String, String)>,
    record: &mut SeqRecord,
) -> Result<(), SeqXmlError> {
    let mut species = None;
    let mut taxid = None;
    for (key, value) in attributes {
        match key.as_str() {
            "name" => species = Some(value),
            "ncbiTaxID" => {
                check_tax_id(&value)?;
                taxid = Some(value);
            }
            _ => return Err(SeqXmlError::unexpected_attribute(element, &key)),
        }
    }
    let species = species.ok_or_else(|| SeqXmlError::missing_attribute(element, "name"))?;
    let taxid = taxid.ok_or_else(|| SeqXmlError::missing_attribute(element, "ncbiTaxID"))?;
    record.annotations.insert(ORGANISM.to_string(), species.into());
    record.annotations.insert(NCBI_TAXID.to_string(), taxid.into());
    Ok(())
}

fn start_cross_reference(
    version: SeqXmlVersion,
    element: &str,
    attributes: Vec<(String, String)>,
) -> Result<String, SeqXmlError> {
    let mut ref_type = None;
    let mut source = None;
    let mut id = None;
    for (key, value) in attributes {
        match key.as_str() {
            "type" => ref_type = Some(value),
            "source" => source = Some(value),
            "id" => id = Some(value),
            _ => return Err(SeqXmlError::unexpected_attribute(element, &key)),
        }
    }
    let source = source.ok_or_else(|| SeqXmlError::missing_attribute(element, "source"))?;
    let id = id.ok_or_else(|| SeqXmlError::missing_attribute(element, "id"))?;
    if ref_type.is_none() && version.requires_dbref_type() {
        return Err(SeqXmlError::missing_attribute(element, "type"));
    }
    Ok(format!("{}:{}", source, id))
}

fn start_property(
    element: &str,
    attributes: Vec<(String, String)>,
    record: &mut SeqRecord,
) -> Result<(), SeqXmlError> {
    let mut name = None;
    let mut value = None;
    for (key, attr_value) in attributes {
        match key.as_str() {
            "name" => name = Some(attr_value),
            "value" => value = Some(attr_value),
            _ => return Err(SeqXmlError::unexpected_attribute(element, &key)),
        }
    }
    let name = name.ok_or_else(|| SeqXmlError::missing_attribute(element, "name"))?;
    if RESERVED_ANNOTATIONS.contains(&name.as_str()) {
        return Err(SeqXmlError::ReservedProperty {
            name,
            entry: record.id.clone(),
        });
    }

    if name != MOLECULE_TYPE {
        record.push_annotation(&name, value);
        return Ok(());
    }

    // Refines the coarse DNA/RNA/protein type set by the sequence element
    let coarse = record.molecule_type().ok_or_else(|| {
        SeqXmlError::InvalidMoleculeType(format!(
            "property '{}' found before the sequence of entry '{}'",
            MOLECULE_TYPE, record.id
        ))
    })?;
    let refined = value.ok_or_else(|| {
        SeqXmlError::InvalidMoleculeType(format!(
            "property '{}' of entry '{}' has no value",
            MOLECULE_TYPE, record.id
        ))
    })?;
    if !refined.contains(coarse) {
        return Err(SeqXmlError::InvalidMoleculeType(format!(
            "'{}' is inconsistent with sequence type '{}' in entry '{}'",
            refined, coarse, record.id
        )));
    }
    record
        .annotations
        .insert(MOLECULE_TYPE.to_string(), refined.into());
    Ok(())
}

fn end_field(open: OpenField, record: &mut SeqRecord) -> Result<(), SeqXmlError> {
    match open.state {
        FieldState::Species | FieldState::Property => {}
        FieldState::Description { text } => {
            if !text.trim().is_empty() {
                record.description = Some(text);
            }
        }
        FieldState::Sequence { kind, text } => {
            record
                .annotations
                .insert(MOLECULE_TYPE.to_string(), kind.as_str().into());
            record.seq = text.into_bytes();
        }
        FieldState::CrossReference { dbxref, text } => {
            if !text.is_empty() {
                return Err(SeqXmlError::UnexpectedData {
                    element: open.element.to_string(),
                    data: text,
                });
            }
            record.add_dbxref(dbxref);
        }
    }
    Ok(())
}
