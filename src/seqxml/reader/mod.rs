//! Streaming SeqXML reader
//!
//! [`SeqXmlReader`] pulls chunks from a byte source, pushes the resulting
//! tokenizer events through the [`ContentHandler`] and hands out completed
//! records in document order.
//!
//! The handler appends a record to the queue as soon as its `<entry>` opens,
//! so the newest queued record may still be incomplete. A record is therefore
//! only released once a later record exists, or once the input is exhausted.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::{debug, trace};

use super::handler::{ContentHandler, DocumentInfo};
use super::tokenizer::{XmlEvent, XmlTokenizer};
use super::version::SeqXmlVersion;
use super::SeqXmlError;
use crate::record::SeqRecord;

pub use config::{ReaderConfig, DEFAULT_BLOCK_SIZE};
pub use iterators::RecordIterator;

mod config;
mod iterators;


/// Streaming parser for SeqXML documents
pub struct SeqXmlReader<R: BufRead> {
    /// `None` once the input is exhausted or parsing failed
    tokenizer: Option<XmlTokenizer<R>>,
    handler: ContentHandler,
    records: VecDeque<SeqRecord>,
    document: DocumentInfo,
    pending_error: Option<SeqXmlError>,
    released: usize,
}

impl SeqXmlReader<Box<dyn BufRead>> {
    /// Open a SeqXML file; `.gz` files are decompressed transparently
    pub fn open<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self, SeqXmlError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let capacity = config.effective_block_size();
        let source: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
            debug!("Reading gzip-compressed {}", path.display());
            Box::new(BufReader::with_capacity(capacity, MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::with_capacity(capacity, file))
        };
        Self::new(source)
    }
}

impl<T: Read> SeqXmlReader<BufReader<T>> {
    /// Read from an unbuffered source in chunks of `config.block_size` bytes
    pub fn from_read(source: T, config: ReaderConfig) -> Result<Self, SeqXmlError> {
        Self::new(BufReader::with_capacity(config.effective_block_size(), source))
    }
}

impl<R: BufRead> SeqXmlReader<R> {
    /// Create a reader and prime it.
    ///
    /// Priming consumes input until the root element (and with it the format
    /// version) has been read. Fails with [`SeqXmlError::EmptyInput`] if the
    /// source has no content at all, and with [`SeqXmlError::NoData`] if it
    /// ends before the root element.
    pub fn new(source: R) -> Result<Self, SeqXmlError> {
        let mut tokenizer = XmlTokenizer::new(source);
        let mut handler = ContentHandler::new();
        let mut records = VecDeque::new();

        let document = loop {
            if let Some(document) = handler.document() {
                break document.clone();
            }
            match tokenizer.next_event()? {
                XmlEvent::Eof if tokenizer.seen_content() => return Err(SeqXmlError::NoData),
                XmlEvent::Eof => return Err(SeqXmlError::EmptyInput),
                event => handler.handle(event, &mut records)?,
            }
        };
        debug!("Primed seqXML {} document", document.version);

        Ok(Self {
            tokenizer: Some(tokenizer),
            handler,
            records,
            document,
            pending_error: None,
            released: 0,
        })
    }

    /// Document metadata from the root element
    pub fn metadata(&self) -> &DocumentInfo {
        &self.document
    }

    /// Declared format version
    pub fn version(&self) -> SeqXmlVersion {
        self.document.version
    }

    /// Number of records handed out so far
    pub fn records_read(&self) -> usize {
        self.released
    }

    /// Iterate over all records
    pub fn records(self) -> RecordIterator<R> {
        RecordIterator { reader: self }
    }

    /// Read the next complete record.
    ///
    /// Returns `Ok(None)` once every record has been handed out. After an
    /// error the reader is exhausted and yields nothing further.
    pub fn next_record(&mut self) -> Result<Option<SeqRecord>, SeqXmlError> {
        loop {
            if self.records.len() > 1 {
                return Ok(self.release());
            }
            if self.tokenizer.is_none() {
                if !self.records.is_empty() {
                    return Ok(self.release());
                }
                return match self.pending_error.take() {
                    Some(e) => Err(e),
                    None => Ok(None),
                };
            }
            if let Err(e) = self.feed() {
                self.tokenizer = None;
                self.records.clear();
                return Err(e);
            }
        }
    }

    /// Push one tokenizer event through the handler
    fn feed(&mut self) -> Result<(), SeqXmlError> {
        let Some(tokenizer) = self.tokenizer.as_mut() else {
            return Ok(());
        };
        match tokenizer.next_event()? {
            XmlEvent::Eof => {
                debug!(
                    "End of input after {} bytes",
                    tokenizer.position()
                );
                self.tokenizer = None;
                if !self.handler.is_done() {
                    if self.handler.entry_open() {
                        // The open entry never saw its end tag
                        self.records.pop_back();
                    }
                    self.pending_error =
                        Some(SeqXmlError::UnexpectedEof(self.handler.open_element().to_string()));
                }
                Ok(())
            }
            event => self.handler.handle(event, &mut self.records),
        }
    }

    fn release(&mut self) -> Option<SeqRecord> {
        let record = self.records.pop_front()?;
        self.released += 1;
        trace!("Releasing record #{} '{}'", self.released, record.id);
        Some(record)
    }
}

/// Parse a complete document held in memory
pub fn parse_str(xml: &str) -> Result<(DocumentInfo, Vec<SeqRecord>), SeqXmlError> {
    let reader = SeqXmlReader::new(xml.as_bytes())?;
    let document = reader.metadata().clone();
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok((document, records))
}
