use std::io::BufRead;
use std::iter::FusedIterator;

use super::{DocumentInfo, SeqXmlError, SeqXmlReader};
use crate::record::SeqRecord;

/// Lazy, single-pass iterator over the records of a SeqXML document
pub struct RecordIterator<R: BufRead> {
    pub(super) reader: SeqXmlReader<R>,
}

impl<R: BufRead> RecordIterator<R> {
    /// Document metadata read during priming
    pub fn metadata(&self) -> &DocumentInfo {
        self.reader.metadata()
    }
}

impl<R: BufRead> Iterator for RecordIterator<R> {
    type Item = Result<SeqRecord, SeqXmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R: BufRead> FusedIterator for RecordIterator<R> {}

impl<R: BufRead> IntoIterator for SeqXmlReader<R> {
    type Item = Result<SeqRecord, SeqXmlError>;
    type IntoIter = RecordIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}
