//! Namespace-aware event adapter over quick-xml
//!
//! The SeqXML state machine only cares about element starts (with resolved
//! attribute names), element ends and character data. This module turns
//! quick-xml's borrowed events into owned [`XmlEvent`]s of exactly that shape.

use std::borrow::Cow;
use std::fmt;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::NsReader;

use super::SeqXmlError;

/// An element or attribute name with its resolved namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Namespace URI, `None` when unqualified
    pub namespace: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl QualifiedName {
    /// Name without a namespace
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Name within a namespace
    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Tokenizer event consumed by the content handler
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// Element opened
    Start {
        /// Element name
        name: QualifiedName,
        /// Attributes in document order, namespace declarations excluded
        attributes: Vec<(QualifiedName, String)>,
    },
    /// Element closed
    End {
        /// Element name
        name: QualifiedName,
    },
    /// Character data (unescaped)
    Characters(String),
    /// End of input
    Eof,
}

/// Pulls [`XmlEvent`]s out of a buffered byte source.
///
/// The underlying `BufRead` decides how many bytes are consumed per refill;
/// a reader with a one-byte buffer produces exactly the same events as one
/// holding the whole document.
pub struct XmlTokenizer<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    seen_content: bool,
}

impl<R: BufRead> XmlTokenizer<R> {
    /// Create a tokenizer over a buffered source
    pub fn new(source: R) -> Self {
        let mut reader = NsReader::from_reader(source);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            buf: Vec::with_capacity(1024),
            seen_content: false,
        }
    }

    /// Whether anything other than end-of-input has been read
    pub fn seen_content(&self) -> bool {
        self.seen_content
    }

    /// Byte offset of the tokenizer in the input
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Release the tokenizer and return the byte source
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Read the next relevant event
    pub fn next_event(&mut self) -> Result<XmlEvent, SeqXmlError> {
        loop {
            self.buf.clear();
            let event = self.reader.read_event_into(&mut self.buf)?;
            if !matches!(event, Event::Eof) {
                self.seen_content = true;
            }
            match event {
                Event::Start(ref e) => {
                    let name = resolve_element(&self.reader, e.name())?;
                    let attributes = collect_attributes(&self.reader, e)?;
                    return Ok(XmlEvent::Start { name, attributes });
                }
                Event::End(ref e) => {
                    let name = resolve_element(&self.reader, e.name())?;
                    return Ok(XmlEvent::End { name });
                }
                Event::Text(ref t) => {
                    let text = t.unescape()?.into_owned();
                    return Ok(XmlEvent::Characters(text));
                }
                Event::CData(ref c) => {
                    let text = std::str::from_utf8(c)?.to_string();
                    return Ok(XmlEvent::Characters(text));
                }
                Event::Eof => return Ok(XmlEvent::Eof),
                // Declarations, comments, processing instructions and doctypes
                _ => {}
            }
        }
    }
}

fn resolve_element<R>(reader: &NsReader<R>, name: QName) -> Result<QualifiedName, SeqXmlError> {
    let (resolved, local) = reader.resolve_element(name);
    qualify(resolved, local.as_ref(), name)
}

fn collect_attributes<R>(
    reader: &NsReader<R>,
    start: &BytesStart,
) -> Result<Vec<(QualifiedName, String)>, SeqXmlError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let name = qualify(resolved, local.as_ref(), attr.key)?;
        let value = match attr.unescape_value()? {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => s,
        };
        attributes.push((name, value));
    }
    Ok(attributes)
}

fn qualify(
    resolved: ResolveResult,
    local: &[u8],
    raw: QName,
) -> Result<QualifiedName, SeqXmlError> {
    let local = std::str::from_utf8(local)?.to_string();
    match resolved {
        ResolveResult::Unbound => Ok(QualifiedName::local(local)),
        ResolveResult::Bound(ns) => {
            let namespace = std::str::from_utf8(ns.as_ref())?.to_string();
            Ok(QualifiedName::namespaced(namespace, local))
        }
        ResolveResult::Unknown(prefix) => Err(SeqXmlError::UnexpectedNamespace {
            name: String::from_utf8_lossy(raw.as_ref()).into_owned(),
            namespace: format!("unbound prefix '{}'", String::from_utf8_lossy(&prefix)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<XmlEvent> {
        let mut tokenizer = XmlTokenizer::new(xml.as_bytes());
        let mut events = Vec::new();
        loop {
            let event = tokenizer.next_event().unwrap();
            if event == XmlEvent::Eof {
                break;
            }
            events.push(event);
        }
        events
    }

    #[test]
    fn test_empty_elements_are_expanded() {
        let events = collect(r#"<a><b x="1"/></a>"#);
        assert_eq!(
            events,
            vec![
                XmlEvent::Start {
                    name: QualifiedName::local("a"),
                    attributes: vec![]
                },
                XmlEvent::Start {
                    name: QualifiedName::local("b"),
                    attributes: vec![(QualifiedName::local("x"), "1".to_string())]
                },
                XmlEvent::End {
                    name: QualifiedName::local("b")
                },
                XmlEvent::End {
                    name: QualifiedName::local("a")
                },
            ]
        );
    }

    #[test]
    fn test_namespaces_are_resolved() {
        let events = collect(
            r#"<root xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="s.xsd"/>"#,
        );
        match &events[0] {
            XmlEvent::Start { name, attributes } => {
                assert_eq!(name, &QualifiedName::local("root"));
                assert_eq!(
                    attributes,
                    &vec![(
                        QualifiedName::namespaced(
                            "http://www.w3.org/2001/XMLSchema-instance",
                            "noNamespaceSchemaLocation"
                        ),
                        "s.xsd".to_string()
                    )]
                );
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_default_namespace_applies_to_elements() {
        let events = collect(r#"<root xmlns="urn:x"/>"#);
        assert_eq!(
            events[0],
            XmlEvent::Start {
                name: QualifiedName::namespaced("urn:x", "root"),
                attributes: vec![]
            }
        );
    }

    #[test]
    fn test_text_is_unescaped_and_comments_skipped() {
        let events = collect("<?xml version=\"1.0\"?><!-- c --><a>x &amp; y<![CDATA[<z>]]></a>");
        assert_eq!(events[1], XmlEvent::Characters("x & y".to_string()));
        assert_eq!(events[2], XmlEvent::Characters("<z>".to_string()));
    }

    #[test]
    fn test_unknown_prefix_is_rejected() {
        let mut tokenizer = XmlTokenizer::new("<p:a/>".as_bytes());
        assert!(matches!(
            tokenizer.next_event(),
            Err(SeqXmlError::UnexpectedNamespace { .. })
        ));
    }

    #[test]
    fn test_seen_content() {
        let mut tokenizer = XmlTokenizer::new("".as_bytes());
        assert_eq!(tokenizer.next_event().unwrap(), XmlEvent::Eof);
        assert!(!tokenizer.seen_content());

        let mut tokenizer = XmlTokenizer::new("<?xml version=\"1.0\"?>".as_bytes());
        assert_eq!(tokenizer.next_event().unwrap(), XmlEvent::Eof);
        assert!(tokenizer.seen_content());
    }
}
