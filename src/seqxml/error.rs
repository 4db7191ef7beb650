/// Broad classes of SeqXML failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The element/attribute structure does not match the grammar
    Structure,
    /// The structure is fine but the content cannot form a valid record
    Content,
    /// A value has a type that cannot be represented in SeqXML
    Type,
    /// Underlying I/O, encoding or XML tokenizer failure
    Io,
}

/// Errors that can occur while reading or writing SeqXML
#[derive(Debug, thiserror::Error)]
pub enum SeqXmlError {
    /// Error from the XML tokenizer
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// An element appeared where the grammar does not allow it
    #[error("Unexpected element <{found}>, expected {expected}")]
    UnexpectedElement {
        /// What the current state accepts
        expected: String,
        /// Element that was found
        found: String,
    },

    /// Closing tag does not match the open element
    #[error("Unexpected end of element </{found}>, expected </{expected}>")]
    UnexpectedEnd {
        /// Element that should have been closed
        expected: String,
        /// Element that was closed
        found: String,
    },

    /// Element or attribute in an unexpected namespace
    #[error("Unexpected namespace '{namespace}' for {name}")]
    UnexpectedNamespace {
        /// Element or attribute name
        name: String,
        /// Namespace that was found
        namespace: String,
    },

    /// Attribute that the element does not accept
    #[error("Unexpected attribute '{attribute}' in {element} element")]
    UnexpectedAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
    },

    /// Required attribute is missing
    #[error("Missing required attribute '{attribute}' in {element} element")]
    MissingAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
    },

    /// Attribute only defined in other versions of the format
    #[error("Attribute '{attribute}' on {element} is not supported in seqXML version {version}")]
    VersionIncompatible {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
        /// Declared document version
        version: String,
    },

    /// Root element has no `seqXMLversion`
    #[error("Failed to find seqXMLversion")]
    MissingVersion,

    /// Declared version is not supported
    #[error("Unsupported seqXMLversion '{0}'")]
    UnsupportedVersion(String),

    /// Schema location does not belong to the declared version
    #[error("XML Schema '{schema}' not consistent with reported seqXML version {version}")]
    SchemaMismatch {
        /// Declared schema location
        schema: String,
        /// Declared document version
        version: String,
    },

    /// Taxonomy identifier is not an integer
    #[error("Invalid ncbiTaxID '{0}': not an integer")]
    InvalidTaxId(String),

    /// Property named after a field the entry carries elsewhere
    #[error("Property '{name}' in entry '{entry}' is reserved")]
    ReservedProperty {
        /// Property name
        name: String,
        /// Entry identifier
        entry: String,
    },

    /// Character data where the grammar allows none
    #[error("Unexpected character data in {element}: '{data}'")]
    UnexpectedData {
        /// Element that received the data
        element: String,
        /// Offending data
        data: String,
    },

    /// Event after the root element was closed
    #[error("Unexpected content after the end of the seqXML element")]
    TrailingContent,

    /// Input ended before the root element was closed
    #[error("Unexpected end of input inside {0}")]
    UnexpectedEof(String),

    /// Input contains no bytes
    #[error("Empty file")]
    EmptyInput,

    /// Input ended before the root element was found
    #[error("XML file contains no data")]
    NoData,

    /// Entry closed without a (non-empty) sequence
    #[error("Failed to find a sequence for entry '{0}'")]
    MissingSequence(String),

    /// Molecule type missing, unresolvable or inconsistent
    #[error("Invalid molecule_type: {0}")]
    InvalidMoleculeType(String),

    /// Record lacks a usable identifier
    #[error("SeqXML requires identifier")]
    MissingIdentifier,

    /// Sequence of a record to write is empty
    #[error("The sequence length should be greater than 0 (record '{0}')")]
    EmptySequence(String),

    /// Cross-reference not of the form `source:id`
    #[error("dbxrefs should be in the form 'source:id', found '{0}'")]
    InvalidDbxref(String),

    /// Taxonomy annotation holds more than one identifier
    #[error("Multiple entries for ncbi_taxid: {0}")]
    MultipleTaxIds(String),

    /// Value of an unsupported type
    #[error("{field} should be of type {expected}")]
    TypeMismatch {
        /// Field or annotation name
        field: String,
        /// Accepted types
        expected: &'static str,
    },

    /// Writer methods called out of order
    #[error("Invalid writer state: {0}")]
    InvalidState(String),
}

impl SeqXmlError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SeqXmlError::XmlError(_) | SeqXmlError::IoError(_) | SeqXmlError::Utf8Error(_) => {
                ErrorCategory::Io
            }
            SeqXmlError::UnexpectedElement { .. }
            | SeqXmlError::UnexpectedEnd { .. }
            | SeqXmlError::UnexpectedNamespace { .. }
            | SeqXmlError::UnexpectedAttribute { .. }
            | SeqXmlError::MissingAttribute { .. }
            | SeqXmlError::VersionIncompatible { .. }
            | SeqXmlError::MissingVersion
            | SeqXmlError::UnsupportedVersion(_)
            | SeqXmlError::SchemaMismatch { .. }
            | SeqXmlError::InvalidTaxId(_)
            | SeqXmlError::ReservedProperty { .. }
            | SeqXmlError::UnexpectedData { .. }
            | SeqXmlError::TrailingContent
            | SeqXmlError::UnexpectedEof(_)
            | SeqXmlError::InvalidState(_) => ErrorCategory::Structure,
            SeqXmlError::EmptyInput
            | SeqXmlError::NoData
            | SeqXmlError::MissingSequence(_)
            | SeqXmlError::InvalidMoleculeType(_)
            | SeqXmlError::MissingIdentifier
            | SeqXmlError::EmptySequence(_)
            | SeqXmlError::InvalidDbxref(_)
            | SeqXmlError::MultipleTaxIds(_) => ErrorCategory::Content,
            SeqXmlError::TypeMismatch { .. } => ErrorCategory::Type,
        }
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        SeqXmlError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn unexpected_attribute(element: &str, attribute: &str) -> Self {
        SeqXmlError::UnexpectedAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn type_mismatch(field: &str, expected: &'static str) -> Self {
        SeqXmlError::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}
