use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Every failure a single analysis can end with.
///
/// All variants are request-fatal: the pipeline stops at the first one and
/// no partial record set is returned.
#[derive(Error, Debug)]
pub enum TallyError {
    /// The declared media type is not one of the four supported formats.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Tabular bytes could not be decoded or do not form a valid table.
    #[error("malformed table: {0}")]
    MalformedTable(String),

    /// A PDF or Word document could not be opened or read.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The entity annotator was not ready or rejected the document text.
    #[error("annotation failed: {0}")]
    Annotation(String),
}

impl TallyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TallyError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            TallyError::MalformedTable(_) => ErrorKind::MalformedTable,
            TallyError::Extraction(_) => ErrorKind::Extraction,
            TallyError::Annotation(_) => ErrorKind::Annotation,
        }
    }

    pub fn malformed(err: impl fmt::Display) -> Self {
        TallyError::MalformedTable(err.to_string())
    }

    pub fn extraction(err: impl fmt::Display) -> Self {
        TallyError::Extraction(err.to_string())
    }
}

/// Failure category reported at the output boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    MalformedTable,
    Extraction,
    Annotation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "UnsupportedFormatError",
            ErrorKind::MalformedTable => "MalformedTableError",
            ErrorKind::Extraction => "ExtractionError",
            ErrorKind::Annotation => "AnnotationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unsupported() {
        let err = TallyError::UnsupportedFormat("text/plain".to_string());
        assert_eq!(err.to_string(), "unsupported format: text/plain");
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_error_helpers_keep_cause() {
        let err = TallyError::malformed("row 3 has 4 fields, header has 2");
        assert_eq!(err.kind(), ErrorKind::MalformedTable);
        assert!(err.to_string().contains("row 3 has 4 fields"));

        let err = TallyError::extraction("invalid file header");
        assert_eq!(err.kind().to_string(), "ExtractionError");
    }
}
