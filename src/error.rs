/// Error types for the boardarchive library
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Main error type for archive operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Structural or value violation found while parsing archive text
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A file (top-level input or include target) could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Include blocks nested deeper than the configured limit
    #[error("include depth {depth} exceeded while including {}", path.display())]
    IncludeDepth {
        /// File whose inclusion crossed the limit
        path: PathBuf,
        /// Depth that was reached
        depth: usize,
    },

    /// Unsupported byte-order mark or invalid UTF-8 text
    #[error("encoding error: {0}")]
    Encoding(String),

    /// JSON mapping failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML mapping failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Lookup by ID failed in the editing API
    #[error("{0} not found")]
    NotFound(String),

    /// A by-value reference (InSub, Post) does not resolve
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl ArchiveError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }

    /// The format error, if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            ArchiveError::Format(err) => Some(err),
            _ => None,
        }
    }
}

/// Which grammar rule a [`FormatError`] violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// Numeric field did not parse as an integer
    InvalidInteger,
    /// Numeric field parsed but was below zero
    NegativeValue,
    /// Category `Kind` names a type absent from the categorization list
    InvalidCategoryType,
    /// Category `InSub` does not match an earlier `ID` of the same type
    UnknownParent,
    /// Two posts in one thread share a `Post` value
    DuplicatePost,
}

/// Fatal parse error carrying the offending key, raw value and line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// Violated rule
    pub kind: FormatErrorKind,
    /// Key (or derived field) that was rejected
    pub key: String,
    /// Raw text of the rejected value
    pub value: String,
    /// 1-based line number within the document being parsed
    pub line: usize,
    /// Source file, when parsing from disk
    pub path: Option<PathBuf>,
    /// Extra detail (e.g. the accepted category types)
    pub detail: Option<String>,
}

impl FormatError {
    pub(crate) fn new(
        kind: FormatErrorKind,
        key: impl Into<String>,
        value: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            kind,
            key: key.into(),
            value: value.into(),
            line,
            path: None,
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn in_file(mut self, path: impl Into<PathBuf>) -> Self {
        if self.path.is_none() {
            self.path = Some(path.into());
        }
        self
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FormatErrorKind::InvalidInteger => write!(
                f,
                "Invalid integer '{}' for key '{}' on line {}",
                self.value, self.key, self.line
            )?,
            FormatErrorKind::NegativeValue => write!(
                f,
                "Negative value '{}' for key '{}' on line {}",
                self.value, self.key, self.line
            )?,
            FormatErrorKind::InvalidCategoryType => write!(
                f,
                "Invalid '{}' value '{}' on line {}",
                self.key, self.value, self.line
            )?,
            FormatErrorKind::UnknownParent => write!(
                f,
                "{} value '{}' on line {} does not match any existing ID values",
                self.key, self.value, self.line
            )?,
            FormatErrorKind::DuplicatePost => write!(
                f,
                "Duplicate '{}' value '{}' on line {}",
                self.key, self.value, self.line
            )?,
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        if let Some(path) = &self.path {
            write!(f, " in {}", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for FormatError {}
