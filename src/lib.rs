//! Boardarchive - Message Board Archive Codec
//!
//! Boardarchive reads and writes a human-readable, block-delimited text format
//! for exports of message boards: services, users, categories, threads, posts
//! and polls. Archives can pull in other archive files through include blocks,
//! and parsed trees can be checked against a declarative schema.
//!
//! # Quick Start
//!
//! ```rust
//! use boardarchive::{parse_str, services_to_string, LineEnding, ParseOptions};
//!
//! let text = "\
//! --- Start Archive Service ---
//! Entry: 1
//! Service: Retro Board
//! --- Start User List ---
//! --- Start User Info ---
//! User: 7
//! Name: Ana
//! Handle: @ana
//! --- End User Info ---
//! --- End User List ---
//! --- End Archive Service ---
//! ";
//!
//! let services = parse_str(text, &ParseOptions::default())?;
//! assert_eq!(services[0].users[&7].name.as_deref(), Some("Ana"));
//!
//! // Serialize back, with Windows line endings
//! let out = services_to_string(&services, LineEnding::CrLf);
//! let again = parse_str(&out, &ParseOptions::default())?;
//! assert_eq!(again[0].users[&7].handle.as_deref(), Some("@ana"));
//! # Ok::<(), boardarchive::ArchiveError>(())
//! ```
//!
//! # Format
//!
//! ```text
//! --- Start Archive Service ---            section marker
//! Entry: 1                                 Key: value field
//! Info:                                    label for the body below
//! --- Start Info Body ---
//! Free text, kept line for line
//! --- End Info Body ---
//! --- Include Users Start ---              include block
//! users.txt                                one path per line
//! --- Include Users End ---
//! --- End Archive Service ---
//! ```
//!
//! # Validation
//!
//! ```rust
//! use boardarchive::{parse_str, validate_services, ParseOptions, Schema};
//!
//! let text = "\
//! --- Start Archive Service ---
//! Entry: 1
//! Service: Demo
//! --- Start Message Thread ---
//! Thread: 1
//! --- Start Message Post ---
//! Post: 1
//! Author: Ana
//! Date: 2024-01-01
//! Time: 10:00
//! Nested: 99
//! --- End Message Post ---
//! --- End Message Thread ---
//! --- End Archive Service ---
//! ";
//!
//! let services = parse_str(text, &ParseOptions::default())?;
//! let report = validate_services(&services, &Schema::default());
//! assert!(!report.is_valid());
//! assert!(report.message().contains("Nested value 99"));
//! # Ok::<(), boardarchive::ArchiveError>(())
//! ```
//!
//! # Other forms
//!
//! The same tree maps to JSON ([`json`]) and YAML ([`yaml`]), and renders as
//! console text or an HTML page ([`display`]). Files ending in `.gz` or
//! `.bz2` are compressed and decompressed transparently ([`file_reader`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Human-readable console rendering
pub mod display;
/// Editing API for service trees
pub mod edit;
/// Error types for archive operations
pub mod error;
pub mod field;
pub mod file_reader;
pub mod include;
/// JSON mapping of service trees
pub mod json;
pub mod model;
pub mod parser;
pub mod schema;
pub mod section;
pub mod serializer;
pub mod validation;
/// YAML mapping of service trees
pub mod yaml;

// Re-exports for Rust consumers

/// Error and result types
pub use crate::error::{ArchiveError, FormatError, FormatErrorKind, Result};

/// Entity model
pub use crate::model::{Category, Poll, Post, Service, Thread, User};

/// Parsing entry points
pub use crate::parser::{parse_file, parse_lines, parse_reader, parse_str, ParseOptions};

/// Serialization entry points
pub use crate::serializer::{
    save_services_to_file, services_to_string, write_services, LineEnding,
};

/// Schema validation
pub use crate::schema::{FieldType, Schema, SectionSchema};
pub use crate::validation::{
    validate_service, validate_services, validate_value, ArchiveStats, ValidationReport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
