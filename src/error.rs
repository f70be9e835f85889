//! Error taxonomy for the generation pipeline.
//!
//! Every fatal error names the offending origin (schema file, or
//! `<file>#<section>` for packed bundle entries) and, where it applies, the
//! schema path inside the document. Nothing here is retryable: generation is
//! a deterministic transform, so the same input always fails the same way.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("no schema files found under {}", .dir.display())]
    NoSchemas { dir: PathBuf },

    #[error("packed mode expects exactly one schema file, found {count} under {}", .dir.display())]
    PackedNotSingle { dir: PathBuf, count: usize },

    #[error("packed schema bundle {origin} is not a JSON object")]
    PackedNotObject { origin: String },

    #[error("invalid schema glob pattern {pattern}")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read {}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema JSON in {origin} at `{}`", .source.path())]
    ParseJson {
        origin: String,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },

    #[error("schema shape error in {origin} at `{path}`: {reason}")]
    SchemaShape {
        origin: String,
        path: String,
        reason: String,
    },

    #[error("duplicate title `{title}`: {first_origin} and {second_origin} define different bodies")]
    DuplicateTitle {
        title: String,
        first_origin: String,
        second_origin: String,
    },

    #[error("unresolved $ref `{reference}` in {origin} at `{path}`")]
    UnresolvedReference {
        reference: String,
        origin: String,
        path: String,
    },

    #[error("no response type matches query variant `{variant}` (tried {})", .candidates.join(", "))]
    UnmatchedResponse {
        variant: String,
        candidates: Vec<String>,
    },
}

// ------------------------------- Tests ------------------------------------ //
