//! Error types for the universe decoder.

use thiserror::Error;

/// Fatal errors that abort an entire parse.
///
/// Missing mandatory markers, truncated headers, and implausible counts
/// are structural failures; a parent-id mismatch inside the class/object/
/// condition tree is an assertion violation. Both abort the whole parse —
/// everything else becomes a [`crate::diagnostic::Diagnostic`] instead.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("mandatory section marker {marker:?} not found in universe file")]
    MissingMarker { marker: &'static str },

    #[error(
        "truncated {section} section at offset {offset}: needed {needed} bytes, had {available}"
    )]
    TruncatedSection {
        section: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("implausible count in {section} section at offset {offset}: {count}")]
    ImplausibleCount {
        section: &'static str,
        offset: usize,
        count: u64,
    },

    #[error("{record_kind} id={found} declares parent_id={declared}, but its owner is id={expected}")]
    ParentMismatch {
        record_kind: &'static str,
        expected: u32,
        declared: u32,
        found: u32,
    },
}

pub type DecodeResult<T> = Result<T, DecodeError>;
