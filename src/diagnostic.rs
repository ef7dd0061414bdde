//! Non-fatal diagnostics accumulated during a parse.
//!
//! Diagnostics are append-only and ordered by discovery time (the order in
//! which the decoder and analyzer produce them): optional-section failures,
//! SQL reference problems, and decoding oddities never abort a parse, they
//! just get recorded here.

use std::fmt;

/// A single non-fatal finding surfaced during decode or analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An optional section's decoder failed; the section's value defaulted.
    OptionalSectionFailed { marker: &'static str, reason: String },

    /// An object's expanded SQL refers to a table name that isn't known.
    BrokenReference {
        object_id: u32,
        object_name: String,
        sql_kind: SqlKind,
        reference: String,
    },

    /// An object has no resolvable table references in its select clause.
    OrphanedObject { object_id: u32, object_name: String },

    /// A table is an alias (`parent_id != 0`) whose parent table id is unknown.
    InvalidAlias { table_id: u32, parent_id: u32 },

    /// A string field contained bytes that needed UTF-8 replacement.
    Utf8Replacement { context: String },

    /// A table name looked corrupt (non-printable, empty, or implausibly long).
    SuspiciousTableName { table_id: u32, raw_len: usize },

    /// A date index decoded below the epoch (2442964 = 1976-07-04).
    DateOutOfRange { context: String, index: u32 },

    /// Two contexts that an object spans share no joins.
    IncompatibleContexts {
        object_id: u32,
        object_name: String,
        context1_id: u32,
        context2_id: u32,
    },

    /// The marker-location heuristic produced an implausible section start
    /// (e.g. a count that is far larger than the remaining buffer allows).
    SuspiciousMarkerLocation { marker: &'static str, offset: usize },

    /// A column's stored table id doesn't resolve to any known table.
    OrphanedColumn { column_id: u32, table_id: u32 },
}

/// Which SQL expression a [`Diagnostic::BrokenReference`] was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    Select,
    Where,
}

impl fmt::Display for SqlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlKind::Select => write!(f, "select"),
            SqlKind::Where => write!(f, "where"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OptionalSectionFailed { marker, reason } => {
                write!(f, "optional section {marker:?} failed: {reason}")
            }
            Diagnostic::BrokenReference {
                object_id,
                object_name,
                sql_kind,
                reference,
            } => write!(
                f,
                "object '{object_name}' (id={object_id}) references unknown table '{reference}' in {sql_kind} clause"
            ),
            Diagnostic::OrphanedObject {
                object_id,
                object_name,
            } => write!(
                f,
                "object '{object_name}' (id={object_id}) has no resolvable table references in its select clause"
            ),
            Diagnostic::InvalidAlias { table_id, parent_id } => write!(
                f,
                "table id={table_id} is an alias for unknown parent table id={parent_id}"
            ),
            Diagnostic::Utf8Replacement { context } => {
                write!(f, "UTF-8 replacement applied while decoding {context}")
            }
            Diagnostic::SuspiciousTableName { table_id, raw_len } => write!(
                f,
                "table id={table_id} has a suspicious name ({raw_len} raw bytes)"
            ),
            Diagnostic::DateOutOfRange { context, index } => write!(
                f,
                "{context}: date index {index} is below the universe epoch (2442964)"
            ),
            Diagnostic::IncompatibleContexts {
                object_id,
                object_name,
                context1_id,
                context2_id,
            } => write!(
                f,
                "object '{object_name}' (id={object_id}) spans incompatible contexts {context1_id} and {context2_id}"
            ),
            Diagnostic::SuspiciousMarkerLocation { marker, offset } => write!(
                f,
                "marker {marker:?} located at offset {offset} looks implausible"
            ),
            Diagnostic::OrphanedColumn { column_id, table_id } => write!(
                f,
                "column id={column_id} refers to unknown table id={table_id}"
            ),
        }
    }
}
