//! univ-decoder: decodes a legacy BusinessObjects `.unv` universe file into
//! an in-memory semantic model, then cross-references it.
//!
//! The format isn't self-describing. [`marker::locate_markers`] finds
//! section-start offsets by scanning for null-prefixed marker strings;
//! [`parse`] then decodes the mandatory sections in the fixed order the
//! decoders depend on (tables before columns/joins/SQL expansion, the
//! class tree before the analyzer), captures whatever optional sections
//! are present as opaque blobs, and runs the cross-reference analyzer over
//! the assembled model.

pub mod analyzer;
pub mod assembler;
pub mod cursor;
pub mod date;
pub mod diagnostic;
pub mod error;
pub mod marker;
pub mod model;
pub mod procedures;
pub mod sections;

use diagnostic::Diagnostic;
use error::{DecodeError, DecodeResult};
use model::Universe;

/// The minimum number of bytes a mandatory section's header needs; used
/// only to flag an obviously-wrong marker location (the 20-byte marker
/// disambiguation heuristic can still mislocate a section inside a long
/// free-text comment).
const MIN_SECTION_HEADER_LEN: usize = 8;

/// The populated model plus every diagnostic accumulated along the way,
/// in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub universe: Universe,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode `bytes` into a [`Universe`] and run the cross-reference
/// analyzer over it.
///
/// Fatal structural errors (a mandatory marker is missing, a section is
/// truncated, a parent-id assertion fails) abort the whole parse and
/// return `Err`. Everything else — optional-section gaps, broken SQL
/// references, suspicious names, out-of-range dates — is folded into
/// `ParseOutcome::diagnostics` instead.
pub fn parse(bytes: &[u8]) -> DecodeResult<ParseOutcome> {
    let offsets = marker::locate_markers(bytes);
    let mut diagnostics = Vec::new();

    for &name in marker::MANDATORY_MARKERS {
        let offset = offsets
            .get(name)
            .copied()
            .ok_or(DecodeError::MissingMarker { marker: name })?;
        marker::check_plausible(name, offset, bytes.len(), MIN_SECTION_HEADER_LEN, &mut diagnostics);
    }

    let mut universe = Universe::default();

    universe.parameters =
        sections::decode_parameters(bytes, offsets["Parameters;"], &mut diagnostics)?;
    universe.custom_parameters = sections::decode_custom_parameters(bytes, offsets["Parameters_6_0;"])?;

    // Tables first: table_index (built in assemble()) is what every later
    // section resolves ids through.
    universe.tables = sections::decode_tables(bytes, offsets["Tables;"])?;
    universe.virtual_tables = sections::decode_virtual_tables(bytes, offsets["Virtual Tables;"])?;
    universe.columns = sections::decode_columns(bytes, offsets["Columns Id;"])?;
    universe.joins = sections::decode_joins(bytes, offsets["Joins;"])?;
    universe.contexts = sections::decode_contexts(bytes, offsets["Contexts;"])?;
    universe.links = sections::decode_links(bytes, offsets["Links;"])?;
    universe.hierarchies = sections::decode_hierarchies(bytes, offsets["Hierarchies;"])?;

    let (classes, root_classes) = sections::decode_classes(bytes, offsets["Objects;"])?;
    universe.classes = classes;
    universe.root_classes = root_classes;

    universe.raw_sections = sections::capture_raw_sections(bytes, &offsets);

    match sections::tables_section_tail(bytes, offsets["Tables;"]) {
        Ok(tail) => {
            universe.stored_procedure_parameters =
                procedures::extract_stored_procedure_parameters(tail);
        }
        Err(err) => diagnostics.push(Diagnostic::OptionalSectionFailed {
            marker: "Tables;",
            reason: format!("stored-procedure tail unreadable: {err}"),
        }),
    }

    assembler::assemble(&mut universe);
    analyzer::analyze(&mut universe);

    // universe.validation_errors already holds everything the assembler
    // and analyzer raised; prepend the decode-time diagnostics so the
    // combined list stays ordered by discovery, and let the universe own
    // the full list.
    diagnostics.append(&mut universe.validation_errors);
    universe.validation_errors = diagnostics.clone();

    Ok(ParseOutcome {
        universe,
        diagnostics,
    })
}
