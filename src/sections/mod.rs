//! Section decoders: each mandatory marker has a dedicated module that
//! seeks to its offset and decodes a fixed positional layout. Optional
//! sections have no decoder at all; their bytes are captured as opaque
//! blobs by [`capture_raw_sections`] instead, bounded by whichever other
//! located marker comes next (or end of file for the last one).

mod classes;
mod columns;
mod joins;
mod links;
mod parameters;
mod tables;

pub use classes::decode_classes;
pub use columns::decode_columns;
pub use joins::{decode_contexts, decode_joins};
pub use links::{decode_hierarchies, decode_links};
pub use parameters::{decode_custom_parameters, decode_parameters};
pub use tables::{decode_tables, decode_virtual_tables, tables_section_tail};

use std::collections::HashMap;

use crate::marker::MANDATORY_MARKERS;

/// Slice out the raw bytes of every located marker that isn't mandatory,
/// bounded by the nearest other located offset greater than its own (or
/// end of file, for whichever section sits last).
pub fn capture_raw_sections(
    bytes: &[u8],
    offsets: &HashMap<&'static str, usize>,
) -> HashMap<&'static str, Vec<u8>> {
    let mut raw = HashMap::new();
    for (&marker, &start) in offsets {
        if MANDATORY_MARKERS.contains(&marker) {
            continue;
        }
        let end = offsets
            .values()
            .copied()
            .filter(|&other| other > start)
            .min()
            .unwrap_or(bytes.len());
        raw.insert(marker, bytes[start..end.min(bytes.len())].to_vec());
    }
    raw
}
