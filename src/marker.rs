//! Locates section-start offsets within the raw byte image.
//!
//! Section boundaries aren't indexed anywhere in the file; they're found
//! by searching for marker strings that the designer tool happens to embed
//! immediately before each section's body. Some files carry marker-like
//! text inside free-text comments, so a naive first-match search can land
//! on a false positive — the disambiguation rule in [`locate_markers`]
//! exists specifically to skip those.

use std::collections::HashMap;

use crate::diagnostic::Diagnostic;

/// The closed set of section markers this format recognizes, mandatory
/// ones first. Mirrors the reference reader's marker tuple.
pub const MARKERS: &[&str] = &[
    // mandatory, decoded in this fixed order
    "Parameters;",
    "Parameters_6_0;",
    "Tables;",
    "Virtual Tables;",
    "Columns Id;",
    "Joins;",
    "Contexts;",
    "Links;",
    "Hierarchies;",
    "Objects;",
    // optional, captured raw
    "Parameters_4_1;",
    "Parameters_5_0;",
    "Parameters_11_5;",
    "Object_Formats;",
    "Object_ExtraFormats;",
    "Dynamic_Class_Descriptions;",
    "Dynamic_Object_Descriptions;",
    "Dynamic_Property_Descriptions;",
    "Audit;",
    "Dimensions;",
    "OLAPInfo;",
    "Graphical_Info;",
    "Crystal_References;",
    "XML-LOV;",
    "Integrity;",
    "AggregateNavigation;",
    "BoundedColumns;",
    "BuildOrigin_v6;",
    "CompulsaryType;",
    "Deleted References;",
    "DELETED_HISTORY;",
    "Dot_Tables;",
    "Downward;",
    "FormatLocaleSort;",
    "FormatVersion;",
    "Joins Extensions;",
    "Key References;",
    "KernelPageFormat;",
    "Platform;",
    "UNICODE ON;",
    "Upward;",
    "Upward_LocalIndexing;",
    "Upward_Mapping;",
    "Upward_Override;",
    "Upward_Override_New;",
    "WindowsPageFormat;",
];

/// The subset of [`MARKERS`] whose absence is a fatal structural error.
pub const MANDATORY_MARKERS: &[&str] = &[
    "Parameters;",
    "Parameters_6_0;",
    "Tables;",
    "Virtual Tables;",
    "Columns Id;",
    "Joins;",
    "Contexts;",
    "Links;",
    "Hierarchies;",
    "Objects;",
];

const DISAMBIGUATION_WINDOW: usize = 20;

/// Maps each marker found in `bytes` to the byte offset immediately after
/// its `0x00`-prefixed occurrence — the start of that section's body.
///
/// For each marker M, the search looks for `0x00` followed by the ASCII
/// bytes of M. If the bare (un-prefixed) ASCII of M also appears within
/// [`DISAMBIGUATION_WINDOW`] bytes before or after that match, the match is
/// treated as a false positive — e.g. the marker text embedded in a
/// preceding comment — and the search resumes `DISAMBIGUATION_WINDOW`
/// bytes past the end of the false match. Markers absent from the image
/// simply have no entry.
pub fn locate_markers(bytes: &[u8]) -> HashMap<&'static str, usize> {
    let mut offsets = HashMap::new();
    for &marker in MARKERS {
        if let Some(offset) = locate_one(bytes, marker) {
            offsets.insert(marker, offset);
        }
    }
    offsets
}

fn locate_one(bytes: &[u8], marker: &str) -> Option<usize> {
    let marker_bytes = marker.as_bytes();
    let mut prefixed = Vec::with_capacity(marker_bytes.len() + 1);
    prefixed.push(0x00);
    prefixed.extend_from_slice(marker_bytes);

    let mut search_from = 0usize;
    loop {
        let begin = find(bytes, &prefixed, search_from)?;
        let end = begin + prefixed.len();

        let window_start = begin.saturating_sub(DISAMBIGUATION_WINDOW);
        let before_has_bare = find(bytes, marker_bytes, window_start)
            .map(|p| p < begin)
            .unwrap_or(false);
        let after_has_bare = find(bytes, marker_bytes, end)
            .map(|p| p < end + DISAMBIGUATION_WINDOW)
            .unwrap_or(false);

        if before_has_bare || after_has_bare {
            search_from = end + DISAMBIGUATION_WINDOW;
            continue;
        }
        return Some(end);
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Raises a [`Diagnostic::SuspiciousMarkerLocation`] when a section's
/// located offset leaves implausibly little room for its minimum header.
pub fn check_plausible(
    marker: &'static str,
    offset: usize,
    total_len: usize,
    min_header_len: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if total_len.saturating_sub(offset) < min_header_len {
        diagnostics.push(Diagnostic::SuspiciousMarkerLocation { marker, offset });
    }
}
