//! Decodes the mandatory `Columns Id;` section.

use crate::cursor::ByteCursor;
use crate::error::DecodeResult;
use crate::model::Column;

const SECTION: &str = "Columns Id;";

/// Layout: column_count (u32), a second column_count (u32, the record
/// count actually used), then that many `(id, table_id, name)` records.
/// Sorted by id after decoding: no decoder relies on the order, but report
/// output is byte-compatible with the reference tool only if it is kept.
pub fn decode_columns(bytes: &[u8], offset: usize) -> DecodeResult<Vec<Column>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    let raw = c.read_u32_le();
    c.require(raw, SECTION, 4)?; // first count, unused
    let raw = c.read_u32_le();
    let count = c.require(raw, SECTION, 4)?;

    let mut columns = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let raw = c.read_u32_le();
        let id = c.require(raw, SECTION, 4)?;
        let raw = c.read_u32_le();
        let table_id = c.require(raw, SECTION, 4)?;
        let raw = c.read_string();
        let name = c.require(raw, SECTION, 2)?.0;
        columns.push(Column { id, name, table_id });
    }
    columns.sort_by_key(|c| c.id);
    Ok(columns)
}
