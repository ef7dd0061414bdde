//! Decodes the mandatory `Tables;` and `Virtual Tables;` sections.

use crate::cursor::ByteCursor;
use crate::error::DecodeResult;
use crate::model::{Table, VirtualTable};

const TABLES: &str = "Tables;";
const VIRTUAL_TABLES: &str = "Virtual Tables;";

/// Layout: 2 unknown bytes, database username, schema name, max_table_id
/// (u32), table_count (u32), then `table_count` table records.
pub fn decode_tables(bytes: &[u8], offset: usize) -> DecodeResult<Vec<Table>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    c.advance(2);
    let raw = c.read_string();
    c.require(raw, TABLES, 2)?;
    let raw = c.read_string();
    let schema = c.require(raw, TABLES, 2)?.0;
    let raw = c.read_u32_le();
    c.require(raw, TABLES, 4)?; // max_table_id, unused
    let raw = c.read_u32_le();
    let table_count = c.require(raw, TABLES, 4)?;

    let mut tables = Vec::with_capacity(table_count as usize);
    for _ in 0..table_count {
        tables.push(decode_table(&mut c, schema.clone())?);
    }
    Ok(tables)
}

/// Layout: id (u32), 19 unknown bytes, name, parent_id (u32), 9 unknown
/// bytes, a flag byte. If the flag is set, a u16 count followed by
/// `4*count+3` unknown bytes; otherwise a single unknown byte.
fn decode_table(c: &mut ByteCursor<'_>, schema: Option<String>) -> DecodeResult<Table> {
    let raw = c.read_u32_le();
    let id = c.require(raw, TABLES, 4)?;
    c.advance(19);
    let raw = c.read_string();
    let name = c.require(raw, TABLES, 2)?.0;
    let raw = c.read_u32_le();
    let parent_id = c.require(raw, TABLES, 4)?;
    c.advance(9);
    let raw = c.read_bool();
    let flag = c.require(raw, TABLES, 1)?;
    if flag {
        let raw = c.read_u16_le();
        let count = c.require(raw, TABLES, 2)? as usize;
        c.advance(4 * count + 3);
    } else {
        c.advance(1);
    }
    Ok(Table {
        id,
        parent_id,
        name,
        schema,
    })
}

/// Everything past the `Tables;` header, to end of file.
///
/// The stored-procedure scan is a blunt regex sweep over this same tail
/// rather than a structured read of the table records, mirroring how the
/// reference reader locates embedded procedure XML: it skips the header
/// and then just grabs the rest of the file without parsing the
/// individual table entries in between.
pub fn tables_section_tail(bytes: &[u8], offset: usize) -> DecodeResult<&[u8]> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    c.advance(2);
    let raw = c.read_string();
    c.require(raw, TABLES, 2)?;
    let raw = c.read_string();
    c.require(raw, TABLES, 2)?;
    c.advance(8); // max_table_id, table_count

    Ok(&bytes[c.position()..])
}

/// Layout: virtual_table_count (u32), then that many `(table_id, select)`
/// records.
pub fn decode_virtual_tables(bytes: &[u8], offset: usize) -> DecodeResult<Vec<VirtualTable>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    let raw = c.read_u32_le();
    let count = c.require(raw, VIRTUAL_TABLES, 4)?;
    let mut tables = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let raw = c.read_u32_le();
        let id = c.require(raw, VIRTUAL_TABLES, 4)?;
        let raw = c.read_string();
        let select = c.require(raw, VIRTUAL_TABLES, 2)?.0;
        tables.push(VirtualTable { id, select });
    }
    Ok(tables)
}
