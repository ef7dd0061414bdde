//! Decodes the mandatory `Joins;` and `Contexts;` sections.

use crate::cursor::ByteCursor;
use crate::error::DecodeResult;
use crate::model::{Context, Join, JoinTerm};

const JOINS: &str = "Joins;";
const CONTEXTS: &str = "Contexts;";

/// Layout: 8 unknown bytes, join_count (u32), that many join records, then
/// 8 trailing unknown bytes.
pub fn decode_joins(bytes: &[u8], offset: usize) -> DecodeResult<Vec<Join>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    c.advance(8);
    let raw = c.read_u32_le();
    let count = c.require(raw, JOINS, 4)?;

    let mut joins = Vec::with_capacity(count as usize);
    for _ in 0..count {
        joins.push(decode_join(&mut c)?);
    }
    c.advance(8);
    Ok(joins)
}

/// Layout: id (u32), 20 unknown bytes, expression string, 8 unknown bytes,
/// term_count (u32), then that many `(term_name, table_id)` pairs.
fn decode_join(c: &mut ByteCursor<'_>) -> DecodeResult<Join> {
    let raw = c.read_u32_le();
    let id = c.require(raw, JOINS, 4)?;
    c.advance(20);
    let raw = c.read_string();
    let expression = c.require(raw, JOINS, 2)?.0.unwrap_or_default();
    c.advance(8);
    let raw = c.read_u32_le();
    let term_count = c.require(raw, JOINS, 4)?;

    let mut terms = Vec::with_capacity(term_count as usize);
    for _ in 0..term_count {
        let raw = c.read_string();
        let column_name = c.require(raw, JOINS, 2)?.0.unwrap_or_default();
        let raw = c.read_u32_le();
        let table_id = c.require(raw, JOINS, 4)?;
        terms.push(JoinTerm { column_name, table_id });
    }
    Ok(Join { id, expression, terms })
}

/// Layout: max_context_id (u32, unused), context_count (u32), then that
/// many context records.
pub fn decode_contexts(bytes: &[u8], offset: usize) -> DecodeResult<Vec<Context>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    let raw = c.read_u32_le();
    c.require(raw, CONTEXTS, 4)?; // max_context_id, unused
    let raw = c.read_u32_le();
    let count = c.require(raw, CONTEXTS, 4)?;

    let mut contexts = Vec::with_capacity(count as usize);
    for _ in 0..count {
        contexts.push(decode_context(&mut c)?);
    }
    Ok(contexts)
}

/// Layout: name string, id (u32), description string, join_count (u32),
/// then that many join ids.
fn decode_context(c: &mut ByteCursor<'_>) -> DecodeResult<Context> {
    let raw = c.read_string();
    let name = c.require(raw, CONTEXTS, 2)?.0.unwrap_or_default();
    let raw = c.read_u32_le();
    let id = c.require(raw, CONTEXTS, 4)?;
    let raw = c.read_string();
    let description = c.require(raw, CONTEXTS, 2)?.0;
    let raw = c.read_u32_le();
    let join_count = c.require(raw, CONTEXTS, 4)?;

    let mut joins = Vec::with_capacity(join_count as usize);
    for _ in 0..join_count {
        let raw = c.read_u32_le();
        joins.push(c.require(raw, CONTEXTS, 4)?);
    }
    Ok(Context {
        id,
        name,
        description,
        joins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_string(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    }

    #[test]
    fn decodes_two_term_join() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&[0u8; 8]);
        buf.extend_from_slice(&1u32.to_le_bytes()); // join_count
        buf.extend_from_slice(&1u32.to_le_bytes()); // join id
        buf.extend_from_slice(&[0u8; 20]);
        push_string(&mut buf, "=");
        buf.extend_from_slice(&[0u8; 8]);
        buf.extend_from_slice(&2u32.to_le_bytes()); // term_count
        push_string(&mut buf, "CustomerId");
        buf.extend_from_slice(&1u32.to_le_bytes());
        push_string(&mut buf, "Id");
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]); // trailing unknown

        let joins = decode_joins(&buf, 0).unwrap();
        assert_eq!(joins.len(), 1);
        assert_eq!(joins[0].expression, "=");
        assert_eq!(joins[0].terms.len(), 2);
        assert_eq!(joins[0].terms[1].table_id, 2);
    }

    #[test]
    fn decodes_context_with_joins() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&5u32.to_le_bytes()); // max_context_id
        buf.extend_from_slice(&1u32.to_le_bytes()); // context_count
        push_string(&mut buf, "Sales");
        buf.extend_from_slice(&1u32.to_le_bytes());
        push_string(&mut buf, "Sales path");
        buf.extend_from_slice(&2u32.to_le_bytes()); // join_count
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&2u32.to_le_bytes());

        let contexts = decode_contexts(&buf, 0).unwrap();
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].name, "Sales");
        assert_eq!(contexts[0].joins, vec![1, 2]);
    }
}
