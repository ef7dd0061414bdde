//! Decodes the mandatory `Objects;` section into the class/object/condition
//! arena.
//!
//! Classes nest arbitrarily deep, so decoding happens in two passes per
//! node: first the class's own fields and its objects/conditions, then its
//! subclasses, recursively. Each class is pushed into the arena before its
//! subclasses are decoded, so a parent's arena index is always smaller
//! than any of its descendants'.

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use crate::model::{Class, ClassId, Condition, Object};

const SECTION: &str = "Objects;";

/// Layout: class_count, object_count, condition_count, rootclass_count (4
/// u32s, only the last is used to drive iteration), then `rootclass_count`
/// root class records.
pub fn decode_classes(bytes: &[u8], offset: usize) -> DecodeResult<(Vec<Class>, Vec<ClassId>)> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    c.advance(12); // class_count, object_count, condition_count: unused
    let raw = c.read_u32_le();
    let root_count = c.require(raw, SECTION, 4)?;

    let mut arena = Vec::new();
    let mut roots = Vec::with_capacity(root_count as usize);
    for _ in 0..root_count {
        let id = decode_class(&mut c, None, &mut arena)?;
        roots.push(id);
    }
    Ok((arena, roots))
}

/// Layout: id (u32), name, parent_id (u32, must match the owning class's
/// id, or 0 at the root), description, 7 unknown bytes, object_count
/// (u32), objects, condition_count (u32), conditions, subclass_count
/// (u32), subclasses.
fn decode_class(
    c: &mut ByteCursor<'_>,
    parent: Option<ClassId>,
    arena: &mut Vec<Class>,
) -> DecodeResult<ClassId> {
    let raw = c.read_u32_le();
    let id = c.require(raw, SECTION, 4)?;
    let raw = c.read_string();
    let name = c.require(raw, SECTION, 2)?.0.unwrap_or_default();
    let raw = c.read_u32_le();
    let parent_id = c.require(raw, SECTION, 4)?;
    check_parent("class", parent, parent_id, &arena[..], id)?;
    let raw = c.read_string();
    let description = c.require(raw, SECTION, 2)?.0;
    c.advance(7);

    let this_id = arena.len();
    arena.push(Class {
        id,
        parent,
        name,
        description,
        objects: Vec::new(),
        conditions: Vec::new(),
        subclasses: Vec::new(),
    });

    let raw = c.read_u32_le();
    let object_count = c.require(raw, SECTION, 4)?;
    let mut objects = Vec::with_capacity(object_count as usize);
    for _ in 0..object_count {
        objects.push(decode_object(c, this_id, id)?);
    }

    let raw = c.read_u32_le();
    let condition_count = c.require(raw, SECTION, 4)?;
    let mut conditions = Vec::with_capacity(condition_count as usize);
    for _ in 0..condition_count {
        conditions.push(decode_condition(c, this_id, id)?);
    }

    arena[this_id].objects = objects;
    arena[this_id].conditions = conditions;

    let raw = c.read_u32_le();
    let subclass_count = c.require(raw, SECTION, 4)?;
    for _ in 0..subclass_count {
        let child_id = decode_class(c, Some(this_id), arena)?;
        arena[this_id].subclasses.push(child_id);
    }

    Ok(this_id)
}

/// Layout: id (u32), name, parent_id (u32), description, select_table_count
/// (u16) + that many unused table ids, where_table_count (u16) + that many
/// unused table ids, select, where, format, an unused string, lov_name, 2
/// unknown bytes, a visibility byte (hidden iff `0x36`), 55 trailing
/// unknown bytes.
fn decode_object(c: &mut ByteCursor<'_>, parent: ClassId, parent_class_id: u32) -> DecodeResult<Object> {
    let raw = c.read_u32_le();
    let id = c.require(raw, SECTION, 4)?;
    let raw = c.read_string();
    let name = c.require(raw, SECTION, 2)?.0.unwrap_or_default();
    let raw = c.read_u32_le();
    let parent_id = c.require(raw, SECTION, 4)?;
    if parent_id != parent_class_id {
        return Err(DecodeError::ParentMismatch {
            record_kind: "object",
            expected: parent_class_id,
            declared: parent_id,
            found: id,
        });
    }
    let raw = c.read_string();
    let description = c.require(raw, SECTION, 2)?.0;

    let raw = c.read_u16_le();
    let select_table_count = c.require(raw, SECTION, 2)?;
    c.advance(4 * select_table_count as usize);
    let raw = c.read_u16_le();
    let where_table_count = c.require(raw, SECTION, 2)?;
    c.advance(4 * where_table_count as usize);

    let raw = c.read_string();
    let select = c.require(raw, SECTION, 2)?.0;
    let raw = c.read_string();
    let where_clause = c.require(raw, SECTION, 2)?.0;
    let raw = c.read_string();
    let format = c.require(raw, SECTION, 2)?.0;
    let raw = c.read_string();
    c.require(raw, SECTION, 2)?; // unused
    let raw = c.read_string();
    let lov_name = c.require(raw, SECTION, 2)?.0;
    c.advance(2);
    let raw = c.read_u8();
    let visibility = c.require(raw, SECTION, 1)?;
    c.advance(55);

    Ok(Object {
        id,
        parent,
        name,
        description,
        select,
        where_clause,
        format,
        lov_name,
        visible: visibility != 0x36,
    })
}

/// Layout: id (u32), name, parent_id (u32), description, where_table_count
/// (u16) + unused ids, a second unused table-id count (u16) + ids, where.
fn decode_condition(c: &mut ByteCursor<'_>, parent: ClassId, parent_class_id: u32) -> DecodeResult<Condition> {
    let raw = c.read_u32_le();
    let id = c.require(raw, SECTION, 4)?;
    let raw = c.read_string();
    let name = c.require(raw, SECTION, 2)?.0.unwrap_or_default();
    let raw = c.read_u32_le();
    let parent_id = c.require(raw, SECTION, 4)?;
    if parent_id != parent_class_id {
        return Err(DecodeError::ParentMismatch {
            record_kind: "condition",
            expected: parent_class_id,
            declared: parent_id,
            found: id,
        });
    }
    let raw = c.read_string();
    let description = c.require(raw, SECTION, 2)?.0;

    let raw = c.read_u16_le();
    let where_table_count = c.require(raw, SECTION, 2)?;
    c.advance(4 * where_table_count as usize);
    let raw = c.read_u16_le();
    let unknown_table_count = c.require(raw, SECTION, 2)?;
    c.advance(4 * unknown_table_count as usize);

    let raw = c.read_string();
    let where_clause = c.require(raw, SECTION, 2)?.0;

    Ok(Condition {
        id,
        parent,
        name,
        description,
        where_clause,
    })
}

fn check_parent(
    kind: &'static str,
    parent: Option<ClassId>,
    declared_parent_id: u32,
    arena: &[Class],
    found: u32,
) -> DecodeResult<()> {
    match parent {
        Some(parent_idx) => {
            let expected = arena[parent_idx].id;
            if declared_parent_id != expected {
                return Err(DecodeError::ParentMismatch {
                    record_kind: kind,
                    expected,
                    declared: declared_parent_id,
                    found,
                });
            }
        }
        None if declared_parent_id != 0 => {
            return Err(DecodeError::ParentMismatch {
                record_kind: kind,
                expected: 0,
                declared: declared_parent_id,
                found,
            });
        }
        None => {}
    }
    Ok(())
}
