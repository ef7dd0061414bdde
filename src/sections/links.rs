//! Decodes the mandatory `Links;` and `Hierarchies;` sections.

use crate::cursor::ByteCursor;
use crate::error::DecodeResult;
use crate::model::{Hierarchy, Link};

const LINKS: &str = "Links;";
const HIERARCHIES: &str = "Hierarchies;";

/// Layout: max_link_id (u32, unused), link_count (u32), then that many
/// link records.
pub fn decode_links(bytes: &[u8], offset: usize) -> DecodeResult<Vec<Link>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    let raw = c.read_u32_le();
    c.require(raw, LINKS, 4)?; // max_link_id, unused
    let raw = c.read_u32_le();
    let count = c.require(raw, LINKS, 4)?;

    let mut links = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let raw = c.read_string();
        let name = c.require(raw, LINKS, 2)?.0.unwrap_or_default();
        let raw = c.read_u32_le();
        let id = c.require(raw, LINKS, 4)?;
        let raw = c.read_string();
        let description = c.require(raw, LINKS, 2)?.0;
        let raw = c.read_string();
        let linked_universe = c.require(raw, LINKS, 2)?.0;
        links.push(Link {
            id,
            name,
            description,
            linked_universe,
        });
    }
    Ok(links)
}

/// Layout: max_hierarchy_id (u32, unused), hierarchy_count (u32), then
/// that many hierarchy records.
pub fn decode_hierarchies(bytes: &[u8], offset: usize) -> DecodeResult<Vec<Hierarchy>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    let raw = c.read_u32_le();
    c.require(raw, HIERARCHIES, 4)?; // max_hierarchy_id, unused
    let raw = c.read_u32_le();
    let count = c.require(raw, HIERARCHIES, 4)?;

    let mut hierarchies = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let raw = c.read_string();
        let name = c.require(raw, HIERARCHIES, 2)?.0.unwrap_or_default();
        let raw = c.read_u32_le();
        let id = c.require(raw, HIERARCHIES, 4)?;
        let raw = c.read_string();
        let description = c.require(raw, HIERARCHIES, 2)?.0;
        let raw = c.read_u32_le();
        let level_count = c.require(raw, HIERARCHIES, 4)?;

        let mut levels = Vec::with_capacity(level_count as usize);
        for _ in 0..level_count {
            let raw = c.read_u32_le();
            levels.push(c.require(raw, HIERARCHIES, 4)?);
        }
        hierarchies.push(Hierarchy {
            id,
            name,
            description,
            levels,
        });
    }
    Ok(hierarchies)
}
