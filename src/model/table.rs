//! Tables, virtual tables, and columns.

/// A source database table, or an alias of one.
///
/// `is_alias` iff `parent_id != 0`; an alias's `parent_id` is expected to
/// eventually resolve to a non-alias table id, though the decoder never
/// enforces that at decode time — an alias whose parent can't be found is
/// flagged during analysis instead (see [`crate::analyzer`]).
#[derive(Debug, Clone)]
pub struct Table {
    pub id: u32,
    pub parent_id: u32,
    /// Absent when the name field was null or failed to decode cleanly.
    pub name: Option<String>,
    pub schema: Option<String>,
}

impl Table {
    pub fn is_alias(&self) -> bool {
        self.parent_id != 0
    }
}

/// A derived table expressed as a SQL select, standing in for a base table.
#[derive(Debug, Clone)]
pub struct VirtualTable {
    pub id: u32,
    pub select: Option<String>,
}

/// A column of a known (or not-yet-resolved) source table.
#[derive(Debug, Clone)]
pub struct Column {
    pub id: u32,
    pub name: Option<String>,
    /// The table id this column was declared against. Resolution against
    /// the universe's table index happens lazily via [`Column::fullname`];
    /// an unresolved id is permitted and simply yields no owner.
    pub table_id: u32,
}

impl Column {
    /// `table.name + "." + name`, when the owning table resolves and has a
    /// name. `None` if either the owner or its name is unavailable.
    pub fn fullname(&self, table_name: Option<&str>) -> Option<String> {
        let table_name = table_name?;
        let name = self.name.as_deref()?;
        Some(format!("{table_name}.{name}"))
    }
}
