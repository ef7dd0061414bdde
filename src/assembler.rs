//! Builds the derived indexes the rest of the model resolves ids through.
//!
//! Runs once, right after every mandatory section has decoded and the
//! class tree is in place. `table_index` is built first since SQL
//! expansion and join statement reconstruction both resolve table ids
//! lazily through it; `object_index` follows from a single depth-first
//! walk of the class arena.

use std::collections::HashMap;

use crate::diagnostic::Diagnostic;
use crate::model::Universe;

pub fn assemble(universe: &mut Universe) {
    universe.table_index = universe
        .tables
        .iter()
        .enumerate()
        .map(|(pos, table)| (table.id, pos))
        .collect();

    let mut object_index = HashMap::new();
    for (class_id, class) in universe.classes.iter().enumerate() {
        for (pos, object) in class.objects.iter().enumerate() {
            object_index.insert(object.id, (class_id, pos));
        }
    }
    universe.object_index = object_index;

    for column in &universe.columns {
        if !universe.table_index.contains_key(&column.table_id) {
            universe.validation_errors.push(Diagnostic::OrphanedColumn {
                column_id: column.id,
                table_id: column.table_id,
            });
        }
    }
}
