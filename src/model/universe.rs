//! The root aggregate: `Universe`, `Parameters`, and the statistics view.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::class::{Class, ClassId, Condition, Object};
use super::join::{Context, Join};
use super::link::{Hierarchy, Link};
use super::sql::expand_sql;
use super::table::{Column, Table, VirtualTable};

/// Universe-level settings from the `Parameters;` section.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    pub universe_filename: Option<String>,
    pub universe_name: Option<String>,
    pub revision: u32,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub created_date: Option<NaiveDate>,
    pub modified_date: Option<NaiveDate>,
    /// Minutes (decoded seconds / 60).
    pub query_time_limit: u32,
    pub query_row_limit: u32,
    pub object_strategy: Option<String>,
    /// Minutes (decoded seconds / 60).
    pub cost_estimate_warning_limit: u32,
    /// Characters.
    pub long_text_limit: u32,
    pub comments: Option<String>,
    pub domain: Option<String>,
    pub dbms_engine: Option<String>,
    pub network_layer: Option<String>,
}

/// Aggregate counts visited over the class/object/condition tree and the
/// table/join/context lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub classes: usize,
    pub objects: usize,
    pub conditions: usize,
    pub tables: usize,
    pub aliases: usize,
    pub joins: usize,
    pub contexts: usize,
}

/// A table record enriched for reporting: a display-safe name, alias
/// validity, column count, and reverse indexes into the objects/joins that
/// reference it. Built by [`crate::analyzer::analyze`].
#[derive(Debug, Clone)]
pub struct EnhancedTable {
    pub id: u32,
    /// `UNNAMED_TABLE_<id>` when the raw name was null, empty, mostly
    /// unprintable, or implausibly long.
    pub name: String,
    pub schema: Option<String>,
    pub is_alias: bool,
    /// `false` when an alias's `parent_id` doesn't resolve to a known table.
    pub is_valid_alias: bool,
    pub column_count: usize,
    pub used_in_objects: Vec<u32>,
    pub used_in_joins: Vec<u32>,
}

/// A pair of contexts, spanned by some object, that share no joins.
#[derive(Debug, Clone)]
pub struct ContextIncompatibility {
    pub object_id: u32,
    pub object_name: String,
    pub context1_id: u32,
    pub context2_id: u32,
}

/// A collected list-of-values reference for an object that names one.
#[derive(Debug, Clone)]
pub struct LovDefinition {
    pub object_id: u32,
    pub object_name: String,
    pub lov_name: String,
    pub select_sql: Option<String>,
}

/// The root aggregate produced by [`crate::parse`].
///
/// Write-once: populated top-to-bottom during decode, frozen before
/// analysis. Analysis mutates only the analyzer-owned fields listed at the
/// bottom of this struct.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    pub parameters: Parameters,
    pub custom_parameters: HashMap<String, String>,
    pub tables: Vec<Table>,
    pub virtual_tables: Vec<VirtualTable>,
    pub columns: Vec<Column>,
    pub joins: Vec<Join>,
    pub contexts: Vec<Context>,
    pub links: Vec<Link>,
    pub hierarchies: Vec<Hierarchy>,

    /// Class arena; see [`super::class`] for why this is index-addressed.
    pub classes: Vec<Class>,
    pub root_classes: Vec<ClassId>,

    /// Raw, unparsed optional-section byte ranges, keyed by marker name.
    pub raw_sections: HashMap<&'static str, Vec<u8>>,

    pub table_index: HashMap<u32, usize>,
    pub object_index: HashMap<u32, (ClassId, usize)>,

    // --- analyzer-owned fields, populated after decode is frozen ---
    /// `obj_<oid>_table_<tid>` / `join_<jid>_table_<tid>` -> true.
    pub cross_references: HashMap<String, bool>,
    pub validation_errors: Vec<crate::diagnostic::Diagnostic>,
    pub dependency_graph: HashMap<u32, Vec<String>>,
    pub database_tables: Vec<EnhancedTable>,
    pub context_incompatibilities: Vec<ContextIncompatibility>,
    pub lov_definitions: HashMap<u32, LovDefinition>,
    pub stored_procedure_parameters: HashMap<String, Vec<crate::procedures::ProcedureParameter>>,
}

impl Universe {
    pub fn table(&self, id: u32) -> Option<&Table> {
        self.table_index.get(&id).map(|&i| &self.tables[i])
    }

    pub fn table_name(&self, id: u32) -> Option<String> {
        self.table(id).and_then(|t| t.name.clone())
    }

    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id)
    }

    pub fn object(&self, id: u32) -> Option<&Object> {
        let (class_id, pos) = *self.object_index.get(&id)?;
        self.classes.get(class_id)?.objects.get(pos)
    }

    /// `parent-class-name.object-name`.
    pub fn object_fullname(&self, id: u32) -> Option<String> {
        let (class_id, pos) = *self.object_index.get(&id)?;
        let class = self.classes.get(class_id)?;
        let object = class.objects.get(pos)?;
        Some(format!("{}.{}", class.name, object.name))
    }

    /// Expand an object's select expression, resolving sentinel table/object
    /// ids against this universe's indexes.
    pub fn object_select_sql(&self, object: &Object) -> Option<String> {
        let sql = object.select.as_deref()?;
        Some(expand_sql(
            sql,
            |id| self.table_name(id),
            |id| self.object_fullname(id),
        ))
    }

    /// Expand an object's where expression.
    pub fn object_where_sql(&self, object: &Object) -> Option<String> {
        let sql = object.where_clause.as_deref()?;
        Some(expand_sql(
            sql,
            |id| self.table_name(id),
            |id| self.object_fullname(id),
        ))
    }

    /// Expand a condition's where expression.
    pub fn condition_where_sql(&self, condition: &Condition) -> Option<String> {
        let sql = condition.where_clause.as_deref()?;
        Some(expand_sql(
            sql,
            |id| self.table_name(id),
            |id| self.object_fullname(id),
        ))
    }

    /// Fully qualified join statement, resolving table names.
    pub fn join_statement(&self, join: &Join) -> String {
        join.statement(|id| self.table_name(id))
    }

    /// Visit every object in the class tree, depth-first.
    pub fn visit_objects<'a>(&'a self, mut f: impl FnMut(&'a Object)) {
        fn walk<'a>(universe: &'a Universe, class_id: ClassId, f: &mut impl FnMut(&'a Object)) {
            let class = &universe.classes[class_id];
            for object in &class.objects {
                f(object);
            }
            for &child in &class.subclasses {
                walk(universe, child, f);
            }
        }
        for &root in &self.root_classes {
            walk(self, root, &mut f);
        }
    }

    /// Recompute the summary statistics by visiting the class tree and
    /// counting tables/joins/contexts.
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            tables: self.tables.iter().filter(|t| !t.is_alias()).count(),
            aliases: self.tables.iter().filter(|t| t.is_alias()).count(),
            joins: self.joins.len(),
            contexts: self.contexts.len(),
            ..Statistics::default()
        };

        fn walk(universe: &Universe, class_id: ClassId, stats: &mut Statistics) {
            let class = &universe.classes[class_id];
            stats.classes += 1;
            stats.objects += class.objects.len();
            stats.conditions += class.conditions.len();
            for &child in &class.subclasses {
                walk(universe, child, stats);
            }
        }
        for &root in &self.root_classes {
            walk(self, root, &mut stats);
        }
        stats
    }
}
