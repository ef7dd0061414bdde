//! Cross-reference analysis over an already-decoded universe.
//!
//! Runs after the class tree and every mandatory section has been
//! assembled. Each pass is independent and clears its own output fields
//! first, so `analyze` is safe to re-run.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::{Diagnostic, SqlKind};
use crate::model::{ContextIncompatibility, EnhancedTable, LovDefinition, Object, Universe};

static TABLE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\.").unwrap());

const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "IN", "BETWEEN", "LIKE", "IS", "NULL",
];

/// A flattened, owned snapshot of one object's analysis-relevant fields.
/// Collecting these up front lets every later pass take `&mut Universe`
/// without fighting the class arena's borrow.
struct ObjectView {
    id: u32,
    name: String,
    select_sql: Option<String>,
    where_sql: Option<String>,
    lov_name: Option<String>,
}

fn collect_objects(universe: &Universe) -> Vec<ObjectView> {
    let mut out = Vec::new();
    universe.visit_objects(|object: &Object| {
        out.push(ObjectView {
            id: object.id,
            name: object.name.clone(),
            select_sql: universe.object_select_sql(object),
            where_sql: universe.object_where_sql(object),
            lov_name: object.lov_name.clone(),
        });
    });
    out
}

/// Run every analysis pass, in the order the reference tool performs them:
/// enhanced tables first (everything else keys off table names), then
/// cross-references, validation, the dependency graph, context
/// incompatibilities, and LOV definitions.
pub fn analyze(universe: &mut Universe) {
    build_enhanced_tables(universe);
    cross_reference(universe);
    validate(universe);
    build_dependency_graph(universe);
    analyze_context_incompatibilities(universe);
    extract_lov_definitions(universe);
}

fn extract_table_references(sql: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut refs = Vec::new();
    for cap in TABLE_REFERENCE.captures_iter(sql) {
        let name = &cap[1];
        if SQL_KEYWORDS.contains(&name.to_ascii_uppercase().as_str()) {
            continue;
        }
        if seen.insert(name.to_string()) {
            refs.push(name.to_string());
        }
    }
    refs
}

fn table_name_index(universe: &Universe) -> HashMap<String, u32> {
    universe
        .tables
        .iter()
        .filter_map(|t| t.name.as_ref().map(|n| (n.clone(), t.id)))
        .collect()
}

fn is_plausible_name(name: &str) -> bool {
    if name.trim().is_empty() || name.chars().count() > 256 {
        return false;
    }
    let total = name.chars().count().max(1) as f64;
    let printable = name.chars().filter(|c| !c.is_control()).count() as f64;
    printable / total >= 0.7
}

fn build_enhanced_tables(universe: &mut Universe) {
    let snapshot = universe.tables.clone();
    let mut column_counts: HashMap<u32, usize> = HashMap::new();
    for column in &universe.columns {
        *column_counts.entry(column.table_id).or_insert(0) += 1;
    }

    let mut tables = Vec::with_capacity(snapshot.len());
    for table in &snapshot {
        let name = match &table.name {
            Some(raw) if is_plausible_name(raw) => raw.clone(),
            raw => {
                if let Some(raw) = raw {
                    universe.validation_errors.push(Diagnostic::SuspiciousTableName {
                        table_id: table.id,
                        raw_len: raw.len(),
                    });
                }
                format!("UNNAMED_TABLE_{}", table.id)
            }
        };

        let is_valid_alias = !table.is_alias() || universe.table_index.contains_key(&table.parent_id);
        if table.is_alias() && !is_valid_alias {
            universe.validation_errors.push(Diagnostic::InvalidAlias {
                table_id: table.id,
                parent_id: table.parent_id,
            });
        }

        tables.push(EnhancedTable {
            id: table.id,
            name,
            schema: table.schema.clone(),
            is_alias: table.is_alias(),
            is_valid_alias,
            column_count: column_counts.get(&table.id).copied().unwrap_or(0),
            used_in_objects: Vec::new(),
            used_in_joins: Vec::new(),
        });
    }

    let mut used_in_joins: HashMap<u32, Vec<u32>> = HashMap::new();
    for join in &universe.joins {
        for term in &join.terms {
            used_in_joins.entry(term.table_id).or_default().push(join.id);
        }
    }
    for table in &mut tables {
        if let Some(joins) = used_in_joins.remove(&table.id) {
            table.used_in_joins = joins;
        }
    }
    universe.database_tables = tables;
}

fn cross_reference(universe: &mut Universe) {
    universe.cross_references.clear();
    let objects = collect_objects(universe);
    let table_ids = table_name_index(universe);

    for object in &objects {
        let Some(sql) = &object.select_sql else { continue };
        for table_name in extract_table_references(sql) {
            let Some(&table_id) = table_ids.get(&table_name) else { continue };
            universe
                .cross_references
                .insert(format!("obj_{}_table_{}", object.id, table_id), true);
            if let Some(enhanced) = universe.database_tables.iter_mut().find(|t| t.id == table_id) {
                enhanced.used_in_objects.push(object.id);
            }
        }
    }

    let joins = universe.joins.clone();
    for join in &joins {
        let statement = universe.join_statement(join);
        for table_name in extract_table_references(&statement) {
            if let Some(&table_id) = table_ids.get(&table_name) {
                universe
                    .cross_references
                    .insert(format!("join_{}_table_{}", join.id, table_id), true);
            }
        }
    }
}

fn validate(universe: &mut Universe) {
    universe.validation_errors.retain(|d| {
        !matches!(d, Diagnostic::BrokenReference { .. } | Diagnostic::OrphanedObject { .. })
    });
    let objects = collect_objects(universe);
    let table_ids = table_name_index(universe);

    for object in &objects {
        if let Some(sql) = &object.select_sql {
            let refs = extract_table_references(sql);
            for table_name in &refs {
                if !table_ids.contains_key(table_name) {
                    universe.validation_errors.push(Diagnostic::BrokenReference {
                        object_id: object.id,
                        object_name: object.name.clone(),
                        sql_kind: SqlKind::Select,
                        reference: table_name.clone(),
                    });
                }
            }
            if refs.is_empty() {
                universe.validation_errors.push(Diagnostic::OrphanedObject {
                    object_id: object.id,
                    object_name: object.name.clone(),
                });
            }
        }
        if let Some(sql) = &object.where_sql {
            for table_name in extract_table_references(sql) {
                if !table_ids.contains_key(&table_name) {
                    universe.validation_errors.push(Diagnostic::BrokenReference {
                        object_id: object.id,
                        object_name: object.name.clone(),
                        sql_kind: SqlKind::Where,
                        reference: table_name,
                    });
                }
            }
        }
    }
}

fn build_dependency_graph(universe: &mut Universe) {
    universe.dependency_graph.clear();
    let objects = collect_objects(universe);
    for object in &objects {
        let mut deps = Vec::new();
        if let Some(sql) = &object.select_sql {
            deps.extend(extract_table_references(sql));
        }
        if let Some(sql) = &object.where_sql {
            deps.extend(extract_table_references(sql));
        }
        universe.dependency_graph.insert(object.id, deps);
    }
}

fn analyze_context_incompatibilities(universe: &mut Universe) {
    universe.context_incompatibilities.clear();
    let objects = collect_objects(universe);
    let table_ids = table_name_index(universe);

    let context_tables: HashMap<u32, HashSet<u32>> = universe
        .contexts
        .iter()
        .map(|context| {
            let tables = context
                .joins
                .iter()
                .filter_map(|join_id| universe.joins.iter().find(|j| j.id == *join_id))
                .flat_map(|join| join.terms.iter().map(|t| t.table_id))
                .collect();
            (context.id, tables)
        })
        .collect();

    let context_joins: HashMap<u32, HashSet<u32>> = universe
        .contexts
        .iter()
        .map(|c| (c.id, c.joins.iter().copied().collect()))
        .collect();

    for object in &objects {
        let Some(sql) = &object.select_sql else { continue };
        let mut spanned: HashSet<u32> = HashSet::new();
        for table_name in extract_table_references(sql) {
            let Some(&table_id) = table_ids.get(&table_name) else { continue };
            for (&context_id, tables) in &context_tables {
                if tables.contains(&table_id) {
                    spanned.insert(context_id);
                }
            }
        }
        if spanned.len() < 2 {
            continue;
        }
        let spanned: Vec<u32> = spanned.into_iter().collect();
        for i in 0..spanned.len() {
            for j in (i + 1)..spanned.len() {
                let (c1, c2) = (spanned[i], spanned[j]);
                let share_a_join = context_joins
                    .get(&c1)
                    .zip(context_joins.get(&c2))
                    .is_some_and(|(a, b)| a.intersection(b).next().is_some());
                if !share_a_join {
                    universe.context_incompatibilities.push(ContextIncompatibility {
                        object_id: object.id,
                        object_name: object.name.clone(),
                        context1_id: c1,
                        context2_id: c2,
                    });
                    universe.validation_errors.push(Diagnostic::IncompatibleContexts {
                        object_id: object.id,
                        object_name: object.name.clone(),
                        context1_id: c1,
                        context2_id: c2,
                    });
                }
            }
        }
    }
}

fn extract_lov_definitions(universe: &mut Universe) {
    universe.lov_definitions.clear();
    let objects = collect_objects(universe);
    for object in &objects {
        let Some(lov_name) = &object.lov_name else { continue };
        universe.lov_definitions.insert(
            object.id,
            LovDefinition {
                object_id: object.id,
                object_name: object.name.clone(),
                lov_name: lov_name.clone(),
                select_sql: object.select_sql.clone(),
            },
        );
    }
}
