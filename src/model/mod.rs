//! The decoded semantic model: universe, parameters, tables, classes,
//! joins, contexts, links, hierarchies, and the derived analyzer outputs.

mod class;
mod join;
mod link;
mod sql;
mod table;
mod universe;

pub use class::{Class, ClassId, Condition, Object};
pub use join::{Context, Join, JoinTerm};
pub use link::{Hierarchy, Link};
pub use sql::expand_sql;
pub use table::{Column, Table, VirtualTable};
pub use universe::{
    ContextIncompatibility, EnhancedTable, LovDefinition, Parameters, Statistics, Universe,
};
