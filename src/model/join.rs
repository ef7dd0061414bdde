//! Joins and the contexts that group them into coherent query paths.

/// A SQL join expression between table terms.
#[derive(Debug, Clone)]
pub struct Join {
    pub id: u32,
    /// Template string: for a 2-term join this is infixed between the
    /// terms; for N terms, each `0x01` byte is a placeholder filled in
    /// order by a fully-qualified term.
    pub expression: String,
    pub terms: Vec<JoinTerm>,
}

/// One `(column, table)` pair participating in a join.
#[derive(Debug, Clone)]
pub struct JoinTerm {
    pub column_name: String,
    pub table_id: u32,
}

impl Join {
    /// Reconstruct the join's executable SQL-like statement.
    ///
    /// `table_name` resolves a term's table id to its name (or `None` if
    /// unresolved, which renders as `UnknownTable_<id>`).
    pub fn statement(&self, mut table_name: impl FnMut(u32) -> Option<String>) -> String {
        let fullterm = |term: &JoinTerm, table_name: &mut dyn FnMut(u32) -> Option<String>| {
            let table = table_name(term.table_id)
                .unwrap_or_else(|| format!("UnknownTable_{}", term.table_id));
            format!("{}.{}", table, term.column_name)
        };

        if self.terms.len() == 2 {
            format!(
                "{}{}{}",
                fullterm(&self.terms[0], &mut table_name),
                self.expression,
                fullterm(&self.terms[1], &mut table_name)
            )
        } else {
            let mut out = String::with_capacity(self.expression.len());
            let mut terms = self.terms.iter();
            for ch in self.expression.chars() {
                if ch == '\u{1}' {
                    if let Some(term) = terms.next() {
                        out.push_str(&fullterm(term, &mut table_name));
                        continue;
                    }
                }
                out.push(ch);
            }
            out
        }
    }
}

/// A named set of join ids forming a coherent query path.
#[derive(Debug, Clone)]
pub struct Context {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub joins: Vec<u32>,
}
