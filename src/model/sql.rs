//! SQL ID expansion.
//!
//! Select/where strings embed two kinds of deferred identifier: a `0x03`
//! byte followed by 1-4 ASCII digits denotes a table id, and a `0x02` byte
//! followed by 1-4 ASCII digits denotes an object id. `expand_sql` replaces
//! each sentinel with the resolved name, leaving every other byte exactly
//! as it was: only the sentinel bytes ever change.

/// One piece of a scanned SQL string: either a literal run of bytes, or a
/// typed sentinel reference to expand.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SqlToken<'a> {
    Literal(&'a str),
    TableRef(u32),
    ObjectRef(u32),
}

/// Scan `sql` into literal runs and sentinel references, in order.
fn tokenize(sql: &str) -> Vec<SqlToken<'_>> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let sentinel = bytes[i];
        if sentinel == 0x02 || sentinel == 0x03 {
            let digits_start = i + 1;
            let mut digits_end = digits_start;
            while digits_end < bytes.len()
                && digits_end - digits_start < 4
                && bytes[digits_end].is_ascii_digit()
            {
                digits_end += 1;
            }
            if digits_end > digits_start {
                if literal_start < i {
                    tokens.push(SqlToken::Literal(&sql[literal_start..i]));
                }
                let id: u32 = sql[digits_start..digits_end].parse().unwrap_or(0);
                tokens.push(if sentinel == 0x03 {
                    SqlToken::TableRef(id)
                } else {
                    SqlToken::ObjectRef(id)
                });
                i = digits_end;
                literal_start = i;
                continue;
            }
        }
        i += 1;
    }
    if literal_start < bytes.len() {
        tokens.push(SqlToken::Literal(&sql[literal_start..]));
    }
    tokens
}

/// Expand a raw select/where string's sentinel-tagged ids into names.
///
/// `table_name(id)` resolves a table id to its name; `object_fullname(id)`
/// resolves an object id to its `parent-name.object-name`. Unresolvable ids
/// render as `UnknownTable_<id>` / `UnknownObject_<id>`.
pub fn expand_sql(
    sql: &str,
    mut table_name: impl FnMut(u32) -> Option<String>,
    mut object_fullname: impl FnMut(u32) -> Option<String>,
) -> String {
    let mut out = String::with_capacity(sql.len());
    for token in tokenize(sql) {
        match token {
            SqlToken::Literal(s) => out.push_str(s),
            SqlToken::TableRef(id) => {
                out.push_str(&table_name(id).unwrap_or_else(|| format!("UnknownTable_{id}")))
            }
            SqlToken::ObjectRef(id) => {
                out.push_str(&object_fullname(id).unwrap_or_else(|| format!("UnknownObject_{id}")))
            }
        }
    }
    out
}
