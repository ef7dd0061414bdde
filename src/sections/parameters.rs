//! Decodes the mandatory `Parameters;` and `Parameters_6_0;` sections.

use std::collections::HashMap;

use crate::cursor::ByteCursor;
use crate::date::decode_date;
use crate::diagnostic::Diagnostic;
use crate::error::DecodeResult;
use crate::model::Parameters;

const SECTION: &str = "Parameters;";
const CUSTOM_SECTION: &str = "Parameters_6_0;";

/// Layout, in order: 2 unknown u32s, filename, name, revision (u32), an
/// unknown u16, description, created_by, modified_by, created_date (u32
/// date index), modified_date (u32 date index), query_time_limit seconds
/// (u32), query_row_limit (u32), an unused string, object_strategy, an
/// unknown byte, cost_estimate_warning_limit seconds (u32), long_text_limit
/// (u32), 4 unknown bytes, comments, 3 unknown u32s, domain, dbms_engine,
/// network_layer.
pub fn decode_parameters(
    bytes: &[u8],
    offset: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> DecodeResult<Parameters> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    c.advance(8);
    let universe_filename = c.require(c.read_string(), SECTION, 2)?.0;
    let universe_name = c.require(c.read_string(), SECTION, 2)?.0;
    let revision = c.require(c.read_u32_le(), SECTION, 4)?;
    c.advance(2);
    let description = c.require(c.read_string_diag("Parameters;.description", diagnostics), SECTION, 2)?;
    let created_by = c.require(c.read_string_diag("Parameters;.created_by", diagnostics), SECTION, 2)?;
    let modified_by = c.require(c.read_string_diag("Parameters;.modified_by", diagnostics), SECTION, 2)?;
    let created = c.require(c.read_u32_le(), SECTION, 4)?;
    let modified = c.require(c.read_u32_le(), SECTION, 4)?;
    let created_date = date_or_diagnostic(created, "Parameters;.created_date", diagnostics);
    let modified_date = date_or_diagnostic(modified, "Parameters;.modified_date", diagnostics);
    let query_time_limit = c.require(c.read_u32_le(), SECTION, 4)? / 60;
    let query_row_limit = c.require(c.read_u32_le(), SECTION, 4)?;
    c.require(c.read_string(), SECTION, 2)?;
    let object_strategy = c.require(c.read_string(), SECTION, 2)?.0;
    c.advance(1);
    let cost_estimate_warning_limit = c.require(c.read_u32_le(), SECTION, 4)? / 60;
    let long_text_limit = c.require(c.read_u32_le(), SECTION, 4)?;
    c.advance(4);
    let comments = c.require(c.read_string_diag("Parameters;.comments", diagnostics), SECTION, 2)?;
    c.advance(12);
    let domain = c.require(c.read_string_diag("Parameters;.domain", diagnostics), SECTION, 2)?;
    let dbms_engine = c.require(c.read_string(), SECTION, 2)?.0;
    let network_layer = c.require(c.read_string(), SECTION, 2)?.0;

    Ok(Parameters {
        universe_filename,
        universe_name,
        revision,
        description,
        created_by,
        modified_by,
        created_date,
        modified_date,
        query_time_limit,
        query_row_limit,
        object_strategy,
        cost_estimate_warning_limit,
        long_text_limit,
        comments,
        domain,
        dbms_engine,
        network_layer,
    })
}

fn date_or_diagnostic(
    index: u32,
    context: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<chrono::NaiveDate> {
    if index < crate::date::EPOCH_INDEX {
        diagnostics.push(Diagnostic::DateOutOfRange {
            context: context.to_string(),
            index,
        });
    }
    Some(decode_date(index))
}

/// Layout: a u32 count followed by that many `(name, value)` string pairs.
pub fn decode_custom_parameters(bytes: &[u8], offset: usize) -> DecodeResult<HashMap<String, String>> {
    let mut c = ByteCursor::new(bytes);
    c.seek(offset);

    let count = c.require(c.read_u32_le(), CUSTOM_SECTION, 4)?;
    let mut params = HashMap::with_capacity(count as usize);
    for _ in 0..count {
        let name = c.require(c.read_string(), CUSTOM_SECTION, 2)?.0.unwrap_or_default();
        let value = c.require(c.read_string(), CUSTOM_SECTION, 2)?.0.unwrap_or_default();
        params.insert(name, value);
    }
    Ok(params)
}
