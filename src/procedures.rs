//! Stored-procedure parameter extraction.
//!
//! Some universes embed `<Procedure name="...">` XML fragments in the
//! tail of the `Tables;` section — legacy integration metadata the
//! designer tool never surfaced through its UI. The fragments are
//! Windows-1252 text, not UTF-8, and occasionally malformed enough that a
//! real XML parser rejects them, so a fragment that fails to parse falls
//! back to a manual attribute-regex scan rather than being dropped.

use std::collections::HashMap;

use encoding_rs::WINDOWS_1252;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;

/// One `<Parameter name="..." type="..." value="...">` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureParameter {
    pub name: String,
    pub param_type: String,
    pub value: String,
}

static PROCEDURE_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Procedure[^>]*>.*?</Procedure>").unwrap());
static NAME_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"name="([^"]*)""#).unwrap());
static PARAMETER_ATTRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<Parameter\s+name="([^"]*)"[^>]*type="([^"]*)"[^>]*value="([^"]*)""#).unwrap()
});

/// Scan a raw byte blob for embedded procedure XML and return every
/// procedure found with at least one parameter, keyed by procedure name.
pub fn extract_stored_procedure_parameters(blob: &[u8]) -> HashMap<String, Vec<ProcedureParameter>> {
    let (decoded, _, _) = WINDOWS_1252.decode(blob);
    let mut procedures = HashMap::new();

    for found in PROCEDURE_FRAGMENT.find_iter(&decoded) {
        let fragment = found.as_str().replace("&quot;", "\"");
        let parsed = parse_with_quick_xml(&fragment).filter(|(_, params)| !params.is_empty());
        let (name, params) = match parsed {
            Some(result) => result,
            None => match parse_manually(&fragment) {
                Some(result) if !result.1.is_empty() => result,
                _ => continue,
            },
        };
        procedures.insert(name, params);
    }
    procedures
}

fn parse_with_quick_xml(fragment: &str) -> Option<(String, Vec<ProcedureParameter>)> {
    let mut reader = Reader::from_str(fragment);
    let mut buf = Vec::new();
    let mut name = "Unknown".to_string();
    let mut params = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).ok()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().as_ref() == b"Procedure" {
                    if let Some(value) = attr(&e, b"name") {
                        name = value;
                    }
                } else if e.name().as_ref() == b"Parameter" {
                    params.push(ProcedureParameter {
                        name: attr(&e, b"name").unwrap_or_default(),
                        param_type: attr(&e, b"type").unwrap_or_default(),
                        value: attr(&e, b"value").unwrap_or_default(),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Some((name, params))
}

fn attr(tag: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    tag.attributes().flatten().find(|a| a.key.as_ref() == key).and_then(|a| {
        a.unescape_value().ok().map(|v| v.into_owned())
    })
}

fn parse_manually(fragment: &str) -> Option<(String, Vec<ProcedureParameter>)> {
    let name = NAME_ATTR
        .captures(fragment)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let params = PARAMETER_ATTRS
        .captures_iter(fragment)
        .map(|c| ProcedureParameter {
            name: c[1].to_string(),
            param_type: c[2].to_string(),
            value: c[3].to_string(),
        })
        .collect();
    Some((name, params))
}
