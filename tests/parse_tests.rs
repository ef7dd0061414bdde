//! End-to-end decode tests over synthetic `.unv`-shaped byte buffers.
//!
//! No committed binary `.unv` fixtures ship with this crate (see
//! DESIGN.md); these buffers are built by hand in the documented wire
//! format instead, exercising every mandatory section plus a handful of
//! optional ones, the alias invariant, SQL sentinel expansion, and the
//! stored-procedure fallback extraction.

use pretty_assertions::assert_eq;

use univ_decoder::diagnostic::Diagnostic;
use univ_decoder::parse;

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn push_empty_string(buf: &mut Vec<u8>) {
    buf.extend_from_slice(&0u16.to_le_bytes());
}

fn push_marker(buf: &mut Vec<u8>, marker: &str) {
    buf.push(0x00);
    buf.extend_from_slice(marker.as_bytes());
}

fn push_parameters_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Parameters;");
    buf.extend_from_slice(&[0u8; 8]);
    push_string(buf, "sales.unv");
    push_string(buf, "Sales Universe");
    buf.extend_from_slice(&3u32.to_le_bytes()); // revision
    buf.extend_from_slice(&[0u8; 2]);
    push_string(buf, "a sample sales universe");
    push_string(buf, "peckhda");
    push_string(buf, "peckhda");
    buf.extend_from_slice(&2_455_090u32.to_le_bytes()); // created_date: 2009-09-15
    buf.extend_from_slice(&2_455_090u32.to_le_bytes()); // modified_date
    buf.extend_from_slice(&2_220u32.to_le_bytes()); // query_time_limit seconds -> 37 min
    buf.extend_from_slice(&54321u32.to_le_bytes()); // query_row_limit
    push_empty_string(buf); // unused
    push_string(buf, "default");
    buf.push(0);
    buf.extend_from_slice(&0u32.to_le_bytes()); // cost_estimate_warning_limit
    buf.extend_from_slice(&1234u32.to_le_bytes()); // long_text_limit
    buf.extend_from_slice(&[0u8; 4]);
    push_string(buf, "sample comments");
    buf.extend_from_slice(&[0u8; 12]);
    push_string(buf, "Sample Domain");
    push_string(buf, "Generic ODBC3 datasource");
    push_string(buf, "ODBC");
}

fn push_custom_parameters_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Parameters_6_0;");
    buf.extend_from_slice(&2u32.to_le_bytes());
    push_string(buf, "OLAP_UNIVERSE");
    push_string(buf, "No");
    push_string(buf, "ANSI92");
    push_string(buf, "YES");
}

/// Two base tables (Orders id=1, Customers id=2) and one alias of Orders
/// (id=3, parent_id=1).
fn push_tables_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Tables;");
    buf.extend_from_slice(&[0u8; 2]);
    push_string(buf, "sa");
    push_string(buf, "dbo");
    buf.extend_from_slice(&3u32.to_le_bytes()); // max_table_id
    buf.extend_from_slice(&3u32.to_le_bytes()); // table_count

    for (id, name, parent_id) in [(1u32, "Orders", 0u32), (2, "Customers", 0), (3, "Orders_Alias", 1)] {
        buf.extend_from_slice(&id.to_le_bytes());
        buf.extend_from_slice(&[0u8; 19]);
        push_string(buf, name);
        buf.extend_from_slice(&parent_id.to_le_bytes());
        buf.extend_from_slice(&[0u8; 9]);
        buf.push(0);
        buf.push(0);
    }
}

fn push_virtual_tables_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Virtual Tables;");
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&50u32.to_le_bytes());
    push_string(buf, "SELECT region, SUM(amount) FROM regional_sales GROUP BY region");
}

/// Columns on Orders (id, CustomerId) and Customers (Id, Name).
fn push_columns_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Columns Id;");
    buf.extend_from_slice(&4u32.to_le_bytes());
    buf.extend_from_slice(&4u32.to_le_bytes());

    for (id, table_id, name) in [
        (40u32, 1u32, "CustomerId"),
        (10, 1, "Id"),
        (30, 2, "Id"),
        (20, 2, "Name"),
    ] {
        buf.extend_from_slice(&id.to_le_bytes());
        buf.extend_from_slice(&table_id.to_le_bytes());
        push_string(buf, name);
    }
}

/// One two-term join: Orders.CustomerId = Customers.Id.
fn push_joins_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Joins;");
    buf.extend_from_slice(&[0u8; 8]);
    buf.extend_from_slice(&1u32.to_le_bytes()); // join_count
    buf.extend_from_slice(&1u32.to_le_bytes()); // join id
    buf.extend_from_slice(&[0u8; 20]);
    push_string(buf, "=");
    buf.extend_from_slice(&[0u8; 8]);
    buf.extend_from_slice(&2u32.to_le_bytes()); // term_count
    push_string(buf, "CustomerId");
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "Id");
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
}

fn push_contexts_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Contexts;");
    buf.extend_from_slice(&1u32.to_le_bytes()); // max_context_id
    buf.extend_from_slice(&1u32.to_le_bytes()); // context_count
    push_string(buf, "Sales path");
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "Orders joined to Customers");
    buf.extend_from_slice(&1u32.to_le_bytes()); // join_count
    buf.extend_from_slice(&1u32.to_le_bytes());
}

fn push_links_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Links;");
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "Finance Link");
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "Links to the finance universe");
    push_string(buf, "Finance.unv");
}

fn push_hierarchies_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Hierarchies;");
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "Customer Geography");
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "drill path");
    buf.extend_from_slice(&1u32.to_le_bytes()); // level_count
    buf.extend_from_slice(&200u32.to_le_bytes()); // object id
}

fn push_object(
    buf: &mut Vec<u8>,
    id: u32,
    name: &str,
    parent_class_id: u32,
    select: &str,
    lov_name: Option<&str>,
    hidden: bool,
) {
    buf.extend_from_slice(&id.to_le_bytes());
    push_string(buf, name);
    buf.extend_from_slice(&parent_class_id.to_le_bytes());
    push_empty_string(buf); // description
    buf.extend_from_slice(&0u16.to_le_bytes()); // select_table_count
    buf.extend_from_slice(&0u16.to_le_bytes()); // where_table_count
    push_string(buf, select);
    push_empty_string(buf); // where
    push_empty_string(buf); // format
    push_empty_string(buf); // unused
    match lov_name {
        Some(lov) => push_string(buf, lov),
        None => push_empty_string(buf),
    }
    buf.extend_from_slice(&[0u8; 2]);
    buf.push(if hidden { 0x36 } else { 0x00 });
    buf.extend_from_slice(&[0u8; 55]);
}

/// One root class "Sales" (id=1) with two objects:
/// - 100 "Customer Name" selecting `Customers.Name` via table sentinel 2.
/// - 101 "Bad Reference" selecting a table id (99) that doesn't exist, to
///   exercise the broken-reference diagnostic.
/// One subclass "Sales Detail" (id=2, parent 1) with one object (200,
/// "Order Total") carrying a LOV name, plus one condition.
fn push_classes_section(buf: &mut Vec<u8>) {
    push_marker(buf, "Objects;");
    buf.extend_from_slice(&[0u8; 12]);
    buf.extend_from_slice(&1u32.to_le_bytes()); // rootclass_count

    // root class 1: Sales
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_string(buf, "Sales");
    buf.extend_from_slice(&0u32.to_le_bytes()); // parent_id (root)
    push_string(buf, "Sales facts");
    buf.extend_from_slice(&[0u8; 7]);

    buf.extend_from_slice(&2u32.to_le_bytes()); // object_count
    push_object(buf, 100, "Customer Name", 1, "\u{3}2.Name", None, false);
    push_object(buf, 101, "Bad Reference", 1, "\u{3}99.Whatever", None, false);

    buf.extend_from_slice(&0u32.to_le_bytes()); // condition_count

    buf.extend_from_slice(&1u32.to_le_bytes()); // subclass_count

    // subclass 2: Sales Detail, parent 1
    buf.extend_from_slice(&2u32.to_le_bytes());
    push_string(buf, "Sales Detail");
    buf.extend_from_slice(&1u32.to_le_bytes()); // parent_id == owning class id
    push_empty_string(buf);
    buf.extend_from_slice(&[0u8; 7]);

    buf.extend_from_slice(&1u32.to_le_bytes()); // object_count
    push_object(buf, 200, "Order Total", 2, "\u{3}1.CustomerId", Some("Order Total LOV"), false);

    buf.extend_from_slice(&1u32.to_le_bytes()); // condition_count
    buf.extend_from_slice(&300u32.to_le_bytes()); // condition id
    push_string(buf, "Recent Orders");
    buf.extend_from_slice(&2u32.to_le_bytes()); // parent_id == owning class id
    push_empty_string(buf); // description
    buf.extend_from_slice(&0u16.to_le_bytes()); // where_table_count
    buf.extend_from_slice(&0u16.to_le_bytes()); // unused table-id count
    push_string(buf, "\u{3}1.OrderDate > '2020-01-01'");

    buf.extend_from_slice(&0u32.to_le_bytes()); // subclass_count
}

fn push_optional_section(buf: &mut Vec<u8>, marker: &str, body: &[u8]) {
    push_marker(buf, marker);
    buf.extend_from_slice(body);
}

fn full_universe_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    push_parameters_section(&mut buf);
    push_custom_parameters_section(&mut buf);
    push_tables_section(&mut buf);
    push_virtual_tables_section(&mut buf);
    push_columns_section(&mut buf);
    push_joins_section(&mut buf);
    push_contexts_section(&mut buf);
    push_links_section(&mut buf);
    push_hierarchies_section(&mut buf);
    push_optional_section(&mut buf, "Platform;", b"Windows NT");
    push_classes_section(&mut buf);

    // Trailing stored-procedure XML: tables_section_tail reads from right
    // after the Tables; header to end-of-file, so appending it here
    // exercises the extractor against the full remaining buffer.
    buf.extend_from_slice(
        br#"<Procedure name="RefreshSalesSummary"><Parameter name="AsOfDate" type="date" value="2020-01-01"/></Procedure>"#,
    );
    buf
}

#[test]
fn decodes_every_mandatory_section() {
    let outcome = parse(&full_universe_bytes()).expect("full universe decodes");
    let universe = &outcome.universe;

    assert_eq!(
        universe.parameters.universe_name.as_deref(),
        Some("Sales Universe")
    );
    assert_eq!(universe.parameters.revision, 3);
    assert_eq!(universe.parameters.query_time_limit, 37);
    assert_eq!(universe.parameters.long_text_limit, 1234);
    assert_eq!(
        universe.parameters.dbms_engine.as_deref(),
        Some("Generic ODBC3 datasource")
    );

    assert_eq!(
        universe.custom_parameters.get("OLAP_UNIVERSE").map(String::as_str),
        Some("No")
    );
    assert_eq!(
        universe.custom_parameters.get("ANSI92").map(String::as_str),
        Some("YES")
    );

    let stats = universe.statistics();
    assert_eq!(stats.classes, 2);
    assert_eq!(stats.objects, 3);
    assert_eq!(stats.conditions, 1);
    assert_eq!(stats.tables, 2); // Orders, Customers (alias excluded)
    assert_eq!(stats.aliases, 1);
    assert_eq!(stats.joins, 1);
    assert_eq!(stats.contexts, 1);

    assert_eq!(universe.virtual_tables.len(), 1);
    assert_eq!(universe.links.len(), 1);
    assert_eq!(universe.links[0].linked_universe.as_deref(), Some("Finance.unv"));
    assert_eq!(universe.hierarchies.len(), 1);
    assert_eq!(universe.hierarchies[0].levels, vec![200]);
}

#[test]
fn alias_resolves_to_its_parent_table() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let universe = &outcome.universe;
    let alias = universe.table(3).expect("alias table 3 exists");
    assert!(alias.is_alias());
    assert_eq!(universe.table_name(alias.parent_id).as_deref(), Some("Orders"));

    let enhanced = universe.database_tables.iter().find(|t| t.id == 3).unwrap();
    assert!(enhanced.is_valid_alias);
}

#[test]
fn object_select_sql_expands_table_sentinel() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let universe = &outcome.universe;
    let object = universe.object(100).unwrap();
    assert_eq!(
        universe.object_select_sql(object).as_deref(),
        Some("Customers.Name")
    );
}

#[test]
fn broken_table_reference_is_diagnosed() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    assert!(outcome.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::BrokenReference { object_id: 101, reference, .. } if reference == "UnknownTable_99"
    )));
}

#[test]
fn two_term_join_statement_is_fully_qualified() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let universe = &outcome.universe;
    let join = &universe.joins[0];
    assert_eq!(universe.join_statement(join), "Orders.CustomerId=Customers.Id");
}

#[test]
fn cross_references_and_lov_definitions_are_populated() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let universe = &outcome.universe;
    assert!(universe.cross_references.contains_key("obj_100_table_2"));
    assert!(universe.cross_references.contains_key("obj_200_table_1"));

    let lov = universe.lov_definitions.get(&200).expect("object 200 has a LOV");
    assert_eq!(lov.lov_name, "Order Total LOV");
}

#[test]
fn optional_section_is_captured_raw_and_not_decoded() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let raw = outcome
        .universe
        .raw_sections
        .get("Platform;")
        .expect("Platform; captured");
    assert_eq!(raw.as_slice(), b"Windows NT");
}

#[test]
fn stored_procedure_parameters_are_extracted_from_the_tables_tail() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let params = outcome
        .universe
        .stored_procedure_parameters
        .get("RefreshSalesSummary")
        .expect("RefreshSalesSummary extracted");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "AsOfDate");
    assert_eq!(params[0].value, "2020-01-01");
}

#[test]
fn condition_where_sql_resolves_its_table_sentinel() {
    let outcome = parse(&full_universe_bytes()).unwrap();
    let universe = &outcome.universe;
    let class = universe.class(1).unwrap(); // arena index of "Sales Detail" subclass
    let condition = &class.conditions[0];
    assert_eq!(
        universe.condition_where_sql(condition).as_deref(),
        Some("Orders.OrderDate > '2020-01-01'")
    );
}

#[test]
fn missing_mandatory_section_is_fatal_but_garbage_input_never_panics() {
    let garbage = vec![0xFFu8; 64];
    assert!(parse(&garbage).is_err());
}
