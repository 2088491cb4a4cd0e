//! End-to-end behavior of the sheet through its public API.

use gridcalc_core::{FormulaError, Position, Sheet, SheetError, Size, Value};

fn pos(label: &str) -> Position {
    Position::from_str(label)
}

fn value(sheet: &Sheet, label: &str) -> Value {
    sheet
        .get_cell(pos(label))
        .unwrap()
        .map(|cell| cell.value())
        .unwrap_or_default()
}

fn text(sheet: &Sheet, label: &str) -> Option<String> {
    sheet.get_cell(pos(label)).unwrap().map(|cell| cell.text())
}

#[test]
fn test_cycle_rejection_leaves_cell_unchanged() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1+C1").unwrap();
    sheet.set_cell(pos("B1"), "2").unwrap();
    sheet.set_cell(pos("C1"), "=D1*2").unwrap();
    sheet.set_cell(pos("D1"), "4").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Number(10.0));

    assert!(matches!(
        sheet.set_cell(pos("A1"), "=A1"),
        Err(SheetError::CircularDependency(_))
    ));
    assert!(matches!(
        sheet.set_cell(pos("D1"), "=A1"),
        Err(SheetError::CircularDependency(_))
    ));

    assert_eq!(text(&sheet, "A1").as_deref(), Some("=B1+C1"));
    assert_eq!(text(&sheet, "D1").as_deref(), Some("4"));
    assert_eq!(value(&sheet, "A1"), Value::Number(10.0));
}

#[test]
fn test_cache_coherence_without_explicit_invalidation() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "5").unwrap();
    sheet.set_cell(pos("B1"), "=A1+1").unwrap();
    assert_eq!(value(&sheet, "B1"), Value::Number(6.0));

    sheet.set_cell(pos("A1"), "10").unwrap();
    assert_eq!(value(&sheet, "B1"), Value::Number(11.0));
}

#[test]
fn test_cache_coherence_through_chain() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    sheet.set_cell(pos("A2"), "=A1*10").unwrap();
    sheet.set_cell(pos("A3"), "=A2+A1").unwrap();
    sheet.set_cell(pos("A4"), "=A3/A1").unwrap();
    assert_eq!(value(&sheet, "A4"), Value::Number(11.0));

    sheet.set_cell(pos("A1"), "2").unwrap();
    assert_eq!(value(&sheet, "A4"), Value::Number(11.0));
    assert_eq!(value(&sheet, "A3"), Value::Number(22.0));

    sheet.set_cell(pos("A2"), "=A1").unwrap();
    assert_eq!(value(&sheet, "A4"), Value::Number(2.0));
}

#[test]
fn test_implicit_creation_and_collection() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();

    let b1 = sheet.get_cell(pos("B1")).unwrap().expect("placeholder created");
    assert_eq!(b1.text(), "");
    assert_eq!(b1.value(), Value::Text(String::new()));
    assert!(b1.is_referenced());
    assert_eq!(value(&sheet, "A1"), Value::Number(0.0));

    sheet.clear_cell(pos("A1")).unwrap();
    assert!(sheet.get_cell(pos("B1")).unwrap().is_none());
    assert!(sheet.get_cell(pos("A1")).unwrap().is_none());
    assert!(sheet.is_empty());
}

#[test]
fn test_collection_cascades_only_one_level() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    sheet.set_cell(pos("C1"), "=B1+D1").unwrap();
    sheet.set_cell(pos("A1"), "text").unwrap();

    assert!(sheet.get_cell(pos("B1")).unwrap().is_some());
    assert_eq!(sheet.len(), 4);

    sheet.clear_cell(pos("C1")).unwrap();
    assert_eq!(sheet.len(), 1);
    assert_eq!(text(&sheet, "A1").as_deref(), Some("text"));
}

#[test]
fn test_bounding_box() {
    let mut sheet = Sheet::new();
    assert_eq!(sheet.printable_size(), Size { rows: 0, cols: 0 });

    sheet.set_cell(pos("A1"), "x").unwrap();
    sheet.set_cell(pos("C3"), "=1").unwrap();
    assert_eq!(sheet.printable_size(), Size { rows: 3, cols: 3 });

    sheet.clear_cell(pos("C3")).unwrap();
    assert_eq!(sheet.printable_size(), Size { rows: 1, cols: 1 });
}

#[test]
fn test_error_propagation_keeps_category() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Error(FormulaError::Arithmetic));

    sheet.set_cell(pos("B1"), "=A1").unwrap();
    assert_eq!(value(&sheet, "B1"), Value::Error(FormulaError::Arithmetic));

    sheet.set_cell(pos("C1"), "oops").unwrap();
    sheet.set_cell(pos("D1"), "=C1+A1").unwrap();
    assert_eq!(value(&sheet, "D1"), Value::Error(FormulaError::Value));

    sheet.set_cell(pos("E1"), "=ZZZZ1+1").unwrap();
    assert_eq!(value(&sheet, "E1"), Value::Error(FormulaError::Ref));
    assert_eq!(text(&sheet, "E1").as_deref(), Some("=#REF!+1"));
}

#[test]
fn test_referenced_cells_sorted_and_unique() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=C2+B1+C2+A3").unwrap();
    let cell = sheet.get_cell(pos("A1")).unwrap().unwrap();
    assert_eq!(
        cell.referenced_cells(),
        vec![pos("B1"), pos("C2"), pos("A3")]
    );
}

#[test]
fn test_escaped_text_and_numeric_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'12").unwrap();
    sheet.set_cell(pos("A2"), "=A1+1").unwrap();
    assert_eq!(value(&sheet, "A1"), Value::Text("12".into()));
    assert_eq!(text(&sheet, "A1").as_deref(), Some("'12"));
    assert_eq!(value(&sheet, "A2"), Value::Number(13.0));
}

#[test]
fn test_long_chain_edit_stays_consistent() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    for row in 1..50 {
        let prev = Position::new(row - 1, 0);
        sheet
            .set_cell(Position::new(row, 0), format!("={}+1", prev))
            .unwrap();
    }
    assert_eq!(value(&sheet, "A50"), Value::Number(50.0));

    sheet.set_cell(pos("A1"), "100").unwrap();
    assert_eq!(value(&sheet, "A50"), Value::Number(149.0));

    assert!(matches!(
        sheet.set_cell(pos("A1"), "=A50"),
        Err(SheetError::CircularDependency(_))
    ));
    assert_eq!(value(&sheet, "A50"), Value::Number(149.0));
}

#[test]
fn test_chain_as_tall_as_the_sheet_evaluates() {
    let mut sheet = Sheet::new();
    for row in (1..16_000).rev() {
        sheet
            .set_cell(Position::new(row, 0), format!("={}+1", Position::new(row - 1, 0)))
            .unwrap();
    }
    sheet.set_cell(pos("A1"), "0").unwrap();

    assert_eq!(value(&sheet, "A16000"), Value::Number(15_999.0));
    assert_eq!(value(&sheet, "A8000"), Value::Number(7_999.0));
}

#[test]
fn test_deeply_nested_formula_rejected() {
    let mut sheet = Sheet::new();
    let deep = format!("={}1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert!(matches!(
        sheet.set_cell(pos("A1"), deep),
        Err(SheetError::FormulaSyntax(_))
    ));
    assert!(sheet.is_empty());
}
