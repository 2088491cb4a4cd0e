//! Dependency extraction from parsed formulas.
//!
//! Walks a formula AST to find every cell it reads. This is the edge list
//! used by the sheet for cache invalidation and cycle detection.

use super::parser::Expr;
use super::position::Position;

/// Collect all valid cell references of an expression, sorted and deduplicated.
/// References that point outside the sheet are skipped: they evaluate to
/// `#REF!` and never become graph edges.
pub fn extract_dependencies(expr: &Expr) -> Vec<Position> {
    let mut deps = Vec::new();
    collect_cell_refs(expr, &mut deps);
    deps.sort();
    deps.dedup();
    deps
}

fn collect_cell_refs(expr: &Expr, deps: &mut Vec<Position>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Cell(pos) => {
            if pos.is_valid() {
                deps.push(*pos);
            }
        }
        Expr::Unary { operand, .. } => collect_cell_refs(operand, deps),
        Expr::Binary { left, right, .. } => {
            collect_cell_refs(left, deps);
            collect_cell_refs(right, deps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parser::parse;

    #[test]
    fn test_extract_dependencies_sorted_and_unique() {
        let expr = parse("B2 + A1 * (B2 - A3) / A1").unwrap();
        assert_eq!(
            extract_dependencies(&expr),
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_extract_dependencies_skips_invalid_refs() {
        let expr = parse("ZZZZ1 + C3").unwrap();
        assert_eq!(extract_dependencies(&expr), vec![Position::new(2, 2)]);
    }

    #[test]
    fn test_constant_formula_has_no_dependencies() {
        let expr = parse("-(1 + 2)").unwrap();
        assert!(extract_dependencies(&expr).is_empty());
    }
}
