//! Parsed, evaluable formulas.
//!
//! A [`Formula`] is the handle a formula cell owns. It knows which cells it
//! reads, how to compute its value given a way to look up other cells, and
//! how to print itself back in canonical form.

use std::fmt;

use super::deps::extract_dependencies;
use super::format::format_number;
use super::parser::{BinaryOp, Expr, ParseError, UnaryOp, parse};
use super::position::Position;
use super::value::{FormulaError, Value};

/// A formula with its referenced cells resolved at parse time.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    ast: Expr,
    referenced: Vec<Position>,
}

impl Formula {
    /// Parse expression text (without the leading `=`).
    pub fn parse(expression: &str) -> Result<Formula, ParseError> {
        let ast = parse(expression)?;
        let referenced = extract_dependencies(&ast);
        Ok(Formula { ast, referenced })
    }

    /// Evaluate against the current values of other cells.
    ///
    /// Operand errors propagate unchanged; any non-finite intermediate
    /// result becomes `#ARITHM!`.
    pub fn evaluate(&self, lookup: &dyn Fn(Position) -> Value) -> Value {
        eval_expr(&self.ast, lookup).into()
    }

    /// Canonical text of the formula, without the leading `=`.
    pub fn expression(&self) -> String {
        self.to_string()
    }

    /// Valid positions read by this formula, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(&self.ast, f)
    }
}

fn eval_expr(expr: &Expr, lookup: &dyn Fn(Position) -> Value) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Cell(pos) => {
            if !pos.is_valid() {
                return Err(FormulaError::Ref);
            }
            lookup(*pos).as_number()
        }
        Expr::Unary { op, operand } => {
            let n = eval_expr(operand, lookup)?;
            Ok(match op {
                UnaryOp::Plus => n,
                UnaryOp::Minus => -n,
            })
        }
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, lookup)?;
            let r = eval_expr(right, lookup)?;
            let result = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => l / r,
            };
            if result.is_finite() {
                Ok(result)
            } else {
                Err(FormulaError::Arithmetic)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Whether `child` must be wrapped in parentheses to keep its place under `parent`.
fn needs_parens(parent: BinaryOp, child: &Expr, side: Side) -> bool {
    let Expr::Binary { op: child, .. } = child else {
        return false;
    };
    let additive = matches!(child, BinaryOp::Add | BinaryOp::Sub);
    match parent {
        BinaryOp::Add => false,
        BinaryOp::Sub => side == Side::Right && additive,
        BinaryOp::Mul => additive,
        BinaryOp::Div => additive || side == Side::Right,
    }
}

fn write_operand(expr: &Expr, parens: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if parens {
        f.write_str("(")?;
        write_expr(expr, f)?;
        f.write_str(")")
    } else {
        write_expr(expr, f)
    }
}

fn write_expr(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expr {
        Expr::Number(n) => f.write_str(&format_number(*n)),
        Expr::Cell(pos) if pos.is_valid() => write!(f, "{}", pos),
        Expr::Cell(_) => f.write_str("#REF!"),
        Expr::Unary { op, operand } => {
            write!(f, "{}", op.symbol())?;
            let parens = matches!(
                operand.as_ref(),
                Expr::Binary {
                    op: BinaryOp::Add | BinaryOp::Sub,
                    ..
                }
            );
            write_operand(operand, parens, f)
        }
        Expr::Binary { op, left, right } => {
            write_operand(left, needs_parens(*op, left, Side::Left), f)?;
            write!(f, "{}", op.symbol())?;
            write_operand(right, needs_parens(*op, right, Side::Right), f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(text: &str) -> String {
        Formula::parse(text).unwrap().expression()
    }

    fn eval_with(text: &str, cells: &[(&str, Value)]) -> Value {
        let formula = Formula::parse(text).unwrap();
        let lookup = |pos: Position| {
            cells
                .iter()
                .find(|(label, _)| Position::from_str(label) == pos)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };
        formula.evaluate(&lookup)
    }

    #[test]
    fn test_canonical_drops_redundant_parens() {
        assert_eq!(canonical(" 1 + 2 "), "1+2");
        assert_eq!(canonical("(1+2)+3"), "1+2+3");
        assert_eq!(canonical("1+(2+3)"), "1+2+3");
        assert_eq!(canonical("(A1*B1)+C1"), "A1*B1+C1");
        assert_eq!(canonical("((A1))"), "A1");
    }

    #[test]
    fn test_canonical_keeps_required_parens() {
        assert_eq!(canonical("1-(2+3)"), "1-(2+3)");
        assert_eq!(canonical("1-(2-3)"), "1-(2-3)");
        assert_eq!(canonical("(1+2)*3"), "(1+2)*3");
        assert_eq!(canonical("2*(3-1)"), "2*(3-1)");
        assert_eq!(canonical("(1+2)/3"), "(1+2)/3");
        assert_eq!(canonical("8/(4/2)"), "8/(4/2)");
        assert_eq!(canonical("8/(2*2)"), "8/(2*2)");
        assert_eq!(canonical("-(A1+1)"), "-(A1+1)");
        assert_eq!(canonical("-(-A1)"), "--A1");
    }

    #[test]
    fn test_canonical_numbers_and_bad_refs() {
        assert_eq!(canonical("1.50+2e3"), "1.5+2000");
        assert_eq!(canonical("ZZZZ1+1"), "#REF!+1");
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval_with("1+2*3", &[]), Value::Number(7.0));
        assert_eq!(eval_with("(1+2)*3", &[]), Value::Number(9.0));
        assert_eq!(eval_with("-4/2", &[]), Value::Number(-2.0));
        assert_eq!(eval_with("1/0", &[]), Value::Error(FormulaError::Arithmetic));
        assert_eq!(eval_with("0/0", &[]), Value::Error(FormulaError::Arithmetic));
        assert_eq!(
            eval_with("1e308*10", &[]),
            Value::Error(FormulaError::Arithmetic)
        );
    }

    #[test]
    fn test_evaluate_references() {
        let cells = [
            ("A1", Value::Number(5.0)),
            ("A2", Value::Text("2.5".into())),
            ("A3", Value::Text("abc".into())),
            ("A4", Value::Error(FormulaError::Arithmetic)),
        ];
        assert_eq!(eval_with("A1+A2", &cells), Value::Number(7.5));
        assert_eq!(eval_with("A1+B9", &cells), Value::Number(5.0));
        assert_eq!(eval_with("A3+1", &cells), Value::Error(FormulaError::Value));
        assert_eq!(
            eval_with("A4+A3", &cells),
            Value::Error(FormulaError::Arithmetic)
        );
        assert_eq!(eval_with("ZZZZ1", &cells), Value::Error(FormulaError::Ref));
    }

    #[test]
    fn test_referenced_cells() {
        let formula = Formula::parse("C1+A1+C1").unwrap();
        assert_eq!(
            formula.referenced_cells(),
            &[Position::new(0, 0), Position::new(0, 2)]
        );
    }
}
