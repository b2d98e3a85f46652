//! A parsed formula together with the references found while parsing it

use crate::ast::Expr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, Evaluation, ReferenceResolver};
use crate::parser::parse_formula;
use sheetcalc_core::Address;

/// A parsed formula
///
/// Owns the expression tree and the list of addresses referenced by the
/// source text, in encounter order. That list is kept raw: duplicates and
/// out-of-range addresses are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
    references: Vec<Address>,
}

impl Formula {
    /// Parse formula text (without the leading `=`)
    pub fn parse(text: &str) -> FormulaResult<Self> {
        let expr = parse_formula(text)?;
        let mut references = Vec::new();
        expr.collect_references(&mut references);
        Ok(Self { expr, references })
    }

    /// The expression tree
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate against a resolver for cell references
    pub fn evaluate<R>(&self, resolver: &R) -> Evaluation
    where
        R: ReferenceResolver + ?Sized,
    {
        evaluate(&self.expr, resolver)
    }

    /// Canonical text of the formula, without the leading `=`.
    ///
    /// Whitespace and redundant parentheses are dropped; parsing the result
    /// yields the same tree.
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// Every address in the source text, in encounter order
    pub fn referenced_addresses(&self) -> &[Address] {
        &self.references
    }

    /// Valid addresses only, each once, in order of first appearance
    pub fn referenced_cells(&self) -> Vec<Address> {
        let mut cells: Vec<Address> = Vec::with_capacity(self.references.len());
        for address in &self.references {
            if address.is_valid() && !cells.contains(address) {
                cells.push(*address);
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EmptyResolver;
    use crate::FormulaError;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use sheetcalc_core::ComputedError;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn test_referenced_addresses_are_raw() {
        let formula = Formula::parse("B2+B2*A99999+C3").unwrap();
        assert_eq!(
            formula.referenced_addresses(),
            &[addr("B2"), addr("B2"), addr("A99999"), addr("C3")]
        );
    }

    #[test]
    fn test_referenced_cells_dedup_in_order() {
        let formula = Formula::parse("C3+B2+C3+A0+B2").unwrap();
        assert_eq!(formula.referenced_cells(), vec![addr("C3"), addr("B2")]);

        let formula = Formula::parse("1+2").unwrap();
        assert!(formula.referenced_cells().is_empty());
    }

    #[test]
    fn test_expression_canonical_form() {
        let cases = [
            ("1 + 2", "1+2"),
            ("(1+2)*3", "(1+2)*3"),
            ("(1*2)+3", "1*2+3"),
            ("((A1))", "A1"),
            ("a1+$b$2", "A1+B2"),
            ("1-(2+3)", "1-(2+3)"),
            ("1/(2*3)", "1/(2*3)"),
            ("-(-A1)", "--A1"),
            ("+(1-2)", "+(1-2)"),
            ("2.50", "2.5"),
            ("1e3", "1000"),
            ("A0+1", "#REF!+1"),
        ];
        for (input, expected) in cases {
            assert_eq!(Formula::parse(input).unwrap().expression(), expected, "{}", input);
        }
    }

    #[test]
    fn test_evaluate() {
        let formula = Formula::parse("A1*2+B1").unwrap();
        let resolver = |address: Address| -> Evaluation {
            if address == addr("A1") {
                Ok(20.0)
            } else {
                Ok(2.0)
            }
        };
        assert_eq!(formula.evaluate(&resolver), Ok(42.0));
        assert_eq!(formula.evaluate(&EmptyResolver), Ok(0.0));

        let formula = Formula::parse("A0").unwrap();
        assert_eq!(formula.evaluate(&EmptyResolver), Err(ComputedError::Ref));
    }

    #[test]
    fn test_parse_failure() {
        assert!(matches!(Formula::parse("1+*2"), Err(FormulaError::Parse(_))));
    }

    fn arb_expr() -> impl Strategy<Value = Expr> {
        let leaf = prop_oneof![
            (0u32..1000).prop_map(|n| Expr::Number(f64::from(n) / 8.0)),
            (0u32..20, 0u32..20).prop_map(|(row, col)| Expr::CellRef(Address::new(row, col))),
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                (
                    prop_oneof![
                        Just(crate::UnaryOperator::Plus),
                        Just(crate::UnaryOperator::Negate)
                    ],
                    inner.clone()
                )
                    .prop_map(|(op, operand)| Expr::UnaryOp {
                        op,
                        operand: Box::new(operand),
                    }),
                (
                    prop_oneof![
                        Just(crate::BinaryOperator::Add),
                        Just(crate::BinaryOperator::Subtract),
                        Just(crate::BinaryOperator::Multiply),
                        Just(crate::BinaryOperator::Divide)
                    ],
                    inner.clone(),
                    inner
                )
                    .prop_map(|(op, left, right)| Expr::BinaryOp {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
            ]
        })
    }

    proptest! {
        #[test]
        fn expression_reparses_to_same_tree(expr in arb_expr()) {
            let text = expr.to_string();
            let formula = Formula::parse(&text).unwrap();
            prop_assert_eq!(formula.expr(), &expr);
            prop_assert_eq!(formula.expression(), text);
        }
    }
}
