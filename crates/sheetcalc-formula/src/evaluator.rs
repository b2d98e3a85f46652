//! Formula evaluator
//!
//! Evaluates formula ASTs to a number or a [`ComputedError`]. An error in
//! any operand short-circuits the enclosing operation and becomes the result
//! of the whole expression.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use sheetcalc_core::{Address, ComputedError};

/// Result of evaluating a formula
pub type Evaluation = Result<f64, ComputedError>;

/// Supplies operand values for cell references.
///
/// Only called with addresses that pass [`Address::is_valid`]; invalid
/// references evaluate to [`ComputedError::Ref`] before reaching the
/// resolver.
pub trait ReferenceResolver {
    fn resolve(&self, address: Address) -> Evaluation;
}

impl<F> ReferenceResolver for F
where
    F: Fn(Address) -> Evaluation,
{
    fn resolve(&self, address: Address) -> Evaluation {
        self(address)
    }
}

/// Resolver for formulas evaluated without a sheet: every cell reads as 0
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl ReferenceResolver for EmptyResolver {
    fn resolve(&self, _address: Address) -> Evaluation {
        Ok(0.0)
    }
}

/// Evaluate a formula expression
pub fn evaluate<R>(expr: &Expr, resolver: &R) -> Evaluation
where
    R: ReferenceResolver + ?Sized,
{
    match expr {
        Expr::Number(n) => Ok(*n),

        Expr::CellRef(address) => {
            if !address.is_valid() {
                return Err(ComputedError::Ref);
            }
            resolver.resolve(*address)
        }

        Expr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, resolver),

        Expr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, resolver),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op<R>(
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    resolver: &R,
) -> Evaluation
where
    R: ReferenceResolver + ?Sized,
{
    // Left operand first; its error wins
    let l = evaluate(left, resolver)?;
    let r = evaluate(right, resolver)?;

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(ComputedError::Div0);
            }
            l / r
        }
    };

    finite(result)
}

/// Evaluate a unary operation
fn evaluate_unary_op<R>(op: UnaryOperator, operand: &Expr, resolver: &R) -> Evaluation
where
    R: ReferenceResolver + ?Sized,
{
    let n = evaluate(operand, resolver)?;

    match op {
        UnaryOperator::Plus => Ok(n),
        UnaryOperator::Negate => Ok(-n),
    }
}

/// Overflow to infinity is reported like a division by zero
fn finite(n: f64) -> Evaluation {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(ComputedError::Div0)
    }
}
