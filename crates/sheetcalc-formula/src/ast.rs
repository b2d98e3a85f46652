//! Formula Abstract Syntax Tree types

use sheetcalc_core::Address;
use std::fmt;

/// Formula expression AST
///
/// Parentheses from the source text are not kept as nodes; the tree shape
/// records the grouping and [`Display`](fmt::Display) re-inserts only the
/// parentheses needed to parse back to the same tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),

    /// Single cell reference (possibly outside the sheet limits)
    CellRef(Address),

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Binding strength used when printing; atoms bind tightest
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::CellRef(_) => 4,
            Expr::UnaryOp { .. } => 3,
            Expr::BinaryOp { op, .. } => op.precedence(),
        }
    }

    /// Append every referenced address in source order (left to right)
    pub fn collect_references(&self, out: &mut Vec<Address>) {
        match self {
            Expr::Number(_) => {}
            Expr::CellRef(address) => out.push(*address),
            Expr::UnaryOp { operand, .. } => operand.collect_references(out),
            Expr::BinaryOp { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::CellRef(address) => write!(f, "{}", address),
            Expr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                operand.write_operand(f, operand.precedence() < self.precedence())
            }
            Expr::BinaryOp { op, left, right } => {
                let precedence = op.precedence();
                left.write_operand(f, left.precedence() < precedence)?;
                write!(f, "{}", op.symbol())?;
                // Same-precedence operators associate left, so a right
                // operand of equal precedence was grouped explicitly.
                right.write_operand(f, right.precedence() <= precedence)
            }
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}
