//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with conventional
//! operator precedence. The input is the formula text without its leading
//! `=` sigil.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use sheetcalc_core::{Address, ComputedError};

/// Maximum nesting of parentheses and unary signs
pub const MAX_NESTING: usize = 256;

/// Maximum height of the expression tree
pub const MAX_DEPTH: usize = 1024;

/// A parsed subexpression and the height of its tree
type Node = (Expr, usize);

/// Parse formula text into an AST
///
/// # Example
/// ```rust
/// use sheetcalc_formula::parse_formula;
///
/// let ast = parse_formula("1+2").unwrap();
/// let ast = parse_formula("(A1 + B2) / -C3").unwrap();
/// assert!(parse_formula("1+").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Expr> {
    let mut parser = FormulaParser::new(formula)?;

    if matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse("Empty formula".into()));
    }

    let (expr, _) = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {} at position {}",
            parser.current_token().describe(),
            parser.token_start
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals and references
    Number(f64),
    CellRef(Address),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::CellRef(address) => format!("reference {}", address),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of formula".into(),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    current_token: Token,
    nesting: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: Token::Eof,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Cell reference
        if c.is_ascii_alphabetic() || c == '$' {
            return self.scan_cell_reference();
        }

        // Reference that no longer points anywhere
        if c == '#' {
            return self.scan_error_reference();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at position {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        let num: f64 = num_str.parse().map_err(|_| {
            FormulaError::Parse(format!("Invalid number '{}' at position {}", num_str, start))
        })?;

        if !num.is_finite() {
            return Err(FormulaError::Parse(format!(
                "Number '{}' at position {} is out of range",
                num_str, start
            )));
        }

        Ok(Token::Number(num))
    }

    fn scan_cell_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        if self.peek_char() == Some('$') {
            self.advance();
        }
        let letters_start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let letters = &self.input[letters_start..self.pos];

        if self.peek_char() == Some('$') {
            self.advance();
        }
        let digits_start = self.pos;
        self.skip_digits();
        let digits = &self.input[digits_start..self.pos];

        // Must be letters then digits, with nothing glued on
        if letters.is_empty()
            || digits.is_empty()
            || self
                .peek_char()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
        {
            while self
                .peek_char()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
            {
                self.advance();
            }
            return Err(FormulaError::Parse(format!(
                "Invalid cell reference '{}' at position {}",
                &self.input[start..self.pos],
                start
            )));
        }

        Ok(Token::CellRef(Address::from_a1_parts(letters, digits)))
    }

    fn scan_error_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance();
        while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric()) {
            self.advance();
        }
        if self.peek_char() == Some('!') {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        match ComputedError::from_marker(text) {
            Some(ComputedError::Ref) => Ok(Token::CellRef(Address::NONE)),
            _ => Err(FormulaError::Parse(format!(
                "Unexpected '{}' at position {}",
                text, start
            ))),
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {}, got {} at position {}",
                expected.describe(),
                self.current_token().describe(),
                self.token_start
            )))
        }
    }

    fn enter_nested(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(FormulaError::Parse(format!(
                "Formula nested too deeply at position {} (limit {})",
                self.token_start, MAX_NESTING
            )));
        }
        Ok(())
    }

    fn leave_nested(&mut self) {
        self.nesting -= 1;
    }

    fn check_depth(&self, depth: usize) -> FormulaResult<usize> {
        if depth > MAX_DEPTH {
            return Err(FormulaError::Parse(format!(
                "Formula expression too deep at position {} (limit {} levels)",
                self.token_start, MAX_DEPTH
            )));
        }
        Ok(depth)
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Node> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<Node> {
        let (mut left, mut depth) = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let (right, right_depth) = self.parse_multiplicative()?;
            depth = self.check_depth(depth.max(right_depth) + 1)?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, depth))
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Node> {
        let (mut left, mut depth) = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let (right, right_depth) = self.parse_unary()?;
            depth = self.check_depth(depth.max(right_depth) + 1)?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, depth))
    }

    fn parse_unary(&mut self) -> FormulaResult<Node> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.enter_nested()?;
        self.consume()?;
        let (operand, depth) = self.parse_unary()?;
        self.leave_nested();

        let depth = self.check_depth(depth + 1)?;
        Ok((
            Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            depth,
        ))
    }

    fn parse_primary(&mut self) -> FormulaResult<Node> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok((Expr::Number(n), 1))
            }

            Token::CellRef(address) => {
                self.consume()?;
                Ok((Expr::CellRef(address), 1))
            }

            Token::LeftParen => {
                self.enter_nested()?;
                self.consume()?;
                let node = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                self.leave_nested();
                Ok(node)
            }

            other => Err(FormulaError::Parse(format!(
                "Unexpected {} at position {}",
                other.describe(),
                self.token_start
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(row: u32, col: u32) -> Expr {
        Expr::CellRef(Address::new(row, col))
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_formula("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse_formula("2.75").unwrap(), Expr::Number(2.75));
        assert_eq!(parse_formula(".5").unwrap(), Expr::Number(0.5));
        assert_eq!(parse_formula("1e10").unwrap(), Expr::Number(1e10));
        assert_eq!(parse_formula("2.5E-2").unwrap(), Expr::Number(0.025));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        let ast = parse_formula("1+2*3").unwrap();
        // Should parse as 1+(2*3) due to precedence
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, Expr::Number(1.0));
            assert!(matches!(
                *right,
                Expr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_left_associative() {
        let ast = parse_formula("8/4/2").unwrap();
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Divide);
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinaryOperator::Divide,
                    ..
                }
            ));
            assert_eq!(*right, Expr::Number(2.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse_formula("(1+2)*3").unwrap();
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinaryOperator::Add,
                    ..
                }
            ));
            assert_eq!(*right, Expr::Number(3.0));
        } else {
            panic!("Expected BinaryOp");
        }

        assert_eq!(parse_formula("((A1))").unwrap(), cell(0, 0));
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse_formula("-5").unwrap();
        assert_eq!(
            ast,
            Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(Expr::Number(5.0)),
            }
        );

        let ast = parse_formula("+-A1").unwrap();
        assert_eq!(
            ast,
            Expr::UnaryOp {
                op: UnaryOperator::Plus,
                operand: Box::new(Expr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(cell(0, 0)),
                }),
            }
        );

        // Unary binds tighter than multiplication
        let ast = parse_formula("2*-3").unwrap();
        assert!(matches!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_formula("A1").unwrap(), cell(0, 0));
        assert_eq!(parse_formula("$B$2").unwrap(), cell(1, 1));
        assert_eq!(parse_formula("aa10").unwrap(), cell(9, 26));
    }

    #[test]
    fn test_parse_out_of_range_reference() {
        // Syntactically fine, evaluated as #REF! later
        assert_eq!(parse_formula("A16385").unwrap(), cell(16384, 0));
        assert_eq!(parse_formula("A0").unwrap(), Expr::CellRef(Address::NONE));
        assert_eq!(parse_formula("#REF!").unwrap(), Expr::CellRef(Address::NONE));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(
            parse_formula(" 1 +\t2 ").unwrap(),
            parse_formula("1+2").unwrap()
        );
    }

    #[test]
    fn test_parse_errors() {
        for text in [
            "", "   ", "1+", "*2", "(1+2", "1+2)", "()", "1 2", "A", "1A", "A1B", "A1_",
            "foo(1)", "1..2", "1e", "1e999", "#VALUE!", "\"text\"", "1^2", "=1",
        ] {
            assert!(
                matches!(parse_formula(text), Err(FormulaError::Parse(_))),
                "expected parse error for {:?}",
                text
            );
        }
    }

    fn assert_too_deep(text: &str) {
        match parse_formula(text) {
            Err(FormulaError::Parse(msg)) => assert!(msg.contains("too deep"), "{}", msg),
            other => panic!("expected depth error, got {:?}", other),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let text = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_too_deep(&text);

        let text = format!("{}1", "-".repeat(100_000));
        assert_too_deep(&text);

        let text = format!("{}A1", "+-".repeat(50_000));
        assert_too_deep(&text);

        // Within the limit
        let text = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse_formula(&text).unwrap(), Expr::Number(1.0));
        let text = format!("{}1", "-".repeat(MAX_NESTING));
        assert!(parse_formula(&text).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let text = vec!["1"; 100_000].join("+");
        assert_too_deep(&text);

        let text = vec!["2"; 100_000].join("*");
        assert_too_deep(&text);

        let text = vec!["A1"; 1000].join("+");
        assert!(parse_formula(&text).is_ok());
    }
}
