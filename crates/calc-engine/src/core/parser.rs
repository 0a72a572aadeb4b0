//! Expression parser for the raw expression pad.
//!
//! Grammar:
//! ```text
//! expression ::= term (('+' | '-') term)*
//! term       ::= unary (('*' | '/' | '%') unary)*
//! unary      ::= ('-' | '+') unary | primary
//! primary    ::= NUMBER | '(' expression ')'
//! ```
//!
//! The display glyphs `−`, `×` and `÷` are accepted as aliases so that
//! a rendered expression trace can be parsed back.

use crate::core::{BinaryOp, CalcError, CalcResult};

/// Infix operators of the expression grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    /// One of the four keypad operators
    Arithmetic(BinaryOp),
    /// Remainder (%)
    Modulo,
}

impl InfixOp {
    /// Returns the precedence level (higher binds tighter)
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Arithmetic(BinaryOp::Add | BinaryOp::Subtract) => 1,
            Self::Arithmetic(BinaryOp::Multiply | BinaryOp::Divide) | Self::Modulo => 2,
        }
    }
}

/// Token types from lexical analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Infix operator
    Operator(InfixOp),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

/// Abstract Syntax Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(f64),
    /// Binary operation
    Infix {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: InfixOp,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
}

impl AstNode {
    /// Creates a binary operation node
    #[must_use]
    pub fn infix(left: AstNode, op: InfixOp, right: AstNode) -> Self {
        Self::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a node for one of the keypad operators
    #[must_use]
    pub fn binary(left: AstNode, op: BinaryOp, right: AstNode) -> Self {
        Self::infix(left, InfixOp::Arithmetic(op), right)
    }

    /// Creates a negation node
    #[must_use]
    pub fn negate(inner: AstNode) -> Self {
        Self::Negate(Box::new(inner))
    }
}

/// Tokenizer for converting expression strings to tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the entire input
    pub fn tokenize(&mut self) -> CalcResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None at end of input
    pub fn next_token(&mut self) -> CalcResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => return self.read_number().map(Some),
            '%' => Token::Operator(InfixOp::Modulo),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            // `x` is a multiply key, not an expression character
            'x' | 'X' => {
                return Err(CalcError::ParseError(format!(
                    "Unexpected character: '{ch}'"
                )))
            }
            other => match BinaryOp::from_symbol(other) {
                Some(op) => Token::Operator(InfixOp::Arithmetic(op)),
                None => {
                    return Err(CalcError::ParseError(format!(
                        "Unexpected character: '{ch}'"
                    )))
                }
            },
        };
        self.advance();
        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_number(&mut self) -> CalcResult<Token> {
        let start = self.pos;
        let mut has_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        self.read_exponent();

        let num_str = &self.input[start..self.pos];
        let value: f64 = num_str
            .parse()
            .map_err(|_| CalcError::ParseError(format!("Invalid number: '{num_str}'")))?;

        Ok(Token::Number(value))
    }

    /// Consumes `e[+-]digits` after a mantissa. A bare `e` is left for
    /// the caller to reject.
    fn read_exponent(&mut self) {
        let rest = &self.input[self.pos..];
        let mut chars = rest.char_indices();
        if !matches!(chars.next(), Some((_, 'e' | 'E'))) {
            return;
        }
        let mut end = 1;
        let mut next = chars.next();
        if let Some((_, '+' | '-')) = next {
            end += 1;
            next = chars.next();
        }
        let mut digits = 0;
        while let Some((i, ch)) = next {
            if !ch.is_ascii_digit() {
                break;
            }
            digits += 1;
            end = i + 1;
            next = chars.next();
        }
        if digits > 0 {
            self.pos += end;
        }
    }
}

/// Recursive descent parser over the token stream
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a new parser from tokens
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses a string expression into an AST
    pub fn parse_str(input: &str) -> CalcResult<AstNode> {
        let tokens = Tokenizer::new(input.trim()).tokenize()?;
        let mut parser = Self::new(tokens);
        parser.parse()
    }

    /// Parses all tokens into an AST
    pub fn parse(&mut self) -> CalcResult<AstNode> {
        if self.tokens.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        let ast = self.parse_expression()?;

        if let Some(token) = self.current() {
            return Err(CalcError::ParseError(format!(
                "Unexpected {token:?} at position {}",
                self.pos
            )));
        }

        Ok(ast)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it is an operator at `precedence`
    fn take_operator(&mut self, precedence: u8) -> Option<InfixOp> {
        match self.current() {
            Some(Token::Operator(op)) if op.precedence() == precedence => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn parse_expression(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.take_operator(1) {
            let right = self.parse_term()?;
            left = AstNode::infix(left, op, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.take_operator(2) {
            let right = self.parse_unary()?;
            left = AstNode::infix(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        match self.current() {
            Some(Token::Operator(InfixOp::Arithmetic(BinaryOp::Subtract))) => {
                self.advance();
                Ok(AstNode::negate(self.parse_unary()?))
            }
            Some(Token::Operator(InfixOp::Arithmetic(BinaryOp::Add))) => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        let token = self
            .advance()
            .cloned()
            .ok_or_else(|| CalcError::ParseError("Unexpected end of expression".into()))?;

        match token {
            Token::Number(n) => Ok(AstNode::Number(n)),
            Token::LeftParen => {
                let expr = self.parse_expression()?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(expr),
                    Some(t) => Err(CalcError::ParseError(format!(
                        "Expected ')' but found {t:?}"
                    ))),
                    None => Err(CalcError::ParseError("Unclosed parenthesis".into())),
                }
            }
            other => Err(CalcError::ParseError(format!(
                "Unexpected token: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADD: InfixOp = InfixOp::Arithmetic(BinaryOp::Add);
    const MUL: InfixOp = InfixOp::Arithmetic(BinaryOp::Multiply);

    // ===== Tokenizer tests =====

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            Tokenizer::new("42").tokenize().unwrap(),
            vec![Token::Number(42.0)]
        );
        assert_eq!(
            Tokenizer::new(".5").tokenize().unwrap(),
            vec![Token::Number(0.5)]
        );
    }

    #[test]
    fn test_tokenize_exponent_numbers() {
        assert_eq!(
            Tokenizer::new("1e-7").tokenize().unwrap(),
            vec![Token::Number(1e-7)]
        );
        assert_eq!(
            Tokenizer::new("1.234568e+15").tokenize().unwrap(),
            vec![Token::Number(1.234568e15)]
        );
        assert_eq!(
            Tokenizer::new("2E3-1").tokenize().unwrap(),
            vec![
                Token::Number(2000.0),
                Token::Operator(InfixOp::Arithmetic(BinaryOp::Subtract)),
                Token::Number(1.0),
            ]
        );
        for input in ["2e", "2e+", "e5"] {
            assert!(
                matches!(Tokenizer::new(input).tokenize(), Err(CalcError::ParseError(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_tokenize_operators() {
        let tokens = Tokenizer::new("+ - * / %").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Operator(ADD),
                Token::Operator(InfixOp::Arithmetic(BinaryOp::Subtract)),
                Token::Operator(MUL),
                Token::Operator(InfixOp::Arithmetic(BinaryOp::Divide)),
                Token::Operator(InfixOp::Modulo),
            ]
        );
    }

    #[test]
    fn test_tokenize_display_glyphs() {
        let tokens = Tokenizer::new("2 × 3 ÷ 4 − 1").tokenize().unwrap();
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[1], Token::Operator(MUL));
    }

    #[test]
    fn test_tokenize_parentheses() {
        assert_eq!(
            Tokenizer::new("()").tokenize().unwrap(),
            vec![Token::LeftParen, Token::RightParen]
        );
    }

    #[test]
    fn test_tokenize_rejects_other_characters() {
        for input in ["2 @ 3", "2 ^ 3", "2 x 3", "alert(1)"] {
            assert!(
                matches!(Tokenizer::new(input).tokenize(), Err(CalcError::ParseError(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(Tokenizer::new("   ").tokenize().unwrap().is_empty());
    }

    // ===== Parser tests =====

    #[test]
    fn test_parse_single_number() {
        assert_eq!(Parser::parse_str("3.5").unwrap(), AstNode::Number(3.5));
    }

    #[test]
    fn test_parse_precedence_mul_over_add() {
        let ast = Parser::parse_str("2 + 3 * 4").unwrap();
        assert_eq!(
            ast,
            AstNode::infix(
                AstNode::Number(2.0),
                ADD,
                AstNode::infix(AstNode::Number(3.0), MUL, AstNode::Number(4.0))
            )
        );
    }

    #[test]
    fn test_parse_left_associative() {
        let ast = Parser::parse_str("8 - 2 - 1").unwrap();
        match ast {
            AstNode::Infix { left, .. } => assert!(matches!(*left, AstNode::Infix { .. })),
            _ => panic!("Expected Infix"),
        }
    }

    #[test]
    fn test_parse_modulo_binds_like_multiply() {
        let ast = Parser::parse_str("1 + 7 % 3").unwrap();
        match ast {
            AstNode::Infix { op, right, .. } => {
                assert_eq!(op, ADD);
                assert!(matches!(
                    *right,
                    AstNode::Infix {
                        op: InfixOp::Modulo,
                        ..
                    }
                ));
            }
            _ => panic!("Expected Infix"),
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = Parser::parse_str("(2 + 3) * 4").unwrap();
        match ast {
            AstNode::Infix { op, left, .. } => {
                assert_eq!(op, MUL);
                assert!(matches!(*left, AstNode::Infix { op: ADD, .. }));
            }
            _ => panic!("Expected Infix"),
        }
    }

    #[test]
    fn test_parse_unary_signs() {
        assert_eq!(
            Parser::parse_str("-5").unwrap(),
            AstNode::negate(AstNode::Number(5.0))
        );
        assert_eq!(
            Parser::parse_str("--5").unwrap(),
            AstNode::negate(AstNode::negate(AstNode::Number(5.0)))
        );
        assert_eq!(Parser::parse_str("+5").unwrap(), AstNode::Number(5.0));
    }

    #[test]
    fn test_parse_empty_expression() {
        assert_eq!(Parser::parse_str(""), Err(CalcError::EmptyExpression));
        assert_eq!(Parser::parse_str("   "), Err(CalcError::EmptyExpression));
    }

    #[test]
    fn test_parse_errors() {
        for input in ["(2 + 3", "2 + 3)", "2 +", "2 * / 3", "()"] {
            assert!(
                matches!(Parser::parse_str(input), Err(CalcError::ParseError(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parser_parse_empty_tokens() {
        let mut parser = Parser::new(vec![]);
        assert_eq!(parser.parse(), Err(CalcError::EmptyExpression));
    }
}
