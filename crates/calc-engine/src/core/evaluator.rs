//! AST evaluator for the raw expression pad.

use crate::core::parser::{AstNode, InfixOp, Parser};
use crate::core::{modulo, CalcResult};

/// Evaluator for parsed expressions
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Creates a new evaluator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Evaluates an AST node and returns the result
    pub fn evaluate(&self, node: &AstNode) -> CalcResult<f64> {
        match node {
            AstNode::Number(n) => Ok(*n),
            AstNode::Negate(inner) => Ok(-self.evaluate(inner)?),
            AstNode::Infix { left, op, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                match op {
                    InfixOp::Arithmetic(op) => op.apply(left_val, right_val),
                    InfixOp::Modulo => modulo(left_val, right_val),
                }
            }
        }
    }

    /// Parses and evaluates a string expression
    pub fn evaluate_str(&self, input: &str) -> CalcResult<f64> {
        let ast = Parser::parse_str(input)?;
        self.evaluate(&ast)
    }
}
