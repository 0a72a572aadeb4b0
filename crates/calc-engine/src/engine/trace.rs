//! Structured expression trace.
//!
//! The running expression is kept as a list of operand and operator
//! tokens and only turned into text when rendered, so replacing the
//! operand being typed never has to re-split a string.

use std::fmt;

use crate::core::BinaryOp;

/// Operator token in the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOperator {
    /// One of the four basic operators
    Binary(BinaryOp),
    /// Exponent entry
    Power,
}

impl TraceOperator {
    /// Rendered form, padded with spaces
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Binary(op) => format!(" {} ", op.display_symbol()),
            Self::Power => " ^ ".to_string(),
        }
    }
}

/// A single trace token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceItem {
    /// Operand text: a number or a function notation such as `√(16)`
    Operand(String),
    /// Operator between two operands
    Operator(TraceOperator),
}

/// Ordered operand/operator tokens of the running expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionTrace {
    items: Vec<TraceItem>,
}

impl ExpressionTrace {
    /// Creates an empty trace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been entered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the last token is an operator
    #[must_use]
    pub fn ends_with_operator(&self) -> bool {
        matches!(self.items.last(), Some(TraceItem::Operator(_)))
    }

    /// Appends an operand token
    pub fn push_operand(&mut self, operand: impl Into<String>) {
        self.items.push(TraceItem::Operand(operand.into()));
    }

    /// Replaces the trailing operand; after an operator (or on an empty
    /// trace) the operand is appended instead
    pub fn replace_last_operand(&mut self, operand: impl Into<String>) {
        match self.items.last_mut() {
            Some(TraceItem::Operand(text)) => *text = operand.into(),
            _ => self.push_operand(operand),
        }
    }

    /// Appends an operator; a trailing operator is replaced
    pub fn push_operator(&mut self, op: TraceOperator) {
        if let Some(TraceItem::Operator(last)) = self.items.last_mut() {
            *last = op;
        } else {
            self.items.push(TraceItem::Operator(op));
        }
    }

    /// Drops everything and starts over with a single operand
    pub fn restart_with(&mut self, operand: impl Into<String>) {
        self.items.clear();
        self.push_operand(operand);
    }

    /// Renders the trace for display, e.g. `12 + 3`
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExpressionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                TraceItem::Operand(text) => f.write_str(text)?,
                TraceItem::Operator(op) => f.write_str(&op.render())?,
            }
        }
        Ok(())
    }
}
