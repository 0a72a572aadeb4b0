//! Core arithmetic: operators, scientific functions, number formatting,
//! calculation history and the expression grammar used by the raw
//! expression pad.
//!
//! Nothing in here holds keypad state; that lives in [`crate::engine`].

pub mod evaluator;
pub mod format;
pub mod history;
mod operations;
pub mod parser;
pub mod scientific;

pub use operations::{modulo, BinaryOp};

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Calculator error types.
///
/// The `Display` text of each variant is the message shown to the user,
/// so the strings are part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// A second decimal point in the same operand
    #[error("Already has decimal point")]
    DuplicateDecimal,
    /// The operand already holds the maximum number of characters
    #[error("Maximum {0} digits reached")]
    MaxDigits(usize),
    /// Division by zero attempted
    #[error("Cannot divide by zero!")]
    DivisionByZero,
    /// Result overflowed to a non-finite value
    #[error("Result is out of range")]
    Overflow,
    /// Scientific function applied outside its domain
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Base or exponent could not be used for a power calculation
    #[error("Invalid power calculation")]
    InvalidPower,
    /// The operand text is not a number
    #[error("Invalid number: '{0}'")]
    InvalidOperand(String),
    /// History clear requested with nothing recorded
    #[error("History is already empty")]
    HistoryEmpty,
    /// Invalid expression syntax
    #[error("Invalid expression: {0}")]
    ParseError(String),
    /// Empty expression provided
    #[error("Empty expression")]
    EmptyExpression,
}

/// Domain violations for the unary scientific functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Square root of a negative number
    #[error("√ requires non-negative number")]
    NegativeSqrt,
    /// Reciprocal of zero
    #[error("Cannot divide by zero")]
    InverseOfZero,
    /// Tangent at 90° + n·180°
    #[error("Undefined: tan(90°) = ∞")]
    TanUndefined,
    /// Common logarithm of zero or a negative number
    #[error("log requires positive number")]
    LogNonPositive,
    /// Natural logarithm of zero or a negative number
    #[error("ln requires positive number")]
    LnNonPositive,
    /// Factorial argument not an integer in [0, 170]
    #[error("n! requires integer: 0 ≤ n ≤ 170")]
    FactorialRange,
}
