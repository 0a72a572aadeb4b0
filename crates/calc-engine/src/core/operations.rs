//! Binary arithmetic for the four keypad operators.

use crate::core::{CalcError, CalcResult};

/// Type-safe operator enum for the four keypad operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
}

impl BinaryOp {
    /// All operators in keypad order
    pub const ALL: [BinaryOp; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Returns the ASCII operator symbol used by keys and button values
    #[must_use]
    pub const fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Returns the glyph shown in the expression trace
    #[must_use]
    pub const fn display_symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '−',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Parses an operator from an ASCII symbol, a display glyph, or `x`
    #[must_use]
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Subtract),
            '*' | '×' | 'x' | 'X' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Applies the operator to two operands
    pub fn apply(&self, a: f64, b: f64) -> CalcResult<f64> {
        let raw = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                a / b
            }
        };
        check_overflow(raw)
    }
}

/// Modulo: a % b (remainder with the sign of the dividend)
pub fn modulo(a: f64, b: f64) -> CalcResult<f64> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    check_overflow(a % b)
}

fn check_overflow(result: f64) -> CalcResult<f64> {
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CalcError::Overflow)
    }
}
