//! Raw expression pad.
//!
//! The lightweight calculator: key presses build an expression string
//! that is parsed and evaluated as a whole on `=`, with normal operator
//! precedence and parentheses. A failed evaluation leaves `Error` on the
//! display until the next key press.

use tracing::{debug, info};

use crate::core::evaluator::Evaluator;
use crate::core::format::{format_number, ERROR_SENTINEL};
use crate::core::history::History;
use crate::core::{CalcError, CalcResult};

/// Expression-string calculator
#[derive(Debug, Default)]
pub struct ExpressionPad {
    evaluator: Evaluator,
    history: History,
    input: String,
    last_error: Option<CalcError>,
}

impl ExpressionPad {
    /// Creates an empty pad
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pad with a history limit
    #[must_use]
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: History::with_limit(limit),
            ..Self::default()
        }
    }

    /// Returns true if the character can be typed into the pad
    #[must_use]
    pub fn is_valid_char(c: char) -> bool {
        c.is_ascii_digit()
            || matches!(
                c,
                '.' | '+' | '-' | '*' | '/' | '%' | '(' | ')' | '−' | '×' | '÷' | 'e' | 'E'
            )
    }

    /// Types a character. A pad showing `Error` starts over first.
    ///
    /// # Errors
    /// Returns a parse error for characters the grammar does not accept.
    pub fn press(&mut self, c: char) -> CalcResult<()> {
        if !Self::is_valid_char(c) {
            return Err(CalcError::ParseError(format!("unexpected character '{c}'")));
        }
        if self.last_error.take().is_some() {
            self.input.clear();
        }
        if matches!(c, 'e' | 'E') && !self.ends_with_mantissa() {
            return Err(CalcError::ParseError(format!("unexpected character '{c}'")));
        }
        self.input.push(c);
        Ok(())
    }

    /// True if the input ends with digits that can still take an exponent
    fn ends_with_mantissa(&self) -> bool {
        let literal = self
            .input
            .trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
        if literal.len() == self.input.len() {
            return false;
        }
        let unsigned = literal.strip_suffix(['+', '-']).unwrap_or(literal);
        !unsigned.ends_with(['e', 'E'])
    }

    /// Removes the last character
    pub fn backspace(&mut self) {
        if self.last_error.take().is_some() {
            self.input.clear();
        } else {
            self.input.pop();
        }
    }

    /// Clears the input
    pub fn clear(&mut self) {
        self.input.clear();
        self.last_error = None;
    }

    /// Evaluates the input. On success the formatted result replaces the
    /// input and is recorded in history; on failure the display shows
    /// `Error`.
    pub fn evaluate(&mut self) -> CalcResult<String> {
        match self.evaluator.evaluate_str(&self.input) {
            Ok(value) => {
                let result = format_number(value);
                if result == ERROR_SENTINEL {
                    return Err(self.fail(CalcError::Overflow));
                }
                self.history.record(&self.input, &result);
                info!(expression = %self.input, result = %result, "Calculation recorded");
                self.input.clone_from(&result);
                Ok(result)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: CalcError) -> CalcError {
        debug!(expression = %self.input, reason = %err, "Evaluation failed");
        self.last_error = Some(err.clone());
        err
    }

    /// Raw input text
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Display text: the input, `0` when empty, `Error` after a failure
    #[must_use]
    pub fn display(&self) -> &str {
        if self.last_error.is_some() {
            ERROR_SENTINEL
        } else if self.input.is_empty() {
            "0"
        } else {
            &self.input
        }
    }

    /// Error from the last evaluation, if it failed
    #[must_use]
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    /// Calculation history
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
}
