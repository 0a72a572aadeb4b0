//! Keypad state owned by an [`ExpressionEngine`](super::ExpressionEngine).

use crate::core::format::ERROR_SENTINEL;
use crate::core::BinaryOp;
use crate::engine::trace::ExpressionTrace;

/// Coarse phase of the state machine, derived from [`CalculatorState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Typing an operand
    Entering,
    /// Operator chosen, next digit starts the second operand
    OperatorPending,
    /// Waiting for an exponent
    PowerPending,
    /// A result is on the display
    ShowingResult,
    /// Terminal error; input is blocked until cleared
    ErrorState,
}

/// All mutable keypad state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    /// Operand being typed or last computed value; never empty
    pub current_value: String,
    /// Left operand of the pending operation, empty when none
    pub previous_value: String,
    /// Pending binary operation
    pub operation: Option<BinaryOp>,
    /// The next digit starts a new operand
    pub should_reset_display: bool,
    /// Running expression
    pub trace: ExpressionTrace,
    /// Waiting for an exponent
    pub power_mode: bool,
    /// Base captured when power mode started
    pub power_base: String,
    /// The display holds the result of an evaluation
    pub showing_result: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_value: "0".to_string(),
            previous_value: String::new(),
            operation: None,
            should_reset_display: false,
            trace: ExpressionTrace::new(),
            power_mode: false,
            power_base: String::new(),
            showing_result: false,
        }
    }
}

impl CalculatorState {
    /// Returns true if the current value is the error sentinel
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.current_value == ERROR_SENTINEL
    }

    /// Returns true while an operator was pressed but no operand followed
    #[must_use]
    pub fn awaiting_operand(&self) -> bool {
        self.trace.ends_with_operator()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> EngineState {
        if self.is_error() {
            EngineState::ErrorState
        } else if self.power_mode {
            EngineState::PowerPending
        } else if self.showing_result {
            EngineState::ShowingResult
        } else if self.operation.is_some() && self.should_reset_display {
            EngineState::OperatorPending
        } else {
            EngineState::Entering
        }
    }

    /// Main display text
    #[must_use]
    pub fn display_text(&self) -> String {
        if self.showing_result {
            format!("= {}", self.current_value)
        } else {
            self.current_value.clone()
        }
    }
}
