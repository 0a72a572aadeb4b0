//! The keypad state machine.
//!
//! [`ExpressionEngine`] owns one [`CalculatorState`] and the calculation
//! [`History`]. Each public operation mutates the state in place and
//! returns an [`Update`]; rejected input leaves the state untouched and
//! reports why through [`Update::notice`].
//!
//! Evaluation is strictly left to right. Pressing a second operator
//! folds the pending one first, so `2 + 3 × 4 =` gives `20`.
//!
//! ```
//! use calc_engine::engine::ExpressionEngine;
//! use calc_engine::input::Action;
//!
//! let mut engine = ExpressionEngine::new();
//! for key in ["2", "+", "3", "*", "4", "Enter"] {
//!     if let Some(action) = Action::from_key(key, Default::default()) {
//!         engine.dispatch(action);
//!     }
//! }
//! assert_eq!(engine.current_value(), "20");
//! assert_eq!(engine.expression(), "2 + 3 × 4");
//! ```

pub mod state;
pub mod trace;
pub mod update;

pub use state::{CalculatorState, EngineState};
pub use trace::{ExpressionTrace, TraceItem, TraceOperator};
pub use update::{KeypadMode, ModeLabel, Notice, RenderSnapshot, Severity, Update};

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::core::format::{format_number, parse_operand, ERROR_SENTINEL};
use crate::core::history::History;
use crate::core::scientific::{Constant, ScientificFn};
use crate::core::{BinaryOp, CalcError, CalcResult};
use crate::input::{Action, DigitKey};

const POWER_PROMPT: &str = "Enter exponent, then press = or Enter";

const HISTORY_CLEARED: &str = "History cleared successfully!";

/// Side effects of a successful operation, merged into the [`Update`]
#[derive(Debug, Default)]
struct Effects {
    notice: Option<Notice>,
    schedule_clear: Option<Duration>,
    history_changed: bool,
}

impl Effects {
    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    fn history_changed() -> Self {
        Self {
            history_changed: true,
            ..Self::default()
        }
    }
}

/// Calculator input/expression state machine
#[derive(Debug)]
pub struct ExpressionEngine {
    state: CalculatorState,
    history: History,
    config: EngineConfig,
    keypad_mode: KeypadMode,
    rng: StdRng,
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine {
    /// Creates an engine with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with the given configuration
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: CalculatorState::default(),
            history: History::with_limit(config.history_limit),
            config,
            keypad_mode: KeypadMode::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds the generator behind `rand()`
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Restores previously persisted history, capped at the configured limit
    #[must_use]
    pub fn with_history(mut self, history: History) -> Self {
        let mut restored = History::with_limit(self.config.history_limit);
        for entry in history.iter().rev() {
            restored.push(entry.clone());
        }
        self.history = restored;
        self
    }

    // ===== Accessors =====

    /// Current keypad state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Calculation history, newest first
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current phase of the state machine
    #[must_use]
    pub fn phase(&self) -> EngineState {
        self.state.phase()
    }

    /// Visible keypad
    #[must_use]
    pub fn keypad_mode(&self) -> KeypadMode {
        self.keypad_mode
    }

    /// Current value text
    #[must_use]
    pub fn current_value(&self) -> &str {
        &self.state.current_value
    }

    /// Rendered expression trace
    #[must_use]
    pub fn expression(&self) -> String {
        self.state.trace.render()
    }

    /// What the display should show right now
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            display_text: self.state.display_text(),
            expression_text: self.state.trace.render(),
            mode_label: ModeLabel::resolve(self.state.power_mode, self.keypad_mode),
        }
    }

    // ===== Operations =====

    /// Routes a keypad or keyboard action
    pub fn dispatch(&mut self, action: Action) -> Update {
        match action {
            Action::Digit(key) => self.append_digit(key),
            Action::Operator(op) => self.set_operator(op),
            Action::Evaluate => self.evaluate(),
            Action::Clear => self.clear(),
            Action::Backspace => self.backspace(),
            Action::Percent => self.percent(),
            Action::Function(f) => self.apply(f),
            Action::Constant(c) => self.insert_constant(c),
            Action::Power => self.power(),
        }
    }

    /// Types a digit or the decimal point
    pub fn append_digit(&mut self, key: DigitKey) -> Update {
        let result = self.try_append_digit(key);
        self.finish("append_digit", result)
    }

    /// Chooses a binary operator, folding a pending one first
    pub fn set_operator(&mut self, op: BinaryOp) -> Update {
        let result = self.try_set_operator(op);
        self.finish("set_operator", result)
    }

    /// The `=` key
    pub fn evaluate(&mut self) -> Update {
        let result = self.try_evaluate();
        self.finish("evaluate", result)
    }

    /// Resets everything except history and keypad mode
    pub fn clear(&mut self) -> Update {
        self.reset();
        self.finish("clear", Ok(Effects::default()))
    }

    /// The deferred clear requested by [`Update::schedule_clear`].
    ///
    /// Resets unconditionally, even if input arrived in the meantime.
    pub fn auto_clear(&mut self) -> Update {
        debug!(phase = ?self.phase(), "Deferred clear fired");
        self.clear()
    }

    /// Deletes the last typed character
    pub fn backspace(&mut self) -> Update {
        let result = self.try_backspace();
        self.finish("backspace", result)
    }

    /// Divides the current value by 100. The result counts as computed,
    /// so the next digit starts a new operand.
    pub fn percent(&mut self) -> Update {
        let result = self.try_percent();
        self.finish("percent", result)
    }

    /// Applies a scientific function to the current value
    pub fn apply(&mut self, function: ScientificFn) -> Update {
        let result = self.try_apply(function);
        self.finish("apply", result)
    }

    /// Replaces the current value with a constant
    pub fn insert_constant(&mut self, constant: Constant) -> Update {
        let result = self.try_insert_constant(constant);
        self.finish("insert_constant", result)
    }

    /// Starts exponent entry with the current value as base
    pub fn power(&mut self) -> Update {
        let result = self.try_power();
        self.finish("power", result)
    }

    /// Computes `base ^ exponent` and leaves power mode
    pub fn complete_power(&mut self) -> Update {
        let result = self.try_complete_power();
        self.finish("complete_power", result)
    }

    /// Reuses the result of a history entry (0 = newest) as the operand
    pub fn recall_history(&mut self, index: usize) -> Update {
        let result = self.try_recall_history(index);
        self.finish("recall_history", result)
    }

    /// Deletes all history entries
    pub fn clear_history(&mut self) -> Update {
        let result = self.try_clear_history();
        self.finish("clear_history", result)
    }

    /// Switches the visible keypad
    pub fn set_keypad_mode(&mut self, mode: KeypadMode) -> Update {
        self.keypad_mode = mode;
        self.finish("set_keypad_mode", Ok(Effects::default()))
    }

    // ===== Transitions =====

    fn try_append_digit(&mut self, key: DigitKey) -> CalcResult<Effects> {
        if self.state.is_error() {
            self.reset();
        }

        let fresh = if key.is_point() {
            "0.".to_string()
        } else {
            key.as_char().to_string()
        };
        let state = &mut self.state;

        if state.showing_result {
            state.trace.restart_with(fresh.clone());
            state.current_value = fresh;
            state.showing_result = false;
            state.should_reset_display = false;
            return Ok(Effects::default());
        }

        if state.should_reset_display {
            if state.trace.ends_with_operator() {
                state.trace.push_operand(fresh.clone());
            } else if state.operation.is_some() || state.power_mode {
                state.trace.replace_last_operand(fresh.clone());
            } else {
                state.trace.restart_with(fresh.clone());
            }
            state.current_value = fresh;
            state.should_reset_display = false;
            return Ok(Effects::default());
        }

        let current = &state.current_value;
        let next = if current == "0" && !key.is_point() {
            key.as_char().to_string()
        } else if key.is_point() && current.contains('.') {
            return Err(CalcError::DuplicateDecimal);
        } else if current.chars().count() < self.config.max_digits {
            format!("{current}{key}")
        } else {
            return Err(CalcError::MaxDigits(self.config.max_digits));
        };

        state.trace.replace_last_operand(next.clone());
        state.current_value = next;
        Ok(Effects::default())
    }

    fn try_set_operator(&mut self, op: BinaryOp) -> CalcResult<Effects> {
        if self.state.is_error() {
            return Ok(Effects::default());
        }
        if self.state.power_mode {
            return self.try_complete_power();
        }

        if self.state.operation.is_some() && !self.state.awaiting_operand() {
            if let Some(terminal) = self.fold_pending()? {
                return Ok(terminal);
            }
        }

        let state = &mut self.state;
        let restart = state.trace.is_empty() || (state.showing_result && state.trace.len() > 1);
        if restart {
            state.trace.restart_with(state.current_value.clone());
        }
        state.trace.push_operator(TraceOperator::Binary(op));

        state.previous_value = state.current_value.clone();
        state.operation = Some(op);
        state.should_reset_display = true;
        state.showing_result = false;
        Ok(Effects::default())
    }

    fn try_evaluate(&mut self) -> CalcResult<Effects> {
        if self.state.is_error() {
            return Ok(Effects::default());
        }
        if self.state.power_mode {
            return self.try_complete_power();
        }
        let Some(op) = self.state.operation else {
            return Ok(Effects::default());
        };
        if self.state.previous_value.is_empty() {
            return Ok(Effects::default());
        }

        let (a, b) = self.pending_operands()?;
        if self.state.trace.ends_with_operator() {
            let operand = self.state.current_value.clone();
            self.state.trace.push_operand(operand);
        }

        let value = match op.apply(a, b) {
            Ok(value) => value,
            Err(err) => return self.terminal_or(err),
        };
        let result = format_number(value);
        let expression = self.state.trace.render();
        self.record_history(&expression, &result);

        let state = &mut self.state;
        state.current_value = result;
        state.previous_value.clear();
        state.operation = None;
        state.should_reset_display = true;
        state.showing_result = true;
        Ok(Effects::history_changed())
    }

    fn try_backspace(&mut self) -> CalcResult<Effects> {
        if self.state.is_error() || self.state.showing_result {
            self.reset();
            return Ok(Effects::default());
        }
        if self.state.should_reset_display {
            return Ok(Effects::default());
        }

        let mut next = self.state.current_value.clone();
        next.pop();
        if parse_operand(&next).is_none() {
            next = "0".to_string();
        }
        if next != self.state.current_value {
            self.state.trace.replace_last_operand(next.clone());
            self.state.current_value = next;
        }
        Ok(Effects::default())
    }

    fn try_percent(&mut self) -> CalcResult<Effects> {
        if self.state.is_error() {
            return Ok(Effects::default());
        }
        let value = self.current_operand()?;
        let result = format_number(value / 100.0);

        let state = &mut self.state;
        if state.showing_result && state.operation.is_none() && !state.power_mode {
            state.trace.restart_with(result.clone());
        } else {
            state.trace.replace_last_operand(result.clone());
        }
        state.current_value = result;
        state.should_reset_display = true;
        Ok(Effects::default())
    }

    fn try_apply(&mut self, function: ScientificFn) -> CalcResult<Effects> {
        if self.state.is_error() {
            return Ok(Effects::default());
        }
        let value = function.apply(self.current_operand()?)?;
        let result = format_number(value);
        if result == ERROR_SENTINEL {
            return Err(CalcError::Overflow);
        }
        let notation = function.notation(&self.state.current_value);
        self.place_operand(notation, result, true);
        Ok(Effects::default())
    }

    fn try_insert_constant(&mut self, constant: Constant) -> CalcResult<Effects> {
        if self.state.is_error() {
            self.reset();
        }
        let value = constant
            .fixed_value()
            .unwrap_or_else(|| self.rng.gen::<f64>());
        self.place_operand(constant.notation().to_string(), format_number(value), true);
        Ok(Effects::default())
    }

    fn try_power(&mut self) -> CalcResult<Effects> {
        if self.state.is_error() || self.state.power_mode {
            return Ok(Effects::default());
        }

        if self.state.operation.is_some() {
            if !self.state.awaiting_operand() {
                if let Some(terminal) = self.fold_pending()? {
                    return Ok(terminal);
                }
            }
            self.state.operation = None;
            self.state.previous_value.clear();
        }

        let state = &mut self.state;
        state.power_base = state.current_value.clone();
        state.trace.restart_with(state.current_value.clone());
        state.trace.push_operator(TraceOperator::Power);
        state.power_mode = true;
        state.should_reset_display = true;
        state.showing_result = false;
        Ok(Effects::notice(Notice::info(POWER_PROMPT)))
    }

    fn try_complete_power(&mut self) -> CalcResult<Effects> {
        if !self.state.power_mode {
            return Ok(Effects::default());
        }
        let base = parse_operand(&self.state.power_base).ok_or(CalcError::InvalidPower)?;
        let exponent = parse_operand(&self.state.current_value).ok_or(CalcError::InvalidPower)?;
        let value = base.powf(exponent);
        if !value.is_finite() {
            return Err(CalcError::InvalidPower);
        }

        if self.state.trace.ends_with_operator() {
            let operand = self.state.current_value.clone();
            self.state.trace.push_operand(operand);
        }
        let result = format_number(value);
        let expression = self.state.trace.render();
        self.record_history(&expression, &result);

        let state = &mut self.state;
        state.current_value = result;
        state.previous_value.clear();
        state.operation = None;
        state.power_mode = false;
        state.power_base.clear();
        state.should_reset_display = true;
        state.showing_result = true;
        Ok(Effects::history_changed())
    }

    fn try_recall_history(&mut self, index: usize) -> CalcResult<Effects> {
        let Some(entry) = self.history.get(index) else {
            debug!(index, len = self.history.len(), "No history entry at index");
            return Ok(Effects::default());
        };
        if !entry.is_reusable() {
            return Ok(Effects::default());
        }
        let value = entry.result.clone();

        if self.state.is_error() {
            self.reset();
        }
        self.place_operand(value.clone(), value.clone(), false);
        Ok(Effects::notice(Notice::success(format!("Using: {value}"))))
    }

    fn try_clear_history(&mut self) -> CalcResult<Effects> {
        if self.history.is_empty() {
            return Err(CalcError::HistoryEmpty);
        }
        let removed = self.history.len();
        self.history.clear();
        info!(removed, "History cleared");
        let mut effects = Effects::notice(Notice::success(HISTORY_CLEARED));
        effects.history_changed = true;
        Ok(effects)
    }

    // ===== Helpers =====

    fn reset(&mut self) {
        self.state = CalculatorState::default();
    }

    /// Folds the pending operation into the current value without
    /// recording history. Returns the effects of a terminal error, if one
    /// occurred.
    fn fold_pending(&mut self) -> CalcResult<Option<Effects>> {
        let Some(op) = self.state.operation else {
            return Ok(None);
        };
        let (a, b) = self.pending_operands()?;
        match op.apply(a, b) {
            Ok(value) => {
                let result = format_number(value);
                self.state.previous_value = result.clone();
                self.state.current_value = result;
                Ok(None)
            }
            Err(err) => self.terminal_or(err).map(Some),
        }
    }

    /// Division by zero and overflow put the engine into the error state;
    /// anything else is an ordinary rejection.
    fn terminal_or(&mut self, err: CalcError) -> CalcResult<Effects> {
        match err {
            CalcError::DivisionByZero | CalcError::Overflow => Ok(self.enter_error(&err)),
            other => Err(other),
        }
    }

    fn enter_error(&mut self, err: &CalcError) -> Effects {
        debug!(reason = %err, expression = %self.state.trace, "Entering error state");
        let state = &mut self.state;
        state.current_value = ERROR_SENTINEL.to_string();
        state.previous_value.clear();
        state.operation = None;
        state.power_mode = false;
        state.power_base.clear();
        state.should_reset_display = false;
        state.showing_result = false;
        Effects {
            notice: Some(Notice::from(err)),
            schedule_clear: Some(self.config.error_clear_delay()),
            history_changed: false,
        }
    }

    /// Puts a computed operand in place. With an operation or exponent
    /// pending it becomes the right-hand operand; otherwise it starts a
    /// new trace.
    fn place_operand(&mut self, notation: String, value: String, show_result: bool) {
        let state = &mut self.state;
        if state.operation.is_some() || state.power_mode {
            state.trace.replace_last_operand(notation);
            state.showing_result = false;
        } else {
            state.trace.restart_with(notation);
            state.showing_result = show_result;
        }
        state.current_value = value;
        state.should_reset_display = true;
    }

    fn current_operand(&self) -> CalcResult<f64> {
        let text = &self.state.current_value;
        parse_operand(text).ok_or_else(|| CalcError::InvalidOperand(text.clone()))
    }

    fn pending_operands(&self) -> CalcResult<(f64, f64)> {
        let previous = &self.state.previous_value;
        let a = parse_operand(previous).ok_or_else(|| CalcError::InvalidOperand(previous.clone()))?;
        Ok((a, self.current_operand()?))
    }

    fn record_history(&mut self, expression: &str, result: &str) {
        self.history.record(expression, result);
        info!(expression, result, entries = self.history.len(), "Calculation recorded");
    }

    fn finish(&self, operation: &'static str, result: CalcResult<Effects>) -> Update {
        let snapshot = self.snapshot();
        match result {
            Ok(effects) => Update {
                snapshot,
                notice: effects.notice,
                schedule_clear: effects.schedule_clear,
                history_changed: effects.history_changed,
            },
            Err(err) => {
                debug!(operation, reason = %err, "Input rejected");
                Update::new(snapshot).with_notice(Notice::from(&err))
            }
        }
    }
}
