//! Calc Engine - keypad calculator core
//!
//! This crate holds everything a calculator widget needs short of
//! painting pixels: the keypad input state machine, scientific
//! functions, number formatting, calculation history and a small
//! expression parser for the raw-expression pad.
//!
//! # Layout
//!
//! - [`engine`]: the [`ExpressionEngine`](engine::ExpressionEngine) state
//!   machine; every operation returns an [`Update`](engine::Update)
//! - [`core`]: arithmetic, scientific functions, formatting, history and
//!   the expression grammar
//! - [`input`]: keyboard and button mapping
//! - [`pad`]: raw expression string evaluated as a whole
//! - [`store`] and [`session`]: persistence of history and theme
//! - [`config`]: YAML-loadable limits and timings
//!
//! # Example
//!
//! ```rust
//! use calc_engine::prelude::*;
//!
//! let mut engine = ExpressionEngine::new();
//! engine.append_digit(DigitKey::new('8').unwrap());
//! engine.set_operator(BinaryOp::Divide);
//! engine.append_digit(DigitKey::new('0').unwrap());
//!
//! let update = engine.evaluate();
//! assert_eq!(engine.phase(), EngineState::ErrorState);
//! assert_eq!(update.notice_text(), Some("Cannot divide by zero!"));
//! assert!(update.schedule_clear.is_some());
//!
//! // Raw expressions use normal precedence
//! let value = Evaluator::new().evaluate_str("2 + 3 * 4").unwrap();
//! assert_eq!(value, 14.0);
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod engine;
pub mod input;
pub mod pad;
pub mod session;
pub mod store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, EngineConfig};
    pub use crate::core::evaluator::Evaluator;
    pub use crate::core::format::{format_number, parse_operand};
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::scientific::{Constant, ScientificFn};
    pub use crate::core::{BinaryOp, CalcError, CalcResult, DomainError};
    pub use crate::engine::{
        CalculatorState, EngineState, ExpressionEngine, ExpressionTrace, KeypadMode, ModeLabel,
        Notice, RenderSnapshot, Severity, Update,
    };
    pub use crate::input::{Action, DigitKey, KeyModifiers};
    pub use crate::pad::ExpressionPad;
    pub use crate::session::CalculatorSession;
    pub use crate::store::{FileStore, MemoryStore, PersistenceStore, StoreError, Theme};
}
