//! Keyboard and button input mapping.
//!
//! Every on-screen button has a keyboard shortcut or is reachable through
//! its `data-value` / `data-action` name; both paths end in the same
//! [`Action`], which [`ExpressionEngine::dispatch`] executes.
//!
//! [`ExpressionEngine::dispatch`]: crate::engine::ExpressionEngine::dispatch

use std::fmt;
use std::str::FromStr;

use crate::core::scientific::{Constant, ScientificFn};
use crate::core::BinaryOp;

/// A digit or the decimal point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitKey(char);

impl DigitKey {
    /// The decimal point key
    pub const POINT: DigitKey = DigitKey('.');

    /// Creates a key from `0`-`9` or `.`
    #[must_use]
    pub const fn new(c: char) -> Option<Self> {
        match c {
            '0'..='9' | '.' => Some(Self(c)),
            _ => None,
        }
    }

    /// Creates a digit key from its value
    #[must_use]
    pub fn digit(value: u8) -> Option<Self> {
        char::from_digit(u32::from(value), 10).map(Self)
    }

    /// The character this key types
    #[must_use]
    pub const fn as_char(&self) -> char {
        self.0
    }

    /// Returns true for the decimal point
    #[must_use]
    pub const fn is_point(&self) -> bool {
        self.0 == '.'
    }
}

impl fmt::Display for DigitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    /// Control key
    pub ctrl: bool,
    /// Meta / command key
    pub meta: bool,
}

impl KeyModifiers {
    /// No modifiers
    pub const NONE: KeyModifiers = KeyModifiers {
        ctrl: false,
        meta: false,
    };

    /// Control held
    pub const CTRL: KeyModifiers = KeyModifiers {
        ctrl: true,
        meta: false,
    };

    /// Meta held
    pub const META: KeyModifiers = KeyModifiers {
        ctrl: false,
        meta: true,
    };

    /// Returns true if a shortcut modifier is held
    #[must_use]
    pub const fn any(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Anything a button or key can ask the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Type a digit or the decimal point
    Digit(DigitKey),
    /// Choose a binary operator
    Operator(BinaryOp),
    /// `=`
    Evaluate,
    /// Reset everything
    Clear,
    /// Delete the last character
    Backspace,
    /// Divide the current value by 100
    Percent,
    /// Apply a scientific function
    Function(ScientificFn),
    /// Insert a constant
    Constant(Constant),
    /// Start exponent entry
    Power,
}

/// Unknown `data-action` name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: '{0}'")]
pub struct UnknownAction(pub String);

impl Action {
    /// Maps a keyboard key (a browser `KeyboardEvent.key` value) to an action
    #[must_use]
    pub fn from_key(key: &str, modifiers: KeyModifiers) -> Option<Self> {
        match key {
            "Enter" => return Some(Self::Evaluate),
            "Escape" => return Some(Self::Clear),
            "Backspace" => return Some(Self::Backspace),
            _ => {}
        }

        let mut chars = key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        if let Some(digit) = DigitKey::new(c) {
            return Some(Self::Digit(digit));
        }

        match c {
            '+' => Some(Self::Operator(BinaryOp::Add)),
            '-' => Some(Self::Operator(BinaryOp::Subtract)),
            '*' | 'x' | 'X' => Some(Self::Operator(BinaryOp::Multiply)),
            '/' | '÷' => Some(Self::Operator(BinaryOp::Divide)),
            '=' => Some(Self::Evaluate),
            '%' => Some(Self::Percent),
            '^' => Some(Self::Power),
            '!' => Some(Self::Function(ScientificFn::Factorial)),
            _ => match c.to_ascii_lowercase() {
                'r' => Some(Self::Function(ScientificFn::Sqrt)),
                'q' => Some(Self::Function(ScientificFn::Square)),
                'i' => Some(Self::Function(ScientificFn::Inverse)),
                'p' => Some(Self::Constant(Constant::Pi)),
                'e' if !modifiers.any() => Some(Self::Constant(Constant::E)),
                _ => None,
            },
        }
    }

    /// Maps a button's `data-value` or `data-action` attribute to an action.
    ///
    /// `value` wins when both are present.
    #[must_use]
    pub fn from_button(value: Option<&str>, action: Option<&str>) -> Option<Self> {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return match value {
                "+" => Some(Self::Operator(BinaryOp::Add)),
                "-" => Some(Self::Operator(BinaryOp::Subtract)),
                "*" => Some(Self::Operator(BinaryOp::Multiply)),
                "/" => Some(Self::Operator(BinaryOp::Divide)),
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => DigitKey::new(c).map(Self::Digit),
                        _ => None,
                    }
                }
            };
        }
        action.and_then(|name| name.parse().ok())
    }

    /// The `data-action` name, for actions that have one
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Digit(_) | Self::Operator(_) => return None,
            Self::Evaluate => "equals",
            Self::Clear => "clear",
            Self::Backspace => "back",
            Self::Percent => "percent",
            Self::Power => "power",
            Self::Function(f) => match f {
                ScientificFn::Sqrt => "sqrt",
                ScientificFn::Square => "square",
                ScientificFn::Cube => "cube",
                ScientificFn::Inverse => "inverse",
                ScientificFn::Sin => "sin",
                ScientificFn::Cos => "cos",
                ScientificFn::Tan => "tan",
                ScientificFn::Log10 => "log",
                ScientificFn::Ln => "ln",
                ScientificFn::Factorial => "factorial",
                ScientificFn::Abs => "abs",
            },
            Self::Constant(c) => match c {
                Constant::Pi => "pi",
                Constant::E => "e",
                Constant::Random => "rand",
            },
        };
        Some(name)
    }

    /// Button label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Operator(op) => op.display_symbol().to_string(),
            Self::Evaluate => "=".to_string(),
            Self::Clear => "C".to_string(),
            Self::Backspace => "⌫".to_string(),
            Self::Percent => "%".to_string(),
            Self::Power => "xʸ".to_string(),
            Self::Function(f) => match f {
                ScientificFn::Sqrt => "√".to_string(),
                ScientificFn::Square => "x²".to_string(),
                ScientificFn::Cube => "x³".to_string(),
                ScientificFn::Inverse => "1/x".to_string(),
                ScientificFn::Sin => "sin".to_string(),
                ScientificFn::Cos => "cos".to_string(),
                ScientificFn::Tan => "tan".to_string(),
                ScientificFn::Log10 => "log".to_string(),
                ScientificFn::Ln => "ln".to_string(),
                ScientificFn::Factorial => "n!".to_string(),
                ScientificFn::Abs => "|x|".to_string(),
            },
            Self::Constant(c) => c.notation().to_string(),
        }
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "clear" => Self::Clear,
            "back" => Self::Backspace,
            "percent" => Self::Percent,
            "equals" => Self::Evaluate,
            "power" => Self::Power,
            "sqrt" => Self::Function(ScientificFn::Sqrt),
            "square" => Self::Function(ScientificFn::Square),
            "cube" => Self::Function(ScientificFn::Cube),
            "inverse" => Self::Function(ScientificFn::Inverse),
            "sin" => Self::Function(ScientificFn::Sin),
            "cos" => Self::Function(ScientificFn::Cos),
            "tan" => Self::Function(ScientificFn::Tan),
            "log" => Self::Function(ScientificFn::Log10),
            "ln" => Self::Function(ScientificFn::Ln),
            "factorial" => Self::Function(ScientificFn::Factorial),
            "abs" => Self::Function(ScientificFn::Abs),
            "pi" => Self::Constant(Constant::Pi),
            "e" => Self::Constant(Constant::E),
            "rand" => Self::Constant(Constant::Random),
            other => return Err(UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Option<Action> {
        Action::from_key(k, KeyModifiers::NONE)
    }

    const ACTION_NAMES: [&str; 19] = [
        "clear",
        "back",
        "percent",
        "equals",
        "sqrt",
        "square",
        "cube",
        "inverse",
        "power",
        "pi",
        "e",
        "sin",
        "cos",
        "tan",
        "log",
        "ln",
        "factorial",
        "abs",
        "rand",
    ];

    // ===== DigitKey tests =====

    #[test]
    fn test_digit_key_new() {
        for c in '0'..='9' {
            assert_eq!(DigitKey::new(c).map(|d| d.as_char()), Some(c));
        }
        assert_eq!(DigitKey::new('.'), Some(DigitKey::POINT));
        assert_eq!(DigitKey::new('a'), None);
    }

    #[test]
    fn test_digit_key_from_value() {
        assert_eq!(DigitKey::digit(7).map(|d| d.as_char()), Some('7'));
        assert_eq!(DigitKey::digit(10), None);
        assert!(DigitKey::POINT.is_point());
        assert!(!DigitKey::digit(0).unwrap().is_point());
    }

    // ===== Keyboard tests =====

    #[test]
    fn test_digit_keys() {
        for c in '0'..='9' {
            let expected = DigitKey::new(c).map(Action::Digit);
            assert_eq!(key(&c.to_string()), expected);
        }
        assert_eq!(key("."), Some(Action::Digit(DigitKey::POINT)));
    }

    #[test]
    fn test_operator_keys() {
        assert_eq!(key("+"), Some(Action::Operator(BinaryOp::Add)));
        assert_eq!(key("-"), Some(Action::Operator(BinaryOp::Subtract)));
        for k in ["*", "x", "X"] {
            assert_eq!(key(k), Some(Action::Operator(BinaryOp::Multiply)));
        }
        for k in ["/", "÷"] {
            assert_eq!(key(k), Some(Action::Operator(BinaryOp::Divide)));
        }
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key("Enter"), Some(Action::Evaluate));
        assert_eq!(key("="), Some(Action::Evaluate));
        assert_eq!(key("Escape"), Some(Action::Clear));
        assert_eq!(key("Backspace"), Some(Action::Backspace));
        assert_eq!(key("%"), Some(Action::Percent));
        assert_eq!(key("^"), Some(Action::Power));
    }

    #[test]
    fn test_letter_shortcuts_ignore_case() {
        for k in ["r", "R"] {
            assert_eq!(key(k), Some(Action::Function(ScientificFn::Sqrt)));
        }
        for k in ["q", "Q"] {
            assert_eq!(key(k), Some(Action::Function(ScientificFn::Square)));
        }
        for k in ["i", "I"] {
            assert_eq!(key(k), Some(Action::Function(ScientificFn::Inverse)));
        }
        for k in ["p", "P"] {
            assert_eq!(key(k), Some(Action::Constant(Constant::Pi)));
        }
        assert_eq!(key("!"), Some(Action::Function(ScientificFn::Factorial)));
    }

    #[test]
    fn test_euler_key_respects_modifiers() {
        assert_eq!(key("e"), Some(Action::Constant(Constant::E)));
        assert_eq!(key("E"), Some(Action::Constant(Constant::E)));
        assert_eq!(Action::from_key("e", KeyModifiers::CTRL), None);
        assert_eq!(Action::from_key("e", KeyModifiers::META), None);
    }

    #[test]
    fn test_unmapped_keys() {
        for k in ["", "Tab", "ArrowUp", "z", "(", "12"] {
            assert_eq!(key(k), None, "{k:?}");
        }
    }

    // ===== Button tests =====

    #[test]
    fn test_button_values() {
        assert_eq!(
            Action::from_button(Some("7"), None),
            DigitKey::new('7').map(Action::Digit)
        );
        assert_eq!(
            Action::from_button(Some("."), None),
            Some(Action::Digit(DigitKey::POINT))
        );
        assert_eq!(
            Action::from_button(Some("*"), None),
            Some(Action::Operator(BinaryOp::Multiply))
        );
        assert_eq!(Action::from_button(Some("77"), None), None);
    }

    #[test]
    fn test_button_value_wins_over_action() {
        assert_eq!(
            Action::from_button(Some("+"), Some("clear")),
            Some(Action::Operator(BinaryOp::Add))
        );
        assert_eq!(
            Action::from_button(Some(""), Some("clear")),
            Some(Action::Clear)
        );
    }

    #[test]
    fn test_every_action_name_round_trips() {
        for name in ACTION_NAMES {
            let action: Action = name.parse().unwrap();
            assert_eq!(action.name(), Some(name));
            assert_eq!(Action::from_button(None, Some(name)), Some(action));
        }
    }

    #[test]
    fn test_unknown_action_name() {
        let err = "explode".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: 'explode'");
        assert_eq!(Action::from_button(None, Some("explode")), None);
        assert_eq!(Action::from_button(None, None), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Action::Operator(BinaryOp::Divide).label(), "÷");
        assert_eq!(Action::Evaluate.label(), "=");
        assert_eq!(Action::Constant(Constant::Pi).label(), "π");
        assert_eq!(Action::Function(ScientificFn::Sqrt).label(), "√");
        assert_eq!(Action::Digit(DigitKey::POINT).label(), ".");
    }

    #[test]
    fn test_digit_and_operator_have_no_name() {
        assert_eq!(Action::Digit(DigitKey::POINT).name(), None);
        assert_eq!(Action::Operator(BinaryOp::Add).name(), None);
    }
}
