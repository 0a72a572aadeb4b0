//! What an engine operation hands back to its caller.
//!
//! The engine never paints anything itself. Each operation returns an
//! [`Update`] holding a fresh [`RenderSnapshot`], an optional
//! [`Notice`] for the toast area, and an optional request to clear the
//! display later.

use std::fmt;
use std::time::Duration;

use crate::core::CalcError;

/// Which button set is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeypadMode {
    /// Digits and the four basic operators
    #[default]
    Standard,
    /// Standard keys plus the scientific row
    Scientific,
}

/// Label shown above the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeLabel {
    /// Waiting for an exponent
    Power,
    /// Scientific keypad visible
    Scientific,
    /// Standard keypad visible
    Standard,
}

impl ModeLabel {
    /// Picks the label; power mode wins over the keypad mode
    #[must_use]
    pub const fn resolve(power_mode: bool, keypad: KeypadMode) -> Self {
        if power_mode {
            return Self::Power;
        }
        match keypad {
            KeypadMode::Standard => Self::Standard,
            KeypadMode::Scientific => Self::Scientific,
        }
    }

    /// Label text
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "POWER MODE",
            Self::Scientific => "SCIENTIFIC",
            Self::Standard => "STANDARD",
        }
    }
}

impl fmt::Display for ModeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a renderer needs to paint the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Main display line, prefixed with `= ` after an evaluation
    pub display_text: String,
    /// Expression trace shown above the main line
    pub expression_text: String,
    /// Mode indicator
    pub mode_label: ModeLabel,
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information
    Info,
    /// Rejected input or failed calculation
    Error,
    /// Confirmation
    Success,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text
    pub message: String,
    /// How the message should be styled
    pub severity: Severity,
}

impl Notice {
    /// Creates an error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a success notice
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// Creates an informational notice
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }
}

impl From<&CalcError> for Notice {
    fn from(err: &CalcError) -> Self {
        Self::error(err.to_string())
    }
}

/// Result of one engine operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// State after the operation
    pub snapshot: RenderSnapshot,
    /// Message to show, if any
    pub notice: Option<Notice>,
    /// The caller should call `auto_clear` after this delay
    pub schedule_clear: Option<Duration>,
    /// A history entry was added or the history was cleared
    pub history_changed: bool,
}

impl Update {
    /// An update carrying only a snapshot
    #[must_use]
    pub fn new(snapshot: RenderSnapshot) -> Self {
        Self {
            snapshot,
            notice: None,
            schedule_clear: None,
            history_changed: false,
        }
    }

    /// Attaches a notice
    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    /// Returns true if the update carries an error notice
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|n| n.severity == Severity::Error)
    }

    /// Message text of the notice, if any
    #[must_use]
    pub fn notice_text(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.message.as_str())
    }
}
