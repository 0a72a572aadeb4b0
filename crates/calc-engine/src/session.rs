//! A calculator wired to persistent storage.
//!
//! [`CalculatorSession`] restores history and theme when it opens and
//! writes them back whenever they change. Storage failures are logged and
//! otherwise ignored: the calculator keeps working from memory.

use std::time::Duration;

use tracing::warn;

use crate::config::EngineConfig;
use crate::core::history::History;
use crate::engine::{ExpressionEngine, KeypadMode, Notice, Update};
use crate::input::Action;
use crate::store::{PersistenceStore, Theme, HISTORY_KEY, THEME_KEY};

/// Engine, store and theme for one calculator widget
#[derive(Debug)]
pub struct CalculatorSession<S: PersistenceStore> {
    engine: ExpressionEngine,
    store: S,
    theme: Theme,
}

impl<S: PersistenceStore> CalculatorSession<S> {
    /// Opens a session with the default configuration
    pub fn open(store: S) -> Self {
        Self::open_with_config(store, EngineConfig::default())
    }

    /// Opens a session, restoring whatever the store holds
    pub fn open_with_config(mut store: S, config: EngineConfig) -> Self {
        let limit = config.history_limit;
        let history = load_history(&mut store, limit);
        let theme = load_theme(&store);
        Self {
            engine: ExpressionEngine::with_config(config).with_history(history),
            store,
            theme,
        }
    }

    /// Replaces the engine, e.g. with a seeded one; history is kept
    #[must_use]
    pub fn with_engine(mut self, engine: ExpressionEngine) -> Self {
        let history = self.engine.history().clone();
        self.engine = engine.with_history(history);
        self
    }

    /// Runs an action and persists history if it changed
    pub fn dispatch(&mut self, action: Action) -> Update {
        let update = self.engine.dispatch(action);
        self.after(update)
    }

    /// Reuses a history result as the current operand
    pub fn recall_history(&mut self, index: usize) -> Update {
        let update = self.engine.recall_history(index);
        self.after(update)
    }

    /// Clears and persists the history
    pub fn clear_history(&mut self) -> Update {
        let update = self.engine.clear_history();
        self.after(update)
    }

    /// Deferred clear after a terminal error
    pub fn auto_clear(&mut self) -> Update {
        self.engine.auto_clear()
    }

    /// Switches the visible keypad
    pub fn set_keypad_mode(&mut self, mode: KeypadMode) -> Update {
        self.engine.set_keypad_mode(mode)
    }

    /// Selects and persists a theme
    pub fn set_theme(&mut self, theme: Theme) -> Notice {
        self.theme = theme;
        if let Err(e) = self.store.set(THEME_KEY, theme.name()) {
            warn!(key = THEME_KEY, error = %e, "Storage unavailable");
        }
        Notice::success(format!("Theme: {theme}"))
    }

    /// How long the caller should show a notice
    #[must_use]
    pub fn notice_duration(&self) -> Duration {
        self.engine.config().notice_duration()
    }

    /// Selected theme
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The engine
    #[must_use]
    pub fn engine(&self) -> &ExpressionEngine {
        &self.engine
    }

    /// The store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Closes the session and returns the store
    pub fn into_store(self) -> S {
        self.store
    }

    fn after(&mut self, update: Update) -> Update {
        if update.history_changed {
            self.save_history();
        }
        update
    }

    fn save_history(&mut self) {
        let json = match self.engine.history().to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(key = HISTORY_KEY, error = %e, "Failed to encode history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &json) {
            warn!(key = HISTORY_KEY, error = %e, "Storage unavailable");
        }
    }
}

fn load_history<S: PersistenceStore>(store: &mut S, limit: usize) -> History {
    match store.get(HISTORY_KEY) {
        Ok(Some(json)) => History::from_json_with_limit(&json, limit).unwrap_or_else(|e| {
            warn!(key = HISTORY_KEY, error = %e, "Discarding unreadable history");
            if let Err(e) = store.remove(HISTORY_KEY) {
                warn!(key = HISTORY_KEY, error = %e, "Storage unavailable");
            }
            History::with_limit(limit)
        }),
        Ok(None) => History::with_limit(limit),
        Err(e) => {
            warn!(key = HISTORY_KEY, error = %e, "Storage unavailable");
            History::with_limit(limit)
        }
    }
}

fn load_theme<S: PersistenceStore>(store: &S) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(name)) => name.parse::<Theme>().unwrap_or_else(|e| {
            warn!(key = THEME_KEY, error = %e, "Ignoring unknown theme");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            warn!(key = THEME_KEY, error = %e, "Storage unavailable");
            Theme::default()
        }
    }
}
