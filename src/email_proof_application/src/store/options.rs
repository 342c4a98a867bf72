use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

pub const DEFAULT_CACHE_KEY: &str = "EmailProof";
pub const DEFAULT_VALIDITY_WINDOW: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_MAX_CAS_ATTEMPTS: u32 = 5;
/// Shortest window accepted; anything shorter would expire codes on issue.
pub const MIN_VALIDITY_WINDOW: Duration = Duration::from_secs(1);

/// How proof items are spread over cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    /// One collection for every email under the base key.
    #[default]
    Shared,
    /// One collection per case-folded email, keyed `{base}:{email}`.
    PerEmail,
}

/// How a mutated collection is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Plain overwrite; concurrent writers can drop each other's changes.
    #[default]
    LastWriterWins,
    /// Write only if the key still holds what was loaded, retrying otherwise.
    CompareAndSwap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub validity_window: Duration,
    pub cache_key: String,
    pub key_layout: KeyLayout,
    pub write_mode: WriteMode,
    pub max_cas_attempts: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            validity_window: DEFAULT_VALIDITY_WINDOW,
            cache_key: DEFAULT_CACHE_KEY.to_owned(),
            key_layout: KeyLayout::default(),
            write_mode: WriteMode::default(),
            max_cas_attempts: DEFAULT_MAX_CAS_ATTEMPTS,
        }
    }
}

impl StoreOptions {
    pub fn with_validity_window(mut self, window: Duration) -> Self {
        self.validity_window = window.max(MIN_VALIDITY_WINDOW);
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    pub fn with_key_layout(mut self, layout: KeyLayout) -> Self {
        self.key_layout = layout;
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn with_max_cas_attempts(mut self, attempts: u32) -> Self {
        self.max_cas_attempts = attempts.max(1);
        self
    }

    pub(crate) fn window(&self) -> TimeDelta {
        TimeDelta::from_std(self.validity_window).unwrap_or(TimeDelta::MAX)
    }

    /// Key holding the collection that `email` lives in.
    pub fn collection_key(&self, email: &str) -> String {
        match self.key_layout {
            KeyLayout::Shared => self.cache_key.clone(),
            KeyLayout::PerEmail => {
                format!("{}{}", self.per_email_prefix(), email.to_ascii_lowercase())
            }
        }
    }

    pub(crate) fn per_email_prefix(&self) -> String {
        format!("{}:", self.cache_key)
    }
}
