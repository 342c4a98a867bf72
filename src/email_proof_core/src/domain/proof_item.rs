use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::proof_code::ProofCode;

/// Identity comparison used for every lookup and dedup decision.
///
/// ASCII-only folding so that results never depend on the host locale.
pub fn emails_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

/// One outstanding verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofItem {
    pub email: String,
    pub code: ProofCode,
    pub created_at: DateTime<Utc>,
}

impl ProofItem {
    pub fn new(email: impl Into<String>, code: ProofCode, created_at: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            code,
            created_at,
        }
    }

    pub fn belongs_to(&self, email: &str) -> bool {
        emails_match(&self.email, email)
    }

    /// An item is valid while its age is strictly below the window.
    pub fn is_valid_at(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        now - self.created_at < window
    }
}

/// Every issued item stored under a single cache key, valid or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofItemCollection {
    items: Vec<ProofItem>,
}

impl ProofItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a stored payload. An empty payload is an empty collection.
    pub fn decode(payload: &str) -> Result<Self, serde_json::Error> {
        if payload.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(payload)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ProofItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ProofItem> {
        self.items
    }

    pub fn push(&mut self, item: ProofItem) {
        self.items.push(item);
    }

    /// Removes every item owned by `email` and returns how many were dropped.
    pub fn remove_email(&mut self, email: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.belongs_to(email));
        before - self.items.len()
    }

    /// Replaces whatever `item.email` had outstanding with `item`.
    pub fn supersede(&mut self, item: ProofItem) {
        self.remove_email(&item.email);
        self.items.push(item);
    }

    /// Drops items whose window has passed and returns how many went.
    pub fn prune_expired(&mut self, now: DateTime<Utc>, window: TimeDelta) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.is_valid_at(now, window));
        before - self.items.len()
    }

    pub fn valid_at(&self, now: DateTime<Utc>, window: TimeDelta) -> Vec<ProofItem> {
        self.items
            .iter()
            .filter(|item| item.is_valid_at(now, window))
            .cloned()
            .collect()
    }

    pub fn find_valid(
        &self,
        email: &str,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> Option<&ProofItem> {
        self.items
            .iter()
            .filter(|item| item.is_valid_at(now, window))
            .find(|item| item.belongs_to(email))
    }
}

impl FromIterator<ProofItem> for ProofItemCollection {
    fn from_iter<I: IntoIterator<Item = ProofItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
