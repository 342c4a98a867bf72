use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofCodeError {
    #[error("Proof code {0} is outside of 1000..=9999")]
    OutOfRange(u32),
    #[error("Proof code must be a 4-digit number, got {0:?}")]
    Malformed(String),
}

/// Four digit numeric secret relayed to the user out of band.
///
/// Codes are drawn from `1000..=9999`, so they always render as exactly four
/// digits and never start with a zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProofCode(u16);

impl ProofCode {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    pub fn new(value: u32) -> Result<Self, ProofCodeError> {
        Self::try_from(value)
    }

    /// Parses a code typed by a user. Surrounding whitespace is ignored.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, ProofCodeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProofCodeError::Malformed(trimmed.to_owned()));
        }
        let value: u32 = trimmed
            .parse()
            .map_err(|_| ProofCodeError::Malformed(trimmed.to_owned()))?;
        Self::new(value)
    }

    pub fn value(&self) -> u32 {
        u32::from(self.0)
    }

    pub fn matches(&self, submitted: u32) -> bool {
        self.value() == submitted
    }
}

impl TryFrom<u32> for ProofCode {
    type Error = ProofCodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (u32::from(Self::MIN)..=u32::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(ProofCodeError::OutOfRange(value))
        }
    }
}

impl From<ProofCode> for u32 {
    fn from(code: ProofCode) -> Self {
        code.value()
    }
}

impl fmt::Display for ProofCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}
