//! Results that succeed with possibly degraded content.
//!
//! Storage failures and model failures never reach the caller as errors.
//! Instead the operation hands back usable data tagged with the reason it is
//! not the full answer, so handlers and tests can tell the two apart without
//! scraping logs.

use std::fmt;

/// Why an operation fell back to degraded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Durable read failed; the collection was treated as empty.
    StorageRead(String),
    /// Durable write failed; the change was not persisted.
    StorageWrite(String),
    /// Stored records that did not decode into the requested shape were skipped.
    UndecodableRecords(usize),
    /// The remote model failed; the template answer was used instead.
    ModelFailed(String),
}

impl Degradation {
    /// Short machine-readable tag, used in the `x-mintai-degraded` header.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StorageRead(_) => "storage-read",
            Self::StorageWrite(_) => "storage-write",
            Self::UndecodableRecords(_) => "undecodable-records",
            Self::ModelFailed(_) => "model-failed",
        }
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageRead(cause) => write!(f, "storage read failed: {cause}"),
            Self::StorageWrite(cause) => write!(f, "storage write failed: {cause}"),
            Self::UndecodableRecords(n) => write!(f, "{n} stored record(s) skipped"),
            Self::ModelFailed(cause) => write!(f, "model request failed: {cause}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Degraded { value: T, reason: Degradation },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: Degradation) -> Self {
        Self::Degraded { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Complete(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Complete(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn reason(&self) -> Option<&Degradation> {
        match self {
            Self::Complete(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Complete(value) => Outcome::Complete(f(value)),
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }

    /// Carry `reason` forward unless this outcome is already degraded.
    pub fn or_degraded(self, reason: Option<Degradation>) -> Self {
        match (self, reason) {
            (Self::Complete(value), Some(reason)) => Self::Degraded { value, reason },
            (outcome, _) => outcome,
        }
    }

    pub fn into_parts(self) -> (T, Option<Degradation>) {
        match self {
            Self::Complete(value) => (value, None),
            Self::Degraded { value, reason } => (value, Some(reason)),
        }
    }
}
