use serde::{Deserialize, Serialize};

/// Most insights returned for one summary.
pub const MAX_INSIGHTS: usize = 5;
/// Longest insight message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Tip,
}

impl InsightKind {
    /// Map a model-supplied label onto a known kind; anything else is a tip.
    pub fn coerce(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("warning") => Self::Warning,
            Some("success") => Self::Success,
            _ => Self::Tip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: InsightKind::Warning,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: InsightKind::Success,
            message: message.into(),
        }
    }

    pub fn tip(message: impl Into<String>) -> Self {
        Self {
            kind: InsightKind::Tip,
            message: message.into(),
        }
    }
}

/// Which path produced an advisory answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Fallback,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Fallback => "fallback",
        }
    }
}
