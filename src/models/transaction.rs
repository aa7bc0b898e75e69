use serde::{Deserialize, Serialize};

pub const TRANSACTIONS: &str = "transactions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    #[serde(other)]
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Other => "other",
        }
    }
}

/// Payload of a record in the `transactions` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    /// ISO date (`2024-03-01`) or full timestamp, as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn income(amount: f64, category: &str) -> Self {
        Self {
            amount: Some(amount),
            kind: Some(TransactionKind::Income),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    pub fn expense(amount: f64, category: &str) -> Self {
        Self {
            amount: Some(amount),
            kind: Some(TransactionKind::Expense),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    pub fn on(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn amount_or_zero(&self) -> f64 {
        self.amount.filter(|a| a.is_finite()).unwrap_or(0.0)
    }

    pub fn is_income(&self) -> bool {
        self.kind == Some(TransactionKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Some(TransactionKind::Expense)
    }
}
