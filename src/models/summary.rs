use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregated view of the transactions, computed on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    /// Percentage, `0.0` when there is no income.
    pub savings_rate: f64,
    /// Expense categories, largest first.
    pub top_categories: Vec<CategoryTotal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_transactions: Vec<RecentTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// May be empty when the sender did not name the category.
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FinancialSummary {
    /// Surplus for the period; never negative.
    pub fn savings(&self) -> f64 {
        (self.total_income - self.total_expenses).max(0.0)
    }

    /// Read a summary sent by a client.
    ///
    /// Clients are not consistent about the shape: totals may sit under a
    /// `totals` object or at the top level, numbers may arrive as strings
    /// (sometimes with a `%` suffix) and categories use either
    /// `category`/`name` and `amount`/`value`. Anything unreadable counts as
    /// missing.
    pub fn from_value(value: &Value) -> Self {
        let totals = value.get("totals");
        let pick = |nested: &str, flat: &str| {
            totals
                .and_then(|t| t.get(nested))
                .and_then(lenient_number)
                .or_else(|| value.get(flat).and_then(lenient_number))
        };

        let total_income = pick("income", "totalIncome").unwrap_or(0.0);
        let total_expenses = pick("expenses", "totalExpenses").unwrap_or(0.0);
        let balance = pick("balance", "balance").unwrap_or(total_income - total_expenses);
        let savings = (total_income - total_expenses).max(0.0);
        let savings_rate = pick("savingsRate", "savingsRate").unwrap_or(if total_income > 0.0 {
            savings / total_income * 100.0
        } else {
            0.0
        });

        let top_categories = value
            .get("topCategories")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(category_total).collect())
            .unwrap_or_default();

        let recent_transactions = value
            .get("recentTransactions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_income,
            total_expenses,
            balance,
            savings_rate,
            top_categories,
            recent_transactions,
        }
    }

    /// Totals and the five largest categories only.
    pub fn compact(&self) -> Self {
        Self {
            top_categories: self.top_categories.iter().take(5).cloned().collect(),
            recent_transactions: Vec::new(),
            ..self.clone()
        }
    }
}

fn category_total(item: &Value) -> CategoryTotal {
    let name = ["category", "name"]
        .iter()
        .find_map(|key| match item.get(*key) {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default();
    let amount = ["amount", "value"]
        .iter()
        .find_map(|key| item.get(*key).and_then(lenient_number))
        .unwrap_or(0.0);

    CategoryTotal { name, amount }
}

/// A finite number from a JSON number or a numeric string such as `"12.5%"`.
pub fn lenient_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_shape() {
        let summary = FinancialSummary::from_value(&json!({
            "totalIncome": 4000,
            "totalExpenses": 3000,
            "balance": 1000,
            "savingsRate": 25,
            "topCategories": [{ "name": "Rent", "amount": 1500 }]
        }));

        assert_eq!(summary.total_income, 4000.0);
        assert_eq!(summary.savings_rate, 25.0);
        assert_eq!(
            summary.top_categories,
            vec![CategoryTotal {
                name: "Rent".into(),
                amount: 1500.0
            }]
        );
    }

    #[test]
    fn test_nested_totals_take_precedence() {
        let summary = FinancialSummary::from_value(&json!({
            "totals": { "income": 1000, "expenses": 400 },
            "totalIncome": 1,
            "topCategories": [{ "category": "Food", "value": "250" }]
        }));

        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.total_expenses, 400.0);
        assert_eq!(summary.balance, 600.0);
        assert!((summary.savings_rate - 60.0).abs() < 1e-9);
        assert_eq!(summary.top_categories[0].name, "Food");
        assert_eq!(summary.top_categories[0].amount, 250.0);
    }

    #[test]
    fn test_percent_strings_and_garbage() {
        let summary = FinancialSummary::from_value(&json!({
            "totalIncome": "2000",
            "totalExpenses": "oops",
            "savingsRate": "12.50%",
            "topCategories": "not a list"
        }));

        assert_eq!(summary.total_income, 2000.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.savings_rate, 12.5);
        assert!(summary.top_categories.is_empty());
    }

    #[test]
    fn test_empty_object_is_all_zero() {
        let summary = FinancialSummary::from_value(&json!({}));
        assert_eq!(summary, FinancialSummary::default());
    }
}
