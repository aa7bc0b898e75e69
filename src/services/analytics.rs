use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{CategoryTotal, FinancialSummary, RecentTransaction, Record, Transaction};

/// Number of categories and recent transactions included in a summary.
pub const SUMMARY_TOP_N: usize = 5;

/// Build the summary the advisor works from out of stored transactions.
pub fn summarize(transactions: &[Record<Transaction>]) -> FinancialSummary {
    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.data.is_income())
        .map(|t| t.data.amount_or_zero())
        .sum();
    let total_expenses: f64 = transactions
        .iter()
        .filter(|t| t.data.is_expense())
        .map(|t| t.data.amount_or_zero())
        .sum();

    let savings_rate = if total_income > 0.0 {
        round_to_cents((total_income - total_expenses) / total_income * 100.0)
    } else {
        0.0
    };

    FinancialSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        savings_rate,
        top_categories: top_expense_categories(transactions),
        recent_transactions: recent(transactions),
    }
}

fn top_expense_categories(transactions: &[Record<Transaction>]) -> Vec<CategoryTotal> {
    // Categories keep first-seen order so equal totals rank stably.
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for t in transactions.iter().filter(|t| t.data.is_expense()) {
        let category = t
            .data
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Other")
            .to_string();

        if !totals.contains_key(&category) {
            order.push(category.clone());
        }
        *totals.entry(category).or_insert(0.0) += t.data.amount_or_zero();
    }

    let mut result: Vec<CategoryTotal> = order
        .into_iter()
        .map(|name| CategoryTotal {
            amount: totals[&name],
            name,
        })
        .collect();

    result.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    result.truncate(SUMMARY_TOP_N);
    result
}

fn recent(transactions: &[Record<Transaction>]) -> Vec<RecentTransaction> {
    let mut dated: Vec<(Option<DateTime<Utc>>, &Record<Transaction>)> = transactions
        .iter()
        .map(|t| (t.data.date.as_deref().and_then(parse_date), t))
        .collect();

    // Newest first; undated entries sink to the end.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    dated
        .into_iter()
        .take(SUMMARY_TOP_N)
        .map(|(_, t)| RecentTransaction {
            date: t.data.date.clone(),
            kind: t.data.kind.map(|k| k.as_str().to_string()),
            category: t.data.category.clone(),
            amount: t.data.amount,
            description: t.data.description.clone(),
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(data: Transaction) -> Record<Transaction> {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Record {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: at,
            updated_at: at,
            data,
        }
    }

    #[test]
    fn test_totals_and_savings_rate() {
        let summary = summarize(&[
            record(Transaction::income(3000.0, "Salary")),
            record(Transaction::expense(1000.0, "Rent")),
            record(Transaction::expense(200.0, "Food")),
        ]);

        assert_eq!(summary.total_income, 3000.0);
        assert_eq!(summary.total_expenses, 1200.0);
        assert_eq!(summary.balance, 1800.0);
        assert_eq!(summary.savings_rate, 60.0);
    }

    #[test]
    fn test_savings_rate_rounds_to_two_decimals() {
        let summary = summarize(&[
            record(Transaction::income(3.0, "Salary")),
            record(Transaction::expense(2.0, "Food")),
        ]);
        assert_eq!(summary.savings_rate, 33.33);
    }

    #[test]
    fn test_no_income_means_zero_rate() {
        let summary = summarize(&[record(Transaction::expense(50.0, "Food"))]);
        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(summary.balance, -50.0);
    }

    #[test]
    fn test_top_categories_ranked_and_capped() {
        let mut txs: Vec<_> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .enumerate()
            .map(|(i, c)| record(Transaction::expense((i + 1) as f64 * 10.0, c)))
            .collect();
        txs.push(record(Transaction::expense(5.0, "A")));
        txs.push(record(Transaction {
            category: None,
            ..Transaction::expense(1.0, "")
        }));

        let summary = summarize(&txs);
        let names: Vec<&str> = summary
            .top_categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn test_missing_category_is_other() {
        let summary = summarize(&[record(Transaction {
            category: None,
            ..Transaction::expense(40.0, "")
        })]);
        assert_eq!(summary.top_categories[0].name, "Other");
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let summary = summarize(&[
            record(Transaction::expense(1.0, "Food").on("2024-01-05")),
            record(Transaction::expense(2.0, "Food")),
            record(Transaction::expense(3.0, "Food").on("2024-03-01T12:00:00Z")),
            record(Transaction::income(4.0, "Salary").on("2024-02-01")),
        ]);

        let amounts: Vec<f64> = summary
            .recent_transactions
            .iter()
            .filter_map(|t| t.amount)
            .collect();
        assert_eq!(amounts, vec![3.0, 4.0, 1.0, 2.0]);
        assert_eq!(summary.recent_transactions[1].kind.as_deref(), Some("income"));
    }
}
