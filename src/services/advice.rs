//! Canned answers for the advice endpoint when no model is available.

use crate::filters::{dollars, round_half_up, whole_percent};
use crate::models::FinancialSummary;

const OPENER: &str = "Here's a practical approach:";

/// Answer `question` from templates, using whatever the summary tells us.
///
/// Keywords are checked in a fixed order: saving, budgeting, investing, then
/// the names of the top expense categories. Anything else gets the generic
/// answer.
pub fn template_advice(question: &str, summary: &FinancialSummary) -> String {
    let question = question.to_lowercase();
    let mentions = |word: &str| question.contains(&word.to_lowercase());

    let savings = summary.savings();
    let top = summary.top_categories.first();

    if mentions("save") || mentions("savings") {
        let extra = if summary.savings_rate > 0.0 {
            format!(
                " You're saving ~{}% ({}/mo). Increase it by 5–10% via automated transfers after payday.",
                whole_percent(summary.savings_rate),
                dollars(savings)
            )
        } else {
            " Start with a small automated transfer after payday to build momentum.".to_string()
        };
        return format!(
            "{OPENER} Track top categories weekly, cap discretionary spend, and set a monthly savings goal.{extra}"
        );
    }

    if mentions("budget") {
        let hint = top
            .filter(|c| !c.name.is_empty())
            .map(|c| {
                format!(
                    " Focus on capping {} which appears to be a top spend.",
                    c.name
                )
            })
            .unwrap_or_default();
        return format!(
            "{OPENER} Use a 50/30/20 rule (needs/wants/savings) as a baseline, then adjust based on actual expenses.{hint}"
        );
    }

    if mentions("invest") {
        return format!(
            "{OPENER} Build an emergency fund first, then consider low-cost index funds or diversified portfolios aligned to your risk tolerance."
        );
    }

    for category in &summary.top_categories {
        let name = category.name.trim();
        if name.is_empty() || !mentions(name) {
            continue;
        }
        let share = if summary.total_expenses > 0.0 {
            round_half_up(category.amount / summary.total_expenses * 100.0)
        } else {
            0
        };
        let target = (category.amount * 0.8).max(0.0);
        return format!(
            "{OPENER} You're spending ~{} on {name} (~{share}% of expenses). Cap {name} at ~{} and seek cheaper alternatives or set a weekly limit.",
            dollars(category.amount),
            dollars(target)
        );
    }

    let category_hint = top
        .filter(|c| !c.name.is_empty())
        .map(|c| {
            format!(
                " Your highest category seems to be {}. Set a monthly cap and seek cheaper alternatives.",
                c.name
            )
        })
        .unwrap_or_default();
    let transfer_hint = if savings > 0.0 {
        format!(
            " Consider automating a ~{} transfer after payday.",
            dollars((savings * 0.2).clamp(25.0, 100.0))
        )
    } else {
        String::new()
    };

    format!(
        "{OPENER} List recurring expenses, cap discretionary categories, and review subscriptions quarterly to reduce silent cost creep.{category_hint}{transfer_hint}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryTotal;

    fn summary(income: f64, expenses: f64, rate: f64, cats: &[(&str, f64)]) -> FinancialSummary {
        FinancialSummary {
            total_income: income,
            total_expenses: expenses,
            balance: income - expenses,
            savings_rate: rate,
            top_categories: cats
                .iter()
                .map(|(name, amount)| CategoryTotal {
                    name: name.to_string(),
                    amount: *amount,
                })
                .collect(),
            recent_transactions: Vec::new(),
        }
    }

    #[test]
    fn test_save_question_with_positive_rate() {
        let answer = template_advice(
            "How can I SAVE more?",
            &summary(4000.0, 3000.0, 25.0, &[]),
        );
        assert!(answer.contains("You're saving ~25% ($1,000/mo)"));
    }

    #[test]
    fn test_save_question_without_savings() {
        let answer = template_advice("how do I save", &summary(0.0, 0.0, 0.0, &[]));
        assert!(answer.contains("to build momentum"));
        assert!(!answer.contains("You're saving"));
    }

    #[test]
    fn test_budget_mentions_top_category() {
        let answer = template_advice(
            "Help me budget",
            &summary(3000.0, 2000.0, 33.0, &[("Dining", 800.0)]),
        );
        assert!(answer.contains("50/30/20"));
        assert!(answer.contains("Focus on capping Dining"));
    }

    #[test]
    fn test_invest_question() {
        let answer = template_advice("Should I invest?", &FinancialSummary::default());
        assert!(answer.contains("emergency fund first"));
    }

    #[test]
    fn test_named_category_question() {
        let answer = template_advice(
            "Am I overdoing groceries?",
            &summary(3000.0, 1000.0, 66.0, &[("Rent", 600.0), ("Groceries", 250.0)]),
        );
        assert!(answer.contains("You're spending ~$250 on Groceries (~25% of expenses)"));
        assert!(answer.contains("Cap Groceries at ~$200"));
    }

    #[test]
    fn test_generic_answer() {
        let answer = template_advice(
            "What now?",
            &summary(1000.0, 200.0, 80.0, &[("Travel", 150.0)]),
        );
        assert!(answer.contains("review subscriptions quarterly"));
        assert!(answer.contains("highest category seems to be Travel"));
        // 20% of $800 savings, capped at $100.
        assert!(answer.contains("~$100 transfer"));
    }

    #[test]
    fn test_generic_transfer_floor() {
        let answer = template_advice("hello", &summary(1000.0, 950.0, 5.0, &[]));
        assert!(answer.contains("~$25 transfer"));
    }
}
