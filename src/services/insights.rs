//! Rule-based insights and clean-up of model-generated ones.

use serde_json::Value;

use crate::filters::{dollars, round_half_up, whole_percent};
use crate::models::{FinancialSummary, Insight, InsightKind, MAX_INSIGHTS, MAX_MESSAGE_CHARS};

/// Savings rate (percent) from which the period counts as healthy.
const HEALTHY_SAVINGS_RATE: f64 = 15.0;
/// Share of expenses (percent) at which the top category becomes a warning.
const CONCENTRATION_WARNING_SHARE: i64 = 30;
/// Suggested target for the second category, as a fraction of its current spend.
const SECOND_CATEGORY_TARGET: f64 = 0.85;

/// Deterministic insights for `summary`, most important first.
pub fn template_insights(summary: &FinancialSummary) -> Vec<Insight> {
    let income = summary.total_income;
    let expenses = summary.total_expenses;
    let savings = summary.savings();
    let rate = summary.savings_rate;

    let mut insights = Vec::with_capacity(MAX_INSIGHTS);

    if expenses > income {
        insights.push(Insight::warning(format!(
            "Your expenses ({}) exceed income ({}). Cap discretionary spend and set weekly limits to restore balance.",
            dollars(expenses),
            dollars(income)
        )));
    } else if rate >= HEALTHY_SAVINGS_RATE {
        insights.push(Insight::success(format!(
            "Strong savings rate (~{}%). Keep it up! Consider allocating part of your surplus ({}/mo) toward an emergency fund or diversified investments.",
            whole_percent(rate),
            dollars(savings)
        )));
    } else if rate > 0.0 {
        insights.push(Insight::tip(format!(
            "You're saving ~{}% ({}/mo). Try increasing it by 5–10% with an automated transfer right after payday.",
            whole_percent(rate),
            dollars(savings)
        )));
    } else {
        insights.push(Insight::warning(
            "No savings detected this period. Start with a small automated transfer after payday to build momentum.",
        ));
    }

    // Categories keep their rank; a zero entry leaves its slot empty.
    let ranked = |idx: usize| summary.top_categories.get(idx).filter(|c| c.amount != 0.0);

    if let Some(top) = ranked(0) {
        let name = label(&top.name, "Top Category");
        let share = if expenses > 0.0 {
            round_half_up(top.amount / expenses * 100.0)
        } else {
            0
        };
        if share >= CONCENTRATION_WARNING_SHARE {
            insights.push(Insight::warning(format!(
                "{name} is {share}% of your expenses ({}). Set a monthly cap and seek cheaper alternatives to reduce {name} costs.",
                dollars(top.amount)
            )));
        } else {
            insights.push(Insight::tip(format!(
                "Highest spending category: {name} ({}, ~{share}% of expenses). Track {name} weekly and set a soft cap to prevent creep.",
                dollars(top.amount)
            )));
        }
    }

    if let Some(second) = ranked(1) {
        let name = label(&second.name, "Second Category");
        insights.push(Insight::tip(format!(
            "Consider trimming {name} by 10–20% (target ~{}). Small cuts across top categories compound into bigger monthly savings.",
            dollars(second.amount * SECOND_CATEGORY_TARGET)
        )));
    }

    insights.push(Insight::tip(
        "Review subscriptions quarterly to avoid silent cost creep and reclaim monthly cash flow.",
    ));

    insights.truncate(MAX_INSIGHTS);
    insights
}

fn label<'a>(name: &'a str, default: &'a str) -> &'a str {
    if name.is_empty() {
        default
    } else {
        name
    }
}

/// Turn raw model text into at most [`MAX_INSIGHTS`] clean insights.
///
/// The text should be a JSON array of `{type, message}` objects, possibly
/// inside a markdown code fence. Valid JSON that is not an array yields
/// nothing. Otherwise an array of objects embedded in surrounding prose is
/// used, and failing that every non-empty line becomes a tip.
pub fn parse_model_insights(text: &str) -> Vec<Insight> {
    let body = strip_code_fence(text.trim());

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => sanitize(items.iter().map(raw_item)),
        Ok(_) => Vec::new(),
        Err(_) => {
            let embedded = embedded_object_array(body)
                .map(|items| sanitize(items.iter().map(raw_item)))
                .unwrap_or_default();
            if embedded.is_empty() {
                sanitize(
                    body.lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(|line| (None, line.to_string())),
                )
            } else {
                embedded
            }
        }
    }
}

fn sanitize(candidates: impl Iterator<Item = (Option<String>, String)>) -> Vec<Insight> {
    candidates
        .filter_map(|(kind, message)| {
            let message = truncate_chars(message.trim(), MAX_MESSAGE_CHARS);
            (!message.is_empty()).then(|| Insight {
                kind: InsightKind::coerce(kind.as_deref()),
                message,
            })
        })
        .take(MAX_INSIGHTS)
        .collect()
}

fn raw_item(item: &Value) -> (Option<String>, String) {
    let kind = item.get("type").and_then(Value::as_str).map(String::from);
    let message = match item.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(Value::Bool(false)) => String::new(),
        Some(other) => other.to_string(),
    };
    (kind, message)
}

/// Contents of a fenced block such as `` ```json ... ``` ``, or `text` unchanged.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let inner = rest.split_once('\n').map_or("", |(_, inner)| inner);
    inner
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(inner)
        .trim()
}

/// The bracketed span of `content` when it is a non-empty JSON array of objects.
fn embedded_object_array(content: &str) -> Option<Vec<Value>> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if start >= end {
        return None;
    }
    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(Value::Array(items)) if !items.is_empty() && items.iter().all(Value::is_object) => {
            Some(items)
        }
        _ => None,
    }
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
