//! Chooses between the remote model and the templates.
//!
//! With a credential configured every request goes to the model first; any
//! failure there is logged and answered from the templates instead, so callers
//! always get content back.

use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{FinancialSummary, Insight, Provider};
use crate::outcome::{Degradation, Outcome};
use crate::services::advice::template_advice;
use crate::services::ai_client::GeminiClient;
use crate::services::insights::{parse_model_insights, template_insights};

const INSIGHTS_SYSTEM_PROMPT: &str = "You are a helpful, practical financial advisor. Provide actionable, ethical, and beginner-friendly advice to optimize spending, increase savings, and plan investments. Keep responses concise and specific to the provided data. Do not provide tax or legal advice.";

const ADVICE_SYSTEM_PROMPT: &str = "You are a helpful, practical financial advisor. Answer user questions concisely in simple language. Use only ethical guidance and avoid legal/tax advice.";

const INSIGHTS_MAX_TOKENS: u32 = 1024;
const ADVICE_MAX_TOKENS: u32 = 512;

pub const EMPTY_ANSWER: &str = "Sorry, I could not generate an answer at this time.";

/// An answer together with the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Advised<T> {
    pub value: T,
    pub provider: Provider,
}

impl<T> Advised<T> {
    fn from_model(value: T) -> Self {
        Self {
            value,
            provider: Provider::Gemini,
        }
    }

    fn from_template(value: T) -> Self {
        Self {
            value,
            provider: Provider::Fallback,
        }
    }
}

pub struct Advisor {
    model: Option<GeminiClient>,
    prompt_summary_limit: usize,
}

impl Advisor {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let model = config
            .google_api_key
            .as_deref()
            .map(|key| GeminiClient::new(&config.gemini_base_url, &config.gemini_model, key))
            .transpose()?;
        if let Some(client) = &model {
            tracing::info!(model = client.model(), "Remote model enabled");
        }

        Ok(Self {
            model,
            prompt_summary_limit: config.prompt_summary_limit,
        })
    }

    /// An advisor that never calls out.
    pub fn template_only() -> Self {
        Self {
            model: None,
            prompt_summary_limit: 0,
        }
    }

    /// The provider requests are routed to first.
    pub fn provider(&self) -> Provider {
        if self.model.is_some() {
            Provider::Gemini
        } else {
            Provider::Fallback
        }
    }

    /// Up to five insights for a client-supplied summary.
    pub async fn insights(&self, raw_summary: &Value) -> Outcome<Advised<Vec<Insight>>> {
        let summary = FinancialSummary::from_value(raw_summary);

        let Some(model) = &self.model else {
            return Outcome::Complete(Advised::from_template(template_insights(&summary)));
        };

        let prompt = format!(
            "Here is my financial summary JSON. Analyze it and return 3-5 concise insights as a JSON array of objects with keys: type (warning|success|tip), message (string).\n\nJSON:\n{}",
            self.bounded_json(raw_summary, &summary)
        );

        let result = model
            .generate(INSIGHTS_SYSTEM_PROMPT, &prompt, INSIGHTS_MAX_TOKENS)
            .await
            .and_then(|text| {
                let insights = parse_model_insights(&text);
                if insights.is_empty() {
                    Err(AppError::Upstream(
                        "model returned no usable insights".into(),
                    ))
                } else {
                    Ok(insights)
                }
            });

        match result {
            Ok(insights) => Outcome::Complete(Advised::from_model(insights)),
            Err(e) => {
                warn!(error = %e, "Insight generation failed, using templates");
                Outcome::degraded(
                    Advised::from_template(template_insights(&summary)),
                    Degradation::ModelFailed(e.to_string()),
                )
            }
        }
    }

    /// A free-text answer to `question`. `context` may carry a summary either
    /// directly or under a `summary` key.
    pub async fn advice(&self, question: &str, context: Option<&Value>) -> Outcome<Advised<String>> {
        let context = context.cloned().unwrap_or_else(|| Value::Object(Default::default()));
        let summary_value = context
            .get("summary")
            .filter(|s| is_truthy(s))
            .unwrap_or(&context);
        let summary = FinancialSummary::from_value(summary_value);

        let Some(model) = &self.model else {
            return Outcome::Complete(Advised::from_template(template_advice(question, &summary)));
        };

        let prompt = format!(
            "Question: {}\n\nContext (optional JSON): {}\n\nReturn a concise answer (plain text).",
            question,
            self.bounded_json(&context, &summary)
        );

        match model
            .generate(ADVICE_SYSTEM_PROMPT, &prompt, ADVICE_MAX_TOKENS)
            .await
        {
            Ok(text) if text.is_empty() => {
                Outcome::Complete(Advised::from_model(EMPTY_ANSWER.to_string()))
            }
            Ok(text) => Outcome::Complete(Advised::from_model(text)),
            Err(e) => {
                warn!(error = %e, "Advice generation failed, using templates");
                Outcome::degraded(
                    Advised::from_template(template_advice(question, &summary)),
                    Degradation::ModelFailed(e.to_string()),
                )
            }
        }
    }

    /// `raw` as JSON, or the normalized summary without recent transactions
    /// when `raw` is larger than the configured limit.
    fn bounded_json(&self, raw: &Value, summary: &FinancialSummary) -> String {
        let full = raw.to_string();
        if full.len() <= self.prompt_summary_limit {
            return full;
        }

        tracing::debug!(
            bytes = full.len(),
            limit = self.prompt_summary_limit,
            "Summary too large for prompt, sending compact form"
        );
        serde_json::to_string(&summary.compact()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Whether a request field counts as present: not missing, `null`, `false`,
/// zero or an empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_template_only_insights() {
        let advisor = Advisor::template_only();
        let outcome = advisor
            .insights(&json!({ "totalIncome": 1000, "totalExpenses": 1200 }))
            .await;

        assert!(!outcome.is_degraded());
        let advised = outcome.into_inner();
        assert_eq!(advised.provider, Provider::Fallback);
        assert_eq!(advised.value[0].kind, crate::models::InsightKind::Warning);
    }

    #[tokio::test]
    async fn test_advice_reads_nested_summary() {
        let advisor = Advisor::template_only();
        let context = json!({ "summary": { "totalIncome": 2000, "totalExpenses": 1500, "savingsRate": 25 } });
        let answer = advisor
            .advice("how to save?", Some(&context))
            .await
            .into_inner();
        assert!(answer.value.contains("~25% ($500/mo)"));
    }

    #[test]
    fn test_prompt_bound_uses_compact_summary() {
        let advisor = Advisor {
            model: None,
            prompt_summary_limit: 64,
        };
        let raw = json!({
            "totalIncome": 10,
            "recentTransactions": (0..50).map(|i| json!({ "amount": i })).collect::<Vec<_>>()
        });
        let summary = FinancialSummary::from_value(&raw);

        let sent = advisor.bounded_json(&raw, &summary);
        assert!(!sent.contains("recentTransactions"));
        assert!(sent.contains("\"totalIncome\":10.0"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("x")));
    }
}
