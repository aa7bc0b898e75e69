use serde::{Deserialize, Serialize};

pub const FINANCIAL_GOALS: &str = "financialgoals";

/// Payload of a record in the `financialgoals` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_achieved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<String>,
}

impl FinancialGoal {
    /// Share of the target reached so far, clamped to 0..=100.
    pub fn progress_percent(&self) -> f64 {
        match (self.target_amount, self.current_progress) {
            (Some(target), Some(current)) if target > 0.0 => {
                (current / target * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        let goal = FinancialGoal {
            target_amount: Some(2000.0),
            current_progress: Some(500.0),
            ..Default::default()
        };
        assert_eq!(goal.progress_percent(), 25.0);

        let overshoot = FinancialGoal {
            target_amount: Some(100.0),
            current_progress: Some(250.0),
            ..Default::default()
        };
        assert_eq!(overshoot.progress_percent(), 100.0);

        assert_eq!(FinancialGoal::default().progress_percent(), 0.0);
    }
}
