use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub name: String,
    /// Annual percentage yield.
    pub apy: f64,
    /// Fraction in `[0, 1)`.
    pub fee: f64,
    /// Withdrawal lockup in days.
    pub lockup: u32,
    /// 1 (lowest) ..= 5 (highest).
    pub risk: u8,
    /// Set by the recommender; never part of seed data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Protocol {
    pub fn new(name: &str, apy: f64, fee: f64, lockup: u32, risk: u8) -> Self {
        Self {
            name: name.to_string(),
            apy,
            fee,
            lockup,
            risk,
            score: None,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_risk(self.risk)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Out-of-range values display as `Medium`.
    pub fn from_risk(risk: u8) -> Self {
        match risk {
            1 => RiskLevel::VeryLow,
            2 => RiskLevel::Low,
            4 => RiskLevel::High,
            5 => RiskLevel::VeryHigh,
            _ => RiskLevel::Medium,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_labels() {
        assert_eq!(RiskLevel::from_risk(1).label(), "Very Low");
        assert_eq!(RiskLevel::from_risk(3).label(), "Medium");
        assert_eq!(RiskLevel::from_risk(5).label(), "Very High");
        assert_eq!(RiskLevel::from_risk(0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_risk(9), RiskLevel::Medium);
    }

    #[test]
    fn unscored_protocol_omits_score_in_json() {
        let p = Protocol::new("Astar Lend", 5.0, 0.02, 0, 1);
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("score").is_none());
        assert_eq!(v["lockup"], 0);
    }
}
