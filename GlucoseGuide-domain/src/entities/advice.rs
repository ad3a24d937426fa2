use serde::{Deserialize, Serialize};

/// Overall assessment of the selected period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceStatus {
    /// Average at or below 120 mg/dL; also reported when there is no data
    Excellent,

    /// Average above 120 and at most 140 mg/dL
    Good,

    /// Average above 140 and at most 180 mg/dL
    Warning,

    /// Average above 180 mg/dL
    Danger,
}

/// Tone of a single tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipSeverity {
    Normal,
    Warning,
    Danger,
}

/// One line of advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceTip {
    /// Short symbol shown next to the text
    pub icon: String,

    /// Human-readable sentence
    pub text: String,

    /// How urgent the tip is
    pub severity: TipSeverity,
}

impl AdviceTip {
    /// Build a tip from its parts
    pub fn new(icon: &str, text: impl Into<String>, severity: TipSeverity) -> Self {
        Self {
            icon: icon.to_string(),
            text: text.into(),
            severity,
        }
    }
}

/// Status, headline and ordered tips for the selected period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAdvice {
    pub status: AdviceStatus,
    pub message: String,
    /// Primary tip first, then distribution tips, then the filler tip
    pub tips: Vec<AdviceTip>,
}
