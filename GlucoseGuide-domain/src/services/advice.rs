use tracing::debug;

use crate::entities::{AdviceStatus, AdviceTip, HealthAdvice, Reading, Stats, TipSeverity};
use crate::services::insights::{Distribution, HIGH_THRESHOLD, LOW_THRESHOLD};

/// Highest average that still counts as excellent
const EXCELLENT_MAX_AVG: u32 = 120;

/// Highest average that still counts as good
const GOOD_MAX_AVG: u32 = 140;

/// Highest average that still counts as a warning rather than danger
const WARNING_MAX_AVG: u32 = 180;

/// Spread between max and min above which readings count as volatile
const VOLATILE_RANGE: u32 = 50;

/// Minimum number of tips before the hydration filler is added
const MIN_TIPS: usize = 3;

/// Build the health assessment for a period
///
/// `stats` is the summary of `filtered`; the two are passed separately so the
/// caller decides how stats were computed. The result is a pure function of
/// the inputs.
pub fn generate_health_advice(stats: &Stats, filtered: &[Reading]) -> HealthAdvice {
    if stats.is_empty() {
        // Kept as `Excellent` so existing consumers see the same status for no data
        return HealthAdvice {
            status: AdviceStatus::Excellent,
            message: "Enter a reading to see your health assessment.".to_string(),
            tips: Vec::new(),
        };
    }

    let avg = stats.avg;
    let (status, message, primary) = if avg <= EXCELLENT_MAX_AVG {
        (
            AdviceStatus::Excellent,
            format!("Your average blood sugar is {} mg/dL. Excellent!", avg),
            AdviceTip::new("✨", "You are in great shape. Keep up your current routine.", TipSeverity::Normal),
        )
    } else if avg <= GOOD_MAX_AVG {
        (
            AdviceStatus::Good,
            format!("Your average blood sugar is {} mg/dL, within the normal range. Well done!", avg),
            AdviceTip::new(
                "💪",
                format!("You are in the normal range. Getting below {} would be even better.", EXCELLENT_MAX_AVG),
                TipSeverity::Normal,
            ),
        )
    } else if avg <= WARNING_MAX_AVG {
        (
            AdviceStatus::Warning,
            format!("Your average blood sugar is {} mg/dL, above the normal range. It needs attention.", avg),
            AdviceTip::new("⚠️", "Moderate your portions and cut back on sugar.", TipSeverity::Warning),
        )
    } else {
        (
            AdviceStatus::Danger,
            format!("Your average blood sugar is {} mg/dL, which is very high. Act on it now!", avg),
            AdviceTip::new(
                "🚨",
                "Talk to your doctor; your diet or medication may need adjusting.",
                TipSeverity::Danger,
            ),
        )
    };

    let mut tips = vec![primary];
    let distribution = Distribution::of(filtered);

    if distribution.high_pct > 50 {
        tips.push(AdviceTip::new(
            "🍽️",
            format!(
                "{}% of readings are above {}. Try reducing your dinner portion by about 20%.",
                distribution.high_pct, HIGH_THRESHOLD
            ),
            TipSeverity::Warning,
        ));
        tips.push(AdviceTip::new(
            "🚶",
            format!(
                "With {}% of readings high, a light 20-30 minute walk after meals helps bring levels down.",
                distribution.high_pct
            ),
            TipSeverity::Normal,
        ));
    } else if distribution.high_pct > 20 {
        tips.push(AdviceTip::new(
            "🥗",
            format!("{}% of readings are high. Try moderating your carbohydrate intake.", distribution.high_pct),
            TipSeverity::Normal,
        ));
    }

    if distribution.low_pct > 20 {
        tips.push(AdviceTip::new(
            "🍎",
            format!(
                "{}% of readings are below {}. Make sure you are not eating too little.",
                distribution.low_pct, LOW_THRESHOLD
            ),
            TipSeverity::Warning,
        ));
    }

    let range = stats.range();
    if range > VOLATILE_RANGE {
        tips.push(AdviceTip::new(
            "📊",
            format!(
                "Your readings vary by {} mg/dL. Eating similar amounts each day helps keep levels stable.",
                range
            ),
            TipSeverity::Normal,
        ));
    }

    if distribution.normal_pct >= 70 {
        tips.push(AdviceTip::new(
            "🎯",
            format!("{}% of readings are in the normal range. Great management!", distribution.normal_pct),
            TipSeverity::Normal,
        ));
    }

    if tips.len() < MIN_TIPS {
        tips.push(AdviceTip::new(
            "💧",
            "Drinking enough water helps with blood sugar control.",
            TipSeverity::Normal,
        ));
    }

    debug!("Generated {:?} advice with {} tips for avg {}", status, tips.len(), avg);

    HealthAdvice { status, message, tips }
}
