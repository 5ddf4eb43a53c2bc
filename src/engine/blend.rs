use crate::core::{Breakdown, WeightSplit};

/// Rule/AI split for the non-critical path.
const RULE_WEIGHT: f64 = 0.6;
const AI_WEIGHT: f64 = 0.4;
/// Score floor enforced when a critical rule fires.
const CRITICAL_FLOOR: u8 = 85;
/// Neutral score for blank input.
const BLANK_SCORE: u8 = 50;

/// A blended final score with its breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    pub final_score: u8,
    pub breakdown: Breakdown,
}

/// Critical override: the rule score is authoritative and the AI input is
/// discarded entirely.
pub fn critical_override(rule_score: u8) -> Blend {
    Blend {
        final_score: rule_score.max(CRITICAL_FLOOR),
        breakdown: Breakdown {
            rule_based_score: rule_score,
            ai_score: 0,
            weights: WeightSplit {
                rule_based: "100%".to_string(),
                ai: "0% (overridden by critical rule)".to_string(),
            },
        },
    }
}

/// Standard 60/40 rule/AI blend, rounded half-up and clamped to [0, 100].
pub fn weighted(rule_score: u8, ai_score: u8) -> Blend {
    let rule_score = rule_score.min(100);
    let ai_score = ai_score.min(100);
    let combined = f64::from(rule_score) * RULE_WEIGHT + f64::from(ai_score) * AI_WEIGHT;
    let final_score = (combined.round() as u8).min(100);
    Blend {
        final_score,
        breakdown: Breakdown {
            rule_based_score: rule_score,
            ai_score,
            weights: WeightSplit {
                rule_based: "60%".to_string(),
                ai: "40%".to_string(),
            },
        },
    }
}

/// Neutral default for blank input: nothing to score, nothing to ask the AI.
pub fn blank() -> Blend {
    Blend {
        final_score: BLANK_SCORE,
        breakdown: Breakdown {
            rule_based_score: BLANK_SCORE,
            ai_score: 0,
            weights: WeightSplit {
                rule_based: "100%".to_string(),
                ai: "0% (no text to analyze)".to_string(),
            },
        },
    }
}
