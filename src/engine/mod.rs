pub mod blend;
pub mod catalog;
pub mod categories;
pub mod critical;
pub mod reasons;

use crate::ai::AiAssessment;
use crate::core::{AnalysisReport, AnalysisResult, ScanOutcome, TraceEvent, Verdict};
use catalog::PatternCatalog;

const BLANK_REASON: &str = "No text provided for analysis";
const CRITICAL_REASON: &str = "Payment or fee requirement detected";

/// The risk-scoring engine: a pure function of (text, AI assessment) over an
/// immutable pattern catalog. Safe to share across threads; holds no mutable
/// state.
pub struct RiskEngine {
    catalog: PatternCatalog,
}

impl RiskEngine {
    pub fn new() -> Self {
        Self {
            catalog: PatternCatalog::standard(),
        }
    }

    /// Scan text and return the terminal scan state plus the decision trace.
    ///
    /// Callers use the outcome to decide whether consulting the AI
    /// collaborator is worthwhile: `Blank` and `CriticalHit` make its result
    /// irrelevant.
    pub fn scan(&self, text: &str) -> (ScanOutcome, Vec<TraceEvent>) {
        let mut trace = Vec::new();

        if text.trim().is_empty() {
            trace.push(TraceEvent::BlankInput);
            return (ScanOutcome::Blank, trace);
        }

        let critical = critical::detect(&self.catalog, text, &mut trace);
        if critical.detected() {
            return (ScanOutcome::CriticalHit(critical), trace);
        }

        let category = categories::score(&self.catalog, text, &mut trace);
        (ScanOutcome::Completed(category), trace)
    }

    /// Combine a scan outcome with the AI assessment into the final result.
    pub fn assemble(&self, outcome: &ScanOutcome, ai: &AiAssessment) -> AnalysisResult {
        match outcome {
            ScanOutcome::Blank => {
                let blend = blend::blank();
                AnalysisResult {
                    score: blend.final_score,
                    status: Verdict::from_score(blend.final_score, false),
                    reasons: vec![BLANK_REASON.to_string()],
                    ai_confidence: 0,
                    has_critical_flags: false,
                    critical_reason: None,
                    breakdown: blend.breakdown,
                }
            }
            ScanOutcome::CriticalHit(critical) => {
                let blend = blend::critical_override(100);
                let critical_reasons = vec![
                    format!(
                        "CRITICAL: Job requires payment or fees - \"{}\"",
                        critical.matches[0]
                    ),
                    "Legitimate employers never ask for money upfront".to_string(),
                ];
                AnalysisResult {
                    score: blend.final_score,
                    status: Verdict::from_score(blend.final_score, true),
                    reasons: reasons::aggregate(&critical_reasons, &[], &ai.red_flags, true),
                    ai_confidence: 100,
                    has_critical_flags: true,
                    critical_reason: Some(CRITICAL_REASON.to_string()),
                    breakdown: blend.breakdown,
                }
            }
            ScanOutcome::Completed(category) => {
                let blend = blend::weighted(category.score, ai.score);
                AnalysisResult {
                    score: blend.final_score,
                    status: Verdict::from_score(blend.final_score, false),
                    reasons: reasons::aggregate(&[], &category.reasons, &ai.red_flags, false),
                    ai_confidence: ai.confidence.min(100),
                    has_critical_flags: false,
                    critical_reason: None,
                    breakdown: blend.breakdown,
                }
            }
        }
    }

    /// One-call analysis for callers that already hold an AI assessment.
    pub fn analyze(&self, text: &str, ai: &AiAssessment) -> AnalysisReport {
        let (outcome, trace) = self.scan(text);
        AnalysisReport {
            result: self.assemble(&outcome, ai),
            trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RiskEngine {
        RiskEngine::new()
    }

    fn ai(score: u8, confidence: u8, red_flags: &[&str]) -> AiAssessment {
        AiAssessment {
            score,
            confidence,
            red_flags: red_flags.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn critical_payment_phrase_overrides_everything() {
        let report = engine().analyze(
            "Please pay a registration fee of $50 to proceed.",
            &ai(0, 10, &[]),
        );
        let result = &report.result;
        assert!(result.has_critical_flags);
        assert_eq!(result.score, 100);
        assert_eq!(result.status, Verdict::PotentialScam);
        assert_eq!(result.ai_confidence, 100);
        assert_eq!(
            result.critical_reason.as_deref(),
            Some("Payment or fee requirement detected")
        );
        assert!(result.reasons[0].contains("registration fee"));
        assert_eq!(result.breakdown.weights.ai, "0% (overridden by critical rule)");
    }

    #[test]
    fn safe_phrases_suppress_critical_and_fall_through() {
        let report = engine().analyze(
            "Registration process opens Monday; no fee required.",
            &ai(0, 50, &[]),
        );
        let result = &report.result;
        assert!(!result.has_critical_flags);
        // Brevity is the only category signal: 5 * 0.6 + 0 * 0.4 = 3.
        assert_eq!(result.score, 3);
        assert_eq!(result.status, Verdict::LikelyLegit);
    }

    #[test]
    fn empty_input_yields_neutral_default() {
        let report = engine().analyze("", &ai(90, 90, &["should be ignored"]));
        let result = &report.result;
        assert_eq!(result.score, 50);
        assert_eq!(result.status, Verdict::Suspicious);
        assert_eq!(result.reasons, vec!["No text provided for analysis"]);
        assert!(!result.has_critical_flags);
        assert!(report.trace.contains(&TraceEvent::BlankInput));
    }

    #[test]
    fn whitespace_only_input_is_blank() {
        let report = engine().analyze("   \n\t  ", &ai(0, 0, &[]));
        assert_eq!(report.result.score, 50);
        assert_eq!(report.result.status, Verdict::Suspicious);
    }

    #[test]
    fn urgency_only_posting_blends_low() {
        let text = "We are hiring for a regular office assistant position in the city \
                    center. apply now, hurry, limited slots for this opening.";
        let report = engine().analyze(text, &ai(0, 80, &[]));
        let result = &report.result;
        assert!(!result.has_critical_flags);
        assert_eq!(result.breakdown.rule_based_score, 10);
        // 10 * 0.6 + 0 * 0.4 = 6
        assert_eq!(result.score, 6);
        assert_eq!(result.status, Verdict::LikelyLegit);
    }

    #[test]
    fn blend_of_rule_40_ai_60_is_suspicious() {
        // Category score 40 = suspicious contact (20) + personal email (15)
        // + brevity (5).
        let text = "Contact on telegram: jobs@yahoo.com";
        let report = engine().analyze(text, &ai(60, 70, &[]));
        let result = &report.result;
        assert_eq!(result.breakdown.rule_based_score, 40);
        assert_eq!(result.breakdown.ai_score, 60);
        assert_eq!(result.score, 48);
        assert_eq!(result.status, Verdict::Suspicious);
        assert_eq!(result.ai_confidence, 70);
    }

    #[test]
    fn ai_red_flags_append_after_category_reasons() {
        let text = "Contact on telegram for this opening";
        let report = engine().analyze(text, &ai(40, 60, &["AI flag one", "AI flag two"]));
        let reasons = &report.result.reasons;
        assert!(reasons[0].starts_with("Suspicious contact method"));
        assert!(reasons.contains(&"AI flag one".to_string()));
        let pos_rule = reasons.iter().position(|r| r.starts_with("Suspicious")).unwrap();
        let pos_ai = reasons.iter().position(|r| r == "AI flag one").unwrap();
        assert!(pos_rule < pos_ai);
    }

    #[test]
    fn engine_is_referentially_transparent() {
        let engine = engine();
        let text = "URGENT!!! earn $10000 weekly, contact via whatsapp, pay $99 registration now";
        let assessment = ai(80, 90, &["flag"]);
        let first = engine.analyze(text, &assessment);
        let second = engine.analyze(text, &assessment);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.result).unwrap(),
            serde_json::to_string(&second.result).unwrap()
        );
    }

    #[test]
    fn score_stays_in_range_over_mixed_corpus() {
        let engine = engine();
        let samples = [
            "",
            "short",
            "Please pay a registration fee of $50 to proceed.",
            "Registration process opens Monday; no fee required.",
            "earn $10000 easy money whatsapp @gmail.com leading company apply now hurry \
             limited slots no experience required anyone can apply work 2 hours",
            "A perfectly ordinary job description for an accountant role with \
             detailed responsibilities and a named employer, Globex Systems.",
        ];
        for text in samples {
            for ai_score in [0u8, 50, 100] {
                let report = engine.analyze(text, &ai(ai_score, 50, &[]));
                assert!(report.result.score <= 100);
                assert!(report.result.reasons.len() <= 10);
            }
        }
    }

    #[test]
    fn reasons_never_contain_duplicates() {
        let engine = engine();
        let text = "Contact on whatsapp for this vacancy";
        let duplicate_flag = "Suspicious contact method: whatsapp";
        let report = engine.analyze(text, &ai(40, 60, &[duplicate_flag, duplicate_flag]));
        let reasons = &report.result.reasons;
        let unique: std::collections::HashSet<_> = reasons.iter().collect();
        assert_eq!(unique.len(), reasons.len());
    }

    #[test]
    fn critical_hit_keeps_supportive_ai_flags_only() {
        let engine = engine();
        let (outcome, _) = engine.scan("You must pay the security deposit first.");
        let assessment = ai(
            90,
            95,
            &[
                "No major red flags detected by AI analysis",
                "Demands an upfront deposit",
            ],
        );
        let result = engine.assemble(&outcome, &assessment);
        assert!(result.has_critical_flags);
        assert!(result.reasons.contains(&"Demands an upfront deposit".to_string()));
        assert!(!result
            .reasons
            .iter()
            .any(|r| r.contains("No major red flags")));
    }
}
