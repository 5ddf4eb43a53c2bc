use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{CategoryKind, CategoryResult, TraceEvent};
use crate::engine::catalog::PatternCatalog;

/// Trimmed length below which the brevity penalty applies.
const MIN_DETAIL_LENGTH: usize = 100;
const BREVITY_WEIGHT: u8 = 5;
/// Scores under this with no reasons get the positive-indicator filler.
const POSITIVE_INDICATOR_CEILING: u8 = 30;

/// Capitalized single- or multi-word token, the rough shape of a proper name.
static CAPITALIZED_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("built-in pattern must compile"));

// Generic capitalized words that do not count as a company name.
const GENERIC_WORDS: &[&str] = &["the", "company", "job", "position", "role", "candidate"];

/// Accumulate the weighted heuristic score. Runs only when the critical
/// detector found nothing.
pub fn score(catalog: &PatternCatalog, text: &str, trace: &mut Vec<TraceEvent>) -> CategoryResult {
    let lower = text.to_lowercase();
    let mut total: u32 = 0;
    let mut reasons: Vec<String> = Vec::new();
    let mut triggered: Vec<CategoryKind> = Vec::new();

    for rule in &catalog.categories {
        let matched: Vec<&str> = rule
            .phrases
            .iter()
            .copied()
            .filter(|phrase| lower.contains(phrase))
            .collect();
        if matched.len() < rule.min_matches {
            continue;
        }
        if rule.kind == CategoryKind::VagueCompany {
            if let Some(name) = specific_company_name(text) {
                trace.push(TraceEvent::CompanyNameDetected { name });
                continue;
            }
        }

        total += u32::from(rule.weight);
        reasons.push(reason_for(rule.kind, matched[0]));
        triggered.push(rule.kind);
        trace.push(TraceEvent::CategoryTriggered {
            category: rule.kind,
            weight: rule.weight,
            match_count: matched.len(),
            first_match: matched[0].to_string(),
        });
    }

    let length = text.trim().chars().count();
    if length < MIN_DETAIL_LENGTH {
        total += u32::from(BREVITY_WEIGHT);
        reasons.push("Very short job description (lacks detail)".to_string());
        trace.push(TraceEvent::ShortDescription { length });
    }

    let score = total.min(100) as u8;

    // Informational only; never affects the score.
    if score < POSITIVE_INDICATOR_CEILING && reasons.is_empty() {
        reasons.push("No critical red flags detected".to_string());
        reasons.push("Professional language and structure".to_string());
        reasons.push("No payment requirements found".to_string());
        trace.push(TraceEvent::PositiveIndicators);
    }

    CategoryResult {
        score,
        reasons,
        triggered,
    }
}

fn reason_for(kind: CategoryKind, first_match: &str) -> String {
    match kind {
        CategoryKind::UnrealisticSalary => {
            format!("Unrealistic salary promises: \"{first_match}\"")
        }
        CategoryKind::SuspiciousContact => {
            format!("Suspicious contact method: {first_match}")
        }
        CategoryKind::PersonalEmail => {
            format!("Uses personal email domain: {first_match}")
        }
        CategoryKind::VagueCompany => "Vague company description without specific name".to_string(),
        CategoryKind::UrgencyTactics => "Uses excessive urgency tactics".to_string(),
        CategoryKind::TooGoodToBeTrue => {
            "Makes unrealistic promises about job requirements".to_string()
        }
    }
}

/// Find a capitalized token that plausibly names a company: longer than
/// three characters and not one of the generic words.
fn specific_company_name(text: &str) -> Option<String> {
    CAPITALIZED_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|token| token.len() > 3 && !GENERIC_WORDS.contains(&token.to_lowercase().as_str()))
        .map(|token| token.to_string())
}
