use regex::Match;

use crate::core::{CriticalResult, MatchSpan, RuleGroup, TraceEvent};
use crate::engine::catalog::PatternCatalog;
use crate::engine::reasons::OrderedSet;

/// Context window radius around a match, in characters per side.
const CONTEXT_RADIUS: usize = 50;

/// Scan text for unambiguous payment/fee demands.
///
/// Payment-phrase matches are suppressed when a safe phrase appears inside
/// the match's context window; demand and currency matches are recorded
/// unconditionally. One left-to-right pass per rule, first match wins.
pub fn detect(catalog: &PatternCatalog, text: &str, trace: &mut Vec<TraceEvent>) -> CriticalResult {
    let mut matches = OrderedSet::new();
    let mut spans = Vec::new();

    for rule in &catalog.payment_phrases {
        let Some(m) = rule.find(text) else { continue };
        let context = context_window(text, m.start(), m.end());
        if let Some(safe) = catalog.safe_phrases.iter().find_map(|s| s.find(context)) {
            trace.push(TraceEvent::SafeContextSuppressed {
                matched: m.as_str().to_string(),
                safe_phrase: safe.as_str().to_string(),
            });
            continue;
        }
        record(&mut matches, &mut spans, trace, RuleGroup::PaymentPhrase, m, context);
    }

    for rule in &catalog.payment_demands {
        if let Some(m) = rule.find(text) {
            let context = context_window(text, m.start(), m.end());
            record(&mut matches, &mut spans, trace, RuleGroup::PaymentDemand, m, context);
        }
    }

    for rule in &catalog.currency_patterns {
        if let Some(m) = rule.find(text) {
            let context = context_window(text, m.start(), m.end());
            record(&mut matches, &mut spans, trace, RuleGroup::Currency, m, context);
        }
    }

    CriticalResult {
        matches: matches.into_vec(),
        spans,
    }
}

fn record(
    matches: &mut OrderedSet,
    spans: &mut Vec<MatchSpan>,
    trace: &mut Vec<TraceEvent>,
    group: RuleGroup,
    m: Match<'_>,
    context: &str,
) {
    matches.insert(m.as_str());
    spans.push(MatchSpan {
        matched: m.as_str().to_string(),
        context: context.to_string(),
        start: m.start(),
        end: m.end(),
    });
    trace.push(TraceEvent::CriticalMatch {
        group,
        matched: m.as_str().to_string(),
        context: context.to_string(),
    });
}

/// Slice the window of [`CONTEXT_RADIUS`] characters on each side of a match,
/// clamped to the text and to char boundaries.
fn context_window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}
