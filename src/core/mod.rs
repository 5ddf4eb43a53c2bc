pub mod pipeline;

use serde::{Deserialize, Serialize};

/// Final verdict for an analyzed job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Likely Legit")]
    LikelyLegit,
    #[serde(rename = "Suspicious")]
    Suspicious,
    #[serde(rename = "Potential Scam")]
    PotentialScam,
}

impl Verdict {
    /// Map a final score to a verdict. A critical flag forces Potential Scam
    /// regardless of the score.
    pub fn from_score(score: u8, has_critical_flags: bool) -> Self {
        if has_critical_flags {
            Verdict::PotentialScam
        } else if score <= 30 {
            Verdict::LikelyLegit
        } else if score <= 70 {
            Verdict::Suspicious
        } else {
            Verdict::PotentialScam
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::LikelyLegit => "Likely Legit",
            Verdict::Suspicious => "Suspicious",
            Verdict::PotentialScam => "Potential Scam",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the six weighted heuristic signal groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    UnrealisticSalary,
    SuspiciousContact,
    PersonalEmail,
    VagueCompany,
    UrgencyTactics,
    TooGoodToBeTrue,
}

/// Rule group a critical match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleGroup {
    PaymentPhrase,
    PaymentDemand,
    Currency,
}

/// A pattern match with its surrounding context window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub matched: String,
    pub context: String,
    pub start: usize,
    pub end: usize,
}

/// Outcome of the critical payment-indicator scan.
///
/// `matches` holds unique matched strings in first-occurrence order;
/// `spans` holds every recorded match with its context window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriticalResult {
    pub matches: Vec<String>,
    pub spans: Vec<MatchSpan>,
}

impl CriticalResult {
    pub fn detected(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Outcome of the heuristic category scan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryResult {
    pub score: u8,
    pub reasons: Vec<String>,
    pub triggered: Vec<CategoryKind>,
}

/// Terminal state of a scan, returned as data so the override contract is
/// visible to the caller instead of buried in control flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Empty or whitespace-only input; scoring is bypassed entirely.
    Blank,
    /// An unambiguous payment demand was found; the score is forced.
    CriticalHit(CriticalResult),
    /// No critical indicator; the weighted category score applies.
    Completed(CategoryResult),
}

/// A decision made during scanning. The engine never logs; it returns these
/// for the caller to log or discard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraceEvent {
    BlankInput,
    CriticalMatch {
        group: RuleGroup,
        matched: String,
        context: String,
    },
    SafeContextSuppressed {
        matched: String,
        safe_phrase: String,
    },
    CategoryTriggered {
        category: CategoryKind,
        weight: u8,
        match_count: usize,
        first_match: String,
    },
    CompanyNameDetected {
        name: String,
    },
    ShortDescription {
        length: usize,
    },
    PositiveIndicators,
}

/// How the final score was composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub rule_based_score: u8,
    pub ai_score: u8,
    pub weights: WeightSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSplit {
    pub rule_based: String,
    pub ai: String,
}

/// Final analysis result in the shape consumed by reviewers' tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub status: Verdict,
    pub reasons: Vec<String>,
    pub ai_confidence: u8,
    pub has_critical_flags: bool,
    pub critical_reason: Option<String>,
    pub breakdown: Breakdown,
}

/// An analysis result together with its diagnostic trace.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub trace: Vec<TraceEvent>,
}
