use regex::Regex;

use crate::core::CategoryKind;

/// A weighted heuristic category: literal phrases, a point weight, and the
/// minimum number of distinct matched phrases required to trigger.
pub struct CategoryRule {
    pub kind: CategoryKind,
    pub weight: u8,
    pub min_matches: usize,
    pub phrases: &'static [&'static str],
}

/// Immutable detection rule catalog. Built once at startup and shared
/// read-only across all scans.
pub struct PatternCatalog {
    pub payment_phrases: Vec<Regex>,
    pub payment_demands: Vec<Regex>,
    pub currency_patterns: Vec<Regex>,
    pub safe_phrases: Vec<Regex>,
    pub categories: Vec<CategoryRule>,
}

// Payment-related phrases: a fee/payment noun next to a qualifying word.
const PAYMENT_PHRASES: &[&str] = &[
    r"(?i)\bregistration\s+fee\b",
    r"(?i)\bprocessing\s+fee\b",
    r"(?i)\btraining\s+fee\b",
    r"(?i)\bapplication\s+fee\b",
    r"(?i)\bmembership\s+fee\b",
    r"(?i)\badmin\s+fee\b",
    r"(?i)\bjoining\s+fee\b",
    r"(?i)\bonboarding\s+fee\b",
    r"(?i)\bcertification\s+fee\b",
    r"(?i)\bid\s+generation\s+fee\b",
    r"(?i)\bbackground\s+check\s+fee\b",
    r"(?i)\bverification\s+fee\b",
    r"(?i)\bactivation\s+fee\b",
    r"(?i)\bsetup\s+fee\b",
    r"(?i)\benrollment\s+fee\b",
    r"(?i)\bstarter\s+kit\s+fee\b",
    r"(?i)\bmaterial\s+fee\b",
    r"(?i)\bequipment\s+fee\b",
    r"(?i)\bsecurity\s+deposit\b",
    r"(?i)\brefundable\s+(?:fee|deposit)\b",
    r"(?i)\badvance\s+payment\b",
    r"(?i)\bpay\s+upfront\b",
    r"(?i)\bpaid\s+assessment\b",
    r"(?i)\bpaid\s+training\b",
    r"(?i)\bpaid\s+certification\b",
    // Kept in this group (not payment demands) so "no fee required" style
    // wording is suppressed by its safe-phrase context.
    r"(?i)\bfee\s+(?:is\s+)?required\b",
];

// Direct payment demands. Imperative enough that no context check applies.
const PAYMENT_DEMANDS: &[&str] = &[
    r"(?i)\bpay\s+(?:for\s+)?(?:training|certification|materials?|equipment)\b",
    r"(?i)\bpayment\s+(?:is\s+)?required\b",
    r"(?i)\bmust\s+pay\b",
    r"(?i)\bneed\s+to\s+pay\b",
    r"(?i)\bhave\s+to\s+pay\b",
    r"(?i)\bcharge\s+(?:for|of)\b",
    r"(?i)\bcost\s+to\s+join\b",
    r"(?i)\bdeposit\s+(?:of|is|required)\b",
];

// Currency amounts co-located with a fee-context word.
const CURRENCY_PATTERNS: &[&str] = &[
    r"(?i)\b(?:pay|fee|deposit|charge|cost)\s*[:-]?\s*[$₹£€¥]\s*\d+",
    r"(?i)\b(?:pay|fee|deposit|charge|cost)\s*[:-]?\s*(?:rs\.?|inr|usd)\s*\d+",
    r"(?i)[$₹£€¥]\s*\d+\s*(?:registration|processing|training|application|onboarding|certification)",
    r"(?i)\d+\s*(?:dollars?|rupees?|pounds?|euros?)\s*(?:fee|deposit|payment)",
];

// Benign phrases that look like a payment match in isolation. Tested against
// the context window of a payment-phrase match, never the whole text.
const SAFE_PHRASES: &[&str] = &[
    r"(?i)\bregistration\s+(?:process|procedure|system|portal|form|link|page|deadline|opens?|closes?)\b",
    r"(?i)\bapplication\s+(?:process|procedure|system|portal|form|link|page|deadline)\b",
    r"(?i)\bregistered\s+(?:candidates?|applicants?|users?|members?|companies?|trademark)\b",
    r"(?i)\bregistration\s+(?:is|will\s+be)\s+(?:open|closed|available|mandatory|optional)\b",
    r"(?i)\bcomplete\s+(?:the\s+)?registration\b",
    r"(?i)\bafter\s+registration\b",
    r"(?i)\bsuccessful\s+registration\b",
    r"(?i)\bno\s+(?:fee|fees|cost|charge|payment)\b",
    r"(?i)\bfree\s+(?:of\s+charge|training|certification)\b",
];

const UNREALISTIC_SALARY: &[&str] = &[
    "earn $10000",
    "make $5000",
    "guaranteed income",
    "easy money",
    "work from home earn",
    "unlimited earning",
    "get rich",
    "fast cash",
    "earn lakhs",
    "earn thousands weekly",
];

const SUSPICIOUS_CONTACT: &[&str] = &[
    "whatsapp",
    "telegram",
    "signal app",
    "wickr",
    "kik messenger",
    "contact via whatsapp",
    "message on telegram",
    "dm on instagram",
];

const PERSONAL_EMAILS: &[&str] = &[
    "@gmail.com",
    "@yahoo.com",
    "@hotmail.com",
    "@outlook.com",
    "@aol.com",
    "@mail.com",
    "@protonmail.com",
    "@icloud.com",
];

const VAGUE_COMPANY: &[&str] = &[
    "leading company",
    "reputed company",
    "top company",
    "multinational company",
    "well established",
    "growing company",
    "startup company",
    "confidential",
];

const URGENCY_TACTICS: &[&str] = &[
    "apply now",
    "limited slots",
    "hurry",
    "immediate joining",
    "urgent requirement",
    "only few positions",
    "act fast",
    "don't miss",
];

const TOO_GOOD_TO_BE_TRUE: &[&str] = &[
    "no experience required",
    "anyone can apply",
    "work 2 hours",
    "flexible timing",
    "part time full pay",
    "guaranteed selection",
];

impl PatternCatalog {
    /// Build the standard catalog. Panics only on an invalid built-in
    /// pattern, which is a programming error caught by tests.
    pub fn standard() -> Self {
        Self {
            payment_phrases: compile(PAYMENT_PHRASES),
            payment_demands: compile(PAYMENT_DEMANDS),
            currency_patterns: compile(CURRENCY_PATTERNS),
            safe_phrases: compile(SAFE_PHRASES),
            categories: vec![
                CategoryRule {
                    kind: CategoryKind::UnrealisticSalary,
                    weight: 25,
                    min_matches: 1,
                    phrases: UNREALISTIC_SALARY,
                },
                CategoryRule {
                    kind: CategoryKind::SuspiciousContact,
                    weight: 20,
                    min_matches: 1,
                    phrases: SUSPICIOUS_CONTACT,
                },
                CategoryRule {
                    kind: CategoryKind::PersonalEmail,
                    weight: 15,
                    min_matches: 1,
                    phrases: PERSONAL_EMAILS,
                },
                CategoryRule {
                    kind: CategoryKind::VagueCompany,
                    weight: 10,
                    min_matches: 1,
                    phrases: VAGUE_COMPANY,
                },
                // Occasional urgency language is normal; only excessive
                // repetition counts.
                CategoryRule {
                    kind: CategoryKind::UrgencyTactics,
                    weight: 10,
                    min_matches: 3,
                    phrases: URGENCY_TACTICS,
                },
                CategoryRule {
                    kind: CategoryKind::TooGoodToBeTrue,
                    weight: 10,
                    min_matches: 3,
                    phrases: TOO_GOOD_TO_BE_TRUE,
                },
            ],
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("built-in pattern must compile"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_builds() {
        let catalog = PatternCatalog::standard();
        assert_eq!(catalog.payment_phrases.len(), 26);
        assert_eq!(catalog.payment_demands.len(), 8);
        assert_eq!(catalog.currency_patterns.len(), 4);
        assert_eq!(catalog.safe_phrases.len(), 9);
        assert_eq!(catalog.categories.len(), 6);
    }

    #[test]
    fn category_weights_and_thresholds() {
        let catalog = PatternCatalog::standard();
        let weights: Vec<(CategoryKind, u8, usize)> = catalog
            .categories
            .iter()
            .map(|c| (c.kind, c.weight, c.min_matches))
            .collect();
        assert_eq!(
            weights,
            vec![
                (CategoryKind::UnrealisticSalary, 25, 1),
                (CategoryKind::SuspiciousContact, 20, 1),
                (CategoryKind::PersonalEmail, 15, 1),
                (CategoryKind::VagueCompany, 10, 1),
                (CategoryKind::UrgencyTactics, 10, 3),
                (CategoryKind::TooGoodToBeTrue, 10, 3),
            ]
        );
    }

    #[test]
    fn payment_phrase_is_case_insensitive() {
        let catalog = PatternCatalog::standard();
        let hit = catalog
            .payment_phrases
            .iter()
            .any(|r| r.is_match("Please pay the REGISTRATION FEE today"));
        assert!(hit);
    }

    #[test]
    fn payment_phrase_respects_word_boundaries() {
        let catalog = PatternCatalog::standard();
        // "feed" must not satisfy the trailing boundary of "fee".
        let hit = catalog
            .payment_phrases
            .iter()
            .any(|r| r.is_match("check the registration feed"));
        assert!(!hit);
    }

    #[test]
    fn currency_pattern_matches_symbol_amounts() {
        let catalog = PatternCatalog::standard();
        assert!(catalog
            .currency_patterns
            .iter()
            .any(|r| r.is_match("pay $99 to start")));
        assert!(catalog
            .currency_patterns
            .iter()
            .any(|r| r.is_match("deposit: ₹500 immediately")));
        assert!(catalog
            .currency_patterns
            .iter()
            .any(|r| r.is_match("$99 registration required")));
        assert!(catalog
            .currency_patterns
            .iter()
            .any(|r| r.is_match("500 rupees fee applies")));
    }

    #[test]
    fn safe_phrases_match_benign_wording() {
        let catalog = PatternCatalog::standard();
        for sample in [
            "the registration process opens Monday",
            "no fee required",
            "free of charge",
            "complete the registration online",
        ] {
            assert!(
                catalog.safe_phrases.iter().any(|r| r.is_match(sample)),
                "expected a safe phrase to match {sample:?}"
            );
        }
    }

    #[test]
    fn category_phrases_are_lowercase() {
        let catalog = PatternCatalog::standard();
        for rule in &catalog.categories {
            for phrase in rule.phrases {
                assert_eq!(
                    *phrase,
                    phrase.to_lowercase(),
                    "category phrases are matched against lowercased text"
                );
            }
        }
    }
}
