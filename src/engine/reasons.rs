use std::collections::HashSet;

/// Maximum number of reasons surfaced to the caller.
pub const MAX_REASONS: usize = 10;

// AI red flags containing these phrases say "nothing found"; they are dropped
// when a critical rule already decided the verdict.
const NEUTRAL_AI_PHRASES: &[&str] = &["no major red flags", "appears to follow professional"];

/// Insertion-ordered string set: keeps first occurrences, rejects duplicates.
#[derive(Debug, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning false if it was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(value);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Merge reason lists into the final explanation list: critical reasons
/// first, duplicates removed keeping first occurrence, at most
/// [`MAX_REASONS`] entries.
///
/// On the critical path, AI red flags that merely report an absence of
/// findings are filtered out so they cannot dilute the override verdict.
pub fn aggregate(
    critical_reasons: &[String],
    category_reasons: &[String],
    ai_red_flags: &[String],
    has_critical_flag: bool,
) -> Vec<String> {
    let mut set = OrderedSet::new();
    if has_critical_flag {
        set.extend(critical_reasons.iter().cloned());
        for flag in ai_red_flags {
            let lower = flag.to_lowercase();
            if NEUTRAL_AI_PHRASES.iter().any(|p| lower.contains(p)) {
                continue;
            }
            set.insert(flag.clone());
        }
    } else {
        set.extend(category_reasons.iter().cloned());
        set.extend(ai_red_flags.iter().cloned());
    }

    let mut reasons = set.into_vec();
    reasons.truncate(MAX_REASONS);
    reasons
}
