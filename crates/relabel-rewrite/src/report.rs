//! Per-pass replacement counts.

/// Outcome of a single rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    /// Name of the rule that ran.
    pub rule: &'static str,
    /// Number of non-overlapping matches replaced.
    pub replacements: usize,
}

/// Replacement counts for every pass of one normalizer run, in pass order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    passes: Vec<PassOutcome>,
}

impl NormalizeReport {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            passes: Vec::with_capacity(capacity),
        }
    }

    /// Record the outcome of a pass.
    pub fn record(&mut self, rule: &'static str, replacements: usize) {
        self.passes.push(PassOutcome { rule, replacements });
    }

    #[must_use]
    pub fn passes(&self) -> &[PassOutcome] {
        &self.passes
    }

    /// Replacements made by the named rule, if it ran.
    #[must_use]
    pub fn replacements_for(&self, rule: &str) -> Option<usize> {
        self.passes
            .iter()
            .find(|pass| pass.rule == rule)
            .map(|pass| pass.replacements)
    }

    /// Total replacements across all passes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passes.iter().map(|pass| pass.replacements).sum()
    }

    /// Whether no pass matched anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}
