//! Runs a preset's passes over a document.

use crate::document::Document;
use crate::preset::Preset;
use crate::report::NormalizeReport;
use crate::rule::RewriteRule;

/// Applies the passes of a [`Preset`] in order.
///
/// Every pass runs to completion over the whole buffer before the next one
/// starts. Passes that match nothing are no-ops and are recorded with a count of 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    preset: Preset,
}

impl Normalizer {
    #[must_use]
    pub fn new(preset: Preset) -> Self {
        Self { preset }
    }

    #[must_use]
    pub fn preset(&self) -> Preset {
        self.preset
    }

    #[must_use]
    pub fn rules(&self) -> &'static [RewriteRule] {
        self.preset.rules()
    }

    /// Rewrite `document` in place and report what each pass replaced.
    pub fn run(&self, document: &mut Document) -> NormalizeReport {
        let rules = self.rules();
        let mut report = NormalizeReport::with_capacity(rules.len());

        for rule in rules {
            let replacements = document.apply(rule);
            tracing::debug!(
                preset = %self.preset,
                rule = rule.name(),
                replacements,
                "rewrite pass"
            );
            report.record(rule.name(), replacements);
        }

        report
    }

    /// Rewrite `input` and return the result.
    #[must_use]
    pub fn normalize(&self, input: &str) -> String {
        let mut document = Document::new(input);
        self.run(&mut document);
        document.into_string()
    }
}

/// Rewrite `input` with the default [`Preset::Collapse`] passes.
#[must_use]
pub fn normalize(input: &str) -> String {
    Normalizer::default().normalize(input)
}
