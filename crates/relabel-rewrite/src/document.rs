//! In-memory markup buffer.

use std::borrow::Cow;

use crate::rule::RewriteRule;

/// Full text of a markup file, rewritten in place one pass at a time.
///
/// The text is never parsed: rules see it as a flat string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Apply `rule` to the current text and return the number of replacements.
    pub fn apply(&mut self, rule: &RewriteRule) -> usize {
        let (rewritten, count) = rule.apply(&self.text);
        if let Cow::Owned(text) = rewritten {
            self.text = text;
        }
        count
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self { text }
    }
}
