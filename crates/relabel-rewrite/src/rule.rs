//! Named search-and-replace passes.

use std::borrow::Cow;

use regex::{Captures, Regex, RegexBuilder};

/// How a rule's pattern is compiled with respect to line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// The pattern is an exact string and is escaped before compiling.
    Literal,
    /// `.` does not match `\n`.
    SingleLine,
    /// `.` also matches `\n`.
    MultiLine,
}

impl LineMode {
    /// Short label used in listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::SingleLine => "single-line",
            Self::MultiLine => "multi-line",
        }
    }
}

/// A global rewrite pass: every non-overlapping match of `pattern` is replaced.
///
/// Non-literal replacements are templates expanded against the match captures
/// (`${1}`, `${2}`, ...). Literal rules insert the replacement verbatim.
#[derive(Debug)]
pub struct RewriteRule {
    name: &'static str,
    description: &'static str,
    mode: LineMode,
    pattern: Regex,
    replacement: &'static str,
}

impl RewriteRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` does not compile.
    pub fn new(
        name: &'static str,
        description: &'static str,
        mode: LineMode,
        pattern: &str,
        replacement: &'static str,
    ) -> Result<Self, regex::Error> {
        let source = match mode {
            LineMode::Literal => Cow::Owned(regex::escape(pattern)),
            LineMode::SingleLine | LineMode::MultiLine => Cow::Borrowed(pattern),
        };
        let pattern = RegexBuilder::new(&source)
            .dot_matches_new_line(mode == LineMode::MultiLine)
            .build()?;

        Ok(Self {
            name,
            description,
            mode,
            pattern,
            replacement,
        })
    }

    /// Stable identifier of the pass.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// One-line summary of what the pass rewrites.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn mode(&self) -> LineMode {
        self.mode
    }

    /// Replace every match in `text`.
    ///
    /// Returns the rewritten text (borrowed when nothing matched) and the
    /// number of replacements made.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut count = 0;
        let rewritten = self.pattern.replace_all(text, |caps: &Captures| {
            count += 1;
            let mut out = String::new();
            if self.mode == LineMode::Literal {
                out.push_str(self.replacement);
            } else {
                caps.expand(self.replacement, &mut out);
            }
            out
        });
        (rewritten, count)
    }
}
