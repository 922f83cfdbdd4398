//! Hardcoded rule tables.
//!
//! Each preset is a fixed, ordered list of passes. Passes see the output of the
//! passes before them, so the table order is significant.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::rule::{LineMode, RewriteRule};

/// A named rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Preset {
    /// Collapse label + detail button items into clickable labels.
    #[default]
    Collapse,
    /// Restore items whose trigger argument was corrupted into `'</li>'`.
    Repair,
}

impl Preset {
    /// All presets, in listing order.
    pub const ALL: [Self; 2] = [Self::Collapse, Self::Repair];

    /// Compiled passes of this preset, in application order.
    #[must_use]
    pub fn rules(self) -> &'static [RewriteRule] {
        match self {
            Self::Collapse => &COLLAPSE_RULES,
            Self::Repair => &REPAIR_RULES,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Collapse => "collapse",
            Self::Repair => "repair",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, thiserror::Error)]
#[error("unknown preset '{0}' (expected 'collapse' or 'repair')")]
pub struct ParsePresetError(String);

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePresetError(s.to_owned()))
    }
}

/// Uncompiled rule definition.
struct RuleSpec {
    name: &'static str,
    description: &'static str,
    mode: LineMode,
    pattern: &'static str,
    replacement: &'static str,
}

const COLLAPSE: &[RuleSpec] = &[
    RuleSpec {
        name: "degenerate-button",
        description: "drop a stray green button whose argument is a closing </li>",
        mode: LineMode::Literal,
        pattern: r#"</span><button @click="showDetail('</li>')" class="px-3 py-1 bg-green-600 text-white text-xs rounded hover:bg-green-700 transition-colors">詳細</button></li>"#,
        replacement: "</li>",
    },
    RuleSpec {
        name: "flex-label",
        description: "flex item with span label and detail button -> blue clickable label",
        mode: LineMode::MultiLine,
        pattern: r#"<li class="flex items-center justify-between">\s*<span>(.*?)</span>\s*<button @click="showDetail\('(.*?)'\)"[^>]*>詳細</button>\s*</li>"#,
        replacement: r#"<li @click="showDetail('${2}')" class="cursor-pointer hover:text-blue-600 hover:underline transition-colors">${1}</li>"#,
    },
    RuleSpec {
        name: "green-trigger",
        description: "clickable flex item with nested detail button -> green clickable label",
        mode: LineMode::SingleLine,
        pattern: r#"<li @click="showDetail\('(.*?)'\)" class="flex items-center justify-between"><span>(.*?)</span><button @click="showDetail\('.*?'\)"[^>]*>詳細</button></li>"#,
        replacement: r#"<li @click="showDetail('${1}')" class="cursor-pointer hover:text-green-600 hover:underline transition-colors">${2}</li>"#,
    },
    RuleSpec {
        name: "orange-trigger",
        description: "orange hover item with trailing detail button -> orange clickable label",
        mode: LineMode::SingleLine,
        pattern: r#"<li @click="showDetail\('(.*?)'\)" class="cursor-pointer hover:text-orange-600 transition-colors">(.*?)</span><button @click="showDetail\('.*?'\)"[^>]*>詳細</button></li>"#,
        replacement: r#"<li @click="showDetail('${1}')" class="cursor-pointer hover:text-orange-600 hover:underline transition-colors">${2}</li>"#,
    },
    RuleSpec {
        name: "purple-trigger",
        description: "purple hover item with trailing detail button -> purple clickable label",
        mode: LineMode::SingleLine,
        pattern: r#"<li @click="showDetail\('(.*?)'\)" class="cursor-pointer hover:text-purple-600 transition-colors">(.*?)</span><button @click="showDetail\('.*?'\)"[^>]*>詳細</button></li>"#,
        replacement: r#"<li @click="showDetail('${1}')" class="cursor-pointer hover:text-purple-600 hover:underline transition-colors">${2}</li>"#,
    },
    RuleSpec {
        name: "bare-item",
        description: "plain <li> with label and detail button -> blue clickable label",
        mode: LineMode::SingleLine,
        pattern: r#"<li>(.*?)</span><button @click="showDetail\('(.*?)'\)"[^>]*>詳細</button></li>"#,
        replacement: r#"<li @click="showDetail('${2}')" class="cursor-pointer hover:text-blue-600 hover:underline transition-colors">${1}</li>"#,
    },
    RuleSpec {
        name: "list-spacing",
        description: "tighten themed list spacing from space-y-3 to space-y-2",
        mode: LineMode::SingleLine,
        pattern: r#"class="text-sm text-(\w+)-800 space-y-3""#,
        replacement: r#"class="text-sm text-${1}-800 space-y-2""#,
    },
];

const REPAIR: &[RuleSpec] = &[
    RuleSpec {
        name: "restore-argument",
        description: "use the bullet label as the detail argument where it was lost to '</li>'",
        mode: LineMode::SingleLine,
        pattern: r#"• (.*?)</span><button @click="showDetail\('</li>'\)""#,
        replacement: r#"• ${1}</span><button @click="showDetail('${1}')""#,
    },
    RuleSpec {
        name: "drop-double-button",
        description: "remove a second detail button appended after a complete one",
        mode: LineMode::SingleLine,
        pattern: r"</button>\s*</span><button[^>]*>詳細</button></li>",
        replacement: "</button></li>",
    },
];

static COLLAPSE_RULES: LazyLock<Vec<RewriteRule>> = LazyLock::new(|| compile(COLLAPSE));
static REPAIR_RULES: LazyLock<Vec<RewriteRule>> = LazyLock::new(|| compile(REPAIR));

fn compile(specs: &[RuleSpec]) -> Vec<RewriteRule> {
    specs
        .iter()
        .map(|spec| {
            RewriteRule::new(
                spec.name,
                spec.description,
                spec.mode,
                spec.pattern,
                spec.replacement,
            )
            .expect("invalid hardcoded rewrite pattern")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(preset: Preset) -> Vec<&'static str> {
        preset.rules().iter().map(RewriteRule::name).collect()
    }

    #[test]
    fn test_collapse_order() {
        assert_eq!(
            names(Preset::Collapse),
            vec![
                "degenerate-button",
                "flex-label",
                "green-trigger",
                "orange-trigger",
                "purple-trigger",
                "bare-item",
                "list-spacing",
            ]
        );
    }

    #[test]
    fn test_repair_order() {
        assert_eq!(
            names(Preset::Repair),
            vec!["restore-argument", "drop-double-button"]
        );
    }

    #[test]
    fn test_only_flex_label_spans_lines() {
        let multi_line: Vec<_> = Preset::Collapse
            .rules()
            .iter()
            .filter(|rule| rule.mode() == LineMode::MultiLine)
            .map(RewriteRule::name)
            .collect();
        assert_eq!(multi_line, vec!["flex-label"]);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!("collapse".parse::<Preset>().unwrap(), Preset::Collapse);
        assert_eq!("Repair".parse::<Preset>().unwrap(), Preset::Repair);
    }

    #[test]
    fn test_parse_unknown_preset() {
        let err = "tidy".parse::<Preset>().unwrap_err();
        assert!(err.to_string().contains("tidy"));
    }

    #[test]
    fn test_display_roundtrips_parse() {
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_default_is_collapse() {
        assert_eq!(Preset::default(), Preset::Collapse);
    }

    #[test]
    fn test_restore_argument() {
        let rule = &Preset::Repair.rules()[0];
        let (out, count) = rule.apply(r#"<li>• 耐震等級3の確保</span><button @click="showDetail('</li>')" class="px-3">"#);
        assert_eq!(
            out,
            r#"<li>• 耐震等級3の確保</span><button @click="showDetail('耐震等級3の確保')" class="px-3">"#
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_drop_double_button() {
        let rule = &Preset::Repair.rules()[1];
        let (out, count) = rule.apply(
            r#"<button @click="showDetail('a')">詳細</button> </span><button class="px-3">詳細</button></li>"#,
        );
        assert_eq!(out, r#"<button @click="showDetail('a')">詳細</button></li>"#);
        assert_eq!(count, 1);
    }
}
