//! Markup normalizer for list items built from a label and a "詳細" detail button.
//!
//! The rewrite is a fixed, ordered sequence of regex passes over the raw text of a
//! document. No tree is ever built: each pass scans the output of the previous one,
//! so the order of passes is part of the behavior.
//!
//! # Architecture
//!
//! ```text
//! Preset ──► &'static [RewriteRule] ──► Normalizer::run(&mut Document) ──► NormalizeReport
//!                                              ▲
//!                        FileRewrite::run ─────┘  (read source, write destination)
//! ```
//!
//! # Example
//!
//! ```
//! let html = r#"<li>Baz</span><button @click="showDetail('qux')" class="px-3">詳細</button></li>"#;
//!
//! assert_eq!(
//!     relabel_rewrite::normalize(html),
//!     r#"<li @click="showDetail('qux')" class="cursor-pointer hover:text-blue-600 hover:underline transition-colors">Baz</li>"#,
//! );
//! ```

mod document;
mod error;
mod file;
mod normalizer;
mod preset;
mod report;
mod rule;

pub use document::Document;
pub use error::RewriteError;
pub use file::{FileOutcome, FileRewrite, WriteMode};
pub use normalizer::{Normalizer, normalize};
pub use preset::{ParsePresetError, Preset};
pub use report::{NormalizeReport, PassOutcome};
pub use rule::{LineMode, RewriteRule};
