//! CLI command implementations.

pub(crate) mod apply;
pub(crate) mod rules;

pub(crate) use apply::ApplyArgs;
pub(crate) use rules::RulesArgs;
