//! `${VAR}` expansion in `[document]` paths.
//!
//! Runs on the raw strings from `relabel.toml`, before they are joined onto the
//! config file's directory, so a variable may hold either a relative or an
//! absolute prefix.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand a `document.path` or `document.output` value.
///
/// `${VAR}` must be set; `${VAR:-fallback}` uses `fallback` when it is not.
/// Values without `${` are returned untouched, so a file name containing `$`
/// needs no escaping. `field` is the TOML key reported in
/// [`ConfigError::EnvVar`].
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

fn lookup(var: &str) -> Result<Option<String>, UnsetVar> {
    std::env::var(var)
        .map(Some)
        .map_err(|_| UnsetVar(var.to_owned()))
}

/// Name of a referenced variable that has no value.
struct UnsetVar(String);
