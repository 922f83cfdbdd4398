//! Configuration management for relabel.
//!
//! Parses `relabel.toml` with serde and discovers it in the current directory
//! or any parent. Without a config file, defaults apply relative to the current
//! directory.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [document]
//! path = "src/rules.html"
//! output = "src/rules_fixed.html"
//! backup = true
//!
//! [rewrite]
//! preset = "collapse"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `document.path` and `document.output` support `${VAR}` (error if unset) and
//! `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};

use relabel_rewrite::Preset;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the document to rewrite.
    pub path: Option<PathBuf>,
    /// Override the output path.
    pub output: Option<PathBuf>,
    /// Override the rule preset.
    pub preset: Option<Preset>,
    /// Override the backup flag.
    pub backup: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "relabel.toml";

/// Document rewritten when nothing else is configured.
const DEFAULT_DOCUMENT: &str = "src/rules.html";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document section as written in TOML (paths are relative strings).
    document: DocumentConfigRaw,
    /// Rewrite configuration.
    pub rewrite: RewriteConfig,

    /// Resolved document configuration (set after loading).
    #[serde(skip)]
    pub document_resolved: DocumentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw document configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocumentConfigRaw {
    path: Option<String>,
    output: Option<String>,
    backup: Option<bool>,
}

/// Resolved document configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocumentConfig {
    /// Markup file to read.
    pub path: PathBuf,
    /// Where to write the result. `None` rewrites `path` in place.
    pub output: Option<PathBuf>,
    /// Copy the previous destination to `<destination>.bak` before writing.
    pub backup: bool,
}

impl DocumentConfig {
    /// Destination of the rewrite.
    #[must_use]
    pub fn destination(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.path)
    }
}

/// Rewrite configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Rule preset to run.
    pub preset: Preset,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`document.path`").
        field: String,
        /// Error message (e.g., "${`RULES_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `relabel.toml` in current directory and parents.
    ///
    /// CLI settings are applied after path resolution, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = &settings.path {
            self.document_resolved.path.clone_from(path);
        }
        if let Some(output) = &settings.output {
            self.document_resolved.output = Some(output.clone());
        }
        if let Some(preset) = settings.preset {
            self.rewrite.preset = preset;
        }
        if let Some(backup) = settings.backup {
            self.document_resolved.backup = backup;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            document: DocumentConfigRaw::default(),
            rewrite: RewriteConfig::default(),
            document_resolved: DocumentConfig {
                path: base.join(DEFAULT_DOCUMENT),
                output: None,
                backup: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate the raw document section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a configured path is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.document.path {
            require_non_empty(path, "document.path")?;
        }
        if let Some(output) = &self.document.output {
            require_non_empty(output, "document.output")?;
        }
        Ok(())
    }

    /// Expand environment variable references in path strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.document.path {
            self.document.path = Some(expand::expand_env(path, "document.path")?);
        }
        if let Some(ref output) = self.document.output {
            self.document.output = Some(expand::expand_env(output, "document.output")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.document_resolved = DocumentConfig {
            path: config_dir.join(self.document.path.as_deref().unwrap_or(DEFAULT_DOCUMENT)),
            output: self.document.output.as_deref().map(|o| config_dir.join(o)),
            backup: self.document.backup.unwrap_or(false),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.document_resolved.path,
            PathBuf::from("/test/src/rules.html")
        );
        assert!(config.document_resolved.output.is_none());
        assert!(!config.document_resolved.backup);
        assert_eq!(config.rewrite.preset, Preset::Collapse);
        assert_eq!(
            config.document_resolved.destination(),
            Path::new("/test/src/rules.html")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.document.path.is_none());
        assert_eq!(config.rewrite.preset, Preset::Collapse);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[document]
path = "pages/rules.html"
output = "pages/rules_fixed.html"
backup = true

[rewrite]
preset = "repair"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.document.path.as_deref(), Some("pages/rules.html"));
        assert_eq!(
            config.document.output.as_deref(),
            Some("pages/rules_fixed.html")
        );
        assert_eq!(config.document.backup, Some(true));
        assert_eq!(config.rewrite.preset, Preset::Repair);
    }

    #[test]
    fn test_parse_unknown_preset() {
        let toml = r#"
[rewrite]
preset = "tidy"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[document]
path = "pages/rules.html"
output = "out/rules.html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.document_resolved.path,
            PathBuf::from("/project/pages/rules.html")
        );
        assert_eq!(
            config.document_resolved.output,
            Some(PathBuf::from("/project/out/rules.html"))
        );
        assert_eq!(
            config.document_resolved.destination(),
            Path::new("/project/out/rules.html")
        );
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.document_resolved.path,
            PathBuf::from("/project/src/rules.html")
        );
        assert!(config.document_resolved.output.is_none());
    }

    #[test]
    fn test_apply_cli_settings_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            path: Some(PathBuf::from("/other/page.html")),
            ..Default::default()
        });
        assert_eq!(
            config.document_resolved.path,
            PathBuf::from("/other/page.html")
        );
        assert!(config.document_resolved.output.is_none()); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            output: Some(PathBuf::from("/test/out.html")),
            preset: Some(Preset::Repair),
            backup: Some(true),
            ..Default::default()
        });
        assert_eq!(
            config.document_resolved.output,
            Some(PathBuf::from("/test/out.html"))
        );
        assert_eq!(config.rewrite.preset, Preset::Repair);
        assert!(config.document_resolved.backup);
    }

    #[test]
    fn test_apply_cli_settings_disables_backup() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "[document]\nbackup = true\n").unwrap();

        let settings = CliSettings {
            backup: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(config_path.as_path()), Some(&settings)).unwrap();

        assert!(!config.document_resolved.backup);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(
            config.document_resolved.path,
            PathBuf::from("/test/src/rules.html")
        );
        assert_eq!(config.rewrite.preset, Preset::Collapse);
    }

    #[test]
    fn test_validate_empty_path() {
        let config: Config = toml::from_str("[document]\npath = \"\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("document.path"));
    }

    #[test]
    fn test_validate_empty_output() {
        let config: Config = toml::from_str("[document]\noutput = \"  \"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("document.output"));
    }

    #[test]
    fn test_expand_env_vars_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RELABEL_TEST_PAGES", "pages");
        }
        let mut config: Config =
            toml::from_str("[document]\npath = \"${RELABEL_TEST_PAGES}/rules.html\"\n").unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.document.path.as_deref(), Some("pages/rules.html"));
        unsafe {
            std::env::remove_var("RELABEL_TEST_PAGES");
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &config_path,
            "[document]\npath = \"site/rules.html\"\nbackup = true\n",
        )
        .unwrap();

        let config = Config::load(Some(config_path.as_path()), None).unwrap();

        assert_eq!(
            config.document_resolved.path,
            dir.path().join("site/rules.html")
        );
        assert!(config.document_resolved.backup);
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn test_load_with_cli_override() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "[rewrite]\npreset = \"repair\"\n").unwrap();

        let settings = CliSettings {
            preset: Some(Preset::Collapse),
            ..Default::default()
        };
        let config = Config::load(Some(config_path.as_path()), Some(&settings)).unwrap();

        assert_eq!(config.rewrite.preset, Preset::Collapse);
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "[document\n").unwrap();
        let err = Config::load(Some(config_path.as_path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
