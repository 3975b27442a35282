//! Application configuration for answerfill.
//!
//! User config lives at `~/.answerfill/answerfill.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnswerFillError, Result};
use crate::types::{DEFAULT_HEADER_BANNER, DEFAULT_PLACEHOLDER};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "answerfill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".answerfill";

// ---------------------------------------------------------------------------
// Config structs (matching answerfill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// File locations.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Extractor behaviour.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Switches for optional extraction backends.
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,

    /// Section-convention markers.
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory that relative source paths are resolved against.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Question template (relative to `data_dir` unless absolute).
    #[serde(default = "default_questions")]
    pub questions: String,

    /// Filled output document (relative to `data_dir` unless absolute).
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            questions: default_questions(),
            output: default_output(),
        }
    }
}

impl DefaultsConfig {
    /// Resolve a path against `data_dir` unless it is already absolute.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Path::new(&self.data_dir).join(p)
        }
    }

    /// Path of the question template.
    pub fn questions_path(&self) -> PathBuf {
        self.resolve(&self.questions)
    }

    /// Path of the filled output document.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }
}

fn default_data_dir() -> String {
    "mcp-data".into()
}
fn default_questions() -> String {
    "questions.md".into()
}
fn default_output() -> String {
    "questions_filled.md".into()
}

/// Which elements the URL extractor removes before collecting text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HtmlProfile {
    /// Remove `script`, `style`, `nav`, `footer`, `header`.
    #[default]
    StripChrome,
    /// Remove only `script` and `style`.
    ScriptsOnly,
}

impl HtmlProfile {
    /// Element names dropped (with their subtrees) under this profile.
    pub fn stripped_tags(&self) -> &'static [&'static str] {
        match self {
            HtmlProfile::StripChrome => &["script", "style", "nav", "footer", "header"],
            HtmlProfile::ScriptsOnly => &["script", "style"],
        }
    }
}

/// `[extraction]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Upper bound on a single URL fetch, in seconds.
    #[serde(default = "default_url_timeout")]
    pub url_timeout_secs: u64,

    /// Element stripping profile for HTML pages.
    #[serde(default)]
    pub html_profile: HtmlProfile,

    /// User-Agent sent with URL fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            url_timeout_secs: default_url_timeout(),
            html_profile: HtmlProfile::default(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_url_timeout() -> u64 {
    10
}
fn default_user_agent() -> String {
    concat!("answerfill/", env!("CARGO_PKG_VERSION")).into()
}

/// `[capabilities]` section. A `false` switches off a compiled-in backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    #[serde(default = "default_true")]
    pub web: bool,
    #[serde(default = "default_true")]
    pub ocr: bool,
    #[serde(default = "default_true")]
    pub pdf: bool,
    #[serde(default = "default_true")]
    pub docx: bool,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            web: true,
            ocr: true,
            pdf: true,
            docx: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[markdown]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Sections of an answer document containing this text are skipped.
    #[serde(default = "default_header_banner")]
    pub header_banner: String,

    /// Marker replaced by the answer body in question sections.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            header_banner: default_header_banner(),
            placeholder: default_placeholder(),
        }
    }
}

fn default_header_banner() -> String {
    DEFAULT_HEADER_BANNER.into()
}
fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.into()
}

impl AppConfig {
    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.url_timeout_secs == 0 {
            return Err(AnswerFillError::config(
                "extraction.url_timeout_secs must be greater than zero",
            ));
        }
        if self.markdown.placeholder.trim().is_empty() {
            return Err(AnswerFillError::config("markdown.placeholder must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.answerfill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AnswerFillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.answerfill/answerfill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AnswerFillError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        AnswerFillError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AnswerFillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AnswerFillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AnswerFillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("strip-chrome"));
        assert!(toml_str.contains("TO BE FILLED"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.extraction.url_timeout_secs, 10);
        assert_eq!(parsed.extraction.html_profile, HtmlProfile::StripChrome);
        assert_eq!(parsed.markdown.header_banner, "# Secure Coding");
        assert!(parsed.capabilities.pdf);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[extraction]
html_profile = "scripts-only"

[capabilities]
ocr = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.extraction.html_profile, HtmlProfile::ScriptsOnly);
        assert_eq!(config.extraction.url_timeout_secs, 10);
        assert!(!config.capabilities.ocr);
        assert!(config.capabilities.web);
        assert_eq!(config.defaults.data_dir, "mcp-data");
    }

    #[test]
    fn defaults_resolve_under_data_dir() {
        let defaults = DefaultsConfig::default();
        assert_eq!(
            defaults.questions_path(),
            Path::new("mcp-data").join("questions.md")
        );
        assert_eq!(
            defaults.output_path(),
            Path::new("mcp-data").join("questions_filled.md")
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.extraction.url_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("url_timeout_secs"));
    }

    #[test]
    fn html_profiles_strip_expected_tags() {
        assert!(HtmlProfile::StripChrome.stripped_tags().contains(&"nav"));
        assert!(!HtmlProfile::ScriptsOnly.stripped_tags().contains(&"nav"));
        assert!(HtmlProfile::ScriptsOnly.stripped_tags().contains(&"script"));
    }
}
