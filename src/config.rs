use crate::models::options::{ConvertOptions, UnterminatedPolicy};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = ".literate.toml";

/// Extensions picked up when walking directories or expanding globs.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

pub const DEFAULT_FENCE_LANG: &str = "typescript";

/// One configuration layer as written in a TOML file.
///
/// Every field is optional so that layers can be stacked: a value set in a
/// later layer overrides the same value from an earlier one.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Info string after the opening code fence
    #[serde(default)]
    pub fence_lang: Option<String>,

    /// `error` or `truncate`
    #[serde(default)]
    pub unterminated: Option<UnterminatedPolicy>,

    /// File extensions (without dot) to convert
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Whether to respect .gitignore files when walking directories
    #[serde(default)]
    pub respect_gitignore: Option<bool>,
}

/// Configuration with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub fence_lang: String,
    pub unterminated: UnterminatedPolicy,
    pub extensions: Vec<String>,
    pub respect_gitignore: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Config::default().resolve()
    }
}

impl ResolvedConfig {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            fence_lang: self.fence_lang.clone(),
            unterminated: self.unterminated,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(fence_lang) = &self.fence_lang {
            if fence_lang.contains(['`', '\n', '\r']) {
                anyhow::bail!("fence_lang must not contain backticks or line breaks");
            }
        }
        if let Some(extensions) = &self.extensions {
            if let Some(bad) = extensions.iter().find(|ext| ext.is_empty() || ext.contains('.')) {
                anyhow::bail!("Invalid extension {bad:?}: give extensions without a leading dot");
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge_with(&self, other: &Config) -> Config {
        Config {
            fence_lang: other.fence_lang.clone().or_else(|| self.fence_lang.clone()),
            unterminated: other.unterminated.or(self.unterminated),
            extensions: other.extensions.clone().or_else(|| self.extensions.clone()),
            respect_gitignore: other.respect_gitignore.or(self.respect_gitignore),
        }
    }

    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            fence_lang: self
                .fence_lang
                .clone()
                .unwrap_or_else(|| DEFAULT_FENCE_LANG.to_string()),
            unterminated: self.unterminated.unwrap_or_default(),
            extensions: self.extensions.clone().unwrap_or_else(|| {
                DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
            }),
            respect_gitignore: self.respect_gitignore.unwrap_or(true),
        }
    }
}

/// Finds and stacks configuration layers: global, then project, then an
/// explicitly named file.
#[derive(Debug)]
pub struct ConfigLoader {
    global_path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            global_path: Self::global_config_path(),
        }
    }

    /// Use `global_path` instead of the user's configuration directory.
    pub fn with_global_path(global_path: Option<PathBuf>) -> Self {
        Self { global_path }
    }

    /// Get the global configuration file path
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("literate").join("config.toml"))
    }

    /// Nearest project config in `start_dir` or one of its ancestors.
    pub fn find_project_config(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    pub fn load(&self, start_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
        let mut config = Config::default();

        if let Some(global_path) = &self.global_path {
            if global_path.is_file() {
                match Config::from_file(global_path) {
                    Ok(global) => config = config.merge_with(&global),
                    Err(e) => eprintln!("Warning: Failed to load global config: {e:#}"),
                }
            }
        }

        if let Some(project_path) = Self::find_project_config(start_dir) {
            config = config.merge_with(&Config::from_file(&project_path)?);
        }

        if let Some(explicit) = explicit {
            config = config.merge_with(&Config::from_file(explicit)?);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let resolved = Config::default().resolve();
        assert_eq!(resolved.fence_lang, "typescript");
        assert_eq!(resolved.unterminated, UnterminatedPolicy::Error);
        assert!(resolved.extensions.contains(&"tsx".to_string()));
        assert!(resolved.respect_gitignore);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
fence_lang = "ts"
unterminated = "truncate"
extensions = ["ts"]
respect_gitignore = false
"#,
        )
        .unwrap();
        let resolved = config.resolve();
        assert_eq!(resolved.fence_lang, "ts");
        assert_eq!(resolved.unterminated, UnterminatedPolicy::Truncate);
        assert_eq!(resolved.extensions, vec!["ts".to_string()]);
        assert!(!resolved.respect_gitignore);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        assert!(Config::from_toml(r#"unterminated = "ignore""#).is_err());
    }

    #[test]
    fn test_invalid_extension_is_rejected() {
        let error = Config::from_toml(r#"extensions = [".ts"]"#).unwrap_err();
        assert!(error.to_string().contains("leading dot"));
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let base = Config {
            fence_lang: Some("js".to_string()),
            respect_gitignore: Some(false),
            ..Default::default()
        };
        let overlay = Config {
            fence_lang: Some("ts".to_string()),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.fence_lang.as_deref(), Some("ts"));
        assert_eq!(merged.respect_gitignore, Some(false));
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "fence_lang = [unclosed").unwrap();

        let error = Config::from_file(&path).unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("Failed to parse config file"));
        assert!(message.contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_loader_layers() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project");
        let nested = project.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        fs::write(&global, "fence_lang = \"js\"\nrespect_gitignore = false\n").unwrap();
        fs::write(project.join(CONFIG_FILE_NAME), "fence_lang = \"tsx\"\n").unwrap();
        let explicit = temp_dir.path().join("explicit.toml");
        fs::write(&explicit, "unterminated = \"truncate\"\n").unwrap();

        let loader = ConfigLoader::with_global_path(Some(global));
        let config = loader.load(&nested, None).unwrap().resolve();
        assert_eq!(config.fence_lang, "tsx");
        assert!(!config.respect_gitignore);
        assert_eq!(config.unterminated, UnterminatedPolicy::Error);

        let config = loader.load(&nested, Some(&explicit)).unwrap().resolve();
        assert_eq!(config.unterminated, UnterminatedPolicy::Truncate);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_path(None);
        let missing = temp_dir.path().join("nope.toml");
        assert!(loader.load(temp_dir.path(), Some(&missing)).is_err());
    }
}
