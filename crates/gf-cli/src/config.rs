//! Configuration loading and management.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use gf_core::AnalysisConfig;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Allergens to flag in addition to the built-in list.
    pub known_allergens: Vec<String>,
    /// Thresholds for every analyzer.
    pub analysis: AnalysisConfig,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("gf.db"),
            known_allergens: Vec::new(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources override earlier ones: built-in defaults, the platform
    /// config file, `config_path`, then `GF_*` environment variables. Nested
    /// keys use a double underscore, e.g. `GF_ANALYSIS__TEMPORAL__TOP_N=3`.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (GF_*)
        figment = figment.merge(Env::prefixed("GF_").split("__"));

        figment.extract()
    }

    /// Configured allergens, lowercased and trimmed, blanks dropped.
    pub fn allergens(&self) -> BTreeSet<String> {
        self.known_allergens
            .iter()
            .map(|allergen| allergen.trim().to_lowercase())
            .filter(|allergen| !allergen.is_empty())
            .collect()
    }
}

/// Returns the platform-specific config directory for gf.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gf"))
}

/// Returns the platform-specific data directory for gf.
///
/// On Linux: `~/.local/share/gf`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("gf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_gf() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "gf");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("gf.db"));
        assert!(config.known_allergens.is_empty());
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
database_path = "/tmp/journal.db"
known_allergens = ["Peanut", "shellfish"]

[analysis.temporal]
top_n = 4

[analysis.correlation]
negative_ratio = 0.5
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/journal.db"));
        assert_eq!(config.analysis.temporal.top_n, 4);
        assert_eq!(config.analysis.temporal.min_samples, 2);
        assert!((config.analysis.correlation.negative_ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.analysis.correlation.min_occurrences, 3);
        assert_eq!(config.analysis.deficiency.rules.len(), 2);
    }

    #[test]
    fn test_allergens_are_normalized() {
        let config = Config {
            known_allergens: vec![" Peanut ".to_string(), String::new(), "SOY".to_string()],
            ..Config::default()
        };
        let allergens: Vec<String> = config.allergens().into_iter().collect();
        assert_eq!(allergens, vec!["peanut", "soy"]);
    }
}
