use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared_logging::LogLevel;

use crate::generation::EngineSettings;

/// Runtime configuration for quiz generation and the `aq` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoQuizConfig {
    /// Engine tunables and the optional seed.
    pub engine: EngineConfig,
    /// Data file locations.
    pub paths: PathsConfig,
    /// Log and event sinks.
    pub telemetry: TelemetryConfig,
}

/// `[engine]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Placeholder and minimum sentence length.
    #[serde(flatten)]
    pub settings: EngineSettings,
    /// Fixed seed for reproducible quizzes; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// `[paths]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathsConfig {
    /// Quiz store snapshot.
    #[serde(default = "default_store")]
    pub store: PathBuf,
    /// Ontology document.
    #[serde(default = "default_ontology")]
    pub ontology: PathBuf,
    /// Annotated passages from the external tagger.
    #[serde(default = "default_annotations")]
    pub annotations: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            ontology: default_ontology(),
            annotations: default_annotations(),
        }
    }
}

/// `[telemetry]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// JSON lines log file.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    /// JSON lines event file.
    #[serde(default)]
    pub event_log: Option<PathBuf>,
    /// Lowest level written to `log_path`.
    #[serde(default = "default_min_level")]
    pub min_level: LogLevel,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            event_log: None,
            min_level: default_min_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    telemetry: TelemetryConfig,
}

impl AutoQuizConfig {
    /// Loads a TOML file; relative paths resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_toml(&raw, &base).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses TOML text, resolving relative paths against `base`.
    pub fn from_toml(raw: &str, base: &Path) -> Result<Self> {
        let document: ConfigDocument = toml::from_str(raw)?;
        let mut config = Self {
            engine: document.engine,
            paths: document.paths,
            telemetry: document.telemetry,
        };
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.engine.settings.min_sentence_chars == 0 {
            bail!("engine.min_sentence_chars must be at least 1");
        }
        if self.engine.settings.blank_placeholder.trim().is_empty() {
            bail!("engine.blank_placeholder cannot be blank");
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |candidate: &mut PathBuf| {
            if candidate.is_relative() {
                *candidate = base.join(&*candidate);
            }
        };
        resolve(&mut self.paths.store);
        resolve(&mut self.paths.ontology);
        resolve(&mut self.paths.annotations);
        if let Some(path) = self.telemetry.log_path.as_mut() {
            resolve(path);
        }
        if let Some(path) = self.telemetry.event_log.as_mut() {
            resolve(path);
        }
    }
}

fn default_store() -> PathBuf {
    PathBuf::from("data/quiz-store.json")
}

fn default_ontology() -> PathBuf {
    PathBuf::from("data/ontology.json")
}

fn default_annotations() -> PathBuf {
    PathBuf::from("data/annotations.json")
}

const fn default_min_level() -> LogLevel {
    LogLevel::Info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::DEFAULT_BLANK;
    use tempfile::tempdir;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AutoQuizConfig::from_toml("", Path::new("/srv/aq")).unwrap();
        assert_eq!(config.engine.settings.blank_placeholder, DEFAULT_BLANK);
        assert_eq!(config.engine.settings.min_sentence_chars, 3);
        assert_eq!(config.engine.seed, None);
        assert_eq!(config.paths.store, PathBuf::from("/srv/aq/data/quiz-store.json"));
        assert_eq!(config.telemetry.min_level, LogLevel::Info);
    }

    #[test]
    fn loads_and_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("autoquiz.toml");
        fs::write(
            &path,
            r#"
[engine]
blank_placeholder = "____"
seed = 42

[paths]
ontology = "/opt/wordnet.json"

[telemetry]
log_path = "logs/aq.log"
min_level = "DEBUG"
"#,
        )
        .unwrap();
        let config = AutoQuizConfig::load(&path).unwrap();
        assert_eq!(config.engine.settings.blank_placeholder, "____");
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.paths.ontology, PathBuf::from("/opt/wordnet.json"));
        assert_eq!(config.telemetry.log_path, Some(dir.path().join("logs/aq.log")));
        assert_eq!(config.telemetry.min_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(AutoQuizConfig::from_toml("[engine]\nmin_sentence_chars = 0", Path::new(".")).is_err());
        assert!(AutoQuizConfig::from_toml("[engine]\nblank_placeholder = \" \"", Path::new(".")).is_err());
    }
}
