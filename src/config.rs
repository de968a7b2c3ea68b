//! Configuration for a corpus build.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (WLP_CORENLP_URL, WLP_ANNOTATORS, WLP_TIMEOUT_MS)
//! 2. Config file (YAML, passed explicitly on the command line)
//! 3. Defaults
//!
//! The resolved config is passed by value into the converter; there is no
//! ambient global state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default CoreNLP server address
const DEFAULT_CORENLP_URL: &str = "http://localhost:9000/";
/// Default annotator set requested from the server
const DEFAULT_ANNOTATORS: &str = "openie, depparse, tokenize";
/// Default per-sentence annotation timeout
const DEFAULT_TIMEOUT_MS: u64 = 50_000;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub corenlp: Option<CoreNlpConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreNlpConfig {
    pub url: Option<String>,
    pub annotators: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub training_file: Option<String>,
    pub relations_file: Option<String>,
    pub entity_types_file: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// CoreNLP server base URL
    pub corenlp_url: String,
    /// Comma-separated annotator list
    pub annotators: String,
    /// Per-sentence annotation timeout in milliseconds
    pub timeout_ms: u64,
    /// Training output file name (within the output directory)
    pub training_file: String,
    /// Predicate-frequency output file name
    pub relations_file: String,
    /// Entity-type index output file name
    pub entity_types_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corenlp_url: DEFAULT_CORENLP_URL.to_string(),
            annotators: DEFAULT_ANNOTATORS.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            training_file: "wlp_train.json".to_string(),
            relations_file: "wlp_relation2id.json".to_string(),
            entity_types_file: "type_info.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, layering file values and env overrides onto
    /// the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.apply_file(file);
        }

        config.apply_env();
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(corenlp) = file.corenlp {
            if let Some(url) = corenlp.url {
                self.corenlp_url = url;
            }
            if let Some(annotators) = corenlp.annotators {
                self.annotators = annotators;
            }
            if let Some(timeout) = corenlp.timeout_ms {
                self.timeout_ms = timeout;
            }
        }
        if let Some(output) = file.output {
            if let Some(name) = output.training_file {
                self.training_file = name;
            }
            if let Some(name) = output.relations_file {
                self.relations_file = name;
            }
            if let Some(name) = output.entity_types_file {
                self.entity_types_file = name;
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("WLP_CORENLP_URL") {
            self.corenlp_url = url;
        }
        if let Ok(annotators) = std::env::var("WLP_ANNOTATORS") {
            self.annotators = annotators;
        }
        if let Ok(timeout) = std::env::var("WLP_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.timeout_ms = ms;
            }
        }
    }

    /// Resolve the three output file paths under an output directory
    pub fn output_paths(&self, out_dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
        (
            out_dir.join(&self.training_file),
            out_dir.join(&self.relations_file),
            out_dir.join(&self.entity_types_file),
        )
    }
}
