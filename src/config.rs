use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "LYCEE_DASHBOARD_CONFIG";
pub const SCORES_ENV: &str = "LYCEE_SCORES";
pub const DIRECTORY_ENV: &str = "LYCEE_DIRECTORY";
const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Results indicators (`fr-en-indicateurs-de-resultat-des-lycees-gt_v2.csv`).
    pub scores_path: PathBuf,
    /// School directory (`fr-en-annuaire-education.csv`).
    pub directory_path: PathBuf,
    pub scores_key: String,
    pub directory_key: String,
    pub region: String,
    pub establishment_type: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            scores_path: PathBuf::from("fr-en-indicateurs-de-resultat-des-lycees-gt_v2.csv"),
            directory_path: PathBuf::from("fr-en-annuaire-education.csv"),
            scores_key: "UAI".to_string(),
            directory_key: "Identifiant_de_l_etablissement".to_string(),
            region: "ILE-DE-FRANCE".to_string(),
            establishment_type: "Lycée".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Resolve the startup config from the config file and environment.
    /// Never fails: problems are logged and defaults used instead.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        };
        config.with_overrides(
            std::env::var_os(SCORES_ENV).map(PathBuf::from),
            std::env::var_os(DIRECTORY_ENV).map(PathBuf::from),
        )
    }

    /// Replace the input paths when overrides are given.
    pub fn with_overrides(mut self, scores: Option<PathBuf>, directory: Option<PathBuf>) -> Self {
        if let Some(p) = scores {
            self.scores_path = p;
        }
        if let Some(p) = directory {
            self.directory_path = p;
        }
        self
    }

    /// Both input files exist on disk.
    pub fn inputs_present(&self) -> bool {
        self.scores_path.is_file() && self.directory_path.is_file()
    }
}
