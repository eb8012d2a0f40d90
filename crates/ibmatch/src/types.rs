use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::MatchDbManager;
use crate::matching::{EvaluationPolicy, MatchError, ProgramMatchProcessor};

/// Environment variable naming the JSON settings file.
pub const CONFIG_ENV: &str = "IBMATCH_CONFIG";
/// Environment override for the bind address.
pub const BIND_ENV: &str = "IBMATCH_BIND";
/// Environment override for the database path.
pub const DB_ENV: &str = "IBMATCH_DB";

/// Service settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory of program seed files loaded at startup
    pub catalog_dir: PathBuf,
    /// Largest grade shortfall still reported as a close miss
    pub partial_grade_margin: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_path: PathBuf::from("ibmatch.db"),
            catalog_dir: PathBuf::from("programs"),
            partial_grade_margin: 1,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, MatchError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolves settings from `IBMATCH_CONFIG` (or defaults), then applies
    /// the `IBMATCH_BIND` and `IBMATCH_DB` overrides.
    pub fn load() -> Result<Self, MatchError> {
        let mut settings = match env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading settings from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        if let Ok(bind) = env::var(BIND_ENV) {
            settings.bind_address = bind;
        }
        if let Some(db) = env::var_os(DB_ENV) {
            settings.database_path = PathBuf::from(db);
        }

        Ok(settings)
    }

    pub fn evaluation_policy(&self) -> EvaluationPolicy {
        EvaluationPolicy::new(self.partial_grade_margin)
    }
}

/// Shared state handed to every request handler.
pub struct AppState {
    pub db: MatchDbManager,
    pub processor: ProgramMatchProcessor,
}

impl AppState {
    /// Builds handler state, taking the evaluation policy from `settings`.
    pub fn new(db: MatchDbManager, settings: &Settings) -> Self {
        Self {
            db,
            processor: ProgramMatchProcessor::new(settings.evaluation_policy()),
        }
    }
}
