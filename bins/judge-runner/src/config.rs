// Runner configuration for the judge process
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/runner.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Interpreter executable invoked against the script
    pub interpreter: String,
    /// Extra arguments placed before the script path
    pub args: Vec<String>,
    /// File name of the materialized script inside the working area
    pub script_name: String,
    /// Wall-clock budget for the whole job
    pub timeout_secs: u64,
    /// Remove the script and fixture files once the verdict is known
    pub cleanup: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: "python".to_string(),
            args: Vec::new(),
            script_name: "f.py".to_string(),
            timeout_secs: 15,
            cleanup: false,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file; a missing file yields the defaults
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load from `JUDGE_CONFIG` (or the default path), then apply env overrides
    pub fn load_default() -> Result<Self> {
        let path = std::env::var("JUDGE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::load(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `JUDGE_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(interpreter) = lookup("JUDGE_INTERPRETER") {
            self.interpreter = interpreter;
        }
        if let Some(script) = lookup("JUDGE_SCRIPT") {
            self.script_name = script;
        }
        if let Some(secs) = lookup("JUDGE_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .parse()
                .with_context(|| format!("JUDGE_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(cleanup) = lookup("JUDGE_CLEANUP") {
            self.cleanup = cleanup.to_lowercase() == "true";
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
