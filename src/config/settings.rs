//! Configuration settings for the peaceable queens solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: SolverConfig,
    pub output: OutputConfig,
    pub encoding: EncodingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Executable for the external backend, looked up on `PATH`
    pub binary: PathBuf,
    /// Arguments placed before the DIMACS path
    pub args: Vec<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Solver subprocess reading a DIMACS file
    #[default]
    External,
    /// In-process CaDiCaL
    Embedded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Where the DIMACS formula is kept; a temporary file is used when unset
    pub cnf_path: Option<PathBuf>,
    pub print_stats: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Write `c` lines describing the variable layout ahead of the header
    pub comments: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::External,
            binary: PathBuf::from("glucose"),
            args: vec!["-model".to_string()],
            timeout_seconds: 300,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.timeout_seconds == 0 {
            anyhow::bail!("Solver timeout must be positive");
        }

        if self.solver.backend == SolverBackend::External
            && self.solver.binary.as_os_str().is_empty()
        {
            anyhow::bail!("External solver binary must not be empty");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(ref binary) = cli_overrides.solver_binary {
            self.solver.binary = binary.clone();
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref cnf_path) = cli_overrides.cnf_path {
            self.output.cnf_path = Some(cnf_path.clone());
        }
        if cli_overrides.print_stats {
            self.output.print_stats = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub backend: Option<SolverBackend>,
    pub solver_binary: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub format: Option<OutputFormat>,
    pub cnf_path: Option<PathBuf>,
    pub print_stats: bool,
}
