use crate::series::AnalysisMode;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Analysis and output configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Series analyzed: `percentages` or `absolute`.
    pub mode: AnalysisMode,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Exported files, written as `<file_stem>_<mode>.<ext>`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv: bool,
    pub json: bool,
    pub html: bool,
    pub file_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: true,
            json: true,
            html: true,
            file_stem: "historical_variability".to_string(),
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_stem(&self.output.file_stem).context("invalid output file stem")?;

        let output = &self.output;
        if !(output.csv || output.json || output.html) {
            bail!("at least one output format must be enabled");
        }

        Ok(())
    }
}

fn check_stem(stem: &str) -> Result<()> {
    if stem.is_empty() {
        bail!("stem must not be empty");
    }
    if let Some(ch) = stem
        .chars()
        .find(|&ch| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
    {
        bail!("stem must contain only ASCII letters, digits, '_' or '-', but contains {ch:?}");
    }
    Ok(())
}
