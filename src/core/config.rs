use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_TREND_YEARS: u32 = 2;
pub const MAX_TREND_YEARS: u32 = 25;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl FrankfurterProviderConfig {
    /// Request timeout, kept within 10 to 30 seconds.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(MIN_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

impl Default for FrankfurterProviderConfig {
    fn default() -> Self {
        FrankfurterProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig::default()),
        }
    }
}

fn default_trend_years() -> u32 {
    DEFAULT_TREND_YEARS
}

/// Checks a trend horizon is within 1 to [`MAX_TREND_YEARS`] years.
pub fn check_trend_years(years: u32) -> Result<u32> {
    if !(1..=MAX_TREND_YEARS).contains(&years) {
        bail!("Trend horizon must be between 1 and {MAX_TREND_YEARS} years, got {years}");
    }
    Ok(years)
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Currency converted from when the command line names none.
    pub from: Option<String>,
    /// Currency converted to when the command line names none.
    pub to: Option<String>,
    #[serde(default = "default_trend_years")]
    pub trend_years: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            from: None,
            to: None,
            trend_years: DEFAULT_TREND_YEARS,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        check_trend_years(config.trend_years)
            .with_context(|| format!("Invalid trend_years in {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Frankfurter settings, falling back to the public API.
    pub fn frankfurter(&self) -> FrankfurterProviderConfig {
        self.providers.frankfurter.clone().unwrap_or_default()
    }
}
