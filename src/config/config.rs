use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ui::viewport::ColumnWidthMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode box-drawing glyphs for the table frame
    pub use_glyphs: bool,

    /// How column widths are derived from the visible window
    pub column_width_mode: ColumnWidthMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Field delimiter used when none is given on the command line
    pub delimiter: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            column_width_mode: ColumnWidthMode::Uniform,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults when
    /// no file exists. The file is never created or written.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            debug!(target: "config", "No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        info!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("csv-pager").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# csv-pager configuration file
# Location: ~/.config/csv-pager/config.toml (Linux)
#           ~/Library/Application Support/csv-pager/config.toml (macOS)
#           %APPDATA%\csv-pager\config.toml (Windows)

[display]
# Draw the table frame with Unicode box-drawing glyphs
# Set to false for plain ASCII borders (+, -, |)
use_glyphs = true

# Column width strategy: "uniform" or "per_column"
# uniform:    every column is as wide as the widest visible field
# per_column: each column is as wide as its own widest visible field
# Can be toggled at runtime with 'w'
column_width_mode = "uniform"

[behavior]
# Field delimiter when --comma is not given (a single ASCII character, or "\t")
delimiter = ","
"#
        .to_string()
    }
}

/// Parse a delimiter argument into the single byte the CSV parser needs
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    if raw == "\\t" || raw.eq_ignore_ascii_case("tab") {
        return Ok(b'\t');
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        (Some(c), None) => Err(anyhow!(
            "Delimiter '{}' is not a single-byte character",
            c
        )),
        (None, _) => Err(anyhow!("Delimiter must not be empty")),
        _ => Err(anyhow!("Delimiter '{}' must be a single character", raw)),
    }
}
