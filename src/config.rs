//! @ai:module:intent Parse options for the library and TOML defaults for the CLI
//! @ai:module:layer infrastructure
//! @ai:module:public_api ParseOptions, CliConfig
//! @ai:module:depends_on format, output, error

use crate::error::{Error, Result};
use crate::format::TextGridFormat;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Options for a single parse call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub check_consistency: bool,
    pub format: TextGridFormat,
}

impl ParseOptions {
    /// @ai:intent Full syntax with consistency checking enabled
    pub fn strict() -> Self {
        Self {
            check_consistency: true,
            format: TextGridFormat::Full,
        }
    }

    pub fn with_format(mut self, format: TextGridFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_consistency_check(mut self, check: bool) -> Self {
        self.check_consistency = check;
        self
    }
}

/// @ai:intent Defaults for the `textgrid` binary, loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub format: TextGridFormat,
    #[serde(default)]
    pub check_consistency: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: TextGridFormat::Full,
            check_consistency: false,
            output: OutputFormat::Text,
        }
    }
}

impl CliConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            check_consistency: self.check_consistency,
            format: self.format,
        }
    }
}
