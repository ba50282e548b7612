use super::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_STALENESS_THRESHOLD_MIN: i64 = 60;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub staleness_threshold_min: i64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            log_level: "info".to_string(),
            staleness_threshold_min: DEFAULT_STALENESS_THRESHOLD_MIN,
        }
    }
}

impl Config {
    /// Loads the config from a TOML file. A missing file yields the defaults.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Config> {
        match fs::read_to_string(path) {
            Ok(raw) => Config::from_toml(&raw),
            Err(ref e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(raw: &str) -> Result<Config> {
        Ok(toml::from_str(raw)?)
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            staleness_threshold_min: self.staleness_threshold_min,
        }
    }
}

/// Settings the extraction core reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParserConfig {
    /// Reports older than this, relative to issuance, are rejected.
    pub staleness_threshold_min: i64,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            staleness_threshold_min: DEFAULT_STALENESS_THRESHOLD_MIN,
        }
    }
}
