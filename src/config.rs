use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};

/// Largest edit distance the Levenshtein automata are built for.
pub const MAX_SUPPORTED_EDIT_DISTANCE: u8 = 2;

/// Tunables for the fuzzy and prefix strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Fuzzy strategy tolerance as a fraction of query token length.
    pub fuzzy_tolerance: f32,
    /// Typo tolerance applied to the prefix strategy.
    pub prefix_tolerance: f32,
    pub max_edit_distance: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_tolerance: 0.3,
            prefix_tolerance: 0.2,
            max_edit_distance: MAX_SUPPORTED_EDIT_DISTANCE,
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if given, else the default location if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fuzzy_tolerance", self.fuzzy_tolerance),
            ("prefix_tolerance", self.prefix_tolerance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HistoryError::Config(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        if self.max_edit_distance > MAX_SUPPORTED_EDIT_DISTANCE {
            return Err(HistoryError::Config(format!(
                "max_edit_distance must be at most {MAX_SUPPORTED_EDIT_DISTANCE}, got {}",
                self.max_edit_distance
            )));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("history-search").join("config.toml"))
}
