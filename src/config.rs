use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::AtomId;

/// Settings for one analysis run.
///
/// Every field may be omitted from a configuration file, in which case the default applies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Trajectory to read.
    pub input: PathBuf,
    /// Histogram output path.
    pub output: PathBuf,
    /// Change log output path.
    pub log: PathBuf,
    /// Oxygens closer than this to the structure center are inside the shell (exclusive).
    pub shell_radius: f64,
    /// Time between two consecutive frames.
    pub frame_time: f64,
    /// Width of a single histogram bin, in the same unit as `frame_time`.
    pub bin_width: f64,
    /// Identifier of the atom whose position is the structure center.
    pub center_id: AtomId,
    /// Element symbol of the atoms that are tracked.
    pub shell_element: String,
    /// Lines containing this marker are never atom records.
    pub box_marker: String,
    /// Close residences that are still open when the trajectory ends, instead of dropping them.
    pub flush_open_on_eof: bool,
    /// Number of histogram bins. One bin per frame when unset.
    pub bins: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("liquid-e100-v100.arc"),
            output: PathBuf::from("bins.txt"),
            log: PathBuf::from("log.txt"),
            shell_radius: 3.6,
            frame_time: 2e-12,
            bin_width: 6e-12,
            center_id: 1,
            shell_element: String::from("O"),
            box_marker: String::from("30.000000   30.000000   30.000000"),
            flush_open_on_eof: false,
            bins: None,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text. Absent keys keep their default values.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("shell_radius", self.shell_radius),
            ("frame_time", self.frame_time),
            ("bin_width", self.bin_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite positive number, found {value}"
                )));
            }
        }
        if self.bins == Some(0) {
            return Err(Error::InvalidConfig(String::from("bins must be at least 1")));
        }
        if self.shell_element.is_empty() {
            return Err(Error::InvalidConfig(String::from(
                "shell_element must not be empty",
            )));
        }
        Ok(())
    }
}
