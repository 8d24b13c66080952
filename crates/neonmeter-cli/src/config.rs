//! Optional YAML configuration.
//!
//! Only `scale` matters here: user units per meter, used to turn pixel
//! measurements into millimeters. Other keys (price tables and the like) are
//! read by other tools and ignored.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::CliError;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG: &str = "neonmeter.yaml";

/// Overrides the file's `scale` when set.
pub const SCALE_ENV: &str = "NEONMETER_SCALE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub scale: f64,
}

impl Config {
    /// Load `explicit`, or the default file if present.
    ///
    /// `Ok(None)` means no scale is known and output stays in pixels. An
    /// explicit file that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Option<Config>, CliError> {
        let from_file = match explicit {
            Some(path) => Some(Self::read(path)?),
            None => {
                let path = Utf8PathBuf::from(DEFAULT_CONFIG);
                if path.exists() {
                    Some(Self::read(&path)?)
                } else {
                    None
                }
            }
        };

        let config = match std::env::var(SCALE_ENV) {
            Ok(raw) => {
                let scale = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| CliError::InvalidScaleText(raw.clone()))?;
                Some(Config { scale })
            }
            Err(_) => from_file,
        };

        if let Some(config) = &config {
            config.validate()?;
        }
        Ok(config)
    }

    fn read(path: &Utf8Path) -> Result<Config, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&text).map_err(|source| CliError::Config {
            path: path.to_string(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(CliError::InvalidScale(self.scale))
        }
    }

    /// Pixels to millimeters.
    pub fn to_mm(&self, px: f64) -> f64 {
        px * 1000.0 / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_and_unrelated_keys() {
        let config = Config::parse("scale: 2000\nsilicones:\n  - size: 8\n    price: 12.5\n").unwrap();
        assert_eq!(config.scale, 2000.0);
        assert_eq!(config.to_mm(500.0), 250.0);
    }

    #[test]
    fn scale_is_required() {
        assert!(Config::parse("leds: []").is_err());
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        for scale in [0.0, -1.0, f64::INFINITY] {
            assert!(matches!(
                Config { scale }.validate(),
                Err(CliError::InvalidScale(_))
            ));
        }
    }
}
