//! Evaluation settings.
//!
//! The timezone used to read agent-stated date-times comes from, in order of
//! precedence: the `--timezone` flag, `LMSEVAL_TIMEZONE` in the environment
//! (a `.env` file is loaded at startup), then [`DEFAULT_TIMEZONE`].

use std::env;

use chrono_tz::Tz;

use crate::error::{EvalError, Result};

/// Timezone of the benchmark's Canvas instance.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Edmonton;

/// Environment variable naming the evaluation timezone.
pub const TIMEZONE_VAR: &str = "LMSEVAL_TIMEZONE";

/// Settings shared by every evaluation in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Zone agent-stated date-times are interpreted in.
    pub timezone: Tz,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { timezone: DEFAULT_TIMEZONE }
    }
}

impl EvalConfig {
    /// Builds the configuration from the environment and an optional override.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidTimezone`] if either source names an unknown zone.
    pub fn resolve(timezone_flag: Option<&str>) -> Result<Self> {
        let from_env = env::var(TIMEZONE_VAR).ok();
        Self::from_sources(timezone_flag, from_env.as_deref())
    }

    /// Builds the configuration from explicit sources; the flag wins over the variable.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidTimezone`] if the chosen source names an unknown zone.
    pub fn from_sources(flag: Option<&str>, env_value: Option<&str>) -> Result<Self> {
        match flag.or(env_value).map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => Ok(Self { timezone: parse_timezone(name)? }),
            None => Ok(Self::default()),
        }
    }
}

/// Parses an IANA timezone identifier.
///
/// # Errors
///
/// Returns [`EvalError::InvalidTimezone`] for an unknown identifier.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| EvalError::InvalidTimezone { name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_edmonton() {
        let config = EvalConfig::from_sources(None, None).unwrap();
        assert_eq!(config.timezone, chrono_tz::America::Edmonton);
    }

    #[test]
    fn environment_overrides_default() {
        let config = EvalConfig::from_sources(None, Some("Europe/Paris")).unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
    }

    #[test]
    fn flag_overrides_environment() {
        let config = EvalConfig::from_sources(Some("UTC"), Some("Europe/Paris")).unwrap();
        assert_eq!(config.timezone, chrono_tz::UTC);
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let config = EvalConfig::from_sources(None, Some("  ")).unwrap();
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let err = parse_timezone("Mars/Olympus").unwrap_err();
        assert!(matches!(err, EvalError::InvalidTimezone { ref name } if name == "Mars/Olympus"));
    }
}
