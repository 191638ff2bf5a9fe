//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;

pub const LOG_LEVEL_VAR: &str = "LIBDESKNAV_LOG_LEVEL";
pub const LOG_FILE_VAR: &str = "LIBDESKNAV_LOG_FILE";
pub const DPI_AWARE_VAR: &str = "LIBDESKNAV_DPI_AWARE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `env_logger` filter string, e.g. `debug` or `libdesknav=trace`.
    pub log_filter: Option<String>,
    /// Log to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Opt the process into per-monitor (v2) DPI awareness on init.
    pub dpi_aware: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { log_filter: None, log_file: None, dpi_aware: true }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(filter) = lookup(LOG_LEVEL_VAR).filter(|s| !s.trim().is_empty()) {
            config.log_filter = Some(filter.trim().to_string());
        }

        if let Some(path) = lookup(LOG_FILE_VAR).filter(|s| !s.trim().is_empty()) {
            config.log_file = Some(PathBuf::from(path.trim()));
        }

        if let Some(flag) = lookup(DPI_AWARE_VAR) {
            config.dpi_aware = !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config, Config::default());
        assert!(config.dpi_aware);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            (LOG_LEVEL_VAR, " libdesknav=trace "),
            (LOG_FILE_VAR, "C:\\temp\\desknav.log"),
            (DPI_AWARE_VAR, "Off"),
        ]));
        assert_eq!(config.log_filter.as_deref(), Some("libdesknav=trace"));
        assert_eq!(config.log_file, Some(PathBuf::from("C:\\temp\\desknav.log")));
        assert!(!config.dpi_aware);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "  "), (LOG_FILE_VAR, ""), (DPI_AWARE_VAR, "1")]));
        assert_eq!(config.log_filter, None);
        assert_eq!(config.log_file, None);
        assert!(config.dpi_aware);
    }
}
