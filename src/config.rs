//! Collector configuration.
//!
//! Host configuration arrives as key/value pairs through [`Config::set`]. The
//! recognized keys are matched case-insensitively:
//!
//! - `Interface` adds one interface name to the filter. May be repeated.
//! - `IgnoreSelected` takes a boolean-like value. When true the listed
//!   interfaces are skipped, when false only the listed interfaces are
//!   collected.
//! - `ReportInactive` is accepted and ignored.
//!
//! [`Config::from_env`] builds a configuration from `SNMP6_*` environment
//! variables and feeds the filter keys through [`Config::set`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::filter::IgnoreList;

const DEFAULT_PROC_ROOT: &str = "/proc";
const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },
}

/// Which counter files are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One sample per interface from `net/dev_snmp6/<interface>`, filtered.
    #[default]
    Interface,
    /// A single unfiltered sample from `net/snmp6`.
    Global,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interface" => Ok(Mode::Interface),
            "global" => Ok(Mode::Global),
            _ => Err(ConfigError::InvalidValue {
                key: "SNMP6_MODE".to_owned(),
                value: s.to_owned(),
                reason: "expected `interface` or `global`",
            }),
        }
    }
}

/// Where dispatched value lists are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Log,
    /// JSON lines on stdout.
    Json,
}

impl FromStr for Output {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Output::Log),
            "json" => Ok(Output::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "SNMP6_OUTPUT".to_owned(),
                value: s.to_owned(),
                reason: "expected `log` or `json`",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub proc_root: PathBuf,
    pub interval: Duration,
    pub output: Output,
    filter: IgnoreList,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            interval: DEFAULT_INTERVAL,
            output: Output::default(),
            filter: IgnoreList::default(),
        }
    }
}

impl Config {
    /// Applies a single host configuration key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for keys other than `Interface`,
    /// `IgnoreSelected` and `ReportInactive`.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp6_monitor::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.set("Interface", "eth1").unwrap();
    /// config.set("IgnoreSelected", "true").unwrap();
    /// assert!(config.filter().matches("eth1"));
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key.eq_ignore_ascii_case("Interface") {
            self.filter.add(value);
        } else if key.eq_ignore_ascii_case("IgnoreSelected") {
            self.filter.set_invert(!is_true(value));
        } else if key.eq_ignore_ascii_case("ReportInactive") {
            log::debug!("Ignoring configuration key `{key}`");
        } else {
            return Err(ConfigError::UnknownKey(key.to_owned()));
        }
        Ok(())
    }

    /// Returns the interface filter built from `Interface` and `IgnoreSelected`.
    pub fn filter(&self) -> &IgnoreList {
        &self.filter
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from a variable lookup function.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(mode) = var("SNMP6_MODE") {
            config.mode = mode.parse()?;
        }
        if let Some(root) = var("SNMP6_PROC_ROOT") {
            config.proc_root = PathBuf::from(root);
        }
        if let Some(secs) = var("SNMP6_INTERVAL_SECS") {
            config.interval = parse_interval(&secs)?;
        }
        if let Some(output) = var("SNMP6_OUTPUT") {
            config.output = output.parse()?;
        }
        if let Some(interfaces) = var("SNMP6_INTERFACES") {
            for iface in interfaces.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                config.set("Interface", iface)?;
            }
        }
        if let Some(ignore_selected) = var("SNMP6_IGNORE_SELECTED") {
            config.set("IgnoreSelected", &ignore_selected)?;
        }

        log::debug!("Configuration: {config:?}");
        Ok(config)
    }

    /// Consumes the configuration, returning the interface filter.
    pub fn into_filter(self) -> IgnoreList {
        self.filter
    }
}

/// Boolean-like configuration value: `true`, `yes` and `on` in any case.
pub fn is_true(value: &str) -> bool {
    let value = value.trim();
    ["true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

fn parse_interval(secs: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &'static str| ConfigError::InvalidValue {
        key: "SNMP6_INTERVAL_SECS".to_owned(),
        value: secs.to_owned(),
        reason,
    };
    match secs.trim().parse::<u64>() {
        Ok(0) => Err(invalid("interval must be positive")),
        Ok(n) => Ok(Duration::from_secs(n)),
        Err(_) => Err(invalid("expected a number of seconds")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mode, Mode::Interface);
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
        assert_eq!(config.interval, Duration::from_secs(10));
        assert!(config.filter().is_empty());
        assert!(!config.filter().is_inverted());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut config = Config::default();
        config.set("interface", "eth0").unwrap();
        config.set("INTERFACE", "eth1").unwrap();
        config.set("reportinactive", "true").unwrap();
        assert_eq!(config.filter().patterns(), ["eth0", "eth1"]);
    }

    #[test]
    fn test_ignore_selected_sets_filter_sense() {
        let mut config = Config::default();
        config.set("Interface", "eth1").unwrap();

        config.set("IgnoreSelected", "false").unwrap();
        assert!(config.filter().is_inverted());
        assert!(config.filter().matches("eth0"));
        assert!(!config.filter().matches("eth1"));

        config.set("IgnoreSelected", "Yes").unwrap();
        assert!(!config.filter().is_inverted());
        assert!(!config.filter().matches("eth0"));
        assert!(config.filter().matches("eth1"));
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        let err = config.set("Verbose", "1").unwrap_err();
        assert_eq!(err, ConfigError::UnknownKey("Verbose".to_string()));
    }

    #[test]
    fn test_from_vars() {
        let config = Config::from_vars(vars(&[
            ("SNMP6_MODE", "Global"),
            ("SNMP6_PROC_ROOT", "/rootfs/proc"),
            ("SNMP6_INTERVAL_SECS", "30"),
            ("SNMP6_OUTPUT", "json"),
            ("SNMP6_INTERFACES", "eth0, eth1,,"),
            ("SNMP6_IGNORE_SELECTED", "off"),
        ]))
        .unwrap();
        assert_eq!(config.mode, Mode::Global);
        assert_eq!(config.proc_root, PathBuf::from("/rootfs/proc"));
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.output, Output::Json);
        assert_eq!(config.filter().patterns(), ["eth0", "eth1"]);
        assert!(config.filter().is_inverted());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_vars(vars(&[("SNMP6_MODE", "both")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_vars(vars(&[("SNMP6_INTERVAL_SECS", "0")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_vars(vars(&[("SNMP6_INTERVAL_SECS", "soon")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_is_true() {
        for value in ["true", "TRUE", "yes", "On", " on "] {
            assert!(is_true(value), "{value}");
        }
        for value in ["false", "no", "off", "1", ""] {
            assert!(!is_true(value), "{value}");
        }
    }
}
