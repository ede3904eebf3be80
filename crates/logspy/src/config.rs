//! Settings from the environment or a TOML document.
//!
//! Both sources validate eagerly: an unknown level, profile or flag value, or a
//! suppression pattern that does not compile, is an error rather than a
//! silent default.

use std::env;
use std::fs;
use std::path::Path;

use logspy_core::logging::{debug, targets};
use logspy_core::{Level, LevelSet, LogspyError, Result};
use serde::Deserialize;

use crate::settings::{RoutingProfile, Settings};

/// On-disk form of [`Settings`].
///
/// ```toml
/// printing = true
/// profile = "standard"
/// levels = ["error", "warn"]
/// suppress = [".*heartbeat.*"]
/// ```
///
/// Omitted keys keep their defaults. Sinks and delegates are runtime objects
/// and cannot be configured here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub printing: Option<bool>,
    pub profile: Option<String>,
    pub levels: Option<Vec<String>>,
    pub suppress: Vec<String>,
}

impl SettingsFile {
    /// Validate and convert into settings.
    pub fn into_settings(self) -> Result<Settings> {
        let profile = match self.profile {
            Some(name) => name.parse::<RoutingProfile>()?,
            None => RoutingProfile::default(),
        };
        let mut settings = Settings::for_profile(profile);

        if let Some(printing) = self.printing {
            settings = settings.printing_enabled(printing);
        }
        if let Some(levels) = self.levels {
            settings = settings.with_enabled_levels(parse_levels(levels.iter().map(String::as_str))?);
        }
        for pattern in &self.suppress {
            settings = settings.suppress_printing(pattern)?;
        }
        Ok(settings)
    }
}

fn parse_levels<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<LevelSet> {
    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse::<Level>)
        .collect()
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(LogspyError::InvalidFlag(value.to_string())),
    }
}

impl Settings {
    /// Create settings from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `LOGSPY_PRINT` | 1/true/on/yes or 0/false/off/no | Console mirroring on or off |
    /// | `LOGSPY_LEVELS` | comma separated level names | Enabled levels (replaces the default) |
    /// | `LOGSPY_PROFILE` | quiet/standard | Routing of non-error levels |
    /// | `LOGSPY_SUPPRESS` | `;` separated regexes | Console suppressions |
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Like [`Settings::from_env`], reading variables through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = SettingsFile {
            printing: lookup("LOGSPY_PRINT")
                .map(|v| parse_flag(&v))
                .transpose()?,
            profile: lookup("LOGSPY_PROFILE"),
            levels: lookup("LOGSPY_LEVELS")
                .map(|v| v.split(',').map(str::to_string).collect()),
            suppress: lookup("LOGSPY_SUPPRESS")
                .map(|v| {
                    v.split(';')
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };
        let settings = file.into_settings()?;
        debug!(target: targets::CONFIG, "settings from environment: {:?}", settings);
        Ok(settings)
    }

    /// Parse settings from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: SettingsFile =
            toml::from_str(source).map_err(|e| LogspyError::Config(e.to_string()))?;
        file.into_settings()
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| LogspyError::Config(format!("{}: {e}", path.display())))?;
        let settings = Self::from_toml_str(&source)?;
        debug!(target: targets::CONFIG, "settings loaded from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = Settings::from_env_with(env(&[])).unwrap();
        assert!(settings.is_printing());
        assert_eq!(settings.enabled_levels(), LevelSet::only(Level::Error));
        assert!(settings.sink(Level::Info).is_noop());
    }

    #[test]
    fn environment_overrides() {
        let settings = Settings::from_env_with(env(&[
            ("LOGSPY_PRINT", "0"),
            ("LOGSPY_LEVELS", "warn, info"),
            ("LOGSPY_PROFILE", "standard"),
            ("LOGSPY_SUPPRESS", ".*heartbeat.*;ping"),
        ]))
        .unwrap();

        assert!(!settings.is_printing());
        assert!(!settings.is_enabled(Level::Error));
        assert!(settings.is_enabled(Level::Warn));
        assert!(settings.is_enabled(Level::Info));
        assert_eq!(settings.sink(Level::Info).describe(), "stdout");
        assert!(settings.is_suppressed("a heartbeat tick"));
        assert!(settings.is_suppressed("ping"));
        assert!(!settings.is_suppressed("pong"));
    }

    #[test]
    fn unknown_level_in_environment_fails() {
        let err = Settings::from_env_with(env(&[("LOGSPY_LEVELS", "error,loud")])).unwrap_err();
        assert!(matches!(err, LogspyError::InvalidLevel(ref name) if name == "loud"));
    }

    #[test]
    fn unknown_profile_fails() {
        let err = Settings::from_env_with(env(&[("LOGSPY_PROFILE", "chatty")])).unwrap_err();
        assert!(matches!(err, LogspyError::InvalidProfile(_)));
    }

    #[test]
    fn print_flag_values() {
        assert!(parse_flag("1").unwrap());
        assert!(parse_flag(" On ").unwrap());
        assert!(parse_flag("yes").unwrap());
        assert!(!parse_flag("OFF").unwrap());
        assert!(!parse_flag("false").unwrap());
    }

    #[test]
    fn unrecognised_print_flag_fails() {
        let err = Settings::from_env_with(env(&[("LOGSPY_PRINT", "maybe")])).unwrap_err();
        assert!(matches!(err, LogspyError::InvalidFlag(ref value) if value == "maybe"));
        assert!(Settings::from_env_with(env(&[("LOGSPY_PRINT", "")])).is_err());
    }

    #[test]
    fn toml_document() {
        let settings = Settings::from_toml_str(
            r#"
            printing = false
            profile = "standard"
            levels = ["error", "debug"]
            suppress = ["secret.*"]
            "#,
        )
        .unwrap();

        assert!(!settings.is_printing());
        assert!(settings.is_enabled(Level::Debug));
        assert!(!settings.is_enabled(Level::Warn));
        assert!(settings.is_suppressed("secret token"));
    }

    #[test]
    fn toml_empty_levels_disables_everything() {
        let settings = Settings::from_toml_str("levels = []").unwrap();
        assert!(settings.enabled_levels().is_empty());
    }

    #[test]
    fn toml_unknown_key_is_rejected() {
        let err = Settings::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(err, LogspyError::Config(_)));
    }

    #[test]
    fn toml_bad_pattern_is_rejected() {
        let err = Settings::from_toml_str(r#"suppress = ["(unclosed"]"#).unwrap_err();
        assert!(matches!(err, LogspyError::Pattern { .. }));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = Settings::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, LogspyError::Config(ref msg) if msg.contains("here.toml")));
    }
}
