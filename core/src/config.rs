use std::env;
use std::str::FromStr;

use serde::Deserialize;

pub const LOCATION_VAR: &str = "STEPMARK_LOCATION";
pub const IGNORE_VAR: &str = "STEPMARK_IGNORE";
pub const FRAME_DEPTH_VAR: &str = "STEPMARK_FRAME_DEPTH";

/// How the call site of a wrapped call is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStrategy {
    /// Capture a backtrace and take the first frame outside ignored paths.
    #[default]
    Backtrace,
    /// Use the `#[track_caller]` location of the call expression.
    Caller,
    Disabled,
}

impl FromStr for LocationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backtrace" => Ok(LocationStrategy::Backtrace),
            "caller" => Ok(LocationStrategy::Caller),
            "disabled" | "off" | "none" => Ok(LocationStrategy::Disabled),
            other => Err(format!("unknown location strategy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub location: LocationStrategy,
    /// Extra path fragments whose frames are never reported as call sites.
    pub ignore: Vec<String>,
    pub own_frame_depth: usize,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source. Invalid values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOCATION_VAR) {
            match raw.parse() {
                Ok(strategy) => config.location = strategy,
                Err(err) => tracing::warn!(var = LOCATION_VAR, %err, "ignoring invalid value"),
            }
        }

        if let Some(raw) = lookup(IGNORE_VAR) {
            config.ignore = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(raw) = lookup(FRAME_DEPTH_VAR) {
            match raw.trim().parse() {
                Ok(depth) => config.own_frame_depth = depth,
                Err(err) => tracing::warn!(var = FRAME_DEPTH_VAR, %err, "ignoring invalid value"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_all_variables() {
        let config = EngineConfig::from_lookup(lookup(&[
            (LOCATION_VAR, "Caller"),
            (IGNORE_VAR, "fixtures/, helpers.rs ,"),
            (FRAME_DEPTH_VAR, "2"),
        ]));
        assert_eq!(config.location, LocationStrategy::Caller);
        assert_eq!(config.ignore, vec!["fixtures/", "helpers.rs"]);
        assert_eq!(config.own_frame_depth, 2);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            (LOCATION_VAR, "somewhere"),
            (FRAME_DEPTH_VAR, "-1"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn deserializes_from_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"location": "disabled", "ignore": ["vendor/"]}"#)
                .expect("valid config");
        assert_eq!(config.location, LocationStrategy::Disabled);
        assert_eq!(config.ignore, vec!["vendor/"]);
        assert_eq!(config.own_frame_depth, 0);
    }
}
