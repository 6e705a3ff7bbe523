// src/config.rs
use std::time::Duration;

use crate::gemini_client::DEFAULT_BASE_URL;

pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_PRACTICE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_FHEEM_TRANSITION_MS: u64 = 4000;

/// Runtime settings read from the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// May be empty; a bad credential only shows up as a failed call.
    pub api_key: String,
    pub chat_model: String,
    pub practice_model: String,
    pub api_base_url: String,
    pub fheem_transition: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            practice_model: DEFAULT_PRACTICE_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            fheem_transition: Duration::from_millis(DEFAULT_FHEEM_TRANSITION_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests do not touch the real environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .unwrap_or_default();

        let fheem_transition = match non_empty("APEX_FHEEM_TRANSITION_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring APEX_FHEEM_TRANSITION_MS={:?} ({}), using {}ms",
                        raw,
                        e,
                        DEFAULT_FHEEM_TRANSITION_MS
                    );
                    defaults.fheem_transition
                }
            },
            None => defaults.fheem_transition,
        };

        Self {
            api_key,
            chat_model: non_empty("APEX_CHAT_MODEL").unwrap_or(defaults.chat_model),
            practice_model: non_empty("APEX_PRACTICE_MODEL").unwrap_or(defaults.practice_model),
            api_base_url: non_empty("APEX_API_BASE_URL").unwrap_or(defaults.api_base_url),
            fheem_transition,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_api_key_fallback() {
        let config = Config::from_lookup(lookup(&[("API_KEY", "fallback")]));
        assert_eq!(config.api_key, "fallback");

        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "fallback")]));
        assert_eq!(config.api_key, "primary");
    }

    #[test]
    fn test_overrides_and_bad_duration() {
        let config = Config::from_lookup(lookup(&[
            ("APEX_CHAT_MODEL", "gemini-2.5-pro"),
            ("APEX_FHEEM_TRANSITION_MS", "soon"),
        ]));
        assert_eq!(config.chat_model, "gemini-2.5-pro");
        assert_eq!(config.practice_model, DEFAULT_PRACTICE_MODEL);
        assert_eq!(config.fheem_transition, Duration::from_millis(4000));

        let config = Config::from_lookup(lookup(&[("APEX_FHEEM_TRANSITION_MS", "250")]));
        assert_eq!(config.fheem_transition, Duration::from_millis(250));
    }
}
