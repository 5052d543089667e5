//! Game configuration loaded from `ARENA_*` environment variables.
//!
//! Every value has a default except the oracle URL, which only the binary
//! requires. `from_lookup` takes the variable source as a closure so tests
//! never touch the process environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::rules::{RoundRules, DEFAULT_ROUND_SECONDS, DEFAULT_SUCCESS_THRESHOLD, MAX_SCORE};
use crate::error::AppError;
use crate::objectives::labels::{default_pool, load_labels, parse_list};
use crate::objectives::registry;
use crate::objectives::ObjectiveSelector;

pub const DEFAULT_HEARTBEAT_SECONDS: u32 = 10;
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_MAX_GROUP_SIZE: usize = 16;
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;
pub const DEFAULT_OBJECTIVE_POLICY: &str = "random";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub round_seconds: u32,
    /// Reset value of the shared `timeLeft` heartbeat.
    pub heartbeat_seconds: u32,
    pub tick_interval: Duration,
    pub success_threshold: f64,
    pub require_label_match: bool,
    pub max_group_size: usize,
    pub objectives: Vec<String>,
    pub objective_policy: String,
    pub objective_seed: Option<u64>,
    pub oracle_url: Option<String>,
    pub oracle_timeout: Duration,
    pub max_frame_bytes: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            heartbeat_seconds: DEFAULT_HEARTBEAT_SECONDS,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            require_label_match: false,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            objectives: default_pool(),
            objective_policy: DEFAULT_OBJECTIVE_POLICY.to_string(),
            objective_seed: None,
            oracle_url: None,
            oracle_timeout: Duration::from_millis(DEFAULT_ORACLE_TIMEOUT_MS),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let objectives = if let Some(list) = var("ARENA_OBJECTIVES") {
            parse_list(&list)
        } else if let Some(path) = var("ARENA_LABELS_PATH") {
            let path = PathBuf::from(path);
            load_labels(&path).map_err(|e| {
                AppError::config(format!("cannot read labels file {}: {e}", path.display()))
            })?
        } else {
            defaults.objectives
        };

        let config = Self {
            round_seconds: parse_or(&var, "ARENA_ROUND_SECONDS", defaults.round_seconds)?,
            heartbeat_seconds: parse_or(&var, "ARENA_HEARTBEAT_SECONDS", defaults.heartbeat_seconds)?,
            tick_interval: Duration::from_millis(parse_or(&var, "ARENA_TICK_MS", DEFAULT_TICK_MS)?),
            success_threshold: parse_or(&var, "ARENA_SUCCESS_THRESHOLD", defaults.success_threshold)?,
            require_label_match: parse_bool_or(&var, "ARENA_REQUIRE_LABEL_MATCH", false)?,
            max_group_size: parse_or(&var, "ARENA_MAX_GROUP_SIZE", defaults.max_group_size)?,
            objectives,
            objective_policy: var("ARENA_OBJECTIVE_POLICY").unwrap_or(defaults.objective_policy),
            objective_seed: var("ARENA_OBJECTIVE_SEED")
                .map(|raw| parse_value("ARENA_OBJECTIVE_SEED", &raw))
                .transpose()?,
            oracle_url: var("ARENA_ORACLE_URL"),
            oracle_timeout: Duration::from_millis(parse_or(
                &var,
                "ARENA_ORACLE_TIMEOUT_MS",
                DEFAULT_ORACLE_TIMEOUT_MS,
            )?),
            max_frame_bytes: parse_or(&var, "ARENA_MAX_FRAME_BYTES", defaults.max_frame_bytes)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.round_seconds == 0 {
            return Err(AppError::config("ARENA_ROUND_SECONDS must be at least 1"));
        }
        if self.heartbeat_seconds == 0 {
            return Err(AppError::config("ARENA_HEARTBEAT_SECONDS must be at least 1"));
        }
        if self.tick_interval < Duration::from_millis(10) {
            return Err(AppError::config("ARENA_TICK_MS must be at least 10"));
        }
        if !(self.success_threshold > 0.0 && self.success_threshold <= MAX_SCORE) {
            return Err(AppError::config(
                "ARENA_SUCCESS_THRESHOLD must be in (0, 100]",
            ));
        }
        if self.max_group_size == 0 {
            return Err(AppError::config("ARENA_MAX_GROUP_SIZE must be at least 1"));
        }
        if self.objectives.is_empty() {
            return Err(AppError::config("objective pool is empty"));
        }
        if registry::by_name(&self.objective_policy).is_none() {
            return Err(AppError::config(format!(
                "unknown ARENA_OBJECTIVE_POLICY '{}'",
                self.objective_policy
            )));
        }
        if self.oracle_timeout.is_zero() {
            return Err(AppError::config("ARENA_ORACLE_TIMEOUT_MS must be positive"));
        }
        if self.max_frame_bytes == 0 {
            return Err(AppError::config("ARENA_MAX_FRAME_BYTES must be positive"));
        }
        Ok(())
    }

    pub fn rules(&self) -> RoundRules {
        RoundRules {
            round_seconds: self.round_seconds,
            success_threshold: self.success_threshold,
            require_label_match: self.require_label_match,
        }
    }

    /// Instantiate the configured objective policy over the pool.
    pub fn objective_selector(&self) -> Result<Box<dyn ObjectiveSelector>, AppError> {
        let factory = registry::by_name(&self.objective_policy).ok_or_else(|| {
            AppError::config(format!(
                "unknown ARENA_OBJECTIVE_POLICY '{}'",
                self.objective_policy
            ))
        })?;
        Ok((factory.make)(self.objectives.clone(), self.objective_seed))
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| AppError::config(format!("{name}='{raw}' is invalid: {e}")))
}

fn parse_or<T, V>(var: &V, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_bool_or<V>(var: &V, name: &str, default: bool) -> Result<bool, AppError>
where
    V: Fn(&str) -> Option<String>,
{
    match var(name).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(AppError::config(format!("{name}='{v}' is not a boolean"))),
    }
}
