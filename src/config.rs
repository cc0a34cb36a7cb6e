// src/config.rs

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::error::AppError;

/// Countdown used when neither the environment nor the paper sets one (120 minutes).
pub const DEFAULT_DURATION_SECONDS: u32 = 7200;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
/// Advisory only. Reaching it is reported on the alert, it never forces submission.
pub const DEFAULT_WARNING_THRESHOLD: u32 = 3;
pub const DEFAULT_LOW_TIME_THRESHOLD_SECONDS: u32 = 600;

#[derive(Debug, Clone)]
pub struct Config {
    pub exam_paper_path: PathBuf,
    /// Overrides the paper's own duration when set.
    pub duration_seconds: Option<u32>,
    pub tick_interval_ms: u64,
    pub warning_threshold: u32,
    pub low_time_threshold_seconds: u32,
    pub submission_output: Option<PathBuf>,
    pub log_dir: String,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam_paper_path: PathBuf::from("data/sample_exam.json"),
            duration_seconds: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            low_time_threshold_seconds: DEFAULT_LOW_TIME_THRESHOLD_SECONDS,
            submission_output: None,
            log_dir: "logs".to_string(),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// Unset keys fall back to defaults; set but malformed keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let exam_paper_path = lookup("EXAM_PAPER_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.exam_paper_path);

        let duration_seconds = parse_var::<u32, _>(&lookup, "EXAM_DURATION_SECONDS")?;
        if duration_seconds == Some(0) {
            return Err(AppError::Config(
                "EXAM_DURATION_SECONDS must be greater than zero".to_string(),
            ));
        }

        let tick_interval_ms =
            parse_var(&lookup, "TICK_INTERVAL_MS")?.unwrap_or(defaults.tick_interval_ms);
        if tick_interval_ms == 0 {
            return Err(AppError::Config(
                "TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        let warning_threshold =
            parse_var(&lookup, "WARNING_THRESHOLD")?.unwrap_or(defaults.warning_threshold);

        let low_time_threshold_seconds = parse_var(&lookup, "LOW_TIME_THRESHOLD_SECONDS")?
            .unwrap_or(defaults.low_time_threshold_seconds);

        let submission_output = lookup("SUBMISSION_OUTPUT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let log_dir = lookup("LOG_DIR").unwrap_or(defaults.log_dir);

        let rust_log = lookup("RUST_LOG").unwrap_or(defaults.rust_log);

        Ok(Self {
            exam_paper_path,
            duration_seconds,
            tick_interval_ms,
            warning_threshold,
            low_time_threshold_seconds,
            submission_output,
            log_dir,
            rust_log,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw))),
    }
}
