use crate::app_config::{AppConfig, Frequency, ScheduleConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let forward_endpoint = require("VIGIL_FORWARD_ENDPOINT")?;
    let forward_token = lookup("VIGIL_FORWARD_TOKEN").ok();

    let db_path = PathBuf::from(or_default("VIGIL_DB_PATH", "data/vigil.db"));
    let sources_path = PathBuf::from(or_default("VIGIL_SOURCES_PATH", "config/sources.yaml"));
    let log_level = or_default("VIGIL_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("VIGIL_REQUEST_TIMEOUT_SECS", "10")?;
    let max_per_source = parse_usize("VIGIL_MAX_PER_SOURCE", "10")?;
    let inter_source_delay_ms = parse_u64("VIGIL_INTER_SOURCE_DELAY_MS", "1000")?;
    let content_max_len = parse_usize("VIGIL_CONTENT_MAX_LEN", "2000")?;
    let retention_days = parse_i64("VIGIL_RETENTION_DAYS", "30")?;
    let user_agent = or_default("VIGIL_USER_AGENT", "vigil/0.1 (compliance-monitoring)");

    let schedule_enabled = parse_bool("VIGIL_SCHEDULE_ENABLED", "false")?;
    let frequency = parse_frequency(&or_default("VIGIL_SCHEDULE_FREQUENCY", "daily"))?;
    let (hour, minute) = parse_schedule_time(&or_default("VIGIL_SCHEDULE_TIME", "06:00"))?;
    let weekday = parse_weekday(&or_default("VIGIL_SCHEDULE_WEEKDAY", "MON"))?;

    Ok(AppConfig {
        db_path,
        sources_path,
        log_level,
        request_timeout_secs,
        max_per_source,
        inter_source_delay_ms,
        content_max_len,
        retention_days,
        forward_endpoint,
        forward_token,
        user_agent,
        schedule: ScheduleConfig {
            enabled: schedule_enabled,
            frequency,
            hour,
            minute,
            weekday,
        },
    })
}

fn parse_frequency(raw: &str) -> Result<Frequency, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "daily" => Ok(Frequency::Daily),
        "weekly" => Ok(Frequency::Weekly),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VIGIL_SCHEDULE_FREQUENCY".to_string(),
            reason: format!("expected 'daily' or 'weekly', got '{other}'"),
        }),
    }
}

/// Parse a `HH:MM` fire time into `(hour, minute)`.
fn parse_schedule_time(raw: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "VIGIL_SCHEDULE_TIME".to_string(),
        reason,
    };

    let (h, m) = raw
        .split_once(':')
        .ok_or_else(|| invalid(format!("expected HH:MM, got '{raw}'")))?;

    let hour: u32 = h
        .parse()
        .map_err(|_| invalid(format!("invalid hour in '{raw}'")))?;
    let minute: u32 = m
        .parse()
        .map_err(|_| invalid(format!("invalid minute in '{raw}'")))?;

    if hour > 23 || minute > 59 {
        return Err(invalid(format!("time '{raw}' out of range")));
    }

    Ok((hour, minute))
}

fn parse_weekday(raw: &str) -> Result<String, ConfigError> {
    const DAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];
    let upper = raw.to_ascii_uppercase();
    if DAYS.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "VIGIL_SCHEDULE_WEEKDAY".to_string(),
            reason: format!("expected one of {DAYS:?}, got '{raw}'"),
        })
    }
}
