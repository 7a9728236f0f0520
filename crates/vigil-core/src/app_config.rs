use std::path::PathBuf;

/// How often the continuous scheduler fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

/// Continuous-mode schedule: a daily or weekly fire time.
///
/// `weekday` is only consulted for [`Frequency::Weekly`] and is validated at
/// config load to be a three-letter cron day (`MON`..`SUN`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub frequency: Frequency,
    pub hour: u32,
    pub minute: u32,
    pub weekday: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub sources_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_per_source: usize,
    pub inter_source_delay_ms: u64,
    pub content_max_len: usize,
    pub retention_days: i64,
    pub forward_endpoint: String,
    pub forward_token: Option<String>,
    pub user_agent: String,
    pub schedule: ScheduleConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_path", &self.db_path)
            .field("sources_path", &self.sources_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_per_source", &self.max_per_source)
            .field("inter_source_delay_ms", &self.inter_source_delay_ms)
            .field("content_max_len", &self.content_max_len)
            .field("retention_days", &self.retention_days)
            .field("forward_endpoint", &self.forward_endpoint)
            .field(
                "forward_token",
                &self.forward_token.as_ref().map(|_| "[redacted]"),
            )
            .field("user_agent", &self.user_agent)
            .field("schedule", &self.schedule)
            .finish()
    }
}
