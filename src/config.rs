use crate::error::{Error, Result};
use crate::services::lifecycle::ExamPolicy;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub exam_duration_minutes: i64,
    pub max_warnings_allowed: u32,
    pub question_slate_size: i64,
    /// Background expiry sweep interval; `None` keeps expiry purely lazy.
    pub expiry_sweep_secs: Option<u64>,
    pub cors_origin: Option<String>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for LOG_FORMAT: {}",
                    other
                )))
            }
        };

        let exam_duration_minutes = get_env_parse_or("EXAM_DURATION_MINUTES", 7)?;
        if exam_duration_minutes <= 0 {
            return Err(Error::Config(
                "EXAM_DURATION_MINUTES must be positive".to_string(),
            ));
        }

        Ok(Self {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            database_url: get_env("DATABASE_URL")?,
            exam_duration_minutes,
            max_warnings_allowed: get_env_parse_or("MAX_WARNINGS_ALLOWED", 1)?,
            question_slate_size: get_env_parse_or("QUESTION_SLATE_SIZE", 7)?,
            expiry_sweep_secs: match get_env_parse_or::<u64>("EXPIRY_SWEEP_SECS", 0)? {
                0 => None,
                secs => Some(secs),
            },
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            log_format,
        })
    }

    pub fn exam_policy(&self) -> ExamPolicy {
        ExamPolicy {
            exam_duration: chrono::Duration::minutes(self.exam_duration_minutes),
            max_warnings_allowed: self.max_warnings_allowed,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
