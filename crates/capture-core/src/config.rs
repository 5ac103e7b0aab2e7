//! Configuration module
//!
//! Settings for the share-intake bridge: where attachments are staged, how
//! large the consumer push channel is, and how the binaries format logs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const NOTIFY_CHANNEL_CAPACITY: usize = 16;
const STAGING_SUBDIR: &str = "quick-capture/shared";

/// Log output format for binaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Share intake configuration
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    /// Private directory that receives staged attachments
    pub staging_dir: PathBuf,
    /// Bound of the push channel handed to an attached consumer
    pub notify_capacity: usize,
    /// fsync staged files before their path is reported
    pub sync_staged_files: bool,
    pub environment: String,
    pub log_format: LogFormat,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            notify_capacity: NOTIFY_CHANNEL_CAPACITY,
            sync_staged_files: true,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Per-user cache directory, so the default path is not shared through the
/// world-writable temp directory. Falls back to the temp directory only when
/// no home is known.
fn default_staging_dir() -> PathBuf {
    let cache_dir = env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| {
            env::var_os("HOME")
                .map(PathBuf::from)
                .filter(|p| p.is_absolute())
                .map(|home| home.join(".cache"))
        })
        .unwrap_or_else(env::temp_dir);
    cache_dir.join(STAGING_SUBDIR)
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let staging_dir = env::var("SHARE_STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_staging_dir());

        let notify_capacity = env::var("SHARE_NOTIFY_CAPACITY")
            .unwrap_or_else(|_| NOTIFY_CHANNEL_CAPACITY.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("SHARE_NOTIFY_CAPACITY must be a valid number"))?;

        let sync_staged_files = env::var("SHARE_SYNC_STAGED_FILES")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .parse()
            .unwrap_or(true);

        let log_format = env::var("LOG_FORMAT")
            .ok()
            .map(|s| s.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        let config = IntakeConfig {
            staging_dir,
            notify_capacity,
            sync_staged_files,
            environment,
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.staging_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("SHARE_STAGING_DIR must not be empty"));
        }

        if !self.staging_dir.is_absolute() {
            return Err(anyhow::anyhow!(
                "SHARE_STAGING_DIR must be an absolute path, got {}",
                self.staging_dir.display()
            ));
        }

        if self.notify_capacity == 0 {
            return Err(anyhow::anyhow!(
                "SHARE_NOTIFY_CAPACITY must be at least 1"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Same configuration with a different staging directory
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IntakeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.notify_capacity, 16);
        assert!(config.staging_dir.ends_with("quick-capture/shared"));
    }

    #[test]
    fn test_default_staging_dir_is_per_user() {
        let dir = default_staging_dir();
        let xdg = env::var_os("XDG_CACHE_HOME").map(PathBuf::from);
        let home = env::var_os("HOME").map(PathBuf::from);

        match (xdg, home) {
            (Some(cache), _) if cache.is_absolute() => assert!(dir.starts_with(cache)),
            (_, Some(home)) if home.is_absolute() => {
                assert!(dir.starts_with(home.join(".cache")))
            }
            _ => assert!(dir.starts_with(env::temp_dir())),
        }
        assert!(dir.ends_with(STAGING_SUBDIR));
    }

    #[test]
    fn test_relative_staging_dir_rejected() {
        let config = IntakeConfig::default().with_staging_dir("relative/dir");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_staging_dir_rejected() {
        let config = IntakeConfig::default().with_staging_dir("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = IntakeConfig {
            notify_capacity: 0,
            ..IntakeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = IntakeConfig::default();
        assert!(!config.is_production());
        config.environment = "PROD".to_string();
        assert!(config.is_production());
    }
}
