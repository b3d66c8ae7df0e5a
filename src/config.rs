use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs::File, io::BufReader, path::Path, path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("Failed to install log subscriber: {0}")]
    Subscriber(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound on a single handler invocation. `None` lets handlers run
    /// until they finish.
    #[serde(default, with = "option_duration_ms")]
    pub handler_timeout: Option<Duration>,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Threshold directive (`error`, `info`, `debug`, ...). `RUST_LOG` wins
    /// when set. A boolean is accepted as a debug switch: `true` means
    /// `info`, `false` means `error`.
    #[serde(default = "default_log_level", deserialize_with = "deserialize_level")]
    pub level: String,

    #[serde(default = "default_true")]
    pub ansi: bool,

    /// Also append log lines to a file.
    #[serde(default)]
    pub file: Option<LogFile>,
}

/// File sink setting: an explicit path, or `true` for a timestamped
/// `log_<time>.log` in the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogFile {
    Enabled(bool),
    Path(PathBuf),
}

impl LogFile {
    /// Path to open, or `None` when the sink is switched off.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            LogFile::Enabled(true) => Some(timestamped_log_name(Local::now())),
            LogFile::Enabled(false) => None,
            LogFile::Path(path) => Some(path.clone()),
        }
    }
}

fn timestamped_log_name(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(now.format("log_%Y-%m-%d_%H-%M-%S_%6f.log").to_string())
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: default_true(),
            file: None,
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let file = File::open(path.as_ref()).map_err(|source| ConfigError::Open {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> ConfigResult<T> {
    Ok(serde_json::from_str(s)?)
}

impl DispatchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        from_file(path)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Debug(bool),
        Directive(String),
    }

    Ok(match Level::deserialize(deserializer)? {
        Level::Debug(true) => "info".to_string(),
        Level::Debug(false) => "error".to_string(),
        Level::Directive(directive) => directive,
    })
}

mod option_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
