// src/config/config.rs
use crate::{identity, types::MinerMode, utils::error::MonitorError};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Poll interval used when `timer` is absent or unreadable
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Identity side-file used when `idfile` is not set
pub const DEFAULT_ID_FILE: &str = "id.config";

/// Monitor configuration
///
/// Loaded once at startup. The node id is the only field that may change
/// afterwards, and only once, when it is first generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Which miner protocol to query (`mode`)
    pub mode: MinerMode,

    /// Miner address: a URL in HTTP mode, `host:port` otherwise (`miner`)
    pub miner: String,

    /// Remote management password, Claymore TCP only (`psw`)
    pub password: String,

    /// Collector endpoint (`gae`)
    pub report_url: String,

    /// Seconds to wait between polls (`timer`)
    pub poll_interval_secs: u64,

    /// Persistent identifier of this host (`id`)
    pub node_id: String,

    /// Where the node id is persisted (`idfile`)
    pub id_file: PathBuf,

    /// Per-call network timeout in seconds, `None` waits forever (`timeout`)
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: MinerMode::default(),
            miner: String::new(),
            password: String::new(),
            report_url: String::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            node_id: String::new(),
            id_file: PathBuf::from(DEFAULT_ID_FILE),
            timeout_secs: None,
        }
    }
}

/// Iterates `key=value` pairs, skipping blanks, `#` comments and lines
/// without `=`. The value is everything after the first `=`.
fn entries(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
}

impl Config {
    /// Parses configuration text
    ///
    /// # Errors
    /// Returns `ConfigError` for an unrecognized `mode`.
    pub fn parse(contents: &str) -> Result<Self, MonitorError> {
        let mut config = Config::default();
        for (key, value) in entries(contents) {
            config.apply(key, value)?;
        }
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), MonitorError> {
        match key {
            "mode" if value.is_empty() => self.mode = MinerMode::default(),
            "mode" => self.mode = value.parse().map_err(MonitorError::ConfigError)?,
            "miner" => self.miner = value.to_string(),
            "psw" => self.password = value.to_string(),
            "gae" => self.report_url = value.to_string(),
            "id" => self.node_id = value.to_string(),
            "idfile" => self.id_file = PathBuf::from(value),
            "timer" => match value.parse() {
                Ok(secs) => self.poll_interval_secs = secs,
                Err(_) => log::warn!(
                    "Invalid timer '{}', using {}s",
                    value,
                    DEFAULT_POLL_INTERVAL_SECS
                ),
            },
            "timeout" => match value.parse::<u64>() {
                Ok(0) => self.timeout_secs = None,
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => log::warn!("Invalid timeout '{}', ignoring", value),
            },
            _ => log::debug!("Ignoring unknown config key '{}'", key),
        }
        Ok(())
    }

    /// Loads configuration from a file, then overlays the persisted node id
    ///
    /// # Arguments
    /// * `path` - Path to the `key=value` configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(MonitorError)` - If a file couldn't be read or `mode` is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let path = path.as_ref();
        log::info!("open config file: {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let mut config = Config::parse(&contents)?;
        config.overlay_id_file()?;
        Ok(config)
    }

    /// Reads the node id from the side-file, if one exists.
    fn overlay_id_file(&mut self) -> Result<(), MonitorError> {
        let contents = match std::fs::read_to_string(&self.id_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No identity file at {}", self.id_file.display());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if let Some((_, id)) = entries(&contents).filter(|(k, _)| *k == "id").last() {
            self.node_id = id.to_string();
        }
        Ok(())
    }

    /// Checks that the fields the monitor cannot run without are present
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.miner.is_empty() {
            return Err(MonitorError::MissingField("miner"));
        }
        Ok(())
    }

    /// Returns the node id, generating and persisting one on first use
    ///
    /// # Errors
    /// Returns `IoError` if the identity file cannot be written.
    pub fn ensure_node_id(&mut self) -> Result<&str, MonitorError> {
        if self.node_id.is_empty() {
            self.node_id = identity::generate_node_id();
            self.persist_node_id()?;
            log::info!(
                "Generated node id {} ({})",
                self.node_id,
                self.id_file.display()
            );
        }
        Ok(&self.node_id)
    }

    /// Writes `id=<node id>` to the identity side-file, owner-only on unix.
    pub fn persist_node_id(&self) -> Result<(), MonitorError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.id_file)?;
        writeln!(file, "id={}", self.node_id)?;
        Ok(())
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Network timeout as a `Duration`, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Logs the effective settings, password masked
    pub fn log_summary(&self) {
        log::info!("mode: {}", self.mode);
        log::info!("miner: {}", self.miner);
        log::info!("psw: {}", if self.password.is_empty() { "" } else { "****" });
        log::info!("gae: {}", self.report_url);
        log::info!("timer: {}", self.poll_interval_secs);
        match self.timeout_secs {
            Some(secs) => log::info!("timeout: {}s", secs),
            None => log::info!("timeout: none"),
        }
    }
}
