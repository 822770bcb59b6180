//! Runtime configuration structures and loaders.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration shared by the orchestrator and its workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Where snapshots land; platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    /// How often the autosave worker checks for new commits.
    pub autosave_interval: Duration,
    /// Fixed session seed; randomized per session when unset.
    pub session_seed: Option<u64>,
    /// Broadcast capacity per event topic.
    pub event_capacity: usize,
    /// Depth of the worker command channel.
    pub command_buffer_size: usize,
    /// Directory for file logs; stderr-only when unset.
    pub log_dir: Option<PathBuf>,
    /// Tracing filter directives, e.g. `runtime=debug,combat_core=info`.
    pub log_filter: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            autosave_interval: Duration::from_secs(30),
            session_seed: None,
            event_capacity: 100,
            command_buffer_size: 32,
            log_dir: None,
            log_filter: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Loads a `.env` file first when one exists.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - snapshot directory (default: platform data dir)
    /// - `COMBAT_AUTOSAVE_SECS` - autosave interval in seconds (default: 30)
    /// - `COMBAT_SESSION_SEED` - fixed session seed (default: random)
    /// - `COMBAT_EVENT_CAPACITY` - per-topic event capacity (default: 100)
    /// - `COMBAT_LOG_DIR` - file log directory (default: none)
    /// - `COMBAT_LOG_FILTER` - tracing filter directives (default: RUST_LOG)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(dir) = env::var_os("COMBAT_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = read_env::<u64>("COMBAT_AUTOSAVE_SECS") {
            config.autosave_interval = Duration::from_secs(secs.max(1));
        }
        config.session_seed = read_env::<u64>("COMBAT_SESSION_SEED");
        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }
        if let Some(dir) = env::var_os("COMBAT_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config.log_filter = env::var("COMBAT_LOG_FILTER").ok();

        config
    }

    /// Snapshot directory with the platform default applied.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "combat-engine")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".combat-engine"))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = RuntimeConfig::default();
        assert_eq!(config.autosave_interval, Duration::from_secs(30));
        assert_eq!(config.event_capacity, 100);
        assert_eq!(config.command_buffer_size, 32);
        assert!(config.session_seed.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn data_dir_resolves_even_without_an_override() {
        let config = RuntimeConfig::default();
        assert!(!config.data_dir().as_os_str().is_empty());

        let config = RuntimeConfig {
            data_dir: Some(PathBuf::from("/tmp/combat")),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/combat"));
    }
}
