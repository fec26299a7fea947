//! Runtime configuration resolved from command-line flags and environment.

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::storage::DEFAULT_KEY;

/// Name of the directory created under `$HOME` when no store is given.
pub const DEFAULT_DIR_NAME: &str = ".taskflow";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_dir: PathBuf,
    pub key: String,
    pub verbosity: u8,
}

impl Config {
    /// Resolve configuration, falling back to `$HOME/.taskflow` and the `todos` key.
    pub fn resolve(store: Option<PathBuf>, key: Option<String>, verbosity: u8) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::resolve_with_home(store, key, verbosity, home.as_deref())
    }

    fn resolve_with_home(
        store: Option<PathBuf>,
        key: Option<String>,
        verbosity: u8,
        home: Option<&Path>,
    ) -> Self {
        let store_dir = store.unwrap_or_else(|| {
            home.unwrap_or_else(|| Path::new("."))
                .join(DEFAULT_DIR_NAME)
        });
        let key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_KEY.to_string());
        Config { store_dir, key, verbosity }
    }

    /// Log filter directive for this verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
