pub mod sorting;

use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Once,
};

use dirs::config_dir;

use crate::errors::LedgerResult;

const DEFAULT_DIR_NAME: &str = "finance_tracker";
const HOME_ENV: &str = "FINANCE_TRACKER_HOME";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "finance_tracker=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        if let Err(err) = fmt().with_env_filter(filter).try_init() {
            tracing::debug!("tracing subscriber not installed: {}", err);
        }
    });
}

/// Returns the application data directory: `$FINANCE_TRACKER_HOME` when set,
/// otherwise [`default_data_dir`].
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    default_data_dir()
}

/// `finance_tracker` under the platform config directory, e.g.
/// `~/.config/finance_tracker` on Linux.
pub fn default_data_dir() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Location of the configuration file inside `base`.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> LedgerResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn default_data_dir_sits_under_config_dir() {
        let dir = default_data_dir();
        assert!(dir.ends_with("finance_tracker"));
        if let Some(platform) = config_dir() {
            assert_eq!(dir, platform.join("finance_tracker"));
        }
    }

    #[test]
    fn config_file_lives_in_base() {
        let base = Path::new("/tmp/somewhere");
        assert_eq!(config_file_in(base), base.join("config.json"));
    }
}
