use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    domain::common::MAX_AMOUNT,
    errors::{LedgerError, LedgerResult},
    utils::{app_data_dir, config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

/// Default terms applied to newly opened checking accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub overdraft_limit: Decimal,
    #[serde(default = "Config::default_monthly_fee")]
    pub monthly_fee: Decimal,
    #[serde(default = "Config::default_minimum_balance")]
    pub minimum_balance: Decimal,
}

impl Config {
    pub fn default_monthly_fee() -> Decimal {
        Decimal::TEN
    }

    pub fn default_minimum_balance() -> Decimal {
        Decimal::from(500)
    }

    /// Rejects terms a checking account would refuse at construction time.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.overdraft_limit < Decimal::ZERO {
            return Err(LedgerError::validation("Overdraft limit cannot be negative"));
        }
        if self.monthly_fee < Decimal::ZERO {
            return Err(LedgerError::validation("Monthly fee cannot be negative"));
        }
        let terms = [
            ("Overdraft limit", self.overdraft_limit),
            ("Monthly fee", self.monthly_fee),
            ("Minimum balance", self.minimum_balance.abs()),
        ];
        for (label, value) in terms {
            if value > MAX_AMOUNT {
                return Err(LedgerError::validation(format!(
                    "{} exceeds the maximum of {}",
                    label, MAX_AMOUNT
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overdraft_limit: Decimal::ZERO,
            monthly_fee: Self::default_monthly_fee(),
            minimum_balance: Self::default_minimum_balance(),
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> LedgerResult<Self> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> LedgerResult<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> LedgerResult<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the stored configuration, falling back to defaults when none exists.
    pub fn load(&self) -> LedgerResult<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> LedgerResult<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> LedgerResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
