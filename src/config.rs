//! Configuration loading and management
//!
//! Handles parsing of `circulate.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::member::{BorrowingLimits, FINE_LIMIT, LOAN_LIMIT};

/// Name of the configuration file
pub const CONFIG_FILENAME: &str = "circulate.toml";

/// Environment variable that overrides the configuration path
pub const CONFIG_ENV: &str = "CIRCULATE_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Borrowing limits applied to every member
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Loan period and fine policy
    #[serde(default)]
    pub loans: LoansConfig,
}

/// Borrowing limit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Loans a member may hold at once
    #[serde(default = "default_loan_limit")]
    pub loan_limit: usize,

    /// Fine balance above which borrowing stops
    #[serde(default = "default_fine_limit")]
    pub fine_limit: f64,
}

fn default_loan_limit() -> usize {
    LOAN_LIMIT
}

fn default_fine_limit() -> f64 {
    FINE_LIMIT
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            loan_limit: default_loan_limit(),
            fine_limit: default_fine_limit(),
        }
    }
}

impl LimitsConfig {
    pub fn borrowing_limits(&self) -> BorrowingLimits {
        BorrowingLimits {
            loan_limit: self.loan_limit,
            fine_limit: self.fine_limit,
        }
    }
}

/// Loan policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoansConfig {
    /// Days between borrow date and due date
    #[serde(default = "default_period_days")]
    pub period_days: u32,

    /// Fine charged per day a book is returned late
    #[serde(default = "default_fine_per_day")]
    pub fine_per_day: f64,

    /// Flat fee charged when a borrowed book is reported lost
    #[serde(default)]
    pub lost_book_fee: f64,
}

fn default_period_days() -> u32 {
    14
}

fn default_fine_per_day() -> f64 {
    1.0
}

impl Default for LoansConfig {
    fn default() -> Self {
        Self {
            period_days: default_period_days(),
            fine_per_day: default_fine_per_day(),
            lost_book_fee: 0.0,
        }
    }
}

impl Config {
    /// Load configuration from a `circulate.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> crate::error::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `circulate.toml` from a directory, or return defaults if absent
    pub fn load_from_dir(dir: &Path) -> crate::error::Result<Self> {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Where configuration is looked up
    ///
    /// Resolution order:
    /// 1) `CIRCULATE_CONFIG` environment variable
    /// 2) `circulate.toml` in the platform config directory
    pub fn resolve_path() -> Option<PathBuf> {
        if let Ok(raw) = std::env::var(CONFIG_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        directories::ProjectDirs::from("", "", "circulate")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load from the resolved path, or return defaults if nothing is there
    pub fn load_resolved() -> crate::error::Result<Self> {
        match Self::resolve_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.limits.validate()?;
        self.loans.validate()?;
        Ok(())
    }
}

impl LimitsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.loan_limit == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "limits.loan_limit must be > 0".to_string(),
            ));
        }
        validate_amount(self.fine_limit, "limits.fine_limit")
    }
}

impl LoansConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.period_days == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "loans.period_days must be > 0".to_string(),
            ));
        }
        validate_amount(self.fine_per_day, "loans.fine_per_day")?;
        validate_amount(self.lost_book_fee, "loans.lost_book_fee")
    }
}

fn validate_amount(amount: f64, field: &str) -> crate::error::Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field} must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}
