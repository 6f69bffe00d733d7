//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Users fetched per page of the administration listing
pub const USERS_PAGE_SIZE: u32 = 10;

/// Documents fetched per page of the dashboard listing
pub const DOCUMENTS_PAGE_SIZE: u32 = 9;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Quiet period before a search request goes out
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub users: u32,
    pub documents: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            users: USERS_PAGE_SIZE,
            documents: DOCUMENTS_PAGE_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub limits: PageLimits,
    /// `None` keeps the token in memory for this process only
    pub token_file: Option<PathBuf>,
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limits: PageLimits::default(),
            token_file: None,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    /// `<config dir>/dms/token.json`
    pub fn default_token_file() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("dms").join("token.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.limits.users == 0 {
            return Err(ConfigError::ZeroPageSize("users"));
        }
        if self.limits.documents == 0 {
            return Err(ConfigError::ZeroPageSize("documents"));
        }
        Ok(())
    }
}
