//! Runtime configuration and draft settings loaders.
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::dto::draft_dto::Side;
use crate::dto::settings_dto::DraftSettings;
use crate::services::pick_order::{ban_slots_for, pick_slots_for};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not read settings file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Could not parse settings file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("max_picks must be {expected} to match the pick order, got {actual}")]
    PickCount { expected: u32, actual: u32 },

    #[error("max_bans must be {expected} to match the pick order, got {actual}")]
    BanCount { expected: u32, actual: u32 },

    #[error("turn_seconds must be greater than zero")]
    ZeroTurnSeconds,
}

impl DraftSettings {
    /// The pick order is fixed, so pick and ban limits must agree with it.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let expected_picks = pick_slots_for(Side::SideA);
        if self.max_picks != expected_picks || pick_slots_for(Side::SideB) != expected_picks {
            return Err(SettingsError::PickCount { expected: expected_picks, actual: self.max_picks });
        }

        let expected_bans = ban_slots_for(Side::SideA);
        if self.max_bans != expected_bans || ban_slots_for(Side::SideB) != expected_bans {
            return Err(SettingsError::BanCount { expected: expected_bans, actual: self.max_bans });
        }

        if self.turn_seconds == 0 {
            return Err(SettingsError::ZeroTurnSeconds);
        }

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: DraftSettings = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub settings_path: Option<PathBuf>,
    pub turn_seconds: Option<u32>,
    pub overtime_seconds: Option<u32>,
    pub broadcast_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/pickban.db?mode=rwc".to_string(),
            db_max_connections: 5,
            bind_addr: "0.0.0.0:3000".to_string(),
            settings_path: None,
            turn_seconds: None,
            overtime_seconds: None,
            broadcast_capacity: 100,
        }
    }
}

impl AppConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `BIND_ADDR` - Listen address (default: 0.0.0.0:3000)
    /// - `DRAFT_SETTINGS_PATH` - JSON file with draft settings and cost tables
    /// - `TURN_SECONDS` / `OVERTIME_SECONDS` - Override the timer durations
    /// - `BROADCAST_CAPACITY` - WebSocket broadcast buffer (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(max) = read_env::<u32>("DB_MAX_CONNECTIONS") {
            config.db_max_connections = max.max(1);
        }
        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config.settings_path = env::var("DRAFT_SETTINGS_PATH").ok().map(PathBuf::from);
        config.turn_seconds = read_env::<u32>("TURN_SECONDS");
        config.overtime_seconds = read_env::<u32>("OVERTIME_SECONDS");
        if let Some(capacity) = read_env::<usize>("BROADCAST_CAPACITY") {
            config.broadcast_capacity = capacity.max(1);
        }

        config
    }

    /// Settings file if configured, defaults otherwise, then timer overrides.
    pub fn draft_settings(&self) -> Result<DraftSettings, SettingsError> {
        let mut settings = match &self.settings_path {
            Some(path) => {
                info!("Loading draft settings from {}", path.display());
                DraftSettings::load(path)?
            }
            None => DraftSettings::default(),
        };

        if let Some(seconds) = self.turn_seconds {
            settings.turn_seconds = seconds;
        }
        if let Some(seconds) = self.overtime_seconds {
            settings.overtime_seconds = seconds;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring {}: could not parse '{}'", key, value);
            None
        }
    }
}
