//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// Base URL the client binaries talk to.
    pub server_url: String,
    pub bus_no: String,
    /// Bind address of the reference server.
    pub host: String,
    pub port: u16,
    pub geofence_radius_meters: f64,
    pub token_max_age_seconds: i64,
    /// Coordinates reported by the console position source. Both must be set,
    /// otherwise the client behaves as a platform without positioning.
    pub fixed_latitude: Option<f64>,
    pub fixed_longitude: Option<f64>,
    pub device_language: String,
    pub device_screen: String,
    pub device_color_depth: u32,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Parses `key` from the environment, falling back to `default` when the
/// variable is missing or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_opt<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every field has a default, so loading never fails.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "bus-attendance".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "bus-attendance.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            server_url: env::var("SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".into()),
            bus_no: env::var("BUS_NO").unwrap_or_else(|_| "Bus-10".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parse_or("PORT", 5000),
            geofence_radius_meters: parse_or("GEOFENCE_RADIUS_METERS", 15.0),
            token_max_age_seconds: parse_or("TOKEN_MAX_AGE_SECONDS", 60),
            fixed_latitude: parse_opt("FIXED_LATITUDE"),
            fixed_longitude: parse_opt("FIXED_LONGITUDE"),
            device_language: env::var("DEVICE_LANGUAGE").unwrap_or_else(|_| "en-US".into()),
            device_screen: env::var("DEVICE_SCREEN").unwrap_or_else(|_| "1920x1080".into()),
            device_color_depth: parse_or("DEVICE_COLOR_DEPTH", 24),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_server_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.server_url = value.into());
    }

    pub fn set_bus_no(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.bus_no = value.into());
    }

    pub fn set_geofence_radius_meters(value: f64) {
        AppConfig::set_field(|cfg| cfg.geofence_radius_meters = value);
    }

    pub fn set_token_max_age_seconds(value: i64) {
        AppConfig::set_field(|cfg| cfg.token_max_age_seconds = value);
    }

    pub fn set_fixed_position(latitude: f64, longitude: f64) {
        AppConfig::set_field(|cfg| {
            cfg.fixed_latitude = Some(latitude);
            cfg.fixed_longitude = Some(longitude);
        });
    }
}

// --- Free accessors, read through the singleton ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn server_url() -> String {
    AppConfig::global().server_url.clone()
}

pub fn bus_no() -> String {
    AppConfig::global().bus_no.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn geofence_radius_meters() -> f64 {
    AppConfig::global().geofence_radius_meters
}

pub fn token_max_age_seconds() -> i64 {
    AppConfig::global().token_max_age_seconds
}

/// Returns the configured fix only when both coordinates are present.
pub fn fixed_position() -> Option<(f64, f64)> {
    let cfg = AppConfig::global();
    cfg.fixed_latitude.zip(cfg.fixed_longitude)
}

pub fn device_language() -> String {
    AppConfig::global().device_language.clone()
}

/// Screen dimensions parsed from `WIDTHxHEIGHT`; `(0, 0)` when malformed.
pub fn device_screen() -> (u32, u32) {
    let raw = AppConfig::global().device_screen.clone();
    raw.split_once('x')
        .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)))
        .unwrap_or((0, 0))
}

pub fn device_color_depth() -> u32 {
    AppConfig::global().device_color_depth
}
