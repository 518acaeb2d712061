use core::time::Duration;
use std::path::PathBuf;

use control::{CoreConfig, HumidityPolicy, Reading, MAX_PRECISION};

use crate::session::SessionState;

#[toml_cfg::toml_config]
pub struct TomlConfig {
    #[default(35.5617)]
    latitude: f32,
    #[default(129.2676)]
    longitude: f32,
    #[default("Asia/Tokyo")]
    timezone: &'static str,
    #[default("https://api.open-meteo.com/v1/forecast")]
    weather_api: &'static str,

    #[default(300)]
    poll_interval: u64,
    #[default(3)]
    fetch_attempts: u32,
    #[default(10)]
    fetch_timeout: u64,

    // Used when the weather provider cannot be reached
    #[default(25.0)]
    fallback_temperature: f32,
    #[default(70.0)]
    fallback_humidity: f32,

    #[default(2.0)]
    safety_margin: f32,
    #[default(70.0)]
    target_humidity: f32,
    #[default(1)]
    precision: u8,
    #[default(false)]
    strict_humidity: bool,

    #[default("session.json")]
    session_path: &'static str,
    #[default(18.5)]
    underground_temperature: f32,
    #[default(60.0)]
    underground_humidity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub latitude: f32,
    pub longitude: f32,
    pub timezone: &'static str,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub site: Site,
    pub weather_api: &'static str,
    // Zero evaluates once and exits
    pub poll_interval: Duration,
    pub fetch_attempts: u32,
    pub fetch_timeout: Duration,
    pub fallback_reading: Reading,
    pub session_path: PathBuf,
    pub default_session: SessionState,
    pub core: CoreConfig,
}

impl Config {
    pub fn read() -> Self {
        Config::from(TOML_CONFIG)
    }
}

impl From<TomlConfig> for Config {
    fn from(config: TomlConfig) -> Self {
        let humidity_policy = if config.strict_humidity {
            HumidityPolicy::Strict
        } else {
            HumidityPolicy::Permissive
        };

        Config {
            site: Site {
                latitude: config.latitude,
                longitude: config.longitude,
                timezone: config.timezone,
            },
            weather_api: config.weather_api,
            poll_interval: Duration::from_secs(config.poll_interval),
            fetch_attempts: config.fetch_attempts.max(1),
            fetch_timeout: Duration::from_secs(config.fetch_timeout),
            fallback_reading: Reading::new(config.fallback_temperature, config.fallback_humidity),
            session_path: PathBuf::from(config.session_path),
            default_session: SessionState {
                underground_temperature: config.underground_temperature,
                underground_humidity: Some(config.underground_humidity),
            },
            core: CoreConfig {
                safety_margin: config.safety_margin,
                target_humidity: config.target_humidity,
                precision: config.precision.min(MAX_PRECISION),
                humidity_policy,
            },
        }
    }
}
