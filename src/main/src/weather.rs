use anyhow::{anyhow, Context, Result};
use log::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use time::{macros::format_description, Date};

use control::Reading;

use crate::config::{Config, Site};

static CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m";
static DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,relative_humidity_2m_mean,precipitation_probability_max";

// Open-Meteo forecast payload. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    current: Option<CurrentConditions>,
    daily: Option<DailySeries>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f32>,
    relative_humidity_2m: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct DailySeries {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<Option<u8>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f32>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f32>>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<Option<f32>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f32>>,
}

// WMO weather interpretation code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WeatherCode(pub u8);

impl WeatherCode {
    pub fn description(&self) -> &'static str {
        match self.0 {
            0 => "Clear sky",
            1..=3 => "Partly cloudy",
            45 | 48 => "Fog",
            51..=57 => "Drizzle",
            61..=67 => "Rain",
            71..=77 => "Snow",
            80..=82 => "Rain showers",
            85 | 86 => "Snow showers",
            95..=99 => "Thunderstorm",
            _ => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.0 {
            0 => "☀️",
            1..=3 => "⛅",
            45 | 48 => "🌫️",
            51..=57 | 80..=82 => "🌦️",
            61..=67 => "🌧️",
            71..=77 | 85 | 86 => "❄️",
            95..=99 => "⛈️",
            _ => "❓",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: Date,
    pub max_temperature: f32,
    pub min_temperature: f32,
    pub mean_relative_humidity: f32,
    pub precipitation_probability: Option<f32>,
    pub weather_code: Option<WeatherCode>,
}

impl DailyForecast {
    // The daily high paired with the mean humidity is the reading the
    // next-day advisory is based on
    pub fn reading(&self) -> Reading {
        Reading::new(self.max_temperature, self.mean_relative_humidity)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: Option<Reading>,
    pub forecast: Vec<DailyForecast>,
}

impl WeatherReport {
    pub fn tomorrow(&self) -> Option<&DailyForecast> {
        let today = self.forecast.first()?;
        let tomorrow = today.date.next_day()?;
        self.forecast.iter().find(|day| day.date == tomorrow)
    }
}

impl From<ForecastResponse> for WeatherReport {
    fn from(response: ForecastResponse) -> Self {
        let current = response.current.and_then(|current| {
            match (current.temperature_2m, current.relative_humidity_2m) {
                (Some(temperature), Some(humidity)) => Some(Reading::new(temperature, humidity)),
                _ => {
                    warn!("Current conditions are incomplete: {:?}", current);
                    None
                }
            }
        });

        let forecast = response
            .daily
            .map(|daily| daily_forecasts(&daily))
            .unwrap_or_default();

        WeatherReport { current, forecast }
    }
}

fn daily_forecasts(daily: &DailySeries) -> Vec<DailyForecast> {
    let date_format = format_description!("[year]-[month]-[day]");
    fn field(values: &[Option<f32>], index: usize) -> Option<f32> {
        values.get(index).copied().flatten()
    }

    daily
        .time
        .iter()
        .enumerate()
        .filter_map(|(index, date)| {
            let date = match Date::parse(date, &date_format) {
                Ok(date) => date,
                Err(error) => {
                    warn!("Skipping forecast day with bad date {:?}: {}", date, error);
                    return None;
                }
            };

            let max_temperature = field(&daily.temperature_2m_max, index);
            let min_temperature = field(&daily.temperature_2m_min, index);
            let mean_relative_humidity = field(&daily.relative_humidity_2m_mean, index);

            match (max_temperature, min_temperature, mean_relative_humidity) {
                (Some(max_temperature), Some(min_temperature), Some(mean_relative_humidity)) => {
                    Some(DailyForecast {
                        date,
                        max_temperature,
                        min_temperature,
                        mean_relative_humidity,
                        precipitation_probability: field(
                            &daily.precipitation_probability_max,
                            index,
                        ),
                        weather_code: daily
                            .weather_code
                            .get(index)
                            .copied()
                            .flatten()
                            .map(WeatherCode),
                    })
                }
                _ => {
                    warn!("Skipping incomplete forecast for {}", date);
                    None
                }
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WeatherSource {
    Live,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResolvedReading {
    pub reading: Reading,
    pub source: WeatherSource,
}

pub fn resolve_current(report: Option<&WeatherReport>, fallback: Reading) -> ResolvedReading {
    match report.and_then(|report| report.current) {
        Some(reading) => ResolvedReading {
            reading,
            source: WeatherSource::Live,
        },
        None => {
            warn!("No current weather available, using fallback reading {:?}", fallback);
            ResolvedReading {
                reading: fallback,
                source: WeatherSource::Fallback,
            }
        }
    }
}

pub struct WeatherClient {
    client: reqwest::blocking::Client,
    url: &'static str,
    site: Site,
    attempts: u32,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Result<WeatherClient> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("condensation-monitor/", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(WeatherClient {
            client,
            url: config.weather_api,
            site: config.site,
            attempts: config.fetch_attempts,
        })
    }

    pub fn fetch(&self) -> Result<WeatherReport> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.fetch_once() {
                Ok(report) => return Ok(report),
                Err(error) => {
                    warn!(
                        "Weather fetch attempt {}/{} failed: {:#}",
                        attempt, self.attempts, error
                    );
                    last_error = Some(error);
                    if attempt < self.attempts {
                        thread::sleep(backoff(attempt));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("No weather fetch attempted")))
    }

    fn fetch_once(&self) -> Result<WeatherReport> {
        info!("Updating weather data");
        let response: ForecastResponse = self
            .client
            .get(self.url)
            .query(&[
                ("latitude", self.site.latitude.to_string()),
                ("longitude", self.site.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", self.site.timezone.to_string()),
            ])
            .send()
            .with_context(|| format!("Failed to reach {}", self.url))?
            .error_for_status()?
            .json()
            .context("Failed to decode weather response")?;

        Ok(WeatherReport::from(response))
    }
}

fn backoff(attempt: u32) -> Duration {
    let base = 500_u64 << attempt.saturating_sub(1).min(6);
    let jitter = rand::thread_rng().gen_range(0..250);
    Duration::from_millis(base + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn report_from(json: &str) -> WeatherReport {
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        WeatherReport::from(response)
    }

    #[test]
    fn test_report_from_full_payload() {
        let report = report_from(
            r#"{
                "current": {"time": "2024-07-01T12:00", "temperature_2m": 27.4, "relative_humidity_2m": 81},
                "daily": {
                    "time": ["2024-07-01", "2024-07-02"],
                    "weather_code": [61, 2],
                    "temperature_2m_max": [29.1, 30.5],
                    "temperature_2m_min": [22.0, 23.4],
                    "relative_humidity_2m_mean": [84, 72],
                    "precipitation_probability_max": [90, 20]
                }
            }"#,
        );

        assert_eq!(report.current, Some(Reading::new(27.4, 81.0)));
        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[0].weather_code, Some(WeatherCode(61)));

        let tomorrow = report.tomorrow().unwrap();
        assert_eq!(tomorrow.date, date!(2024 - 07 - 02));
        assert_eq!(tomorrow.reading(), Reading::new(30.5, 72.0));
        assert_eq!(tomorrow.precipitation_probability, Some(20.0));
    }

    #[test]
    fn test_report_skips_incomplete_entries() {
        let report = report_from(
            r#"{
                "current": {"temperature_2m": 27.4},
                "daily": {
                    "time": ["2024-07-01", "2024-07-02", "not-a-date"],
                    "temperature_2m_max": [29.1, null, 31.0],
                    "temperature_2m_min": [22.0, 23.4, 24.0],
                    "relative_humidity_2m_mean": [84, 72, 70]
                }
            }"#,
        );

        assert_eq!(report.current, None);
        assert_eq!(report.forecast.len(), 1);
        assert_eq!(report.forecast[0].weather_code, None);
        assert_eq!(report.tomorrow(), None);
    }

    #[test]
    fn test_report_from_empty_payload() {
        let report = report_from("{}");
        assert_eq!(report, WeatherReport::default());
    }

    #[test]
    fn test_resolve_current_live() {
        let report = WeatherReport {
            current: Some(Reading::new(12.0, 40.0)),
            forecast: vec![],
        };
        let resolved = resolve_current(Some(&report), Reading::new(25.0, 70.0));
        assert_eq!(resolved.source, WeatherSource::Live);
        assert_eq!(resolved.reading, Reading::new(12.0, 40.0));
    }

    #[test]
    fn test_resolve_current_fallback() {
        let fallback = Reading::new(25.0, 70.0);

        let resolved = resolve_current(None, fallback);
        assert_eq!(resolved.source, WeatherSource::Fallback);
        assert_eq!(resolved.reading, fallback);

        let resolved = resolve_current(Some(&WeatherReport::default()), fallback);
        assert_eq!(resolved.source, WeatherSource::Fallback);
    }

    #[test]
    fn test_weather_code_descriptions() {
        assert_eq!(WeatherCode(0).description(), "Clear sky");
        assert_eq!(WeatherCode(63).description(), "Rain");
        assert_eq!(WeatherCode(96).icon(), "⛈️");
        assert_eq!(WeatherCode(200).description(), "Unknown");
    }

    #[test]
    fn test_backoff_grows() {
        assert!(backoff(1) < Duration::from_millis(750));
        assert!(backoff(3) >= Duration::from_millis(2000));
    }
}
