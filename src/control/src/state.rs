use serde::Serialize;

// Temperature in degrees celcius
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Serialize)]
pub struct Temperature(pub f32);

impl Temperature {
    pub fn new(value: f32) -> Self {
        Self(value)
    }
}

impl From<Temperature> for f32 {
    fn from(value: Temperature) -> f32 {
        value.0
    }
}

// Relative humidity in percent
// Values above 100 are physically meaningless but accepted unless the
// strict humidity policy is in force
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Serialize)]
pub struct RelativeHumidity(pub f32);

impl RelativeHumidity {
    pub fn new(value: f32) -> Self {
        Self(value)
    }
}

impl From<RelativeHumidity> for f32 {
    fn from(value: RelativeHumidity) -> f32 {
        value.0
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Reading {
    pub temperature: Temperature,
    pub relative_humidity: RelativeHumidity,
}

impl Reading {
    pub fn new(temperature: f32, relative_humidity: f32) -> Self {
        Self {
            temperature: Temperature::new(temperature),
            relative_humidity: RelativeHumidity::new(relative_humidity),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    On,
    Off,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct VentilationDecision {
    pub main_ventilation: PowerState,
    pub induced_fan: PowerState,
    pub dehumidifier: PowerState,
    pub risk_level: RiskLevel,
    pub rationale: &'static str,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastAdvice {
    Caution,
    OkToVentilate,
}

impl ForecastAdvice {
    pub fn rationale(&self) -> &'static str {
        match self {
            ForecastAdvice::Caution => {
                "Tomorrow's air is expected to be humid enough to condense on the underground surface"
            }
            ForecastAdvice::OkToVentilate => {
                "Tomorrow's air is expected to be dry enough to ventilate"
            }
        }
    }
}
