use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum HumidityPolicy {
    // Only reject humidity at or below zero, where the formula is undefined
    Permissive,
    // Also reject humidity above saturation
    Strict,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct CoreConfig {
    // Buffer in degrees subtracted from the surface temperature before
    // comparing against the external dew point
    pub safety_margin: f32,

    // Internal humidity above which the dehumidifier is run
    pub target_humidity: f32,

    // Decimal places dew points are rounded to
    pub precision: u8,

    pub humidity_policy: HumidityPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            safety_margin: 2.0,
            target_humidity: 70.0,
            precision: 1,
            humidity_policy: HumidityPolicy::Permissive,
        }
    }
}
