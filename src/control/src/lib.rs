#![no_std]

mod config;
mod dew_point;
mod error;
mod state;

pub use config::{CoreConfig, HumidityPolicy};
pub use dew_point::{dew_point, dew_point_checked, MAX_PRECISION};
pub use error::DewPointError;
pub use state::{
    ForecastAdvice, PowerState, Reading, RelativeHumidity, RiskLevel, Temperature,
    VentilationDecision,
};

// Ties are unsafe: a dew point exactly at the margin does not ventilate
pub fn is_ventilation_safe(
    config: &CoreConfig,
    dew_point: Temperature,
    underground_temperature: Temperature,
) -> bool {
    f32::from(dew_point) < f32::from(underground_temperature) - config.safety_margin
}

impl VentilationDecision {
    pub fn from_conditions(
        config: &CoreConfig,
        external_dew_point: Temperature,
        underground_temperature: Temperature,
        underground_humidity: Option<RelativeHumidity>,
    ) -> VentilationDecision {
        if is_ventilation_safe(config, external_dew_point, underground_temperature) {
            return VentilationDecision {
                main_ventilation: PowerState::On,
                induced_fan: PowerState::On,
                dehumidifier: PowerState::Off,
                risk_level: RiskLevel::Safe,
                rationale: "External air is dry enough to ventilate; the dehumidifier is not needed",
            };
        }

        match underground_humidity {
            Some(humidity) if f32::from(humidity) > config.target_humidity => {
                // Seal against outside air and circulate across the dehumidifier
                VentilationDecision {
                    main_ventilation: PowerState::Off,
                    induced_fan: PowerState::On,
                    dehumidifier: PowerState::On,
                    risk_level: RiskLevel::Danger,
                    rationale: "External air would condense on the surface and the interior is already humid; close ventilation and dehumidify",
                }
            }
            Some(_) => VentilationDecision {
                main_ventilation: PowerState::Off,
                induced_fan: PowerState::Off,
                dehumidifier: PowerState::Off,
                risk_level: RiskLevel::Caution,
                rationale: "External air would condense on the surface but the interior is not humid yet; hold and re-evaluate",
            },
            // No internal humidity signal, only the ventilation test applies
            None => VentilationDecision {
                main_ventilation: PowerState::Off,
                induced_fan: PowerState::Off,
                dehumidifier: PowerState::Off,
                risk_level: RiskLevel::Caution,
                rationale: "External air would condense on the surface; keep ventilation closed",
            },
        }
    }
}

pub fn decide(
    config: &CoreConfig,
    external_dew_point: Temperature,
    underground_temperature: Temperature,
    underground_humidity: Option<RelativeHumidity>,
) -> VentilationDecision {
    VentilationDecision::from_conditions(
        config,
        external_dew_point,
        underground_temperature,
        underground_humidity,
    )
}

pub fn forecast_advice(
    config: &CoreConfig,
    forecast_dew_point: Temperature,
    underground_temperature: Temperature,
) -> ForecastAdvice {
    if is_ventilation_safe(config, forecast_dew_point, underground_temperature) {
        ForecastAdvice::OkToVentilate
    } else {
        ForecastAdvice::Caution
    }
}
