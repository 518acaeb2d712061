use anyhow::{Context, Result};
use log::*;
use serde::Serialize;

use control::{
    decide, forecast_advice, CoreConfig, ForecastAdvice, PowerState, Temperature,
    VentilationDecision,
};

use crate::session::SessionState;
use crate::weather::{DailyForecast, ResolvedReading};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NextDayOutlook {
    pub forecast: DailyForecast,
    pub dew_point: Temperature,
    pub advice: ForecastAdvice,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub external: ResolvedReading,
    pub external_dew_point: Temperature,
    pub underground: SessionState,
    // Dew point of the underground air, when its humidity is known
    pub internal_dew_point: Option<Temperature>,
    pub decision: VentilationDecision,
    pub tomorrow: Option<NextDayOutlook>,
}

impl Evaluation {
    pub fn evaluate(
        config: &CoreConfig,
        external: ResolvedReading,
        tomorrow: Option<&DailyForecast>,
        session: &SessionState,
    ) -> Result<Evaluation> {
        let external_dew_point = external
            .reading
            .dew_point(config)
            .context("External reading is invalid")?;

        let internal_dew_point = match session.underground_humidity {
            Some(humidity) => Some(
                control::dew_point_checked(
                    session.underground_temperature,
                    humidity,
                    config.precision,
                    config.humidity_policy,
                )
                .context("Underground reading is invalid")?,
            ),
            None => None,
        };

        let decision = decide(
            config,
            external_dew_point,
            session.temperature(),
            session.humidity(),
        );

        // A bad forecast day only loses the outlook, not the decision
        let tomorrow = tomorrow.and_then(|forecast| match forecast.reading().dew_point(config) {
            Ok(dew_point) => Some(NextDayOutlook {
                forecast: *forecast,
                dew_point,
                advice: forecast_advice(config, dew_point, session.temperature()),
            }),
            Err(error) => {
                warn!("Ignoring forecast for {}: {}", forecast.date, error);
                None
            }
        });

        Ok(Evaluation {
            external,
            external_dew_point,
            underground: *session,
            internal_dew_point,
            decision,
            tomorrow,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equipment {
    MainVentilation,
    InducedFan,
    Dehumidifier,
}

impl Equipment {
    pub fn name(&self) -> &'static str {
        match self {
            Equipment::MainVentilation => "main ventilation",
            Equipment::InducedFan => "induced-draft fan",
            Equipment::Dehumidifier => "dehumidifier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    TurnOn,
    TurnOff,
}

impl From<PowerState> for SwitchAction {
    fn from(power: PowerState) -> SwitchAction {
        match power {
            PowerState::On => SwitchAction::TurnOn,
            PowerState::Off => SwitchAction::TurnOff,
        }
    }
}

// Last state commanded to each device; unknown until the first decision
#[derive(Debug, Default)]
pub struct EquipmentPanel {
    main_ventilation: Option<PowerState>,
    induced_fan: Option<PowerState>,
    dehumidifier: Option<PowerState>,
}

impl EquipmentPanel {
    fn slot(&mut self, equipment: Equipment) -> &mut Option<PowerState> {
        match equipment {
            Equipment::MainVentilation => &mut self.main_ventilation,
            Equipment::InducedFan => &mut self.induced_fan,
            Equipment::Dehumidifier => &mut self.dehumidifier,
        }
    }

    pub fn apply(&mut self, decision: &VentilationDecision) -> Vec<(Equipment, SwitchAction)> {
        let desired = [
            (Equipment::MainVentilation, decision.main_ventilation),
            (Equipment::InducedFan, decision.induced_fan),
            (Equipment::Dehumidifier, decision.dehumidifier),
        ];

        let mut actions = Vec::new();
        for (equipment, power) in desired {
            let slot = self.slot(equipment);
            match (power, *slot) {
                (PowerState::On, Some(PowerState::On)) | (PowerState::Off, Some(PowerState::Off)) => {
                    info!("{} is already in desired state {:?}", equipment.name(), power);
                }
                (PowerState::On, _) => {
                    info!("Turning on {}", equipment.name());
                    *slot = Some(power);
                    actions.push((equipment, SwitchAction::from(power)));
                }
                (PowerState::Off, _) => {
                    info!("Turning off {}", equipment.name());
                    *slot = Some(power);
                    actions.push((equipment, SwitchAction::from(power)));
                }
            }
        }
        actions
    }
}
