use rgb::RGB8;
use std::fmt::{self, Write};

use control::{PowerState, Temperature};

use crate::advisory::{Equipment, Evaluation, SwitchAction};
use crate::status::StatusEvent;
use crate::weather::{DailyForecast, WeatherSource};

fn coloured(text: &str, colour: RGB8) -> String {
    format!("\x1b[1;38;2;{};{};{}m{}\x1b[0m", colour.r, colour.g, colour.b, text)
}

fn power_label(power: PowerState) -> &'static str {
    match power {
        PowerState::On => "ON",
        PowerState::Off => "OFF",
    }
}

fn degrees(temperature: Temperature) -> String {
    format!("{:.1}°C", f32::from(temperature))
}

// Dew points are shown with the precision they were rounded to
fn dew_point_degrees(temperature: Temperature, precision: u8) -> String {
    format!("{:.*}°C", usize::from(precision), f32::from(temperature))
}

// `switched` lists the devices whose commanded state changed on this
// evaluation; they are marked on the dashboard
pub fn render(
    evaluation: &Evaluation,
    forecast: &[DailyForecast],
    switched: &[(Equipment, SwitchAction)],
    precision: u8,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let status = StatusEvent::from(evaluation);
    let risk = StatusEvent::from(evaluation.decision.risk_level);

    writeln!(out, "{}", coloured(&format!("== Condensation risk: {} ==", risk.label()), risk.into()))?;
    if status == StatusEvent::MissingData {
        writeln!(
            out,
            "{}",
            coloured("Weather provider unavailable, showing fallback reading", status.into())
        )?;
    }

    let external = evaluation.external.reading;
    let source = match evaluation.external.source {
        WeatherSource::Live => "live",
        WeatherSource::Fallback => "fallback",
    };
    writeln!(
        out,
        "Outside ({}): {} / {:.0}%  dew point {}",
        source,
        degrees(external.temperature),
        f32::from(external.relative_humidity),
        dew_point_degrees(evaluation.external_dew_point, precision)
    )?;

    write!(
        out,
        "Underground: {}",
        degrees(evaluation.underground.temperature())
    )?;
    if let Some(humidity) = evaluation.underground.underground_humidity {
        write!(out, " / {:.0}%", humidity)?;
    }
    if let Some(dew_point) = evaluation.internal_dew_point {
        write!(out, "  dew point {}", dew_point_degrees(dew_point, precision))?;
    }
    writeln!(out)?;

    let decision = &evaluation.decision;
    for (equipment, power) in [
        (Equipment::MainVentilation, decision.main_ventilation),
        (Equipment::InducedFan, decision.induced_fan),
        (Equipment::Dehumidifier, decision.dehumidifier),
    ] {
        write!(out, "  {:<18} {}", equipment.name(), power_label(power))?;
        if let Some((_, action)) = switched.iter().find(|(device, _)| *device == equipment) {
            let marker = match action {
                SwitchAction::TurnOn => "switched on",
                SwitchAction::TurnOff => "switched off",
            };
            write!(out, "  <- {}", marker)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{}", decision.rationale)?;

    if let Some(tomorrow) = &evaluation.tomorrow {
        writeln!(
            out,
            "Tomorrow ({}): dew point {}, {:?}: {}",
            tomorrow.forecast.date,
            dew_point_degrees(tomorrow.dew_point, precision),
            tomorrow.advice,
            tomorrow.advice.rationale()
        )?;
    }

    if !forecast.is_empty() {
        writeln!(out, "Forecast:")?;
    }
    for day in forecast {
        let (icon, description) = day
            .weather_code
            .map(|code| (code.icon(), code.description()))
            .unwrap_or(("", "-"));
        write!(
            out,
            "  {} {} {} {:.0}/{:.0}°C {:.0}%",
            day.date,
            icon,
            description,
            day.min_temperature,
            day.max_temperature,
            day.mean_relative_humidity
        )?;
        if let Some(precipitation) = day.precipitation_probability {
            write!(out, " rain {:.0}%", precipitation)?;
        }
        writeln!(out)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use control::{CoreConfig, Reading};
    use time::macros::date;

    use crate::session::SessionState;
    use crate::weather::{ResolvedReading, WeatherCode};

    #[test]
    fn test_render_dashboard() {
        let forecast = [DailyForecast {
            date: date!(2024 - 07 - 02),
            max_temperature: 30.0,
            min_temperature: 23.0,
            mean_relative_humidity: 80.0,
            precipitation_probability: Some(60.0),
            weather_code: Some(WeatherCode(61)),
        }];
        let evaluation = Evaluation::evaluate(
            &CoreConfig::default(),
            ResolvedReading {
                reading: Reading::new(25.0, 70.0),
                source: WeatherSource::Fallback,
            },
            forecast.first(),
            &SessionState {
                underground_temperature: 18.5,
                underground_humidity: Some(75.0),
            },
        )
        .unwrap();

        let switched = [(Equipment::Dehumidifier, SwitchAction::TurnOn)];
        let text = render(&evaluation, &forecast, &switched, 1).unwrap();

        assert!(text.contains("DANGER"), "{}", text);
        assert!(text.contains("fallback reading"), "{}", text);
        assert!(text.contains("main ventilation   OFF"), "{}", text);
        assert!(text.contains("dehumidifier       ON  <- switched on"), "{}", text);
        assert!(!text.contains("main ventilation   OFF  <-"), "{}", text);
        assert!(text.contains("Tomorrow (2024-07-02)"), "{}", text);
        assert!(text.contains("Rain"), "{}", text);
        assert!(text.contains("rain 60%"), "{}", text);
    }

    #[test]
    fn test_render_dew_point_precision() {
        let evaluation = Evaluation::evaluate(
            &CoreConfig {
                precision: 2,
                ..CoreConfig::default()
            },
            ResolvedReading {
                reading: Reading::new(25.0, 60.0),
                source: WeatherSource::Live,
            },
            None,
            &SessionState {
                underground_temperature: 18.5,
                underground_humidity: None,
            },
        )
        .unwrap();

        let dew_point = f32::from(evaluation.external_dew_point);
        assert!(16.6 < dew_point && dew_point < 16.8, "{}", dew_point);

        let two_decimals = render(&evaluation, &[], &[], 2).unwrap();
        let expected = format!("dew point {:.2}°C", dew_point);
        assert!(two_decimals.contains(&expected), "{}", two_decimals);
        assert!(!two_decimals.contains(&format!("dew point {:.1}°C", dew_point)), "{}", two_decimals);

        let no_decimals = render(&evaluation, &[], &[], 0).unwrap();
        assert!(no_decimals.contains("dew point 17°C"), "{}", no_decimals);
    }
}
