use anyhow::Result;
use log::*;
use std::thread;

mod advisory;
mod config;
mod render;
mod session;
mod status;
mod weather;

use advisory::{EquipmentPanel, Evaluation};
use config::Config;
use session::SessionState;
use status::StatusEvent;
use weather::{resolve_current, WeatherClient};

fn poll(config: &Config, client: &WeatherClient, panel: &mut EquipmentPanel) -> Result<()> {
    let report = match client.fetch() {
        Ok(report) => Some(report),
        Err(error) => {
            error!("Weather provider unavailable: {:#}", error);
            None
        }
    };

    let external = resolve_current(report.as_ref(), config.fallback_reading);
    let session = SessionState::load(&config.session_path, config.default_session)?;
    let tomorrow = report.as_ref().and_then(|report| report.tomorrow());

    let evaluation = Evaluation::evaluate(&config.core, external, tomorrow, &session)?;
    info!(
        "Status {:?}: {:?}",
        StatusEvent::from(&evaluation),
        evaluation.decision
    );
    debug!("{}", serde_json::to_string(&evaluation)?);

    let switched = panel.apply(&evaluation.decision);

    let forecast = report.as_ref().map(|report| report.forecast.as_slice()).unwrap_or(&[]);
    print!("{}", render::render(&evaluation, forecast, &switched, config.core.precision)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Status {:?}", StatusEvent::Initializing);

    let config = Config::read();
    let client = WeatherClient::new(&config)?;
    let mut panel = EquipmentPanel::default();

    if config.poll_interval.is_zero() {
        return poll(&config, &client, &mut panel);
    }

    loop {
        if let Err(error) = poll(&config, &client, &mut panel) {
            error!("Evaluation failed: {:#}", error);
        }
        thread::sleep(config.poll_interval);
    }
}
