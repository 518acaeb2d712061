use rgb::RGB8;

use control::RiskLevel;

use crate::advisory::Evaluation;
use crate::weather::WeatherSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    Initializing,
    MissingData,
    Safe,
    Caution,
    Danger,
}

impl StatusEvent {
    pub fn label(&self) -> &'static str {
        match self {
            StatusEvent::Initializing => "INITIALIZING",
            StatusEvent::MissingData => "FALLBACK WEATHER",
            StatusEvent::Safe => "SAFE",
            StatusEvent::Caution => "CAUTION",
            StatusEvent::Danger => "DANGER",
        }
    }
}

impl From<StatusEvent> for RGB8 {
    fn from(status: StatusEvent) -> RGB8 {
        match status {
            StatusEvent::Initializing => RGB8::new(200, 200, 0),
            StatusEvent::MissingData => RGB8::new(200, 0, 200),
            StatusEvent::Safe => RGB8::new(0, 200, 0),
            StatusEvent::Caution => RGB8::new(230, 140, 0),
            StatusEvent::Danger => RGB8::new(220, 0, 0),
        }
    }
}

impl From<RiskLevel> for StatusEvent {
    fn from(risk: RiskLevel) -> StatusEvent {
        match risk {
            RiskLevel::Safe => StatusEvent::Safe,
            RiskLevel::Caution => StatusEvent::Caution,
            RiskLevel::Danger => StatusEvent::Danger,
        }
    }
}

impl From<&Evaluation> for StatusEvent {
    fn from(evaluation: &Evaluation) -> StatusEvent {
        match evaluation.external.source {
            WeatherSource::Fallback => StatusEvent::MissingData,
            WeatherSource::Live => StatusEvent::from(evaluation.decision.risk_level),
        }
    }
}
