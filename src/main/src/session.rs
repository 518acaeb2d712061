use anyhow::{Context, Result};
use log::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use control::{RelativeHumidity, Temperature};

// Underground readings entered by the site operator. Re-read before every
// evaluation so edits take effect on the next poll.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct SessionState {
    pub underground_temperature: f32,
    #[serde(default)]
    pub underground_humidity: Option<f32>,
}

impl SessionState {
    pub fn load(path: &Path, defaults: SessionState) -> Result<SessionState> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(
                    "No session file at {}, using default underground readings",
                    path.display()
                );
                return Ok(defaults);
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("Failed to read session file {}", path.display()))
            }
        };

        let session: SessionState = serde_json::from_str(&json)
            .with_context(|| format!("Malformed session file {}", path.display()))?;
        Ok(session)
    }

    pub fn temperature(&self) -> Temperature {
        Temperature::new(self.underground_temperature)
    }

    pub fn humidity(&self) -> Option<RelativeHumidity> {
        self.underground_humidity.map(RelativeHumidity::new)
    }
}
