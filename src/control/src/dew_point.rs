use micromath::F32Ext;

use crate::config::HumidityPolicy;
use crate::error::DewPointError;
use crate::state::{Reading, Temperature};
use crate::CoreConfig;

pub struct MagnusCoefficients {
    b: f32,
    c: f32,
}

// Magnus-Tetens coefficients over water, valid roughly -45..60 degrees
static MAGNUS_COEFFICIENTS: MagnusCoefficients = MagnusCoefficients {
    b: 17.62,
    c: 243.12,
};

// f32 carries about 7 significant digits, more decimals add nothing
pub const MAX_PRECISION: u8 = 6;

// Called through the trait so the same approximations are used whether or
// not the toolchain provides inherent float methods in core
fn round_to(value: f32, precision: u8) -> f32 {
    let factor = F32Ext::powi(10.0_f32, i32::from(precision.min(MAX_PRECISION)));
    F32Ext::round(value * factor) / factor
}

pub fn dew_point_checked(
    temperature: f32,
    relative_humidity: f32,
    precision: u8,
    policy: HumidityPolicy,
) -> Result<Temperature, DewPointError> {
    //              c * gamma                    b * t
    // td =  ---------------- ,  gamma = ------------ + ln(rh / 100)
    //             b - gamma                   c + t

    // Negated comparison so that NaN is rejected as well
    if !(relative_humidity > 0.0) {
        return Err(DewPointError::InvalidHumidity(relative_humidity));
    }
    if policy == HumidityPolicy::Strict && relative_humidity > 100.0 {
        return Err(DewPointError::InvalidHumidity(relative_humidity));
    }

    let b = MAGNUS_COEFFICIENTS.b;
    let c = MAGNUS_COEFFICIENTS.c;

    let gamma = (b * temperature) / (c + temperature) + F32Ext::ln(relative_humidity / 100.0);
    let denominator = b - gamma;
    if denominator == 0.0 || !gamma.is_finite() {
        return Err(DewPointError::SingularFormula);
    }

    let dew_point = round_to((c * gamma) / denominator, precision);
    if !dew_point.is_finite() {
        return Err(DewPointError::SingularFormula);
    }

    Ok(Temperature::new(dew_point))
}

pub fn dew_point(
    temperature: f32,
    relative_humidity: f32,
    precision: u8,
) -> Result<Temperature, DewPointError> {
    dew_point_checked(
        temperature,
        relative_humidity,
        precision,
        HumidityPolicy::Permissive,
    )
}

impl Reading {
    pub fn dew_point(&self, config: &CoreConfig) -> Result<Temperature, DewPointError> {
        dew_point_checked(
            self.temperature.into(),
            self.relative_humidity.into(),
            config.precision,
            config.humidity_policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(value: Temperature, expected: f32, tolerance: f32) -> bool {
        let value = f32::from(value);
        value > expected - tolerance && value < expected + tolerance
    }

    #[test]
    fn test_dew_point_known_values() {
        let td = dew_point(25.0, 60.0, 2).unwrap();
        assert!(within(td, 16.7, 0.1), "{:?}", td);

        let td = dew_point(20.0, 50.0, 2).unwrap();
        assert!(within(td, 9.3, 0.1), "{:?}", td);
    }

    #[test]
    fn test_dew_point_at_saturation_is_air_temperature() {
        let td = dew_point(18.5, 100.0, 1).unwrap();
        assert!(within(td, 18.5, 0.05), "{:?}", td);
    }

    #[test]
    fn test_dew_point_is_deterministic() {
        let first = dew_point(12.3, 81.0, 2).unwrap();
        let second = dew_point(12.3, 81.0, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dew_point_increases_with_humidity() {
        let mut previous = dew_point(15.0, 5.0, 2).unwrap();
        for humidity in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0] {
            let td = dew_point(15.0, humidity, 2).unwrap();
            assert!(previous < td, "{:?} < {:?} at {}%", previous, td, humidity);
            previous = td;
        }
    }

    #[test]
    fn test_dew_point_rounding() {
        let td = f32::from(dew_point(25.0, 60.0, 0).unwrap());
        assert_eq!(td, 17.0);

        let td = f32::from(dew_point(25.0, 60.0, 1).unwrap());
        assert!((td * 10.0 - (td * 10.0).round()).abs() < 1e-3);
    }

    #[test]
    fn test_dew_point_excess_precision_is_clamped() {
        for precision in [7, 39, 40, u8::MAX] {
            let td = f32::from(dew_point(25.0, 60.0, precision).unwrap());
            assert!(td.is_finite(), "precision {}: {}", precision, td);
            assert!(td > 16.6 && td < 16.8, "precision {}: {}", precision, td);
        }
        assert_eq!(
            dew_point(25.0, 60.0, 40),
            dew_point(25.0, 60.0, MAX_PRECISION)
        );
    }

    #[test]
    fn test_dew_point_rejects_zero_humidity() {
        assert_eq!(
            dew_point(25.0, 0.0, 1),
            Err(DewPointError::InvalidHumidity(0.0))
        );
        assert_eq!(
            dew_point(25.0, -5.0, 1),
            Err(DewPointError::InvalidHumidity(-5.0))
        );
        assert!(matches!(
            dew_point(25.0, f32::NAN, 1),
            Err(DewPointError::InvalidHumidity(_))
        ));
    }

    #[test]
    fn test_dew_point_above_saturation_depends_on_policy() {
        let permissive = dew_point(20.0, 120.0, 1).unwrap();
        assert!(f32::from(permissive) > 20.0);

        let strict = dew_point_checked(20.0, 120.0, 1, HumidityPolicy::Strict);
        assert_eq!(strict, Err(DewPointError::InvalidHumidity(120.0)));

        let strict = dew_point_checked(20.0, 100.0, 1, HumidityPolicy::Strict);
        assert!(strict.is_ok());
    }

    #[test]
    fn test_dew_point_singular_temperature() {
        assert_eq!(
            dew_point(-243.12, 50.0, 1),
            Err(DewPointError::SingularFormula)
        );
    }

    #[test]
    fn test_reading_dew_point_uses_config() {
        let reading = Reading::new(25.0, 60.0);
        let config = CoreConfig {
            precision: 0,
            ..CoreConfig::default()
        };
        assert_eq!(reading.dew_point(&config), Ok(Temperature::new(17.0)));

        let config = CoreConfig {
            humidity_policy: HumidityPolicy::Strict,
            ..CoreConfig::default()
        };
        let reading = Reading::new(25.0, 101.0);
        assert!(reading.dew_point(&config).is_err());
    }
}
