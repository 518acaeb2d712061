use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DewPointError {
    /// Humidity outside the range accepted by the active policy.
    InvalidHumidity(f32),
    /// The formula divided by zero or otherwise produced a non-finite value.
    SingularFormula,
}

impl fmt::Display for DewPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHumidity(value) => write!(f, "invalid relative humidity: {value}%"),
            Self::SingularFormula => write!(f, "dew point formula is singular for these inputs"),
        }
    }
}

impl core::error::Error for DewPointError {}
