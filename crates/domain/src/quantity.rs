use std::ops::Mul;

use derive_more::{Display, Into};

/// Weight in the canonical unit (kg). Converted to other units for display
/// only.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub const ZERO: Weight = Weight(0.0);

    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !value.is_finite() || !(0.0..10000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f64>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

impl Mul<Reps> for Weight {
    type Output = f64;

    fn mul(self, rhs: Reps) -> Self::Output {
        self.0 * f64::from(rhs.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 9999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub const ZERO: Reps = Reps(0);

    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value >= 1000 {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Rest time between sets in seconds.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct RestTime(u32);

impl RestTime {
    pub const ZERO: RestTime = RestTime(0);
    pub const DEFAULT: RestTime = RestTime(90);

    pub fn new(value: u32) -> Result<Self, RestTimeError> {
        if value > 3600 {
            return Err(RestTimeError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for RestTime {
    type Error = RestTimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => RestTime::new(parsed_value),
            Err(_) => Err(RestTimeError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RestTimeError {
    #[error("Rest time must be in the range 0 to 3600 s")]
    OutOfRange,
    #[error("Rest time must be an integer")]
    ParseError,
}
