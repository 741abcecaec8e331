use crate::{RestTime, Weight};

const POUNDS_PER_KILOGRAM: f64 = 2.20462;

/// Display preferences, passed explicitly into the formatting functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub weight_unit: WeightUnit,
    pub default_rest_time: RestTime,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Kilograms,
            default_rest_time: RestTime::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Kilograms,
    Pounds,
}

impl WeightUnit {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "Kilograms",
            WeightUnit::Pounds => "Pounds",
        }
    }

    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lbs",
        }
    }

    #[must_use]
    pub fn convert(self, value: f64, to: WeightUnit) -> f64 {
        match (self, to) {
            (WeightUnit::Kilograms, WeightUnit::Pounds) => value * POUNDS_PER_KILOGRAM,
            (WeightUnit::Pounds, WeightUnit::Kilograms) => value / POUNDS_PER_KILOGRAM,
            _ => value,
        }
    }
}

/// Format a stored (canonical kg) weight in the configured unit, without a
/// trailing zero fraction.
#[must_use]
pub fn format_weight(weight: Weight, settings: &Settings) -> String {
    let value = WeightUnit::Kilograms.convert(f64::from(weight), settings.weight_unit);
    let unit = settings.weight_unit.abbreviation();

    if value.fract() == 0.0 {
        format!("{value:.0} {unit}")
    } else {
        format!("{value:.1} {unit}")
    }
}

#[must_use]
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[must_use]
pub fn format_rest_time(rest_time: RestTime) -> String {
    let total_seconds = u32::from(rest_time);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    if minutes > 0 {
        format!("{minutes}:{seconds:02}")
    } else {
        format!("{seconds}s")
    }
}
