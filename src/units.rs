use serde::{Deserialize, Serialize};

pub const METER_TO_FEET: f64 = 3.28084;

/// Square feet per square meter: area scales with the square of the linear factor.
pub const SQFT_PER_SQM: f64 = METER_TO_FEET * METER_TO_FEET;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Host convention: the literal "imperial" selects imperial, anything else is metric.
    pub fn from_host(value: &str) -> Self {
        if value == "imperial" {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        }
    }

    pub fn is_imperial(self) -> bool {
        matches!(self, UnitSystem::Imperial)
    }

    pub fn area_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m²",
            UnitSystem::Imperial => "ft²",
        }
    }

    pub fn rate_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "/m²",
            UnitSystem::Imperial => "/ft²",
        }
    }
}

/// Canonical storage is always m² (and currency per m² for rates); these two
/// functions are the only place display units enter or leave the model.
/// Rates follow the same factor as areas.
pub fn to_display(canonical: f64, unit: UnitSystem) -> f64 {
    if unit.is_imperial() {
        canonical * SQFT_PER_SQM
    } else {
        canonical
    }
}

pub fn from_display(display: f64, unit: UnitSystem) -> f64 {
    if unit.is_imperial() {
        display / SQFT_PER_SQM
    } else {
        display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imperial_round_trip_within_tolerance() {
        for value in [0.0, 1.0, 42.5, 1000.0, 123_456.789] {
            let back = from_display(to_display(value, UnitSystem::Imperial), UnitSystem::Imperial);
            assert!((back - value).abs() < 1e-9, "round trip drifted: {} -> {}", value, back);
        }
    }

    #[test]
    fn metric_is_identity() {
        assert_eq!(to_display(123.456, UnitSystem::Metric), 123.456);
        assert_eq!(from_display(123.456, UnitSystem::Metric), 123.456);
    }

    #[test]
    fn one_square_meter_in_feet() {
        let ft2 = to_display(1.0, UnitSystem::Imperial);
        assert!((ft2 - 10.7639).abs() < 1e-3, "1 m² should be ~10.764 ft², got {}", ft2);
    }

    #[test]
    fn host_string_mapping() {
        assert_eq!(UnitSystem::from_host("imperial"), UnitSystem::Imperial);
        assert_eq!(UnitSystem::from_host("metric"), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_host(""), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_host("IMPERIAL"), UnitSystem::Metric);
    }
}
