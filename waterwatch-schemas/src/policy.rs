use crate::parameter::Parameter;
use serde::Serialize;

/// Static safe range and advice text for a [`Parameter`].
///
/// Either bound may be absent, meaning the range is open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafeRange {
    pub safe_min: Option<f64>,
    pub safe_max: Option<f64>,
    pub unit: &'static str,
    pub insight: &'static str,
    pub recommendation: &'static str,
}

impl SafeRange {
    pub fn contains(&self, value: f64) -> bool {
        self.safe_min.map_or(true, |min| value >= min) && self.safe_max.map_or(true, |max| value <= max)
    }

    pub fn is_below(&self, value: f64) -> bool {
        self.safe_min.map_or(false, |min| value < min)
    }

    pub fn is_above(&self, value: f64) -> bool {
        self.safe_max.map_or(false, |max| value > max)
    }
}

impl Parameter {
    /// The fixed policy used to assess this parameter. Not user-configurable.
    pub fn safe_range(self) -> SafeRange {
        match self {
            Parameter::Ph => SafeRange {
                safe_min: Some(6.5),
                safe_max: Some(8.5),
                unit: "",
                insight: "pH levels between 6.5 and 8.5 support biodiversity.",
                recommendation: "Consider adding pH buffers if out of range.",
            },
            Parameter::Temperature => SafeRange {
                safe_min: None,
                safe_max: Some(35.0),
                unit: "°C",
                insight: "Temperature below 35°C avoids stress on aquatic life.",
                recommendation: "Consider using aeration or shading.",
            },
            Parameter::Turbidity => SafeRange {
                safe_min: None,
                safe_max: Some(5.0),
                unit: "NTU",
                insight: "Low turbidity indicates clear water.",
                recommendation: "Implement sediment control if high.",
            },
            Parameter::DissolvedOxygen => SafeRange {
                safe_min: Some(6.0),
                safe_max: Some(10.0),
                unit: "mg/L",
                insight: "Ideal dissolved oxygen range for aquatic health.",
                recommendation: "Consider aeration if levels are low.",
            },
            Parameter::Conductivity => SafeRange {
                safe_min: None,
                safe_max: Some(1000.0),
                unit: "µS/cm",
                insight: "Conductivity under 1000 µS/cm is suitable for freshwater.",
                recommendation: "Check for potential pollutants if high.",
            },
        }
    }
}
