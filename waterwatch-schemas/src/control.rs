use crate::parameter::Parameter;
use serde::Serialize;

/// Range and starting position of the manual entry control for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlBounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub unit: &'static str,
}

impl ControlBounds {
    /// Finite and within `min..=max`, i.e. a value the control could produce.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

impl Parameter {
    pub fn control_bounds(self) -> ControlBounds {
        let (min, max, default) = match self {
            Parameter::Ph => (0.0, 14.0, 7.0),
            Parameter::Temperature => (0.0, 50.0, 25.0),
            Parameter::Turbidity => (0.0, 100.0, 5.0),
            Parameter::DissolvedOxygen => (0.0, 15.0, 8.0),
            Parameter::Conductivity => (0.0, 2000.0, 500.0),
        };
        ControlBounds {
            min,
            max,
            default,
            unit: self.safe_range().unit,
        }
    }
}
