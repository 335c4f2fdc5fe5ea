use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five water quality quantities the assessment understands.
///
/// The set is closed: every session carries exactly one reading slot per variant,
/// and reports always list them in [`Parameter::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    #[serde(rename = "pH")]
    Ph,
    Temperature,
    Turbidity,
    #[serde(rename = "Dissolved Oxygen")]
    DissolvedOxygen,
    Conductivity,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::Ph,
        Parameter::Temperature,
        Parameter::Turbidity,
        Parameter::DissolvedOxygen,
        Parameter::Conductivity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Temperature => "Temperature",
            Parameter::Turbidity => "Turbidity",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Conductivity => "Conductivity",
        }
    }

    /// Position of this parameter in [`Parameter::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks a parameter up by its display name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Parameter> {
        let name = name.trim();
        Parameter::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
