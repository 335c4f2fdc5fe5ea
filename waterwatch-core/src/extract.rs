//! Turning raw text and tables into [`Readings`].

use crate::table::Table;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use waterwatch_schemas::{parameter::Parameter, reading::Readings};

/// First unsigned decimal in a line. Signs, exponents and digit grouping are not recognized.
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+(\.[0-9]+)?").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Case-sensitive substring.
    Contains(&'static str),
    /// Substring of the lower-cased line; the needle must be lower case.
    ContainsIgnoreCase(&'static str),
}

impl Keyword {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Keyword::Contains(needle) => line.contains(needle),
            Keyword::ContainsIgnoreCase(needle) => line.to_lowercase().contains(needle),
        }
    }
}

/// A line mentioning any of `keywords` sets `parameter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub parameter: Parameter,
    pub keywords: &'static [Keyword],
}

impl KeywordRule {
    pub fn matches(&self, line: &str) -> bool {
        self.keywords.iter().any(|k| k.matches(line))
    }
}

/// Rules in precedence order: a line belongs to the first rule it matches.
pub const DEFAULT_RULES: [KeywordRule; 5] = [
    KeywordRule {
        parameter: Parameter::Ph,
        keywords: &[Keyword::Contains("pH")],
    },
    KeywordRule {
        parameter: Parameter::Temperature,
        keywords: &[Keyword::Contains("Temperature"), Keyword::ContainsIgnoreCase("temp")],
    },
    KeywordRule {
        parameter: Parameter::Turbidity,
        keywords: &[Keyword::Contains("Turbidity")],
    },
    KeywordRule {
        parameter: Parameter::DissolvedOxygen,
        keywords: &[Keyword::Contains("Dissolved Oxygen"), Keyword::Contains("Oxygen")],
    },
    KeywordRule {
        parameter: Parameter::Conductivity,
        keywords: &[Keyword::Contains("Conductivity")],
    },
];

/// The parameter a line talks about, if any.
pub fn match_line(line: &str, rules: &[KeywordRule]) -> Option<Parameter> {
    rules.iter().find(|rule| rule.matches(line)).map(|rule| rule.parameter)
}

/// Parses the first unsigned decimal number in `text`.
pub fn extract_numeric_value(text: &str) -> Option<f64> {
    DECIMAL_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Scans OCR output line by line.
///
/// Each matching line assigns its parameter, so a later line replaces an
/// earlier one, including with an absent value when the later line has no number.
pub fn readings_from_lines<S: AsRef<str>>(lines: &[S], rules: &[KeywordRule]) -> Readings {
    let mut readings = Readings::empty();
    for line in lines.iter().flat_map(|l| l.as_ref().split('\n')) {
        if let Some(parameter) = match_line(line, rules) {
            let value = extract_numeric_value(line);
            debug!("Line {:?} sets {} to {:?}", line, parameter, value);
            readings.set(parameter, value);
        }
    }
    readings
}

/// Maps columns whose header names a parameter onto the readings.
///
/// A column supplies the first cell that parses as a finite number. When
/// several columns name the same parameter, the leftmost one wins.
pub fn readings_from_table(table: &Table) -> Readings {
    let mut readings = Readings::empty();
    for (index, header) in table.headers.iter().enumerate() {
        let Some(parameter) = Parameter::from_name(header) else {
            continue;
        };
        if readings.get(parameter).is_some() {
            continue;
        }
        let value = table
            .column(index)
            .filter_map(|cell| cell.trim().parse::<f64>().ok())
            .find(|v| v.is_finite());
        readings.set(parameter, value);
    }
    readings
}
