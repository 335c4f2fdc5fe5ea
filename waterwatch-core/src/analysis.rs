use serde::Serialize;
use waterwatch_schemas::{parameter::Parameter, policy::SafeRange, reading::Readings};

/// Where a reading falls relative to its safe range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Unavailable,
    Safe,
    TooLow,
    TooHigh,
    /// Neither inside the range nor beyond a set bound. Only NaN lands here.
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub parameter: Parameter,
    pub value: Option<f64>,
    pub status: RangeStatus,
    pub analysis: String,
}

pub fn classify(value: Option<f64>, range: &SafeRange) -> RangeStatus {
    match value {
        None => RangeStatus::Unavailable,
        Some(v) if range.contains(v) => RangeStatus::Safe,
        Some(v) if range.is_below(v) => RangeStatus::TooLow,
        Some(v) if range.is_above(v) => RangeStatus::TooHigh,
        Some(_) => RangeStatus::Indeterminate,
    }
}

/// Renders the analysis text for one reading against its safe range.
pub fn analyze_parameter(parameter: Parameter, value: Option<f64>, range: &SafeRange) -> String {
    let Some(v) = value else {
        return format!("{} data is not available.", parameter);
    };

    let unit = range.unit;
    let min = display_bound(range.safe_min);
    let max = display_bound(range.safe_max);
    let mut analysis = format!("{}: {} {}. ", parameter, display_value(v), unit);

    match classify(value, range) {
        RangeStatus::Safe => {
            analysis.push_str(&format!(
                "This is within the safe range ({} - {} {} where applicable). {}",
                min, max, unit, range.insight
            ));
            return analysis;
        }
        RangeStatus::TooLow => analysis.push_str(&format!(
            "The value is too low and below the safe range ({} - {} {}).",
            min, max, unit
        )),
        RangeStatus::TooHigh => analysis.push_str(&format!(
            "The value is too high and exceeds the safe range ({} - {} {}).",
            min, max, unit
        )),
        RangeStatus::Indeterminate | RangeStatus::Unavailable => {}
    }
    analysis.push(' ');
    analysis.push_str(range.recommendation);
    analysis
}

pub fn assess(parameter: Parameter, value: Option<f64>) -> Assessment {
    let range = parameter.safe_range();
    Assessment {
        parameter,
        value,
        status: classify(value, &range),
        analysis: analyze_parameter(parameter, value, &range),
    }
}

/// One assessment per parameter, in display order.
pub fn assess_all(readings: &Readings) -> Vec<Assessment> {
    readings.iter().map(|(p, v)| assess(p, v)).collect()
}

/// Whole readings keep one decimal place (`8.0`); others use the shortest form.
fn display_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn display_bound(bound: Option<f64>) -> String {
    bound.map_or_else(|| "None".to_string(), |b| b.to_string())
}
