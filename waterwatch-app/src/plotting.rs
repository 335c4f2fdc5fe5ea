//! Chart of the session readings against their safe ranges.

use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;
use waterwatch_core::analysis::{Assessment, RangeStatus};

/// Vertical extent of a panel: the manual control range, stretched to fit the reading.
fn panel_upper(assessment: &Assessment) -> f64 {
    let control_max = assessment.parameter.control_bounds().max;
    match assessment.value {
        Some(v) if v.is_finite() && v > control_max => v * 1.1,
        _ => control_max,
    }
}

fn status_color(status: RangeStatus) -> RGBColor {
    match status {
        RangeStatus::Safe => GREEN,
        RangeStatus::TooLow | RangeStatus::TooHigh => RED,
        RangeStatus::Indeterminate | RangeStatus::Unavailable => BLACK,
    }
}

/// Draws one panel per parameter with the safe band shaded and the reading as a bar.
pub fn plot_readings(path: &Path, assessments: &[Assessment]) -> Result<()> {
    let root = BitMapBackend::new(path, (1500, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, assessments.len().max(1)));

    for (panel, assessment) in panels.iter().zip(assessments) {
        let range = assessment.parameter.safe_range();
        let upper = panel_upper(assessment);
        let caption = if range.unit.is_empty() {
            assessment.parameter.to_string()
        } else {
            format!("{} ({})", assessment.parameter, range.unit)
        };

        let mut chart = ChartBuilder::on(panel)
            .caption(caption, ("sans-serif", 22).into_font())
            .margin(10)
            .x_label_area_size(10)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..1f64, 0f64..upper)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .draw()?;

        let band_low = range.safe_min.unwrap_or(0.0);
        let band_high = range.safe_max.unwrap_or(upper).min(upper);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, band_low), (1.0, band_high)],
            GREEN.mix(0.15).filled(),
        )))?;

        match assessment.value {
            Some(v) if v.is_finite() => {
                let color = status_color(assessment.status);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(0.3, 0.0), (0.7, v.max(0.0))],
                    color.mix(0.8).filled(),
                )))?;
            }
            _ => {
                chart.draw_series(std::iter::once(Text::new(
                    "no data".to_string(),
                    (0.3, upper / 2.0),
                    ("sans-serif", 18).into_font(),
                )))?;
            }
        }
    }

    root.present()?;
    info!("Readings chart saved to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waterwatch_core::analysis::assess;
    use waterwatch_schemas::parameter::Parameter;

    #[test]
    fn panel_grows_for_readings_past_the_control_range() {
        assert_eq!(panel_upper(&assess(Parameter::Ph, Some(7.0))), 14.0);
        let high = panel_upper(&assess(Parameter::Conductivity, Some(3000.0)));
        assert!((high - 3300.0).abs() < 1e-9);
        assert_eq!(panel_upper(&assess(Parameter::Turbidity, None)), 100.0);
    }

    #[test]
    fn colors_follow_status() {
        assert_eq!(status_color(RangeStatus::Safe).rgb(), GREEN.rgb());
        assert_eq!(status_color(RangeStatus::TooLow).rgb(), RED.rgb());
        assert_eq!(status_color(RangeStatus::Unavailable).rgb(), BLACK.rgb());
    }
}
