//! Text rendering of a session: input summary followed by the per-parameter analysis.

use std::io::{self, Write};
use waterwatch_core::{
    analysis::Assessment,
    extraction::extractor::{Extraction, Provenance},
};

pub fn render<W: Write>(out: &mut W, extraction: &Extraction, assessments: &[Assessment]) -> io::Result<()> {
    writeln!(out, "🌊 Water Quality Monitor Dashboard")?;
    writeln!(
        out,
        "This dashboard provides an overview of water quality parameters with analysis tools for environmental monitoring."
    )?;
    writeln!(out)?;

    match &extraction.provenance {
        Provenance::Manual => {
            writeln!(out, "Manual readings:")?;
            for (parameter, value) in extraction.readings.iter() {
                let unit = parameter.control_bounds().unit;
                match value {
                    Some(v) => writeln!(out, "  - {}: {} {}", parameter, v, unit)?,
                    None => writeln!(out, "  - {}: -", parameter)?,
                }
            }
        }
        Provenance::Table { format, table } => {
            writeln!(out, "Uploaded {} Data:", format)?;
            write!(out, "{}", table)?;
        }
        Provenance::OcrText(lines) => {
            writeln!(out, "Extracted Text from Image:")?;
            for line in lines {
                writeln!(out, "{}", line)?;
            }
        }
    }

    for assessment in assessments {
        writeln!(out)?;
        writeln!(out, "### {} Analysis", assessment.parameter)?;
        writeln!(out, "{}", assessment.analysis)?;
    }

    if extraction.is_upload() {
        writeln!(out)?;
        writeln!(
            out,
            "The above analysis and recommendations are based on data extracted from the uploaded file."
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waterwatch_core::{analysis::assess_all, table::Table};
    use waterwatch_schemas::{file_formats::TabularFormat, parameter::Parameter, reading::Readings};

    fn rendered(extraction: &Extraction) -> String {
        let assessments = assess_all(&extraction.readings);
        let mut out = Vec::new();
        render(&mut out, extraction, &assessments).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn manual_session_lists_values_and_every_analysis() {
        let extraction = Extraction {
            readings: Readings::empty()
                .with(Parameter::Ph, 7.0)
                .with(Parameter::Temperature, 25.0),
            provenance: Provenance::Manual,
        };
        let text = rendered(&extraction);
        assert!(text.contains("  - Temperature: 25 °C"));
        for parameter in Parameter::ALL {
            assert!(text.contains(&format!("### {} Analysis", parameter)));
        }
        assert!(text.contains("Turbidity data is not available."));
        assert!(!text.contains("uploaded file"));
    }

    #[test]
    fn table_upload_shows_table_and_note() {
        let extraction = Extraction {
            readings: Readings::empty(),
            provenance: Provenance::Table {
                format: TabularFormat::Csv,
                table: Table::new(vec!["pH".into()], vec![vec!["7.7".into()]]),
            },
        };
        let text = rendered(&extraction);
        assert!(text.contains("Uploaded CSV Data:\n| pH |\n"));
        assert!(text.contains("| 7.7 |"));
        assert!(text.ends_with("based on data extracted from the uploaded file.\n"));
    }

    #[test]
    fn image_upload_echoes_ocr_lines() {
        let extraction = Extraction {
            readings: Readings::empty().with(Parameter::Turbidity, 8.0),
            provenance: Provenance::OcrText(vec!["Turbidity 8 NTU".into()]),
        };
        let text = rendered(&extraction);
        assert!(text.contains("Extracted Text from Image:\nTurbidity 8 NTU\n"));
        assert!(text.contains("too high"));
    }
}
