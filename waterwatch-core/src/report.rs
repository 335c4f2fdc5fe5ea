use crate::{
    analysis::{Assessment, RangeStatus},
    error::WaterwatchError,
    extraction::extractor::{Extraction, Provenance},
};
use csv::Writer;
use serde::Serialize;
use std::{fs, io, path::Path};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    parameter: &'a str,
    value: Option<f64>,
    unit: &'a str,
    safe_min: Option<f64>,
    safe_max: Option<f64>,
    status: RangeStatus,
    analysis: &'a str,
}

/// Writes assessments as CSV rows, one per parameter.
pub struct ReportWriter<W: io::Write> {
    writer: Writer<W>,
}

impl ReportWriter<fs::File> {
    pub fn create(path: &Path) -> Result<Self, WaterwatchError> {
        let writer = Writer::from_path(path)
            .map_err(|e| WaterwatchError::CsvError(path.display().to_string(), e))?;
        Ok(Self { writer })
    }
}

impl<W: io::Write> ReportWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
        }
    }

    pub fn write_assessments(&mut self, assessments: &[Assessment]) -> Result<(), WaterwatchError> {
        for assessment in assessments {
            let range = assessment.parameter.safe_range();
            let row = ReportRow {
                parameter: assessment.parameter.name(),
                value: assessment.value,
                unit: range.unit,
                safe_min: range.safe_min,
                safe_max: range.safe_max,
                status: assessment.status,
                analysis: &assessment.analysis,
            };
            self.writer
                .serialize(row)
                .map_err(|e| WaterwatchError::CsvError("report".to_string(), e))?;
        }
        self.writer
            .flush()
            .map_err(|e| WaterwatchError::FileIO("report".to_string(), e))?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, WaterwatchError> {
        self.writer
            .into_inner()
            .map_err(|e| WaterwatchError::FileIO("report".to_string(), e.into_error()))
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    source: &'static str,
    readings: &'a waterwatch_schemas::reading::Readings,
    assessments: &'a [Assessment],
}

fn source_label(provenance: &Provenance) -> &'static str {
    match provenance {
        Provenance::Manual => "manual",
        Provenance::Table { .. } => "table",
        Provenance::OcrText(_) => "image",
    }
}

/// Serializes the readings and their assessments as a pretty JSON document.
pub fn to_json(extraction: &Extraction, assessments: &[Assessment]) -> Result<String, WaterwatchError> {
    let report = JsonReport {
        source: source_label(&extraction.provenance),
        readings: &extraction.readings,
        assessments,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn write_json(path: &Path, extraction: &Extraction, assessments: &[Assessment]) -> Result<(), WaterwatchError> {
    let json = to_json(extraction, assessments)?;
    fs::write(path, json).map_err(|e| WaterwatchError::FileIO(path.display().to_string(), e))
}
