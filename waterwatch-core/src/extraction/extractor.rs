use crate::{
    error::WaterwatchError,
    extract::{readings_from_lines, readings_from_table, KeywordRule},
    extraction::source::InputSource,
    ocr::OcrEngine,
    table::Table,
    tabular::TabularParser,
};
use tracing::{info, warn};
use waterwatch_schemas::{file_formats::TabularFormat, reading::Readings};

/// Whether a parsed table feeds the readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnMapping {
    /// Tables are shown but contribute no readings.
    #[default]
    Disabled,
    /// Columns whose header is a parameter name supply that parameter.
    HeaderNames,
}

/// What the readings were derived from, kept for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    Manual,
    Table { format: TabularFormat, table: Table },
    OcrText(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub readings: Readings,
    pub provenance: Provenance,
}

impl Extraction {
    pub fn is_upload(&self) -> bool {
        !matches!(self.provenance, Provenance::Manual)
    }
}

/// Normalizes any [`InputSource`] into [`Readings`].
pub struct Extractor {
    pub(super) ocr: Option<Box<dyn OcrEngine>>,
    pub(super) tabular: Box<dyn TabularParser>,
    pub(super) rules: Vec<KeywordRule>,
    pub(super) column_mapping: ColumnMapping,
}

impl Extractor {
    /// Extracts readings from one input.
    ///
    /// # Errors
    ///
    /// Table parse failures are returned as-is with no partial readings. OCR
    /// failures are not errors: the image is treated as containing no text.
    pub fn extract(&self, source: &InputSource) -> Result<Extraction, WaterwatchError> {
        match source {
            InputSource::Manual(manual) => Ok(Extraction {
                readings: manual.readings(),
                provenance: Provenance::Manual,
            }),
            InputSource::Tabular { format, bytes } => {
                let table = self.tabular.parse(bytes, *format)?;
                let readings = match self.column_mapping {
                    ColumnMapping::Disabled => Readings::empty(),
                    ColumnMapping::HeaderNames => readings_from_table(&table),
                };
                info!(
                    "Loaded {} table; {} readings mapped from columns",
                    format,
                    readings.present_count()
                );
                Ok(Extraction {
                    readings,
                    provenance: Provenance::Table {
                        format: *format,
                        table,
                    },
                })
            }
            InputSource::Image { bytes } => {
                let lines = self.read_image(bytes);
                let readings = readings_from_lines(&lines, &self.rules);
                info!(
                    "Extracted {} readings from {} OCR lines",
                    readings.present_count(),
                    lines.len()
                );
                Ok(Extraction {
                    readings,
                    provenance: Provenance::OcrText(lines),
                })
            }
        }
    }

    fn read_image(&self, bytes: &[u8]) -> Vec<String> {
        let Some(ocr) = &self.ocr else {
            warn!("No OCR engine configured; image yields no text");
            return Vec::new();
        };
        match ocr.read_lines(bytes) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("OCR failed, continuing with no extracted text: {:#}", e);
                Vec::new()
            }
        }
    }
}
