use crate::{
    extract::{KeywordRule, DEFAULT_RULES},
    extraction::extractor::{ColumnMapping, Extractor},
    ocr::OcrEngine,
    tabular::{BuiltinTabularParser, TabularParser},
};

/// A fluent builder for constructing an [`Extractor`].
///
/// Collaborators are handed in explicitly. Without an OCR engine, image
/// uploads extract no text; without a table parser the built-in CSV/JSON
/// parser is used.
#[derive(Default)]
pub struct ExtractorBuilder {
    ocr: Option<Box<dyn OcrEngine>>,
    tabular: Option<Box<dyn TabularParser>>,
    rules: Option<Vec<KeywordRule>>,
    column_mapping: ColumnMapping,
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine used to read text out of image uploads.
    pub fn with_ocr_engine(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr = Some(Box::new(engine));
        self
    }

    /// Replaces the built-in CSV/JSON/Excel parser.
    pub fn with_tabular_parser(mut self, parser: impl TabularParser + 'static) -> Self {
        self.tabular = Some(Box::new(parser));
        self
    }

    /// Replaces the keyword rules applied to OCR lines. Order is precedence.
    pub fn with_rules(mut self, rules: Vec<KeywordRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Opts tabular uploads into filling readings from matching column headers.
    pub fn with_column_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.column_mapping = mapping;
        self
    }

    pub fn build(self) -> Extractor {
        Extractor {
            ocr: self.ocr,
            tabular: match self.tabular {
                Some(parser) => parser,
                None => Box::new(BuiltinTabularParser),
            },
            rules: self.rules.unwrap_or_else(|| DEFAULT_RULES.to_vec()),
            column_mapping: self.column_mapping,
        }
    }
}
