use anyhow::bail;
use waterwatch_core::{
    analysis::{assess_all, RangeStatus},
    error::WaterwatchError,
    extract::{Keyword, KeywordRule, DEFAULT_RULES},
    extraction::{
        builder::ExtractorBuilder,
        extractor::{ColumnMapping, Provenance},
        source::{InputSource, ManualInput, Upload},
    },
    table::Table,
    tabular::TabularParser,
};
use waterwatch_schemas::{file_formats::TabularFormat, parameter::Parameter};

fn fake_ocr(lines: &'static [&'static str]) -> impl Fn(&[u8]) -> anyhow::Result<Vec<String>> {
    move |_: &[u8]| Ok(lines.iter().map(|l| l.to_string()).collect())
}

fn image() -> InputSource {
    InputSource::Image { bytes: vec![0x89, b'P', b'N', b'G'] }
}

#[test]
fn manual_defaults_are_all_safe() {
    let extractor = ExtractorBuilder::new().build();
    let manual = ManualInput::new()
        .with_value(Parameter::Ph, 7.0)
        .and_then(|m| m.with_value(Parameter::Temperature, 25.0))
        .and_then(|m| m.with_value(Parameter::Turbidity, 5.0))
        .and_then(|m| m.with_value(Parameter::DissolvedOxygen, 8.0))
        .and_then(|m| m.with_value(Parameter::Conductivity, 500.0))
        .unwrap();

    let extraction = extractor.extract(&InputSource::Manual(manual)).unwrap();
    assert!(!extraction.is_upload());

    for assessment in assess_all(&extraction.readings) {
        let range = assessment.parameter.safe_range();
        assert_eq!(assessment.status, RangeStatus::Safe, "{}", assessment.parameter);
        assert!(assessment.analysis.contains("within the safe range"));
        assert!(assessment.analysis.contains(range.insight));
    }
}

#[test]
fn low_oxygen_from_manual_input() {
    let extractor = ExtractorBuilder::new().build();
    let manual = ManualInput::new()
        .with_value(Parameter::DissolvedOxygen, 4.0)
        .unwrap();
    let extraction = extractor.extract(&InputSource::Manual(manual)).unwrap();
    let oxygen = &assess_all(&extraction.readings)[Parameter::DissolvedOxygen.index()];

    assert_eq!(oxygen.status, RangeStatus::TooLow);
    assert!(oxygen.analysis.contains("too low"));
    assert!(oxygen.analysis.contains("Consider aeration if levels are low."));
}

#[test]
fn ocr_lines_fill_matching_parameters() {
    let extractor = ExtractorBuilder::new()
        .with_ocr_engine(fake_ocr(&[
            "HydroProbe 3000",
            "pH reading: 7.2 units",
            "Water temp 18.5 C",
            "Turbidity 12 NTU",
            "Oxygen 7.9 mg/L",
        ]))
        .build();

    let extraction = extractor.extract(&image()).unwrap();
    let readings = extraction.readings;
    assert_eq!(readings.get(Parameter::Ph), Some(7.2));
    assert_eq!(readings.get(Parameter::Temperature), Some(18.5));
    assert_eq!(readings.get(Parameter::Turbidity), Some(12.0));
    assert_eq!(readings.get(Parameter::DissolvedOxygen), Some(7.9));
    assert_eq!(readings.get(Parameter::Conductivity), None);
    assert!(matches!(extraction.provenance, Provenance::OcrText(ref lines) if lines.len() == 5));

    let assessments = assess_all(&readings);
    assert_eq!(assessments[Parameter::Turbidity.index()].status, RangeStatus::TooHigh);
    assert_eq!(
        assessments[Parameter::Conductivity.index()].analysis,
        "Conductivity data is not available."
    );
}

#[test]
fn mixed_keyword_line_goes_to_ph_regardless_of_neighbours() {
    let orders: [&'static [&'static str]; 3] = [
        &["Temperature and pH both mentioned: 5"],
        &["Conductivity 300", "Temperature and pH both mentioned: 5"],
        &["Temperature and pH both mentioned: 5", "Turbidity 1"],
    ];
    for lines in orders {
        let extractor = ExtractorBuilder::new().with_ocr_engine(fake_ocr(lines)).build();
        let readings = extractor.extract(&image()).unwrap().readings;
        assert_eq!(readings.get(Parameter::Ph), Some(5.0));
        assert_eq!(readings.get(Parameter::Temperature), None);
    }
}

#[test]
fn failing_ocr_degrades_to_no_text() {
    let extractor = ExtractorBuilder::new()
        .with_ocr_engine(|_: &[u8]| -> anyhow::Result<Vec<String>> { bail!("corrupt image") })
        .build();
    let extraction = extractor.extract(&image()).unwrap();
    assert!(extraction.readings.is_empty());
    assert_eq!(extraction.provenance, Provenance::OcrText(Vec::new()));
}

#[test]
fn missing_ocr_engine_degrades_to_no_text() {
    let extraction = ExtractorBuilder::new().build().extract(&image()).unwrap();
    assert!(extraction.readings.is_empty());
}

#[test]
fn tables_are_displayed_but_not_mapped_by_default() {
    let upload = Upload {
        file_name: "samples.csv".into(),
        bytes: b"pH,Turbidity\n7.1,2\n".to_vec(),
    };
    let source = InputSource::from_upload(upload).unwrap();
    let extraction = ExtractorBuilder::new().build().extract(&source).unwrap();

    assert!(extraction.readings.is_empty());
    assert!(extraction.is_upload());
    let Provenance::Table { format, table } = extraction.provenance else {
        panic!("expected a table");
    };
    assert_eq!(format, TabularFormat::Csv);
    assert_eq!(table.rows, vec![vec!["7.1", "2"]]);
}

#[test]
fn column_mapping_feeds_named_columns() {
    let source = InputSource::Tabular {
        format: TabularFormat::Json,
        bytes: br#"[{"site": "A", "pH": 6.1, "Conductivity": 1200}]"#.to_vec(),
    };
    let extraction = ExtractorBuilder::new()
        .with_column_mapping(ColumnMapping::HeaderNames)
        .build()
        .extract(&source)
        .unwrap();

    assert_eq!(extraction.readings.get(Parameter::Ph), Some(6.1));
    assert_eq!(extraction.readings.get(Parameter::Conductivity), Some(1200.0));
    let assessments = assess_all(&extraction.readings);
    assert_eq!(assessments[0].status, RangeStatus::TooLow);
    assert_eq!(assessments[4].status, RangeStatus::TooHigh);
}

#[test]
fn table_parse_failure_is_returned() {
    let source = InputSource::Tabular {
        format: TabularFormat::Json,
        bytes: b"not json".to_vec(),
    };
    let err = ExtractorBuilder::new().build().extract(&source).unwrap_err();
    assert!(matches!(err, WaterwatchError::JsonParsing(_)));
}

struct SpreadsheetStub;

impl TabularParser for SpreadsheetStub {
    fn parse(&self, _bytes: &[u8], format: TabularFormat) -> Result<Table, WaterwatchError> {
        assert_eq!(format, TabularFormat::Excel);
        Ok(Table::new(vec!["Turbidity".into()], vec![vec!["0.8".into()]]))
    }
}

#[test]
fn injected_parser_handles_excel() {
    let source = InputSource::from_upload(Upload {
        file_name: "lab.xlsx".into(),
        bytes: Vec::new(),
    })
    .unwrap();
    let extraction = ExtractorBuilder::new()
        .with_tabular_parser(SpreadsheetStub)
        .with_column_mapping(ColumnMapping::HeaderNames)
        .build()
        .extract(&source)
        .unwrap();
    assert_eq!(extraction.readings.get(Parameter::Turbidity), Some(0.8));
}

#[test]
fn excel_upload_maps_worksheet_columns() {
    let source = InputSource::from_upload(Upload {
        file_name: "lab.XLSX".into(),
        bytes: include_bytes!("fixtures/readings.xlsx").to_vec(),
    })
    .unwrap();
    let extraction = ExtractorBuilder::new()
        .with_column_mapping(ColumnMapping::HeaderNames)
        .build()
        .extract(&source)
        .unwrap();

    assert_eq!(extraction.readings.get(Parameter::Ph), Some(7.1));
    assert_eq!(extraction.readings.get(Parameter::Turbidity), Some(2.0));
    assert!(matches!(
        extraction.provenance,
        Provenance::Table { format: TabularFormat::Excel, ref table } if table.row_count() == 2
    ));
}

#[test]
fn unreadable_excel_upload_fails() {
    let source = InputSource::Tabular {
        format: TabularFormat::Excel,
        bytes: Vec::new(),
    };
    let err = ExtractorBuilder::new().build().extract(&source).unwrap_err();
    assert!(matches!(err, WaterwatchError::UnsupportedFormat(TabularFormat::Excel)));
}

#[test]
fn custom_rules_change_precedence() {
    // Temperature ahead of pH, plus a conductivity abbreviation.
    let rules = vec![
        DEFAULT_RULES[1],
        DEFAULT_RULES[0],
        KeywordRule {
            parameter: Parameter::Conductivity,
            keywords: &[Keyword::Contains("EC")],
        },
    ];
    let extractor = ExtractorBuilder::new()
        .with_ocr_engine(fake_ocr(&["Temperature and pH both mentioned: 5", "EC 410 uS"]))
        .with_rules(rules)
        .build();

    let readings = extractor.extract(&image()).unwrap().readings;
    assert_eq!(readings.get(Parameter::Temperature), Some(5.0));
    assert_eq!(readings.get(Parameter::Ph), None);
    assert_eq!(readings.get(Parameter::Conductivity), Some(410.0));
}

#[test]
fn only_manual_input_is_not_an_upload() {
    assert!(!InputSource::Manual(ManualInput::new()).is_upload());
    assert!(image().is_upload());
    assert!(InputSource::Tabular { format: TabularFormat::Csv, bytes: Vec::new() }.is_upload());
}
