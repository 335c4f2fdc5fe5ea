use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialization form of a tabular upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularFormat {
    Csv,
    Excel,
    Json,
}

impl fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TabularFormat::Csv => "CSV",
            TabularFormat::Excel => "Excel",
            TabularFormat::Json => "JSON",
        })
    }
}

/// What an uploaded file holds, decided from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadKind {
    Tabular { format: TabularFormat },
    Image,
}

impl UploadKind {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 7] = ["csv", "xlsx", "xls", "json", "png", "jpeg", "jpg"];

    /// Classifies an upload by the lower-cased text after the last `.` in its name.
    pub fn from_file_name(file_name: &str) -> Option<UploadKind> {
        let extension = file_name.rsplit('.').next()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(UploadKind::Tabular { format: TabularFormat::Csv }),
            "xlsx" | "xls" => Some(UploadKind::Tabular { format: TabularFormat::Excel }),
            "json" => Some(UploadKind::Tabular { format: TabularFormat::Json }),
            "png" | "jpeg" | "jpg" => Some(UploadKind::Image),
            _ => None,
        }
    }
}

fn default_schema_version() -> String {
    "1".to_string()
}

fn default_ocr_program() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

/// Top level of the `waterwatch.yaml` configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub tabular: TabularSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            ocr: OcrSettings::default(),
            tabular: TabularSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrSettings {
    #[serde(default = "default_ocr_program")]
    pub program: String,
    #[serde(default = "default_ocr_language")]
    pub language: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            program: default_ocr_program(),
            language: default_ocr_language(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularSettings {
    /// Feed table columns named after a parameter into the readings.
    #[serde(default)]
    pub map_columns: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub directory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_last_extension_case_insensitively() {
        assert_eq!(
            UploadKind::from_file_name("samples.2024.CSV"),
            Some(UploadKind::Tabular { format: TabularFormat::Csv })
        );
        assert_eq!(
            UploadKind::from_file_name("probe.xls"),
            Some(UploadKind::Tabular { format: TabularFormat::Excel })
        );
        assert_eq!(UploadKind::from_file_name("meter.JPG"), Some(UploadKind::Image));
        assert_eq!(UploadKind::from_file_name("notes.txt"), None);
        assert_eq!(UploadKind::from_file_name("README"), None);
    }

    #[test]
    fn every_accepted_extension_classifies() {
        for extension in UploadKind::ACCEPTED_EXTENSIONS {
            assert!(UploadKind::from_file_name(&format!("upload.{extension}")).is_some());
        }
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ConfigFile = serde_yaml::from_str("ocr:\n  language: deu\n").unwrap();
        assert_eq!(config.ocr.program, "tesseract");
        assert_eq!(config.ocr.language, "deu");
        assert!(!config.tabular.map_columns);
        assert_eq!(config.output.directory, None);
        assert_eq!(config.schema_version, "1");
    }
}
