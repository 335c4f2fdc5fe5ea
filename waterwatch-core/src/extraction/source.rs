use crate::error::WaterwatchError;
use std::{fs, path::Path};
use waterwatch_schemas::{
    file_formats::{TabularFormat, UploadKind},
    parameter::Parameter,
    reading::Readings,
};

/// Values entered by hand. Every parameter always has a value, starting at its control default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualInput {
    values: [f64; 5],
}

impl Default for ManualInput {
    fn default() -> Self {
        Self {
            values: Parameter::ALL.map(|p| p.control_bounds().default),
        }
    }
}

impl ManualInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one parameter, rejecting values its control could not produce.
    pub fn with_value(mut self, parameter: Parameter, value: f64) -> Result<Self, WaterwatchError> {
        let bounds = parameter.control_bounds();
        if !bounds.accepts(value) {
            return Err(WaterwatchError::ManualValueOutOfRange {
                parameter,
                value,
                min: bounds.min,
                max: bounds.max,
            });
        }
        self.values[parameter.index()] = value;
        Ok(self)
    }

    pub fn value(&self, parameter: Parameter) -> f64 {
        self.values[parameter.index()]
    }

    pub fn readings(&self) -> Readings {
        Parameter::ALL
            .into_iter()
            .fold(Readings::empty(), |readings, p| readings.with(p, self.value(p)))
    }
}

/// A file handed to the tool instead of manual values.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn read(path: &Path) -> Result<Self, WaterwatchError> {
        let bytes = fs::read(path)
            .map_err(|e| WaterwatchError::FileIO(path.display().to_string(), e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Where the readings of a session come from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Manual(ManualInput),
    Tabular { format: TabularFormat, bytes: Vec<u8> },
    Image { bytes: Vec<u8> },
}

impl InputSource {
    /// Classifies an upload by its file extension.
    pub fn from_upload(upload: Upload) -> Result<Self, WaterwatchError> {
        match UploadKind::from_file_name(&upload.file_name) {
            Some(UploadKind::Tabular { format }) => Ok(InputSource::Tabular {
                format,
                bytes: upload.bytes,
            }),
            Some(UploadKind::Image) => Ok(InputSource::Image { bytes: upload.bytes }),
            None => Err(WaterwatchError::UnsupportedFileKind(upload.file_name)),
        }
    }

    pub fn is_upload(&self) -> bool {
        !matches!(self, InputSource::Manual(_))
    }
}
