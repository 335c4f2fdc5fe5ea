//! Optical character recognition collaborator.
//!
//! The engine is a black box from image bytes to text lines. The extractor
//! receives it as a handle so tests can substitute a closure.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info};

pub trait OcrEngine {
    /// Reads every line of text the engine can find in the image.
    fn read_lines(&self, image: &[u8]) -> Result<Vec<String>>;
}

impl<F> OcrEngine for F
where
    F: Fn(&[u8]) -> Result<Vec<String>>,
{
    fn read_lines(&self, image: &[u8]) -> Result<Vec<String>> {
        self(image)
    }
}

/// Runs a tesseract-compatible program as `<program> stdin stdout -l <language> [extra args]`,
/// feeding the image on stdin and reading recognized text from stdout.
#[derive(Debug, Clone)]
pub struct CommandOcr {
    pub program: String,
    pub language: String,
    pub extra_args: Vec<String>,
}

impl CommandOcr {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

impl OcrEngine for CommandOcr {
    fn read_lines(&self, image: &[u8]) -> Result<Vec<String>> {
        info!("Running OCR on {} byte image with '{}'", image.len(), self.program);

        let mut child = Command::new(&self.program)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start OCR program '{}'", self.program))?;

        // Dropping stdin after the write closes the pipe so the engine sees EOF.
        {
            let mut stdin = child.stdin.take().context("OCR program stdin was not captured")?;
            stdin
                .write_all(image)
                .context("Failed to send image to OCR program")?;
        }

        let output = child
            .wait_with_output()
            .context("Failed to collect OCR program output")?;
        if !output.status.success() {
            bail!(
                "OCR program '{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let lines = text_lines(&String::from_utf8_lossy(&output.stdout));
        debug!("OCR produced {} lines", lines.len());
        Ok(lines)
    }
}

/// Splits recognized text into trimmed, non-empty lines.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
