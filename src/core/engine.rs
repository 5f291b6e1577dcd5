use crate::core::converter::AccentConverter;
use crate::core::types::{ConversionReport, PassStats};
use crate::error::{AccentsError, Result};
use crate::persistence::AtomicFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const STDIO_MARKER: &str = "-";

/// One side of a conversion: a named file or the process's standard stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Stdio,
    File(PathBuf),
}

impl Endpoint {
    /// `-` selects stdin or stdout, anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == STDIO_MARKER {
            Endpoint::Stdio
        } else {
            Endpoint::File(PathBuf::from(arg))
        }
    }

    fn path(&self) -> &Path {
        match self {
            Endpoint::Stdio => Path::new(STDIO_MARKER),
            Endpoint::File(path) => path,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// How the final report is printed on the status channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// "N characters were converted."
    #[default]
    Text,
    /// The full report as a JSON object.
    Json,
}

impl ReportFormat {
    pub fn render(&self, report: &ConversionReport) -> Result<String> {
        match self {
            ReportFormat::Text => Ok(report.summary()),
            ReportFormat::Json => Ok(serde_json::to_string(report)?),
        }
    }
}

/// Options that shape a run beyond its two endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub report: ReportFormat,
    /// Style the status line for a terminal.
    pub color: bool,
}

/// A single input-to-output conversion, from opening the streams to the report.
pub struct ConversionJob {
    input: Endpoint,
    output: Endpoint,
    converter: AccentConverter,
}

impl ConversionJob {
    pub fn new(input: Endpoint, output: Endpoint) -> Self {
        Self {
            input,
            output,
            converter: AccentConverter::new(),
        }
    }

    /// Converts a file onto itself. The original is only replaced once the
    /// whole output has been written.
    pub fn in_place(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(Endpoint::File(path.clone()), Endpoint::File(path))
    }

    /// Opens both endpoints, converts, and reports. Any I/O failure ends the
    /// run; a file output is left as it was before the run.
    pub fn run(&self) -> Result<ConversionReport> {
        self.run_with(io::stdin().lock(), io::stdout().lock())
    }

    /// Same as `run`, with `stdin`/`stdout` standing in for the `-` endpoints.
    pub fn run_with<R: BufRead, W: Write>(&self, stdin: R, stdout: W) -> Result<ConversionReport> {
        info!(input = %self.input, output = %self.output, "converting");

        let source = self.open_source(stdin)?;
        let stats = match &self.output {
            Endpoint::Stdio => self.pass(source, BufWriter::new(stdout))?,
            Endpoint::File(path) => {
                let staged = AtomicFile::create(path)?;
                let stats = self.pass(source, BufWriter::new(staged.as_file()))?;
                staged.persist()?;
                stats
            }
        };

        if stats.characters_read == 0 {
            info!(input = %self.input, "input was empty");
        }

        Ok(ConversionReport {
            input: self.input.to_string(),
            output: self.output.to_string(),
            converted: stats.converted,
            characters_read: stats.characters_read,
            bytes_written: stats.bytes_written,
        })
    }

    fn open_source<'a, R: BufRead + 'a>(&self, stdin: R) -> Result<Box<dyn BufRead + 'a>> {
        match &self.input {
            Endpoint::Stdio => Ok(Box::new(stdin)),
            Endpoint::File(path) => {
                let file =
                    File::open(path).map_err(|e| AccentsError::from_read(path.as_path(), e))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }

    fn pass<R: BufRead, W: Write>(&self, source: R, sink: W) -> Result<PassStats> {
        self.converter
            .convert(source, sink)
            .map_err(|e| AccentsError::from_stream(e, self.input.path(), self.output.path()))
    }
}
