// File: src/error.rs
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that abort a conversion run.
///
/// The converter has no per-character failure mode; every variant here comes
/// from one of the two streams it is handed.
#[derive(Error, Debug)]
pub enum AccentsError {
    #[error("Error : could not open the input file '{}'.", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error : could not create the output file '{}'.", .path.display())]
    SinkUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error : the input file '{}' is not valid UTF-8 text.", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error : could not serialize the conversion report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AccentsError>;

/// Which side of a conversion pass failed. The converter only knows its two
/// streams, not the paths behind them.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl AccentsError {
    /// Classifies a read-side I/O error. The converter reports invalid UTF-8
    /// as `InvalidData`.
    pub fn from_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::InvalidData {
            AccentsError::Decode { path, source }
        } else {
            AccentsError::SourceUnreadable { path, source }
        }
    }

    pub fn from_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AccentsError::SinkUnwritable { path: path.into(), source }
    }

    /// Attaches the input and output paths to a failed conversion pass.
    pub fn from_stream(err: StreamError, input: &Path, output: &Path) -> Self {
        match err {
            StreamError::Read(source) => Self::from_read(input, source),
            StreamError::Write(source) => Self::from_write(output, source),
        }
    }
}
