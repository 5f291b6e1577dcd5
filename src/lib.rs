// src/lib.rs

pub mod core;
pub mod error;
pub mod persistence;

pub use crate::core::converter::AccentConverter;
pub use crate::core::engine::{ConversionJob, ConvertOptions, Endpoint, ReportFormat};
pub use crate::core::types::ConversionReport;
pub use crate::error::{AccentsError, Result};
