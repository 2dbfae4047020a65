//! Snapshot data model.

pub mod ast;
pub mod image;
pub mod measurement;
pub mod section;
pub mod signatory;
pub mod snapshot;
pub mod unit;

pub use ast::{AstPanel, AstRow, Breakpoints, Interpretation};
pub use image::ImageData;
pub use measurement::{Analyte, AnalyteReading, Measurement};
pub use section::DiseaseSection;
pub use signatory::{Signatory, SignatoryRole};
pub use snapshot::{CoaSnapshot, CoaStatus};
pub use unit::{SampleContext, TestUnit};
