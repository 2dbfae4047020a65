//! Certificate-of-analysis document synthesis.
//!
//! Turns a frozen [`coa_common::CoaSnapshot`] into a paginated, print-ready
//! document: one page set per disease section, an optional AST section, and a
//! single self-contained HTML file (or the JSON page model).
//!
//! # Pipeline
//!
//! - [`pagination`]: pure row distribution per section
//! - [`layout`]: typed blocks per page (header, results, footers)
//! - [`html`] / [`serialize`]: output serializers
//! - [`print`]: export state machine with the bounded image wait
//!
//! # Example
//!
//! ```no_run
//! use coa_common::CoaSnapshot;
//! use coa_config::CoaConfig;
//! use coa_report::{ReportConfig, ReportGenerator};
//! use std::path::Path;
//!
//! let snapshot = CoaSnapshot::load(Path::new("unit.json")).unwrap();
//! let generator = ReportGenerator::new(CoaConfig::default(), ReportConfig::default());
//! if let Some(document) = generator.assemble(&snapshot, chrono::Utc::now()) {
//!     let html = generator.render_html(&document).unwrap();
//!     std::fs::write("coa.html", html).unwrap();
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod html;
pub mod layout;
pub mod pagination;
pub mod print;
pub mod serialize;

pub use config::ReportConfig;
pub use document::{Block, Cell, Document, DocumentMeta, Page, SectionTrack, TableBlock, Tone};
pub use error::{ReportError, Result};
pub use generator::{ReportGenerator, SectionPlan};
pub use pagination::{page_count, plan, PageCapacity, PageSlice};
pub use print::{
    wait_for_images, ExportReport, ExportState, Exporter, FileSurface, ImageEvent, MemorySurface,
    PrintSurface, WaitOutcome,
};
