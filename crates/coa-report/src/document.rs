//! Structured document model.
//!
//! Layout produces a [`Document`]: an ordered list of pages, each an ordered
//! list of typed blocks. Serializers ([`crate::html`], [`crate::serialize`])
//! turn the model into output; nothing here knows about markup.

use chrono::{DateTime, Utc};
use coa_common::{CoaStatus, ImageData};
use coa_numeric::Classification;
use serde::{Deserialize, Serialize};

/// Visual tone of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Pass,
    Fail,
    Resistant,
    Intermediate,
    Sensitive,
    /// Table header cell.
    Heading,
    /// Placeholder for missing data.
    Muted,
}

impl From<Classification> for Tone {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Pass => Tone::Pass,
            Classification::Fail => Tone::Fail,
            Classification::Neutral => Tone::Neutral,
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub colspan: usize,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub rowspan: usize,
}

fn one() -> usize {
    1
}

fn is_one(n: &usize) -> bool {
    *n == 1
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Neutral,
            colspan: 1,
            rowspan: 1,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(text).with_tone(Tone::Heading)
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self::new(text).with_tone(Tone::Muted)
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_colspan(mut self, colspan: usize) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    pub fn with_rowspan(mut self, rowspan: usize) -> Self {
        self.rowspan = rowspan.max(1);
        self
    }
}

/// A table with one or more header rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub head: Vec<Vec<Cell>>,
    pub rows: Vec<Vec<Cell>>,
    /// Shown in place of the body when `rows` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl TableBlock {
    /// Column count of the widest header row.
    pub fn column_count(&self) -> usize {
        self.head
            .iter()
            .map(|row| row.iter().map(|c| c.colspan).sum::<usize>())
            .max()
            .unwrap_or(0)
    }
}

/// Lab identity, title and report number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub lab_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accreditation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageData>,
    pub title: String,
    pub report_number: String,
    pub draft: bool,
}

/// Label/value pair in the sample-info block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

impl InfoField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Signature slot for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` renders a placeholder box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

/// Ordered content of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header(HeaderBlock),
    SampleInfo { fields: Vec<InfoField> },
    Continued { label: String },
    Results(TableBlock),
    Totals { samples: usize, passed: usize, failed: usize },
    QcReference(TableBlock),
    Signatures { entries: Vec<SignatureEntry> },
    LegalWarning { lines: Vec<String>, confidentiality: String },
    PageFooter { label: String, page_number: usize, page_count: usize },
}

impl Block {
    /// Images this block embeds.
    pub fn image_count(&self) -> usize {
        match self {
            Block::Header(h) => usize::from(h.logo.is_some()),
            Block::Signatures { entries } => entries.iter().filter(|e| e.image.is_some()).count(),
            _ => 0,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header(_) => "header",
            Block::SampleInfo { .. } => "sample_info",
            Block::Continued { .. } => "continued",
            Block::Results(_) => "results",
            Block::Totals { .. } => "totals",
            Block::QcReference(_) => "qc_reference",
            Block::Signatures { .. } => "signatures",
            Block::LegalWarning { .. } => "legal_warning",
            Block::PageFooter { .. } => "page_footer",
        }
    }
}

/// Which track a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTrack {
    Disease,
    Ast,
}

/// One printed A4 page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub section: String,
    pub track: SectionTrack,
    pub page_number: usize,
    pub page_count: usize,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn image_count(&self) -> usize {
        self.blocks.iter().map(Block::image_count).sum()
    }

    pub fn results(&self) -> Option<&TableBlock> {
        self.blocks.iter().find_map(|b| match b {
            Block::Results(table) => Some(table),
            _ => None,
        })
    }

    pub fn has_block(&self, kind: &str) -> bool {
        self.blocks.iter().any(|b| b.kind() == kind)
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub unit_code: String,
    pub status: CoaStatus,
    pub generated_at: DateTime<Utc>,
    pub generator_version: String,
    /// Short fingerprint of the engine configuration used.
    pub config_id: String,
}

/// A complete COA ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub meta: DocumentMeta,
    pub pages: Vec<Page>,
    /// Embed the auto-print script in HTML output.
    #[serde(default)]
    pub auto_print: bool,
    /// Upper bound the auto-print script waits for images.
    #[serde(default)]
    pub image_wait_ms: u64,
}

impl Document {
    /// Number of embedded images, known before anything is rendered.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(Page::image_count).sum()
    }

    pub fn is_draft(&self) -> bool {
        !self.meta.status.is_final()
    }

    /// Pages of one section, in order.
    pub fn section_pages<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Page> + 'a {
        self.pages.iter().filter(move |p| p.section == section)
    }
}
