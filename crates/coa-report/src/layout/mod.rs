//! Page layout.
//!
//! Each planned page becomes an ordered block list:
//!
//! 1. header
//! 2. sample info (first page of the first section only) or "(Continued)"
//! 3. results table
//! 4. totals, QC reference, signatures and legal warning (final page only)
//! 5. page footer

pub mod ast;
pub mod footer;
pub mod header;
pub mod qc;
pub mod schema;

use chrono::{DateTime, NaiveDate, Utc};
use coa_common::{
    derive_ast_report_number, derive_report_number, CoaSnapshot, DiseaseSection, SampleContext,
    TestUnit, AST_PREFIX,
};
use coa_config::CoaConfig;

use crate::config::ReportConfig;
use crate::document::{Block, Page, SectionTrack};
use crate::pagination::{plan, PageCapacity, PageSlice};

/// Everything layout reads. Borrowed from one frozen snapshot.
pub struct LayoutContext<'a> {
    pub settings: &'a CoaConfig,
    pub report: &'a ReportConfig,
    pub snapshot: &'a CoaSnapshot,
    pub unit: &'a TestUnit,
    pub sample: &'a SampleContext,
    pub generated_at: DateTime<Utc>,
}

impl<'a> LayoutContext<'a> {
    /// `None` when the snapshot has no unit or the unit has no sample.
    pub fn new(
        settings: &'a CoaConfig,
        report: &'a ReportConfig,
        snapshot: &'a CoaSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Option<Self> {
        let unit = snapshot.unit.as_ref()?;
        let sample = unit.sample.as_ref()?;
        Some(Self {
            settings,
            report,
            snapshot,
            unit,
            sample,
            generated_at,
        })
    }

    /// Received date, or the generation date when the sample has none.
    pub fn reference_date(&self) -> NaiveDate {
        self.unit
            .received_date()
            .unwrap_or_else(|| self.generated_at.date_naive())
    }

    /// Stored report number if present, otherwise derived.
    pub fn report_number(&self, section: &DiseaseSection) -> String {
        self.snapshot
            .report_numbers
            .get(&section.name)
            .cloned()
            .unwrap_or_else(|| {
                derive_report_number(
                    section.category,
                    self.unit.unit_code.as_str(),
                    self.reference_date(),
                )
            })
    }

    pub fn ast_report_number(&self) -> String {
        self.snapshot
            .report_numbers
            .get(AST_PREFIX)
            .cloned()
            .unwrap_or_else(|| {
                derive_ast_report_number(self.unit.unit_code.as_str(), self.reference_date())
            })
    }

    pub fn title(&self) -> String {
        self.report
            .title
            .clone()
            .unwrap_or_else(|| self.settings.lab.report_title.clone())
    }

    pub fn is_draft(&self) -> bool {
        !self.snapshot.status.is_final()
    }

    pub fn is_feed_sample(&self) -> bool {
        self.unit.is_feed_sample()
    }
}

/// Pages of one disease section.
///
/// `with_sample_info` puts the full sample-info block on the first page.
pub fn layout_disease_section(
    ctx: &LayoutContext<'_>,
    section: &DiseaseSection,
    with_sample_info: bool,
) -> Vec<Page> {
    let visible = section.visible_indexes(&ctx.unit.indexes);
    let rows: Vec<schema::ResultRow> = visible
        .iter()
        .enumerate()
        .map(|(i, index)| schema::result_row(ctx, section, index, i + 1))
        .collect();

    let capacity = PageCapacity::for_disease(
        &ctx.settings.pagination.disease,
        section.category.has_qc_table(),
    );
    let slices = plan(rows.len(), capacity);
    let report_number = ctx.report_number(section);
    let title = ctx.title();

    slices
        .iter()
        .map(|slice| {
            let mut blocks = vec![header::header_block(ctx, &title, &report_number)];
            blocks.push(intro_block(ctx, slice, with_sample_info, &section.name));
            blocks.push(Block::Results(schema::results_table(
                section,
                &rows[slice.rows.clone()],
            )));

            if slice.is_last() {
                blocks.push(footer::totals_block(&rows));
                if section.category.has_qc_table() {
                    blocks.push(Block::QcReference(qc::qc_reference_table(
                        section.category,
                        ctx.is_feed_sample(),
                        &ctx.settings.thresholds,
                    )));
                }
                blocks.push(footer::signature_block(ctx));
                blocks.push(footer::legal_warning_block(ctx));
            }
            blocks.push(footer::page_footer(&section.name, slice));

            Page {
                section: section.name.clone(),
                track: SectionTrack::Disease,
                page_number: slice.page_number(),
                page_count: slice.page_count,
                blocks,
            }
        })
        .collect()
}

/// Sample info on the document's very first page; "(Continued)" everywhere else.
fn intro_block(
    ctx: &LayoutContext<'_>,
    slice: &PageSlice,
    with_sample_info: bool,
    section_name: &str,
) -> Block {
    if with_sample_info && slice.is_first() {
        header::sample_info_block(ctx)
    } else {
        header::continued_block(ctx, section_name)
    }
}
