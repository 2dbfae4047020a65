//! Document assembly.

use chrono::{DateTime, Utc};
use coa_common::{AstPanel, CoaSnapshot, DiseaseCategory};
use coa_config::{CoaConfig, ConfigSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::document::{Document, DocumentMeta, Page, SectionTrack};
use crate::error::Result;
use crate::html::render_document;
use crate::layout::ast::{layout_ast_section, AST_SECTION};
use crate::layout::{layout_disease_section, LayoutContext};
use crate::pagination::{plan, PageCapacity};

/// Pagination summary of one section, without rendering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPlan {
    pub section: String,
    pub track: SectionTrack,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<DiseaseCategory>,
    pub report_number: String,
    pub visible_rows: usize,
    pub hidden_rows: usize,
    pub capacity: PageCapacity,
    /// Row count of each page, in order.
    pub page_rows: Vec<usize>,
}

impl SectionPlan {
    pub fn page_count(&self) -> usize {
        self.page_rows.len()
    }
}

/// Assembles COA documents from frozen snapshots.
pub struct ReportGenerator {
    settings: CoaConfig,
    config: ReportConfig,
    config_id: String,
}

impl ReportGenerator {
    /// Create a generator for validated engine settings and output toggles.
    pub fn new(settings: CoaConfig, config: ReportConfig) -> Self {
        let config_id = ConfigSnapshot::from_config(&settings).short_id().to_string();
        Self {
            settings,
            config,
            config_id,
        }
    }

    /// Generator with built-in settings.
    pub fn default_config() -> Self {
        Self::new(CoaConfig::default(), ReportConfig::default())
    }

    pub fn settings(&self) -> &CoaConfig {
        &self.settings
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Whether the AST panel gets its own pages.
    fn includes_ast(&self, panel: &AstPanel) -> bool {
        panel.should_render(self.config.include_ast)
    }

    fn auto_print(&self) -> bool {
        self.config.auto_print.unwrap_or(self.settings.print.auto_print)
    }

    /// Lay out every page of the snapshot.
    ///
    /// Returns `None` when the snapshot has no unit or the unit has no sample
    /// context. The clock is injected so identical input yields identical output.
    pub fn assemble(
        &self,
        snapshot: &CoaSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Option<Document> {
        let ctx = LayoutContext::new(&self.settings, &self.config, snapshot, generated_at)?;
        let mut pages: Vec<Page> = Vec::new();

        for section in &ctx.unit.diseases {
            let section_pages = layout_disease_section(&ctx, section, pages.is_empty());
            debug!(
                section = %section.name,
                category = %section.category,
                pages = section_pages.len(),
                "Section laid out"
            );
            pages.extend(section_pages);
        }

        if let Some(panel) = snapshot.ast.as_ref().filter(|p| self.includes_ast(p)) {
            let ast_pages = layout_ast_section(&ctx, panel, pages.is_empty());
            debug!(pages = ast_pages.len(), "AST section laid out");
            pages.extend(ast_pages);
        }

        let document = Document {
            title: ctx.title(),
            meta: DocumentMeta {
                unit_code: ctx.unit.unit_code.to_string(),
                status: snapshot.status,
                generated_at,
                generator_version: env!("CARGO_PKG_VERSION").to_string(),
                config_id: self.config_id.clone(),
            },
            pages,
            auto_print: self.auto_print(),
            image_wait_ms: self.settings.print.image_wait_timeout_ms,
        };

        info!(
            unit = %document.meta.unit_code,
            pages = document.pages.len(),
            images = document.image_count(),
            "Document assembled"
        );
        Some(document)
    }

    /// Pagination of every section without building pages.
    pub fn plan(
        &self,
        snapshot: &CoaSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Option<Vec<SectionPlan>> {
        let ctx = LayoutContext::new(&self.settings, &self.config, snapshot, generated_at)?;
        let total = ctx.unit.indexes.len();

        let mut plans: Vec<SectionPlan> = ctx
            .unit
            .diseases
            .iter()
            .map(|section| {
                let visible = section.visible_indexes(&ctx.unit.indexes).len();
                let capacity = PageCapacity::for_disease(
                    &self.settings.pagination.disease,
                    section.category.has_qc_table(),
                );
                SectionPlan {
                    section: section.name.clone(),
                    track: SectionTrack::Disease,
                    category: Some(section.category),
                    report_number: ctx.report_number(section),
                    visible_rows: visible,
                    hidden_rows: total.saturating_sub(visible),
                    capacity,
                    page_rows: plan(visible, capacity).iter().map(|s| s.row_count()).collect(),
                }
            })
            .collect();

        if let Some(panel) = snapshot.ast.as_ref().filter(|p| self.includes_ast(p)) {
            let visible = panel.renderable_rows().len();
            let capacity = PageCapacity::for_ast(&self.settings.pagination.ast);
            plans.push(SectionPlan {
                section: AST_SECTION.to_string(),
                track: SectionTrack::Ast,
                category: None,
                report_number: ctx.ast_report_number(),
                visible_rows: visible,
                hidden_rows: panel.rows.len().saturating_sub(visible),
                capacity,
                page_rows: plan(visible, capacity).iter().map(|s| s.row_count()).collect(),
            });
        }

        Some(plans)
    }

    /// Serialize a document to HTML, minified unless disabled.
    pub fn render_html(&self, document: &Document) -> Result<String> {
        let html = render_document(document);

        let output = if self.config.should_minify() {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = output.len(),
            title = %document.title,
            pages = document.pages.len(),
            "Report generated"
        );

        Ok(output)
    }

    /// Serialize a document to pretty JSON.
    pub fn render_json(&self, document: &Document) -> Result<String> {
        crate::serialize::to_json(document)
    }

    /// Assemble and serialize in one step.
    pub fn generate(
        &self,
        snapshot: &CoaSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Result<Option<String>> {
        self.assemble(snapshot, generated_at)
            .map(|doc| self.render_html(&doc))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use coa_common::{
        AstRow, Interpretation, Measurement, SampleContext, DiseaseSection, TestUnit,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 8, 30, 0).unwrap()
    }

    fn snapshot(rows: usize) -> CoaSnapshot {
        let indexes: Vec<String> = (1..=rows).map(|i| i.to_string()).collect();
        let mut salmonella = DiseaseSection::new("Salmonella");
        for index in &indexes {
            salmonella = salmonella.with_result(index.as_str(), Measurement::new("Not Detected"));
        }
        let unit = TestUnit::new("MIC-7")
            .with_sample(SampleContext {
                company: "Acme".into(),
                ..SampleContext::default()
            })
            .with_indexes(indexes.iter().map(String::as_str))
            .with_disease(salmonella)
            .with_disease(DiseaseSection::new("Water"));
        CoaSnapshot {
            unit: Some(unit),
            ..CoaSnapshot::default()
        }
    }

    fn generator() -> ReportGenerator {
        ReportGenerator::new(CoaConfig::default(), ReportConfig::new().with_minify(false))
    }

    #[test]
    fn test_missing_unit_yields_none() {
        let generator = generator();
        assert!(generator.assemble(&CoaSnapshot::default(), now()).is_none());

        let no_sample = CoaSnapshot {
            unit: Some(TestUnit::new("MIC-1")),
            ..CoaSnapshot::default()
        };
        assert!(generator.assemble(&no_sample, now()).is_none());
        assert!(generator.generate(&no_sample, now()).unwrap().is_none());
    }

    #[test]
    fn test_sections_in_order_with_sample_info_once() {
        let doc = generator().assemble(&snapshot(50), now()).unwrap();
        let sections: Vec<&str> = doc.pages.iter().map(|p| p.section.as_str()).collect();
        assert_eq!(sections, vec!["Salmonella", "Salmonella", "Water", "Water"]);

        let with_info = doc.pages.iter().filter(|p| p.has_block("sample_info")).count();
        assert_eq!(with_info, 1);
        assert!(doc.pages[0].has_block("sample_info"));
        assert!(doc.pages[2].has_block("continued"));
    }

    #[test]
    fn test_draft_status_carried() {
        let doc = generator().assemble(&snapshot(1), now()).unwrap();
        assert!(doc.is_draft());
        assert_eq!(doc.meta.unit_code, "MIC-7");
        assert_eq!(doc.meta.generated_at, now());
    }

    #[test]
    fn test_ast_gated_on_renderable_rows() {
        let mut snap = snapshot(1);
        snap.ast = Some(AstPanel {
            include_in_report: true,
            rows: vec![AstRow {
                disk: "Ampicillin".into(),
                ..AstRow::default()
            }],
            ..AstPanel::default()
        });
        let generator = generator();
        let doc = generator.assemble(&snap, now()).unwrap();
        assert!(doc.pages.iter().all(|p| p.track == SectionTrack::Disease));

        if let Some(panel) = snap.ast.as_mut() {
            panel.rows[0].interpretation = Some(Interpretation::Resistant);
        }
        let doc = generator.assemble(&snap, now()).unwrap();
        assert_eq!(doc.pages.last().map(|p| p.track), Some(SectionTrack::Ast));

        let forced_off = ReportGenerator::new(
            CoaConfig::default(),
            ReportConfig::new().with_include_ast(false),
        );
        let doc = forced_off.assemble(&snap, now()).unwrap();
        assert!(doc.pages.iter().all(|p| p.track == SectionTrack::Disease));
    }

    #[test]
    fn test_plan_matches_assembly() {
        let snap = snapshot(40);
        let generator = generator();
        let plans = generator.plan(&snap, now()).unwrap();
        let doc = generator.assemble(&snap, now()).unwrap();

        assert_eq!(plans[0].page_rows, vec![39, 1]);
        assert_eq!(plans[0].report_number, "SALM25-7");
        assert_eq!(plans[1].category, Some(DiseaseCategory::Water));
        assert_eq!(plans[1].page_rows, vec![39, 1]);
        assert_eq!(plans[1].report_number, "WATER25-7");
        let planned: usize = plans.iter().map(SectionPlan::page_count).sum();
        assert_eq!(planned, doc.pages.len());
    }

    #[test]
    fn test_render_html_unminified() {
        let generator = generator();
        let doc = generator.assemble(&snapshot(3), now()).unwrap();
        let html = generator.render_html(&doc).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Salmonella — Page 1 of 1"));
        assert!(html.contains("DRAFT"));
    }
}
