//! Final-page footer blocks and the per-page footer line.

use coa_common::SignatoryRole;

use crate::document::{Block, SignatureEntry};
use crate::pagination::PageSlice;

use super::schema::ResultRow;
use super::LayoutContext;

/// Visible sample count with pass/fail tallies over the whole section.
pub fn totals_block(rows: &[ResultRow]) -> Block {
    Block::Totals {
        samples: rows.len(),
        passed: rows.iter().filter(|r| r.outcome.is_pass()).count(),
        failed: rows.iter().filter(|r| r.outcome.is_fail()).count(),
    }
}

/// One slot per role in report order; absent signatories keep an empty slot.
pub fn signature_block(ctx: &LayoutContext<'_>) -> Block {
    let entries = SignatoryRole::all()
        .iter()
        .map(|role| {
            let signatory = ctx.snapshot.signatory(*role);
            SignatureEntry {
                role: role.label().to_string(),
                name: signatory
                    .map(|s| s.name.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
                image: signatory.and_then(|s| s.signature.clone()),
            }
        })
        .collect();
    Block::Signatures { entries }
}

pub fn legal_warning_block(ctx: &LayoutContext<'_>) -> Block {
    let lab = &ctx.settings.lab;
    Block::LegalWarning {
        lines: lab.legal_warning.clone(),
        confidentiality: lab.confidentiality_notice.clone(),
    }
}

pub fn page_footer(section_name: &str, slice: &PageSlice) -> Block {
    Block::PageFooter {
        label: format!(
            "{} — Page {} of {}",
            section_name,
            slice.page_number(),
            slice.page_count
        ),
        page_number: slice.page_number(),
        page_count: slice.page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use chrono::{TimeZone, Utc};
    use coa_common::{CoaSnapshot, ImageData, SampleContext, Signatory, TestUnit};
    use coa_config::CoaConfig;
    use coa_numeric::Classification;

    fn row(outcome: Classification) -> ResultRow {
        ResultRow {
            cells: Vec::new(),
            outcome,
        }
    }

    #[test]
    fn test_totals_tally() {
        let rows = vec![
            row(Classification::Pass),
            row(Classification::Fail),
            row(Classification::Pass),
            row(Classification::Neutral),
        ];
        assert_eq!(
            totals_block(&rows),
            Block::Totals {
                samples: 4,
                passed: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_signatures_keep_every_role() {
        let settings = CoaConfig::default();
        let report = ReportConfig::default();
        let snapshot = CoaSnapshot {
            unit: Some(TestUnit::new("MIC-1").with_sample(SampleContext::default())),
            signatories: vec![Signatory {
                role: SignatoryRole::LabManager,
                name: "Dr. Okafor".into(),
                signature: Some(ImageData::new("image/png", vec![0x89, 0x50])),
            }],
            ..CoaSnapshot::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let ctx = LayoutContext::new(&settings, &report, &snapshot, now).unwrap();

        let Block::Signatures { entries } = signature_block(&ctx) else {
            panic!("expected signatures");
        };
        assert_eq!(entries.len(), 4);
        assert!(entries[..3].iter().all(|e| e.image.is_none() && e.name.is_none()));
        assert_eq!(entries[3].name.as_deref(), Some("Dr. Okafor"));
        assert!(entries[3].image.is_some());
    }

    #[test]
    fn test_page_footer_label() {
        let slice = PageSlice {
            index: 1,
            page_count: 3,
            rows: 45..90,
        };
        let Block::PageFooter { label, .. } = page_footer("Salmonella", &slice) else {
            panic!("expected footer");
        };
        assert_eq!(label, "Salmonella — Page 2 of 3");
    }
}
