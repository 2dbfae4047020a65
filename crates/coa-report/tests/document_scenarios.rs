//! End-to-end layout scenarios and pagination properties.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use coa_common::{
    AstPanel, AstRow, CoaSnapshot, CoaStatus, DiseaseSection, Interpretation, Measurement,
    SampleContext, TestUnit,
};
use coa_config::CoaConfig;
use coa_report::{
    page_count, plan, Block, PageCapacity, ReportConfig, ReportGenerator, SectionTrack,
};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap()
}

fn indexes(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{:03}", i)).collect()
}

fn unit_with(rows: usize, sections: Vec<DiseaseSection>) -> TestUnit {
    let idx = indexes(rows);
    let mut unit = TestUnit::new("MIC-314")
        .with_sample(SampleContext {
            company: "Delta Hatcheries".into(),
            farm: "Farm 2".into(),
            date_received: NaiveDate::from_ymd_opt(2025, 12, 30),
            ..SampleContext::default()
        })
        .with_indexes(idx.iter().map(String::as_str));
    for section in sections {
        unit = unit.with_disease(section);
    }
    unit
}

fn filled(name: &str, rows: usize, value: &str) -> DiseaseSection {
    indexes(rows)
        .iter()
        .fold(DiseaseSection::new(name), |s, i| {
            s.with_result(i.as_str(), Measurement::new(value))
        })
}

fn generator() -> ReportGenerator {
    ReportGenerator::new(CoaConfig::default(), ReportConfig::new().with_minify(false))
}

fn page_rows(snapshot: &CoaSnapshot, section: &str) -> Vec<usize> {
    let doc = generator().assemble(snapshot, now()).unwrap();
    doc.section_pages(section)
        .map(|p| p.results().map(|t| t.rows.len()).unwrap_or(0))
        .collect()
}

fn snapshot_of(unit: TestUnit) -> CoaSnapshot {
    CoaSnapshot {
        unit: Some(unit),
        status: CoaStatus::Completed,
        ..CoaSnapshot::default()
    }
}

#[test]
fn non_qc_section_worked_examples() {
    let snap = snapshot_of(unit_with(30, vec![filled("Salmonella", 30, "Not Detected")]));
    assert_eq!(page_rows(&snap, "Salmonella"), vec![30]);

    let snap = snapshot_of(unit_with(50, vec![filled("Salmonella", 50, "Not Detected")]));
    assert_eq!(page_rows(&snap, "Salmonella"), vec![45, 5]);
}

#[test]
fn qc_section_worked_examples() {
    let snap = snapshot_of(unit_with(26, vec![filled("Total Count", 26, "500")]));
    assert_eq!(page_rows(&snap, "Total Count"), vec![26]);

    let snap = snapshot_of(unit_with(60, vec![filled("Total Count", 60, "500")]));
    assert_eq!(page_rows(&snap, "Total Count"), vec![45, 15]);
}

#[test]
fn hidden_indexes_never_rendered() {
    let section = filled("Salmonella", 10, "Detected").hide("003").hide("007");
    let snap = snapshot_of(unit_with(10, vec![section]));
    let doc = generator().assemble(&snap, now()).unwrap();

    let rendered: Vec<String> = doc
        .section_pages("Salmonella")
        .flat_map(|p| p.results().map(|t| t.rows.clone()).unwrap_or_default())
        .map(|row| row[1].text.clone())
        .collect();
    assert_eq!(rendered.len(), 8);
    assert!(!rendered.contains(&"003".to_string()));
    assert!(!rendered.contains(&"007".to_string()));

    let numbers: Vec<String> = doc.pages[0].results().unwrap().rows.iter().map(|r| r[0].text.clone()).collect();
    assert_eq!(numbers, (1..=8).map(|n| n.to_string()).collect::<Vec<_>>());

    let totals: Vec<&Block> = doc
        .section_pages("Salmonella")
        .flat_map(|p| p.blocks.iter())
        .filter(|b| matches!(b, Block::Totals { .. }))
        .collect();
    assert_eq!(
        totals,
        vec![&Block::Totals {
            samples: 8,
            passed: 0,
            failed: 8
        }]
    );
}

#[test]
fn hidden_set_is_per_section() {
    let salmonella = filled("Salmonella", 5, "Not Detected").hide("001");
    let culture = filled("Culture", 5, "No growth");
    let snap = snapshot_of(unit_with(5, vec![salmonella, culture]));
    let plans = generator().plan(&snap, now()).unwrap();
    assert_eq!(plans[0].visible_rows, 4);
    assert_eq!(plans[0].hidden_rows, 1);
    assert_eq!(plans[1].visible_rows, 5);
}

#[test]
fn numbering_continues_across_pages() {
    let snap = snapshot_of(unit_with(50, vec![filled("Culture", 50, "No growth")]));
    let doc = generator().assemble(&snap, now()).unwrap();
    let second = doc.section_pages("Culture").nth(1).unwrap();
    assert_eq!(second.results().unwrap().rows[0][0].text, "46");
}

#[test]
fn footer_blocks_only_on_final_page() {
    let snap = snapshot_of(unit_with(60, vec![filled("Total Count", 60, "500")]));
    let doc = generator().assemble(&snap, now()).unwrap();
    let pages: Vec<_> = doc.section_pages("Total Count").collect();

    for kind in ["totals", "qc_reference", "signatures", "legal_warning"] {
        assert!(!pages[0].has_block(kind), "{kind} on first page");
        assert!(pages[1].has_block(kind), "{kind} missing on last page");
    }
    assert!(pages.iter().all(|p| p.has_block("page_footer")));

    let totals = pages[1]
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Totals { samples, passed, failed } => Some((*samples, *passed, *failed)),
            _ => None,
        })
        .unwrap();
    assert_eq!(totals, (60, 60, 0));
}

#[test]
fn zero_visible_rows_still_one_page() {
    let section = filled("Salmonella", 2, "Detected").hide("001").hide("002");
    let snap = snapshot_of(unit_with(2, vec![section]));
    let doc = generator().assemble(&snap, now()).unwrap();
    let pages: Vec<_> = doc.section_pages("Salmonella").collect();
    assert_eq!(pages.len(), 1);
    let table = pages[0].results().unwrap();
    assert!(table.rows.is_empty());
    assert!(table.placeholder.is_some());
}

#[test]
fn report_numbers_use_received_year_and_overrides() {
    let mut snap = snapshot_of(unit_with(
        1,
        vec![filled("Water", 1, "3"), filled("Salmonella", 1, "Not Detected")],
    ));
    snap.report_numbers.insert("Salmonella".into(), "SALM-MANUAL-1".into());
    let plans = generator().plan(&snap, now()).unwrap();
    assert_eq!(plans[0].report_number, "WATER25-314");
    assert_eq!(plans[1].report_number, "SALM-MANUAL-1");
}

#[test]
fn ast_section_follows_diseases() {
    let mut snap = snapshot_of(unit_with(1, vec![filled("Culture", 1, "E. coli isolated")]));
    snap.ast = Some(AstPanel {
        include_in_report: true,
        bacterial_family: "Enterobacteriaceae".into(),
        rows: vec![
            AstRow {
                disk: "Enrofloxacin".into(),
                value: Some("12".into()),
                interpretation: Some(Interpretation::Resistant),
                ..AstRow::default()
            },
            AstRow {
                disk: "Colistin".into(),
                ..AstRow::default()
            },
        ],
        ..AstPanel::default()
    });
    let doc = generator().assemble(&snap, now()).unwrap();
    let last = doc.pages.last().unwrap();
    assert_eq!(last.track, SectionTrack::Ast);
    assert_eq!(last.results().unwrap().rows.len(), 1);
    assert!(last.has_block("continued"));
}

#[test]
fn ast_without_renderable_rows_is_skipped() {
    let mut snap = snapshot_of(unit_with(1, vec![filled("Culture", 1, "No growth")]));
    snap.ast = Some(AstPanel {
        include_in_report: true,
        rows: vec![AstRow {
            disk: "Colistin".into(),
            value: Some("   ".into()),
            ..AstRow::default()
        }],
        ..AstPanel::default()
    });
    let doc = generator()
        .assemble(&snap, now())
        .unwrap();
    assert!(doc.pages.iter().all(|p| p.track == SectionTrack::Disease));

    let forced = ReportGenerator::new(CoaConfig::default(), ReportConfig::new().with_include_ast(true));
    let doc = forced.assemble(&snap, now()).unwrap();
    assert!(doc.pages.iter().all(|p| p.track == SectionTrack::Disease));
}

#[test]
fn assembly_is_deterministic() {
    let snap = snapshot_of(unit_with(70, vec![filled("Total Count", 70, "1500"), filled("Water", 70, "12")]));
    let generator = generator();
    let a = generator.assemble(&snap, now()).unwrap();
    let b = generator.assemble(&snap, now()).unwrap();
    assert_eq!(a, b);
    assert_eq!(generator.render_html(&a).unwrap(), generator.render_html(&b).unwrap());
}

proptest! {
    #[test]
    fn rows_are_conserved(
        rows in 0usize..400,
        rows_per_page in 1usize..60,
        last_frac in 0.0f64..1.0,
    ) {
        let last = ((rows_per_page as f64) * last_frac) as usize + 1;
        let capacity = PageCapacity::new(rows_per_page, last);
        let slices = plan(rows, capacity);

        prop_assert_eq!(slices.len(), page_count(rows, capacity));
        prop_assert_eq!(slices.iter().map(|s| s.row_count()).sum::<usize>(), rows);

        let mut expected_start = 0;
        for slice in &slices {
            prop_assert_eq!(slice.rows.start, expected_start);
            expected_start = slice.rows.end;
        }
    }

    #[test]
    fn final_page_respects_footer_space(
        rows in 0usize..400,
        rows_per_page in 1usize..60,
        last_frac in 0.0f64..1.0,
    ) {
        let last = ((rows_per_page as f64) * last_frac) as usize + 1;
        let capacity = PageCapacity::new(rows_per_page, last);
        let slices = plan(rows, capacity);
        let final_slice = slices.last().unwrap();

        prop_assert!(final_slice.row_count() <= capacity.rows_on_last_page);
        if rows > 0 {
            prop_assert!(final_slice.row_count() >= 1);
        }
        for slice in &slices[..slices.len() - 1] {
            prop_assert!(slice.row_count() >= 1);
            prop_assert!(slice.row_count() <= capacity.rows_per_page);
        }
        // Only the page before the final one may give up rows.
        if slices.len() >= 3 {
            for slice in &slices[..slices.len() - 2] {
                prop_assert_eq!(slice.row_count(), capacity.rows_per_page);
            }
        }
    }
}
