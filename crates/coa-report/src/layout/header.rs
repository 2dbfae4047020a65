//! Page header and sample-info blocks.

use crate::document::{Block, HeaderBlock, InfoField};

use super::LayoutContext;

/// Placeholder for absent sample fields.
pub const MISSING: &str = "-";

pub fn header_block(ctx: &LayoutContext<'_>, title: &str, report_number: &str) -> Block {
    let lab = &ctx.settings.lab;
    Block::Header(HeaderBlock {
        lab_name: lab.name.clone(),
        address: lab.address.clone(),
        accreditation: lab.accreditation.clone(),
        contact: lab.contact.clone(),
        logo: ctx.snapshot.logo.clone(),
        title: title.to_string(),
        report_number: report_number.to_string(),
        draft: ctx.is_draft(),
    })
}

/// Compact header for every page after the document's first.
pub fn continued_block(ctx: &LayoutContext<'_>, section_name: &str) -> Block {
    Block::Continued {
        label: format!(
            "{} | {} | {} (Continued)",
            ctx.unit.unit_code,
            or_missing(&ctx.sample.company),
            section_name
        ),
    }
}

pub fn sample_info_block(ctx: &LayoutContext<'_>) -> Block {
    let sample = ctx.sample;
    let unit = ctx.unit;

    let mut fields = vec![
        InfoField::new("Company", or_missing(&sample.company)),
        InfoField::new("Farm", or_missing(&sample.farm)),
        InfoField::new("Unit Code", unit.unit_code.as_str()),
        InfoField::new(
            "Date Received",
            sample
                .date_received
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        ),
        InfoField::new(
            "Date Tested",
            ctx.snapshot
                .date_tested
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        ),
    ];

    let optional = [
        ("Sample Code", sample.sample_code.clone()),
        ("Flock", sample.flock.clone()),
        ("Cycle", sample.cycle.clone()),
        ("Houses", join_list(&unit.houses)),
        ("Age", unit.age.clone()),
        ("Source", unit.source.clone()),
        ("Sample Type", join_list(&unit.sample_types)),
        ("Batch No.", unit.batch_no.clone()),
        ("Fumigation", unit.fumigation.clone()),
        ("Technician", unit.technician.clone()),
        ("Notes", ctx.snapshot.notes.clone()),
    ];
    fields.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.filter(|v| !v.trim().is_empty()).map(|v| InfoField::new(label, v))),
    );

    Block::SampleInfo { fields }
}

fn or_missing(value: &str) -> &str {
    if value.trim().is_empty() {
        MISSING
    } else {
        value
    }
}

fn join_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}
