//! Results-table schemas.
//!
//! The column set follows the section's [`DiseaseCategory`]:
//!
//! | category    | columns                                               |
//! |-------------|-------------------------------------------------------|
//! | total count | bacterial count, mould count, pathogenic fungi        |
//! | water       | total bacterial count, coliform, E. coli, Pseudomonas |
//! | salmonella  | result, test portion                                  |
//! | other       | result, isolate type, range                           |
//!
//! Every table starts with a row number and the sample index.

use coa_common::{Analyte, DiseaseCategory, DiseaseSection, Measurement, SampleIndex};
use coa_numeric::{
    classify_value, classify_with, combine_plate_texts, format_scientific,
    format_scientific_notation, is_placeholder, single_plate_text, water_reading_text,
    Classification, SectionKind,
};

use crate::document::{Cell, TableBlock};

use super::header::MISSING;
use super::LayoutContext;

/// One rendered row plus its overall outcome for the totals line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub cells: Vec<Cell>,
    pub outcome: Classification,
}

/// Column headings for a category.
pub fn column_headings(category: DiseaseCategory) -> Vec<&'static str> {
    let mut head = vec!["No.", "Sample"];
    match category {
        DiseaseCategory::TotalCount => {
            head.extend(["Total Bacterial Count", "Mould Count", "Pathogenic Fungi"])
        }
        DiseaseCategory::Water => {
            head.extend(["Total Bacterial Count", "Coliform", "E. coli", "Pseudomonas"])
        }
        DiseaseCategory::Salmonella => head.extend(["Result", "Test Portion"]),
        DiseaseCategory::Culture | DiseaseCategory::Fungi | DiseaseCategory::Other => {
            head.extend(["Result", "Isolate Type", "Range"])
        }
    }
    head
}

/// Build the results table for one page's rows.
pub fn results_table(section: &DiseaseSection, rows: &[ResultRow]) -> TableBlock {
    TableBlock {
        caption: section
            .test_method
            .as_ref()
            .filter(|m| !m.trim().is_empty())
            .map(|m| format!("Test Method: {}", m)),
        head: vec![column_headings(section.category)
            .into_iter()
            .map(Cell::heading)
            .collect()],
        rows: rows.iter().map(|r| r.cells.clone()).collect(),
        placeholder: rows
            .is_empty()
            .then(|| "No results to report for this section.".to_string()),
    }
}

/// Render one visible index as a table row. `number` is 1-based across the section.
pub fn result_row(
    ctx: &LayoutContext<'_>,
    section: &DiseaseSection,
    index: &SampleIndex,
    number: usize,
) -> ResultRow {
    let measurement = section.measurement(index);
    let mut cells = vec![Cell::new(number.to_string()), Cell::new(index.as_str())];
    let mut outcomes = Vec::new();

    let mut push = |cell: Cell, outcome: Classification| {
        outcomes.push(outcome);
        cells.push(cell);
    };

    match section.category {
        DiseaseCategory::TotalCount => {
            let feed = ctx.is_feed_sample();
            let dilution = measurement
                .and_then(|m| m.dilution_factor)
                .unwrap_or(ctx.settings.dilution.total_count_factor);

            let (cell, outcome) = plate_count_cell(
                ctx,
                measurement.map(|m| m.result.as_str()),
                measurement.and_then(|m| m.duplicate.as_deref()),
                dilution,
                feed,
            );
            push(cell, outcome);

            let mould = measurement.and_then(|m| m.analyte(Analyte::Mould));
            let (cell, outcome) = plate_count_cell(
                ctx,
                mould.map(|r| r.value.as_str()),
                mould.and_then(|r| r.duplicate.as_deref()),
                dilution,
                feed,
            );
            push(cell, outcome);

            let fungi = analyte_text(measurement, Analyte::PathogenicFungi);
            let (cell, outcome) = qualitative_cell(ctx, fungi);
            push(cell, outcome);
        }
        DiseaseCategory::Water => {
            let dilution = measurement
                .and_then(|m| m.dilution_factor)
                .unwrap_or(ctx.settings.dilution.water_factor);

            let primary = measurement.map(|m| m.result.as_str());
            let (cell, outcome) = water_cell(ctx, primary, dilution, SectionKind::WaterPrimary);
            push(cell, outcome);

            for analyte in Analyte::water_secondary() {
                let text = analyte_text(measurement, *analyte);
                let (cell, outcome) = water_cell(ctx, text, dilution, SectionKind::WaterSecondary);
                push(cell, outcome);
            }
        }
        DiseaseCategory::Salmonella => {
            let (cell, outcome) = qualitative_cell(ctx, measurement.map(|m| m.result.as_str()));
            push(cell, outcome);
            cells.push(text_cell(section.test_portions.get(index)));
        }
        DiseaseCategory::Culture | DiseaseCategory::Fungi | DiseaseCategory::Other => {
            let (cell, outcome) = qualitative_cell(ctx, measurement.map(|m| m.result.as_str()));
            push(cell, outcome);
            cells.push(text_cell(section.isolate_types.get(index)));
            cells.push(text_cell(section.ranges.get(index)));
        }
    }

    ResultRow {
        cells,
        outcome: row_outcome(&outcomes),
    }
}

/// Any failing cell fails the row; otherwise any passing cell passes it.
fn row_outcome(outcomes: &[Classification]) -> Classification {
    if outcomes.iter().any(|o| o.is_fail()) {
        Classification::Fail
    } else if outcomes.iter().any(|o| o.is_pass()) {
        Classification::Pass
    } else {
        Classification::Neutral
    }
}

fn analyte_text(measurement: Option<&Measurement>, analyte: Analyte) -> Option<&str> {
    measurement
        .and_then(|m| m.analyte(analyte))
        .map(|r| r.value.as_str())
}

fn missing_cell() -> (Cell, Classification) {
    (Cell::muted(MISSING), Classification::Neutral)
}

fn present(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !is_placeholder(t))
}

fn text_cell(text: Option<&String>) -> Cell {
    match text.map(|t| t.trim()).filter(|t| !t.is_empty()) {
        Some(t) => Cell::new(t),
        None => Cell::muted(MISSING),
    }
}

/// `(first + duplicate) / dilution`. Without a duplicate the first reading
/// counts for both plates so the column keeps one scale; unparseable text is
/// shown as entered.
fn plate_count_cell(
    ctx: &LayoutContext<'_>,
    first: Option<&str>,
    duplicate: Option<&str>,
    dilution: f64,
    feed: bool,
) -> (Cell, Classification) {
    let Some(first) = present(first) else {
        return missing_cell();
    };
    let thresholds = &ctx.settings.thresholds;

    let combined = match present(duplicate) {
        Some(duplicate) => combine_plate_texts(first, Some(duplicate), dilution),
        None => single_plate_text(first, dilution),
    };
    let (text, outcome) = match combined {
        Some(value) => (
            format_scientific(value),
            classify_value(value, SectionKind::TotalCount, feed, thresholds),
        ),
        None => (
            format_scientific_notation(first.trim()),
            classify_with(first, SectionKind::TotalCount, feed, thresholds),
        ),
    };
    (Cell::new(text).with_tone(outcome.into()), outcome)
}

/// `(reading × dilution) × volume`, falling back to the raw text.
fn water_cell(
    ctx: &LayoutContext<'_>,
    reading: Option<&str>,
    dilution: f64,
    kind: SectionKind,
) -> (Cell, Classification) {
    let Some(reading) = present(reading) else {
        return missing_cell();
    };
    let thresholds = &ctx.settings.thresholds;
    let volume = ctx.settings.dilution.water_volume;

    let (text, outcome) = match water_reading_text(reading, dilution, volume) {
        Some(value) => (
            format_scientific(value),
            classify_value(value, kind, false, thresholds),
        ),
        None => (
            reading.trim().to_string(),
            classify_with(reading, kind, false, thresholds),
        ),
    };
    (Cell::new(text).with_tone(outcome.into()), outcome)
}

fn qualitative_cell(ctx: &LayoutContext<'_>, text: Option<&str>) -> (Cell, Classification) {
    let Some(text) = present(text) else {
        return missing_cell();
    };
    let outcome = classify_with(
        text,
        SectionKind::Qualitative,
        ctx.is_feed_sample(),
        &ctx.settings.thresholds,
    );
    (Cell::new(text.trim()).with_tone(outcome.into()), outcome)
}
