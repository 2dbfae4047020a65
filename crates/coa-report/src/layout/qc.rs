//! QC-reference table for total-count and water sections.

use coa_common::{Analyte, DiseaseCategory};
use coa_numeric::{format_scientific, Thresholds};

use crate::document::{Cell, TableBlock};

/// Acceptance limits the section was styled against.
///
/// Total-count limits depend on whether the unit holds feed samples; water
/// limits do not.
pub fn qc_reference_table(
    category: DiseaseCategory,
    is_feed_sample: bool,
    thresholds: &Thresholds,
) -> TableBlock {
    let rows: Vec<[String; 3]> = match category {
        DiseaseCategory::TotalCount => {
            let (limit, sample) = if is_feed_sample {
                (thresholds.total_count_feed, "Feed")
            } else {
                (thresholds.total_count_other, "Environmental")
            };
            vec![
                [
                    "Total Bacterial Count".into(),
                    sample.into(),
                    format!("< {} CFU/g", format_scientific(limit)),
                ],
                [
                    Analyte::Mould.label().into(),
                    sample.into(),
                    format!("< {} CFU/g", format_scientific(limit)),
                ],
                [
                    Analyte::PathogenicFungi.label().into(),
                    sample.into(),
                    "Not Detected".into(),
                ],
            ]
        }
        DiseaseCategory::Water => {
            let mut rows = vec![[
                "Total Bacterial Count".to_string(),
                "Water".to_string(),
                format!("≤ {} CFU/mL", format_scientific(thresholds.water_primary)),
            ]];
            rows.extend(Analyte::water_secondary().iter().map(|analyte| {
                [
                    analyte.label().to_string(),
                    "Water".to_string(),
                    format!("≤ {} CFU/100 mL", format_scientific(thresholds.water_secondary)),
                ]
            }));
            rows
        }
        _ => Vec::new(),
    };

    TableBlock {
        caption: Some("Quality Control Reference".into()),
        head: vec![vec![
            Cell::heading("Parameter"),
            Cell::heading("Sample Type"),
            Cell::heading("Acceptable Limit"),
        ]],
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::new).collect())
            .collect(),
        placeholder: None,
    }
}
