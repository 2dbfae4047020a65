//! JSON and text serializations of documents and section plans.

use crate::document::Document;
use crate::error::Result;
use crate::generator::SectionPlan;

/// Pretty JSON of the full document model.
pub fn to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a document previously written by [`to_json`].
pub fn from_json(json: &str) -> Result<Document> {
    Ok(serde_json::from_str(json)?)
}

/// Markdown table of section plans.
pub fn plans_to_markdown(plans: &[SectionPlan]) -> String {
    let mut out = String::from(
        "| Section | Report No. | Visible | Hidden | Capacity | Pages |\n\
         |---|---|---:|---:|---|---|\n",
    );
    for plan in plans {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {}/{} | {} |\n",
            plan.section,
            plan.report_number,
            plan.visible_rows,
            plan.hidden_rows,
            plan.capacity.rows_per_page,
            plan.capacity.rows_on_last_page,
            page_split(plan),
        ));
    }
    out
}

/// One line per section.
pub fn plans_summary(plans: &[SectionPlan]) -> String {
    let pages: usize = plans.iter().map(SectionPlan::page_count).sum();
    let mut out = format!("{} section(s), {} page(s)\n", plans.len(), pages);
    for plan in plans {
        out.push_str(&format!(
            "  {}: {} row(s) -> {}\n",
            plan.section,
            plan.visible_rows,
            page_split(plan)
        ));
    }
    out
}

fn page_split(plan: &SectionPlan) -> String {
    let rows: Vec<String> = plan.page_rows.iter().map(|r| r.to_string()).collect();
    format!("[{}]", rows.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SectionTrack;
    use crate::pagination::PageCapacity;
    use coa_common::DiseaseCategory;

    fn plan() -> SectionPlan {
        SectionPlan {
            section: "Salmonella".into(),
            track: SectionTrack::Disease,
            category: Some(DiseaseCategory::Salmonella),
            report_number: "SALM25-7".into(),
            visible_rows: 50,
            hidden_rows: 2,
            capacity: PageCapacity::new(45, 34),
            page_rows: vec![45, 5],
        }
    }

    #[test]
    fn test_markdown_row() {
        let md = plans_to_markdown(&[plan()]);
        assert!(md.contains("| Salmonella | SALM25-7 | 50 | 2 | 45/34 | [45, 5] |"));
    }

    #[test]
    fn test_summary() {
        let summary = plans_summary(&[plan()]);
        assert!(summary.starts_with("1 section(s), 2 page(s)"));
        assert!(summary.contains("Salmonella: 50 row(s) -> [45, 5]"));
    }
}
