//! AST (antimicrobial susceptibility) pages.

use coa_common::{AstPanel, AstRow, Interpretation};

use crate::document::{Block, Cell, Page, SectionTrack, TableBlock, Tone};
use crate::pagination::{plan, PageCapacity};

use super::header::MISSING;
use super::{footer, header, LayoutContext};

/// Section name used for AST pages.
pub const AST_SECTION: &str = "Antimicrobial Susceptibility";

impl From<Interpretation> for Tone {
    fn from(interpretation: Interpretation) -> Self {
        match interpretation {
            Interpretation::Resistant => Tone::Resistant,
            Interpretation::Intermediate => Tone::Intermediate,
            Interpretation::Sensitive => Tone::Sensitive,
        }
    }
}

/// Pages of the AST panel. Only renderable rows are laid out.
pub fn layout_ast_section(
    ctx: &LayoutContext<'_>,
    panel: &AstPanel,
    with_sample_info: bool,
) -> Vec<Page> {
    let rows: Vec<Vec<Cell>> = panel.renderable_rows().into_iter().map(ast_row).collect();
    let capacity = PageCapacity::for_ast(&ctx.settings.pagination.ast);
    let report_number = ctx.ast_report_number();
    let title = ctx.settings.lab.ast_title.clone();

    plan(rows.len(), capacity)
        .iter()
        .map(|slice| {
            let mut blocks = vec![header::header_block(ctx, &title, &report_number)];
            blocks.push(if with_sample_info && slice.is_first() {
                header::sample_info_block(ctx)
            } else {
                header::continued_block(ctx, AST_SECTION)
            });
            blocks.push(Block::Results(ast_table(panel, &rows[slice.rows.clone()])));

            if slice.is_last() {
                blocks.push(footer::signature_block(ctx));
                blocks.push(footer::legal_warning_block(ctx));
            }
            blocks.push(footer::page_footer(AST_SECTION, slice));

            Page {
                section: AST_SECTION.to_string(),
                track: SectionTrack::Ast,
                page_number: slice.page_number(),
                page_count: slice.page_count,
                blocks,
            }
        })
        .collect()
}

fn ast_table(panel: &AstPanel, rows: &[Vec<Cell>]) -> TableBlock {
    let family = if panel.bacterial_family.trim().is_empty() {
        "Breakpoints".to_string()
    } else {
        format!("Breakpoints ({})", panel.bacterial_family.trim())
    };

    let mut caption = Vec::new();
    if let Some(source) = panel.source.as_deref().filter(|s| !s.trim().is_empty()) {
        caption.push(format!("Source: {}", source.trim()));
    }
    if let Some(method) = panel.test_method.as_deref().filter(|s| !s.trim().is_empty()) {
        caption.push(format!("Test Method: {}", method.trim()));
    }

    TableBlock {
        caption: (!caption.is_empty()).then(|| caption.join(" | ")),
        head: vec![
            vec![
                Cell::heading("Antimicrobial Disk").with_rowspan(2),
                Cell::heading("Zone (mm)").with_rowspan(2),
                Cell::heading("Interpretation").with_rowspan(2),
                Cell::heading(family).with_colspan(3),
            ],
            vec![Cell::heading("R"), Cell::heading("I"), Cell::heading("S")],
        ],
        rows: rows.to_vec(),
        placeholder: rows
            .is_empty()
            .then(|| "No susceptibility results to report.".to_string()),
    }
}

fn ast_row(row: &AstRow) -> Vec<Cell> {
    let tone = row.interpretation.map(Tone::from).unwrap_or_default();
    let text_or_missing = |text: &str| {
        if text.trim().is_empty() {
            Cell::muted(MISSING)
        } else {
            Cell::new(text.trim())
        }
    };

    vec![
        Cell::new(row.disk.trim()),
        text_or_missing(row.value.as_deref().unwrap_or_default()).with_tone(tone),
        row.interpretation
            .map(|i| Cell::new(i.letter()).with_tone(tone))
            .unwrap_or_else(|| Cell::muted(MISSING)),
        text_or_missing(&row.breakpoints.resistant),
        text_or_missing(&row.breakpoints.intermediate),
        text_or_missing(&row.breakpoints.sensitive),
    ]
}
