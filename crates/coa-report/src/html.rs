//! HTML serialization of the document model.
//!
//! The output is a single self-contained file: fixed A4 print style sheet,
//! images as data URIs, no external assets. Every page but the last carries
//! the `page-break` class so the browser starts a new sheet after it.

use coa_common::ImageData;

use crate::document::{Block, Cell, Document, HeaderBlock, Page, SignatureEntry, TableBlock, Tone};

const STYLE: &str = r#"
@page { size: A4; margin: 12mm 10mm; }
* { box-sizing: border-box; }
html, body {
    margin: 0;
    padding: 0;
    -webkit-print-color-adjust: exact;
    print-color-adjust: exact;
}
body { font-family: Arial, Helvetica, sans-serif; font-size: 9pt; color: #111827; }
.page { position: relative; width: 190mm; min-height: 270mm; padding: 0; }
.page-break { page-break-after: always; break-after: page; }
.coa-header { display: flex; align-items: center; gap: 6mm; border-bottom: 2px solid #1f2937; padding-bottom: 3mm; margin-bottom: 3mm; }
.coa-header .logo { max-height: 20mm; max-width: 40mm; }
.coa-header h1 { font-size: 13pt; margin: 0; }
.coa-header .lab-line { font-size: 8pt; color: #4b5563; margin: 0; }
.coa-title { text-align: center; font-size: 12pt; margin: 2mm 0; text-transform: uppercase; }
.report-number { text-align: right; font-weight: bold; }
.draft-marker { color: #b91c1c; font-weight: bold; font-size: 14pt; text-align: center; letter-spacing: 4px; border: 2px solid #b91c1c; margin: 2mm auto; width: 40mm; }
.sample-info { display: grid; grid-template-columns: repeat(2, 1fr); gap: 1mm 6mm; margin: 2mm 0 4mm; }
.sample-info dt { font-weight: bold; display: inline; }
.sample-info dd { display: inline; margin: 0 0 0 2mm; }
.continued { font-style: italic; color: #4b5563; margin: 2mm 0 3mm; }
table { width: 100%; border-collapse: collapse; margin-bottom: 3mm; }
caption { text-align: left; font-weight: bold; padding-bottom: 1mm; }
th, td { border: 1px solid #9ca3af; padding: 1mm 1.5mm; text-align: center; }
th { background: #e5e7eb; }
.placeholder { font-style: italic; color: #6b7280; }
.tone-pass { color: #166534; }
.tone-fail { color: #b91c1c; font-weight: bold; background: #fee2e2; }
.tone-resistant { color: #b91c1c; font-weight: bold; background: #fee2e2; }
.tone-intermediate { color: #92400e; background: #fef3c7; }
.tone-sensitive { color: #166534; background: #dcfce7; }
.tone-muted { color: #9ca3af; }
.totals { font-weight: bold; margin: 1mm 0 3mm; }
.signatures { display: flex; justify-content: space-between; margin-top: 6mm; }
.signature { width: 24%; text-align: center; }
.signature img { max-height: 15mm; max-width: 100%; }
.signature-placeholder { height: 15mm; border: 1px dashed #9ca3af; }
.signatory-name { border-top: 1px solid #111827; margin-top: 1mm; padding-top: 1mm; font-weight: bold; min-height: 4mm; }
.signatory-role { font-size: 8pt; color: #4b5563; }
.legal-warning { font-size: 7pt; color: #374151; margin-top: 4mm; }
.legal-warning p { margin: 0 0 1mm; }
.confidentiality { font-style: italic; }
.page-footer { position: absolute; bottom: 0; width: 100%; text-align: center; font-size: 8pt; color: #6b7280; }
"#;

/// Serialize a document to HTML.
pub fn render_document(document: &Document) -> String {
    let last = document.pages.len().saturating_sub(1);
    let pages: Vec<String> = document
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| render_page(page, i < last))
        .collect();

    let script = if document.auto_print {
        auto_print_script(document.image_wait_ms)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<meta name="generator" content="coa-report {version}">
<meta name="coa-unit" content="{unit}">
<meta name="coa-status" content="{status}">
<style>{style}</style>
</head>
<body>
{pages}
{script}
</body>
</html>"#,
        title = html_escape(&document.title),
        version = html_escape(&document.meta.generator_version),
        unit = html_escape(&document.meta.unit_code),
        status = if document.is_draft() { "draft" } else { "final" },
        style = STYLE,
        pages = pages.join("\n"),
        script = script,
    )
}

fn render_page(page: &Page, page_break: bool) -> String {
    let class = if page_break { "page page-break" } else { "page" };
    let blocks: String = page.blocks.iter().map(render_block).collect();
    format!(
        r#"<div class="{class}" data-section="{section}" data-page="{number}" data-pages="{count}">{blocks}</div>"#,
        class = class,
        section = html_escape(&page.section),
        number = page.page_number,
        count = page.page_count,
        blocks = blocks,
    )
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Header(header) => render_header(header),
        Block::SampleInfo { fields } => {
            let items: String = fields
                .iter()
                .map(|f| {
                    format!(
                        "<div><dt>{}:</dt><dd>{}</dd></div>",
                        html_escape(&f.label),
                        html_escape(&f.value)
                    )
                })
                .collect();
            format!(r#"<dl class="sample-info">{}</dl>"#, items)
        }
        Block::Continued { label } => {
            format!(r#"<div class="continued">{}</div>"#, html_escape(label))
        }
        Block::Results(table) => render_table(table, "results"),
        Block::Totals {
            samples,
            passed,
            failed,
        } => format!(
            r#"<div class="totals">Total samples: {} | Passed: {} | Failed: {}</div>"#,
            samples, passed, failed
        ),
        Block::QcReference(table) => render_table(table, "qc-reference"),
        Block::Signatures { entries } => {
            let slots: String = entries.iter().map(render_signature).collect();
            format!(r#"<div class="signatures">{}</div>"#, slots)
        }
        Block::LegalWarning {
            lines,
            confidentiality,
        } => {
            let body: String = lines
                .iter()
                .map(|l| format!("<p>{}</p>", html_escape(l)))
                .collect();
            format!(
                r#"<div class="legal-warning">{}<p class="confidentiality">{}</p></div>"#,
                body,
                html_escape(confidentiality)
            )
        }
        Block::PageFooter { label, .. } => {
            format!(r#"<footer class="page-footer">{}</footer>"#, html_escape(label))
        }
    }
}

fn render_header(header: &HeaderBlock) -> String {
    let logo = header
        .logo
        .as_ref()
        .map(|img| image_tag(img, "logo", "Laboratory logo"))
        .unwrap_or_default();
    let lines: String = [&header.address, &header.accreditation, &header.contact]
        .into_iter()
        .flatten()
        .map(|line| format!(r#"<p class="lab-line">{}</p>"#, html_escape(line)))
        .collect();
    let draft = if header.draft {
        r#"<div class="draft-marker">DRAFT</div>"#
    } else {
        ""
    };

    format!(
        r#"<header class="coa-header">{logo}<div><h1>{name}</h1>{lines}</div></header><h2 class="coa-title">{title}</h2>{draft}<div class="report-number">Report No: {number}</div>"#,
        logo = logo,
        name = html_escape(&header.lab_name),
        lines = lines,
        title = html_escape(&header.title),
        draft = draft,
        number = html_escape(&header.report_number),
    )
}

fn render_table(table: &TableBlock, class: &str) -> String {
    let mut html = format!(r#"<table class="{}">"#, class);
    if let Some(caption) = &table.caption {
        html.push_str(&format!("<caption>{}</caption>", html_escape(caption)));
    }

    html.push_str("<thead>");
    for row in &table.head {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&render_cell("th", cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</thead><tbody>");

    if table.rows.is_empty() {
        if let Some(placeholder) = &table.placeholder {
            html.push_str(&format!(
                r#"<tr><td class="placeholder" colspan="{}">{}</td></tr>"#,
                table.column_count().max(1),
                html_escape(placeholder)
            ));
        }
    }
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&render_cell("td", cell));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

fn render_cell(tag: &str, cell: &Cell) -> String {
    let mut attrs = String::new();
    if let Some(class) = tone_class(cell.tone) {
        attrs.push_str(&format!(r#" class="{}""#, class));
    }
    if cell.colspan > 1 {
        attrs.push_str(&format!(r#" colspan="{}""#, cell.colspan));
    }
    if cell.rowspan > 1 {
        attrs.push_str(&format!(r#" rowspan="{}""#, cell.rowspan));
    }
    format!("<{tag}{attrs}>{}</{tag}>", html_escape(&cell.text))
}

/// CSS class for a tone; neutral and heading cells need none.
pub fn tone_class(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Neutral | Tone::Heading => None,
        Tone::Pass => Some("tone-pass"),
        Tone::Fail => Some("tone-fail"),
        Tone::Resistant => Some("tone-resistant"),
        Tone::Intermediate => Some("tone-intermediate"),
        Tone::Sensitive => Some("tone-sensitive"),
        Tone::Muted => Some("tone-muted"),
    }
}

fn render_signature(entry: &SignatureEntry) -> String {
    let image = match &entry.image {
        Some(img) => image_tag(img, "signature-image", &entry.role),
        None => r#"<div class="signature-placeholder"></div>"#.to_string(),
    };
    format!(
        r#"<div class="signature">{}<div class="signatory-name">{}</div><div class="signatory-role">{}</div></div>"#,
        image,
        html_escape(entry.name.as_deref().unwrap_or_default()),
        html_escape(&entry.role)
    )
}

fn image_tag(image: &ImageData, class: &str, alt: &str) -> String {
    format!(
        r#"<img class="{}" src="{}" alt="{}">"#,
        class,
        html_escape(&image.to_data_uri()),
        html_escape(alt)
    )
}

/// Print once every image has loaded or failed, or after `wait_ms`.
fn auto_print_script(wait_ms: u64) -> String {
    format!(
        r#"<script>
(function () {{
    var printed = false;
    function trigger() {{
        if (printed) {{ return; }}
        printed = true;
        window.print();
    }}
    var images = Array.prototype.slice.call(document.images);
    var pending = images.length;
    function settle() {{
        pending -= 1;
        if (pending <= 0) {{ trigger(); }}
    }}
    images.forEach(function (img) {{
        if (img.complete) {{
            settle();
        }} else {{
            img.addEventListener('load', settle);
            img.addEventListener('error', settle);
        }}
    }});
    if (pending <= 0) {{ trigger(); }}
    setTimeout(trigger, {wait_ms});
}})();
</script>"#,
        wait_ms = wait_ms
    )
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
