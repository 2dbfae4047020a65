//! COA synthesis CLI.
//!
//! The main entry point for coa-core, handling:
//! - Rendering a unit snapshot to a paginated HTML (or JSON) certificate
//! - Exporting to a print surface with the bounded image wait
//! - Pagination plans, report numbers and hidden-index diffs
//! - Configuration inspection and validation

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use coa_common::{
    derive_ast_report_number, derive_report_number, diff_hidden_indexes, CoaStatus,
    DiseaseCategory, OutputFormat, StructuredError, SCHEMA_VERSION,
};
use coa_config::{load_config, ConfigSnapshot, LoadedConfig};
use coa_core::error::{CliError, Result};
use coa_core::exit_codes::ExitCode;
use coa_core::input::{load_snapshot, parse_status, write_output, RoleAssignment, SnapshotOverlay};
use coa_core::log_event;
use coa_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogEvent, LogFormat, Stage,
};
use coa_report::serialize::{plans_summary, plans_to_markdown};
use coa_report::{ExportReport, Exporter, FileSurface, ReportConfig, ReportGenerator, WaitOutcome};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Certificate-of-analysis synthesis: paginated, print-ready lab reports
#[derive(Parser)]
#[command(name = "coa-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Engine configuration file (coa.toml / coa.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a unit snapshot to a certificate document
    Render(RenderArgs),

    /// Render and send to the print surface, waiting for embedded images
    Export(ExportArgs),

    /// Show per-section pagination without rendering
    Plan(PlanArgs),

    /// Validate configuration and, optionally, a snapshot
    Check(CheckArgs),

    /// Derive report numbers
    ReportNumber(ReportNumberArgs),

    /// Describe hidden-index changes between two snapshots
    HiddenDiff(HiddenDiffArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print version information
    Version,
}

/// Layout toggles shared by render, export and plan.
#[derive(Args, Debug, Default)]
struct LayoutArgs {
    /// Override the lab profile's report title
    #[arg(long)]
    title: Option<String>,

    /// Always include the AST section when it has renderable rows
    #[arg(long, conflicts_with = "no_ast")]
    ast: bool,

    /// Never include the AST section
    #[arg(long)]
    no_ast: bool,

    /// Generation timestamp (RFC 3339); defaults to now
    #[arg(long)]
    generated_at: Option<DateTime<Utc>>,
}

impl LayoutArgs {
    fn report_config(&self) -> ReportConfig {
        let mut config = ReportConfig::new();
        if let Some(title) = &self.title {
            config = config.with_title(title.clone());
        }
        if self.ast {
            config = config.with_include_ast(true);
        } else if self.no_ast {
            config = config.with_include_ast(false);
        }
        config
    }

    fn now(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}

/// Image and signer overlays applied to the snapshot before layout.
#[derive(Args, Debug, Default)]
struct OverlayArgs {
    /// Lab logo image file
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Signature image for a role, e.g. tested-by=sig.png (repeatable)
    #[arg(long = "signature", value_name = "ROLE=FILE")]
    signatures: Vec<RoleAssignment>,

    /// Signer name for a role, e.g. "lab-manager=Dr. A. Osei" (repeatable)
    #[arg(long = "signer", value_name = "ROLE=NAME")]
    signers: Vec<RoleAssignment>,

    /// COA status (draft, need-approval, completed)
    #[arg(long, value_parser = parse_status)]
    status: Option<CoaStatus>,
}

impl OverlayArgs {
    fn overlay(&self) -> SnapshotOverlay {
        SnapshotOverlay {
            logo: self.logo.clone(),
            signatures: self.signatures.clone(),
            signers: self.signers.clone(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderTarget {
    /// Self-contained HTML
    Html,
    /// JSON page model
    Json,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Snapshot JSON file ("-" for stdin)
    snapshot: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document serialization
    #[arg(long = "as", value_enum, default_value = "html")]
    target: RenderTarget,

    /// Skip HTML minification
    #[arg(long)]
    no_minify: bool,

    /// Embed the script that prints once images settle
    #[arg(long)]
    auto_print: bool,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(flatten)]
    overlay: OverlayArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Snapshot JSON file ("-" for stdin)
    snapshot: PathBuf,

    /// Document written to the print surface
    #[arg(short, long)]
    output: PathBuf,

    /// Override print.image_wait_timeout_ms
    #[arg(long)]
    image_timeout_ms: Option<u64>,

    /// Append export events as JSON lines to this file
    #[arg(long)]
    events: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(flatten)]
    overlay: OverlayArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Snapshot JSON file ("-" for stdin)
    snapshot: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Snapshot to validate alongside the configuration
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReportNumberArgs {
    /// Report numbers of every section in this snapshot
    #[arg(long, conflicts_with_all = ["unit_code", "disease", "ast"])]
    snapshot: Option<PathBuf>,

    /// Unit code, e.g. MIC-42
    #[arg(long, required_unless_present = "snapshot")]
    unit_code: Option<String>,

    /// Disease name, classified into a report category
    #[arg(long, required_unless_present_any = ["snapshot", "ast"])]
    disease: Option<String>,

    /// Derive the AST report number instead of a disease one
    #[arg(long, conflicts_with = "disease")]
    ast: bool,

    /// Received date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct HiddenDiffArgs {
    /// Snapshot before the edit
    old: PathBuf,

    /// Snapshot after the edit
    new: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,
    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the resolved configuration)
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Target shell
    shell: clap_complete::Shell,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_cli(
        cli.global.verbose,
        cli.global.quiet,
        cli.global.log_format,
    ));

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "coa-core started");

    let global = &cli.global;
    let result = match &cli.command {
        Commands::Render(args) => run_render(global, &ctx, args),
        Commands::Export(args) => run_export(global, &ctx, args),
        Commands::Plan(args) => run_plan(global, &ctx, args),
        Commands::Check(args) => run_check(global, args),
        Commands::ReportNumber(args) => run_report_number(global, args),
        Commands::HiddenDiff(args) => run_hidden_diff(global, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(global),
            ConfigCommands::Validate { path } => run_config_validate(global, path.as_deref()),
        },
        Commands::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "coa-core",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::Clean)
        }
        Commands::Version => {
            print_version(global);
            Ok(ExitCode::Clean)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(global, &ctx, &err),
    };
    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "coa-core finished",
        exit_code = exit_code.as_i32()
    );

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load_settings(global: &GlobalOpts) -> Result<LoadedConfig> {
    let loaded = load_config(global.config.as_deref())?;
    tracing::debug!(source = %loaded.source, path = ?loaded.path, "Settings resolved");
    Ok(loaded)
}

/// Load the snapshot and apply overlays; tags `ctx` with the unit code.
fn prepare_snapshot(
    ctx: &LogContext,
    path: &Path,
    overlay: &SnapshotOverlay,
) -> Result<(coa_common::CoaSnapshot, LogContext)> {
    let mut snapshot = load_snapshot(path)?;
    overlay.apply(&mut snapshot)?;

    let ctx = match snapshot.unit.as_ref() {
        Some(unit) => ctx.clone().with_unit_code(unit.unit_code.as_str()),
        None => ctx.clone(),
    };
    log_event!(
        ctx,
        INFO,
        event_names::SNAPSHOT_LOADED,
        Stage::Load,
        "Snapshot loaded",
        path = tracing::field::display(path.display()),
        status = tracing::field::debug(snapshot.status)
    );
    Ok((snapshot, ctx))
}

fn nothing_to_render(global: &GlobalOpts, ctx: &LogContext) -> ExitCode {
    log_event!(
        ctx,
        WARN,
        event_names::SNAPSHOT_EMPTY,
        Stage::Assemble,
        "Snapshot has no unit or sample context"
    );
    let message = "Snapshot has no unit or sample context; nothing rendered";
    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "status": "empty",
            "message": message,
        }),
        || format!("# coa-core\n\n{}\n", message),
        || format!("empty: {}", message),
    );
    ExitCode::NothingToRender
}

/// Print a command result in the selected format.
fn emit(
    global: &GlobalOpts,
    json: &serde_json::Value,
    md: impl FnOnce() -> String,
    summary: impl FnOnce() -> String,
) {
    match global.format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
            println!("{}", text);
        }
        OutputFormat::Md => print!("{}", md()),
        OutputFormat::Summary => println!("{}", summary()),
    }
}

/// Report an error on stderr in the selected format.
fn output_error(global: &GlobalOpts, ctx: &LogContext, error: &CliError) -> ExitCode {
    let exit_code = error.exit_code();
    log_event!(
        ctx,
        ERROR,
        event_names::INTERNAL_ERROR,
        Stage::Init,
        "Command failed",
        code = error.code(),
        exit = exit_code.code_name()
    );

    match global.format {
        OutputFormat::Json => {
            let structured: StructuredError = error.to_structured();
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "error",
                "error": structured,
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
            );
        }
        OutputFormat::Summary => eprintln!("error: {} [{}]", error, exit_code),
        OutputFormat::Md => eprintln!("{}", error.to_human()),
    }
    exit_code
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_render(global: &GlobalOpts, ctx: &LogContext, args: &RenderArgs) -> Result<ExitCode> {
    let settings = load_settings(global)?;
    let (snapshot, ctx) = prepare_snapshot(ctx, &args.snapshot, &args.overlay.overlay())?;

    let mut report_config = args.layout.report_config();
    if args.no_minify {
        report_config = report_config.with_minify(false);
    }
    if args.auto_print {
        report_config = report_config.with_auto_print(true);
    }
    let generator = ReportGenerator::new(settings.config, report_config);

    let Some(document) = generator.assemble(&snapshot, args.layout.now()) else {
        return Ok(nothing_to_render(global, &ctx));
    };
    log_event!(
        ctx,
        INFO,
        event_names::DOCUMENT_ASSEMBLED,
        Stage::Assemble,
        "Document assembled",
        pages = document.pages.len(),
        images = document.image_count()
    );

    let payload = match args.target {
        RenderTarget::Html => generator.render_html(&document)?,
        RenderTarget::Json => generator.render_json(&document)?,
    };
    write_output(args.output.as_deref(), &payload)?;

    if let Some(path) = &args.output {
        log_event!(
            ctx,
            INFO,
            event_names::DOCUMENT_WRITTEN,
            Stage::Render,
            "Document written",
            path = tracing::field::display(path.display()),
            bytes = payload.len()
        );
        emit(
            global,
            &serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "ok",
                "unit_code": document.meta.unit_code,
                "path": path.display().to_string(),
                "pages": document.pages.len(),
                "images": document.image_count(),
                "bytes": payload.len(),
                "draft": document.is_draft(),
                "config_id": document.meta.config_id,
            }),
            || {
                format!(
                    "# coa-core render\n\n- Unit: {}\n- Output: {}\n- Pages: {}\n- Images: {}\n",
                    document.meta.unit_code,
                    path.display(),
                    document.pages.len(),
                    document.image_count()
                )
            },
            || {
                format!(
                    "{}: {} page(s) -> {}",
                    document.meta.unit_code,
                    document.pages.len(),
                    path.display()
                )
            },
        );
    }
    Ok(ExitCode::Clean)
}

fn run_export(global: &GlobalOpts, ctx: &LogContext, args: &ExportArgs) -> Result<ExitCode> {
    let settings = load_settings(global)?;
    let (snapshot, ctx) = prepare_snapshot(ctx, &args.snapshot, &args.overlay.overlay())?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let generator = ReportGenerator::new(settings.config, args.layout.report_config());
    let mut exporter = Exporter::new(generator, FileSurface::new(&args.output));
    if let Some(ms) = args.image_timeout_ms {
        exporter = exporter.with_image_timeout(Duration::from_millis(ms));
    }

    let report = match exporter.export(&snapshot, args.layout.now()) {
        Ok(Some(report)) => report,
        Ok(None) => return Ok(nothing_to_render(global, &ctx)),
        Err(err) => {
            log_event!(ctx, ERROR, event_names::EXPORT_ERROR, Stage::Print, "Export failed", code = err.code());
            return Err(err.into());
        }
    };

    let events = export_events(&ctx, &report);
    for event in &events {
        tracing::debug!(event = %event.event, stage = %event.stage, "{}", event.message);
    }
    if let Some(path) = &args.events {
        append_events(path, &events)?;
    }

    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "status": if report.wait.is_settled() { "ok" } else { "images_pending" },
            "run_id": ctx.run_id,
            "path": args.output.display().to_string(),
            "report": report,
        }),
        || export_markdown(&report, &args.output),
        || {
            format!(
                "{}: {} page(s), {} image(s), {} -> {}",
                report.unit_code,
                report.pages,
                report.images,
                wait_label(&report.wait),
                args.output.display()
            )
        },
    );

    Ok(if report.wait.is_settled() {
        ExitCode::Clean
    } else {
        ExitCode::ImagesPending
    })
}

fn wait_label(wait: &WaitOutcome) -> String {
    match wait {
        WaitOutcome::Settled { loaded, errored } => {
            format!("images settled ({} loaded, {} errored)", loaded, errored)
        }
        WaitOutcome::TimedOut { settled, expected } => {
            format!("image wait timed out ({}/{})", settled, expected)
        }
        WaitOutcome::SurfaceClosed { settled, expected } => {
            format!("surface closed ({}/{})", settled, expected)
        }
    }
}

fn export_markdown(report: &ExportReport, output: &Path) -> String {
    let states: Vec<String> = report.states.iter().map(|s| s.to_string()).collect();
    format!(
        "# coa-core export\n\n- Unit: {}\n- Output: {}\n- Pages: {}\n- Images: {}\n- Wait: {}\n- States: {}\n",
        report.unit_code,
        output.display(),
        report.pages,
        report.images,
        wait_label(&report.wait),
        states.join(" → ")
    )
}

/// Event trail of one export, in order.
fn export_events(ctx: &LogContext, report: &ExportReport) -> Vec<LogEvent> {
    let mut events = vec![ctx
        .info(
            event_names::DOCUMENT_ASSEMBLED,
            Stage::Assemble,
            "Document assembled",
        )
        .with_field("pages", report.pages)
        .with_field("images", report.images)
        .with_field("bytes", report.bytes)];

    let wait = if report.wait.is_settled() {
        ctx.info(
            event_names::EXPORT_IMAGES_SETTLED,
            Stage::WaitImages,
            "Images settled",
        )
    } else {
        log_event!(
            ctx,
            WARN,
            event_names::EXPORT_IMAGES_TIMED_OUT,
            Stage::WaitImages,
            "Printed before every image settled"
        );
        ctx.warn(
            event_names::EXPORT_IMAGES_TIMED_OUT,
            Stage::WaitImages,
            wait_label(&report.wait),
        )
    };
    events.push(wait.with_field("wait", report.wait));

    events.push(
        ctx.info(event_names::EXPORT_PRINTED, Stage::Print, "Print triggered")
            .with_field("states", &report.states),
    );
    events
}

fn append_events(path: &Path, events: &[LogEvent]) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    for event in events {
        writeln!(file, "{}", event.to_jsonl())?;
    }
    Ok(())
}

fn run_plan(global: &GlobalOpts, ctx: &LogContext, args: &PlanArgs) -> Result<ExitCode> {
    let settings = load_settings(global)?;
    let (snapshot, ctx) = prepare_snapshot(ctx, &args.snapshot, &SnapshotOverlay::default())?;
    let generator = ReportGenerator::new(settings.config, args.layout.report_config());

    let Some(plans) = generator.plan(&snapshot, args.layout.now()) else {
        return Ok(nothing_to_render(global, &ctx));
    };
    let pages: usize = plans.iter().map(|p| p.page_count()).sum();
    log_event!(
        ctx,
        INFO,
        event_names::DOCUMENT_ASSEMBLED,
        Stage::Paginate,
        "Pagination planned",
        sections = plans.len(),
        pages = pages
    );

    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "unit_code": ctx.unit_code,
            "pages": pages,
            "sections": plans,
        }),
        || format!("# coa-core plan\n\n{}", plans_to_markdown(&plans)),
        || plans_summary(&plans).trim_end().to_string(),
    );
    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> Result<ExitCode> {
    let mut results: Vec<serde_json::Value> = Vec::new();
    let mut failure: Option<ExitCode> = None;

    match load_settings(global) {
        Ok(loaded) => {
            let snapshot = ConfigSnapshot::new(&loaded);
            results.push(serde_json::json!({
                "check": "config",
                "status": "ok",
                "source": snapshot.source,
                "path": snapshot.path,
                "config_id": snapshot.short_id(),
            }));
        }
        Err(e) => {
            failure = Some(e.exit_code());
            results.push(serde_json::json!({
                "check": "config",
                "status": "error",
                "error": e.to_string(),
            }));
        }
    }

    if let Some(path) = &args.snapshot {
        match load_snapshot(path) {
            Ok(snapshot) => {
                let unit = snapshot.unit.as_ref();
                let renderable = unit.is_some_and(|u| u.sample.is_some());
                let ast_rows = snapshot
                    .ast
                    .as_ref()
                    .map(|p| p.renderable_rows().len())
                    .unwrap_or(0);
                results.push(serde_json::json!({
                    "check": "snapshot",
                    "status": if renderable { "ok" } else { "info" },
                    "unit_code": unit.map(|u| u.unit_code.as_str()),
                    "indexes": unit.map(|u| u.indexes.len()).unwrap_or(0),
                    "diseases": unit
                        .map(|u| u.diseases.iter().map(|d| d.name.as_str()).collect::<Vec<_>>())
                        .unwrap_or_default(),
                    "ast_renderable_rows": ast_rows,
                    "coa_status": snapshot.status,
                    "note": if renderable {
                        "Snapshot is renderable"
                    } else {
                        "Snapshot has no unit or sample context; render will produce nothing"
                    },
                }));
            }
            Err(e) => {
                failure.get_or_insert(e.exit_code());
                results.push(serde_json::json!({
                    "check": "snapshot",
                    "status": "error",
                    "error": e.to_string(),
                }));
            }
        }
    }

    let all_ok = failure.is_none();
    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "generated_at": Utc::now().to_rfc3339(),
            "status": if all_ok { "ok" } else { "error" },
            "checks": results,
        }),
        || {
            let mut out = String::from("# coa-core check\n\n");
            for result in &results {
                let check = result.get("check").and_then(|v| v.as_str()).unwrap_or("?");
                let status = result.get("status").and_then(|v| v.as_str()).unwrap_or("?");
                let symbol = match status {
                    "ok" => "✓",
                    "info" => "ℹ",
                    _ => "✗",
                };
                out.push_str(&format!("{} {}: {}\n", symbol, check, status));
                if let Some(note) = result.get("note").and_then(|v| v.as_str()) {
                    out.push_str(&format!("  {}\n", note));
                }
                if let Some(error) = result.get("error").and_then(|v| v.as_str()) {
                    out.push_str(&format!("  Error: {}\n", error));
                }
            }
            out
        },
        || format!("check: {}", if all_ok { "OK" } else { "FAILED" }),
    );

    Ok(failure.unwrap_or(ExitCode::Clean))
}

fn run_report_number(global: &GlobalOpts, args: &ReportNumberArgs) -> Result<ExitCode> {
    let numbers: Vec<(String, String)> = if let Some(path) = &args.snapshot {
        let settings = load_settings(global)?;
        let snapshot = load_snapshot(path)?;
        let generator = ReportGenerator::new(settings.config, ReportConfig::new());
        let Some(plans) = generator.plan(&snapshot, Utc::now()) else {
            return Err(CliError::Args(
                "snapshot has no unit or sample context".to_string(),
            ));
        };
        plans
            .into_iter()
            .map(|plan| (plan.section, plan.report_number))
            .collect()
    } else {
        let unit_code = args
            .unit_code
            .as_deref()
            .ok_or_else(|| CliError::Args("--unit-code is required".to_string()))?;
        let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
        if args.ast {
            vec![("AST".to_string(), derive_ast_report_number(unit_code, date))]
        } else {
            let disease = args
                .disease
                .as_deref()
                .ok_or_else(|| CliError::Args("--disease or --ast is required".to_string()))?;
            let category = DiseaseCategory::classify(disease);
            vec![(
                disease.to_string(),
                derive_report_number(category, unit_code, date),
            )]
        }
    };

    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "report_numbers": numbers
                .iter()
                .map(|(section, number)| serde_json::json!({
                    "section": section,
                    "report_number": number,
                }))
                .collect::<Vec<_>>(),
        }),
        || {
            let mut out = String::from("| Section | Report No. |\n|---|---|\n");
            for (section, number) in &numbers {
                out.push_str(&format!("| {} | {} |\n", section, number));
            }
            out
        },
        || {
            numbers
                .iter()
                .map(|(section, number)| format!("{}: {}", section, number))
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    Ok(ExitCode::Clean)
}

fn run_hidden_diff(global: &GlobalOpts, args: &HiddenDiffArgs) -> Result<ExitCode> {
    let old = load_snapshot(&args.old)?;
    let new = load_snapshot(&args.new)?;
    let changes = diff_hidden_indexes(&old.hidden_indexes(), &new.hidden_indexes());

    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "changed": !changes.is_empty(),
            "changes": changes
                .iter()
                .map(|c| serde_json::json!({
                    "disease": c.disease,
                    "visibility": c.visibility,
                    "indexes": c.indexes,
                    "description": c.to_string(),
                }))
                .collect::<Vec<_>>(),
        }),
        || {
            if changes.is_empty() {
                return "No hidden-index changes.\n".to_string();
            }
            changes.iter().map(|c| format!("- {}\n", c)).collect()
        },
        || format!("{} hidden-index change(s)", changes.len()),
    );
    Ok(ExitCode::Clean)
}

fn run_config_show(global: &GlobalOpts) -> Result<ExitCode> {
    let loaded = load_settings(global)?;
    let snapshot = ConfigSnapshot::new(&loaded);

    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "source": snapshot,
            "config": loaded.config,
        }),
        || {
            let summary = &snapshot.summary;
            format!(
                "# coa-core config show\n\nSource: {}\nPath: {}\nConfig id: {}\n\n\
                 ## Pagination\n- Rows per page: {}\n- Last page (QC table): {}\n\
                 - Last page (no QC table): {}\n- AST rows per page: {}\n- AST last page: {}\n\n\
                 ## Print\n- Image wait: {} ms\n- Auto print: {}\n",
                snapshot.source,
                snapshot.path.as_deref().unwrap_or("built-in defaults"),
                snapshot.short_id(),
                summary.rows_per_page,
                summary.rows_on_last_page_with_qc,
                summary.rows_on_last_page_without_qc,
                summary.ast_rows_per_page,
                summary.ast_rows_on_last_page,
                summary.image_wait_timeout_ms,
                summary.auto_print,
            )
        },
        || {
            format!(
                "config: {} ({})",
                snapshot.path.as_deref().unwrap_or("built-in defaults"),
                snapshot.short_id()
            )
        },
    );
    Ok(ExitCode::Clean)
}

fn run_config_validate(global: &GlobalOpts, path: Option<&Path>) -> Result<ExitCode> {
    let loaded = match path {
        Some(path) => load_config(Some(path))?,
        None => load_settings(global)?,
    };
    let path_label = loaded
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());

    emit(
        global,
        &serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "status": "valid",
            "path": loaded.path.as_ref().map(|p| p.display().to_string()),
            "source": loaded.source.to_string(),
            "config_schema_version": loaded.config.schema_version,
        }),
        || format!("# Configuration Validation\n\nStatus: ✓ Valid\nConfig: {}\n", path_label),
        || format!("config validate: OK ({})", path_label),
    );
    Ok(ExitCode::Clean)
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "config_schema_version": coa_config::CONFIG_SCHEMA_VERSION,
        "coa_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });
    emit(
        global,
        &version_info,
        || {
            format!(
                "coa-core {}\nschema version: {}\n",
                env!("CARGO_PKG_VERSION"),
                SCHEMA_VERSION
            )
        },
        || format!("coa-core {}", env!("CARGO_PKG_VERSION")),
    );
}
