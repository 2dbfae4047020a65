//! Export to a print surface.
//!
//! One export walks `Idle → Assembling → WaitingForImages → PrintTriggered →
//! Idle`. The surface reports image load and error events on a channel; the
//! exporter waits for as many events as the document embeds images, bounded
//! by the configured timeout, then prints. A failed load counts the same as a
//! successful one.

use chrono::{DateTime, Utc};
use coa_common::{CoaSnapshot, ImageData};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::generator::ReportGenerator;

static RE_IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\bsrc=(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportState {
    Idle,
    Assembling,
    WaitingForImages,
    PrintTriggered,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportState::Idle => "idle",
            ExportState::Assembling => "assembling",
            ExportState::WaitingForImages => "waiting_for_images",
            ExportState::PrintTriggered => "print_triggered",
        };
        f.write_str(s)
    }
}

/// Image event raised by a surface. The payload is the image's position in
/// document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEvent {
    Loaded(usize),
    Errored(usize),
}

/// Where a rendered document goes to be printed.
pub trait PrintSurface {
    /// Hand the serialized document to the surface. Image events go to `events`,
    /// possibly from another thread.
    fn open(&mut self, html: &str, events: Sender<ImageEvent>) -> Result<()>;

    /// Trigger printing of the opened document.
    fn print(&mut self) -> Result<()>;
}

/// How the image wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WaitOutcome {
    /// Every expected image reported in.
    Settled { loaded: usize, errored: usize },
    /// The deadline passed first.
    TimedOut { settled: usize, expected: usize },
    /// The surface dropped its sender before every image reported in.
    SurfaceClosed { settled: usize, expected: usize },
}

impl WaitOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, WaitOutcome::Settled { .. })
    }
}

/// Drain image events until `expected` arrive or `timeout` elapses.
pub fn wait_for_images(
    events: &Receiver<ImageEvent>,
    expected: usize,
    timeout: Duration,
) -> WaitOutcome {
    let deadline = Instant::now() + timeout;
    let mut loaded = 0;
    let mut errored = 0;

    while loaded + errored < expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return WaitOutcome::TimedOut {
                settled: loaded + errored,
                expected,
            };
        }
        match events.recv_timeout(remaining) {
            Ok(ImageEvent::Loaded(_)) => loaded += 1,
            Ok(ImageEvent::Errored(index)) => {
                debug!(index, "Image failed to load");
                errored += 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                return WaitOutcome::TimedOut {
                    settled: loaded + errored,
                    expected,
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                return WaitOutcome::SurfaceClosed {
                    settled: loaded + errored,
                    expected,
                }
            }
        }
    }

    WaitOutcome::Settled { loaded, errored }
}

/// Result of one completed export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub unit_code: String,
    pub pages: usize,
    pub images: usize,
    pub bytes: usize,
    pub wait: WaitOutcome,
    /// States visited, in order, ending back at `Idle`.
    pub states: Vec<ExportState>,
}

/// Drives exports onto one surface.
pub struct Exporter<S: PrintSurface> {
    generator: ReportGenerator,
    surface: S,
    state: ExportState,
    image_timeout: Duration,
}

impl<S: PrintSurface> Exporter<S> {
    pub fn new(generator: ReportGenerator, surface: S) -> Self {
        let image_timeout =
            Duration::from_millis(generator.settings().print.image_wait_timeout_ms);
        Self {
            generator,
            surface,
            state: ExportState::Idle,
            image_timeout,
        }
    }

    /// Override the image wait bound.
    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Assemble, hand off, wait for images and print.
    ///
    /// `Ok(None)` when the snapshot has no unit or sample context; nothing is
    /// sent to the surface in that case. The exporter is back in `Idle` when
    /// this returns, on success or error.
    pub fn export(
        &mut self,
        snapshot: &CoaSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Result<Option<ExportReport>> {
        let mut states = vec![self.state];
        let result = self.run(snapshot, generated_at, &mut states);
        self.transition(ExportState::Idle, &mut states);

        match result {
            Ok(Some(mut report)) => {
                report.states = states;
                Ok(Some(report))
            }
            other => other,
        }
    }

    fn run(
        &mut self,
        snapshot: &CoaSnapshot,
        generated_at: DateTime<Utc>,
        states: &mut Vec<ExportState>,
    ) -> Result<Option<ExportReport>> {
        self.transition(ExportState::Assembling, states);
        let Some(document) = self.generator.assemble(snapshot, generated_at) else {
            warn!("Snapshot has no unit or sample context; nothing to export");
            return Ok(None);
        };
        let html = self.generator.render_html(&document)?;
        let images = document.image_count();

        let (tx, rx) = mpsc::channel();
        self.surface.open(&html, tx)?;

        self.transition(ExportState::WaitingForImages, states);
        let wait = wait_for_images(&rx, images, self.image_timeout);
        if !wait.is_settled() {
            warn!(?wait, "Printing before every image reported in");
        }

        self.transition(ExportState::PrintTriggered, states);
        self.surface.print()?;
        info!(
            unit = %document.meta.unit_code,
            pages = document.pages.len(),
            images,
            "Print triggered"
        );

        Ok(Some(ExportReport {
            unit_code: document.meta.unit_code.clone(),
            pages: document.pages.len(),
            images,
            bytes: html.len(),
            wait,
            states: Vec::new(),
        }))
    }

    fn transition(&mut self, next: ExportState, states: &mut Vec<ExportState>) {
        debug!(from = %self.state, to = %next, "Export state");
        self.state = next;
        states.push(next);
    }
}

/// Data-URI image sources of an HTML document, in document order.
pub fn image_sources(html: &str) -> Vec<String> {
    RE_IMG_SRC
        .captures_iter(html)
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().replace("&amp;", "&"))
        })
        .collect()
}

/// Writes the document to a file.
///
/// A background thread decodes each embedded image and reports it loaded or
/// errored, standing in for a browser's image pipeline.
#[derive(Debug)]
pub struct FileSurface {
    path: PathBuf,
    printed: bool,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            printed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn printed(&self) -> bool {
        self.printed
    }
}

impl PrintSurface for FileSurface {
    fn open(&mut self, html: &str, events: Sender<ImageEvent>) -> Result<()> {
        std::fs::write(&self.path, html)?;
        debug!(path = %self.path.display(), bytes = html.len(), "Document written");

        let sources = image_sources(html);
        thread::spawn(move || {
            for (index, src) in sources.iter().enumerate() {
                let event = match ImageData::from_data_uri(src) {
                    Ok(_) => ImageEvent::Loaded(index),
                    Err(_) => ImageEvent::Errored(index),
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        });
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Err(ReportError::Surface(format!(
                "{} disappeared before printing",
                self.path.display()
            )));
        }
        self.printed = true;
        Ok(())
    }
}

/// In-memory surface that replays scripted image events.
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub html: Option<String>,
    /// Events sent on `open`, in order.
    pub script: Vec<ImageEvent>,
    /// Keep the sender alive after replaying so the exporter must time out
    /// instead of seeing a closed channel.
    pub hold_open: bool,
    pub print_count: usize,
    held: Option<Sender<ImageEvent>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, script: Vec<ImageEvent>) -> Self {
        self.script = script;
        self
    }

    pub fn holding_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

impl PrintSurface for MemorySurface {
    fn open(&mut self, html: &str, events: Sender<ImageEvent>) -> Result<()> {
        self.html = Some(html.to_string());
        for event in &self.script {
            events
                .send(*event)
                .map_err(|e| ReportError::Surface(e.to_string()))?;
        }
        if self.hold_open {
            self.held = Some(events);
        }
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        self.print_count += 1;
        self.held = None;
        Ok(())
    }
}
