//! Report rendering and output.
//!
//! The report is a flat list of transitions, newest first, in one of two
//! formats: a self-refreshing HTML page whose background color signals the
//! latest known state, or plain text for terminal-side inspection. Writing
//! the report must never take down the sampling loop, so write failures are
//! logged and swallowed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::data::{History, Observation, Policy};

/// How much of the history the report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Only the most recent entries (bounded by [`Policy::tail_limit`]).
    Tail,
    /// Every recorded transition.
    Full,
}

/// Output markup for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Text,
}

impl ReportFormat {
    /// Pick the format from the output path's extension; anything that is
    /// not explicitly text renders as HTML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") | Some("text") => ReportFormat::Text,
            _ => ReportFormat::Html,
        }
    }
}

/// Renders the history and writes it to the report file.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    format: ReportFormat,
    mode: ReportMode,
    refresh_secs: u32,
}

impl ReportWriter {
    /// Create a writer for the given output path. The format is inferred
    /// from the path's extension; `refresh_secs` is the auto-refresh
    /// interval embedded in HTML output.
    pub fn new<P: AsRef<Path>>(path: P, mode: ReportMode, refresh_secs: u32) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = ReportFormat::from_path(&path);
        Self {
            path,
            format,
            mode,
            refresh_secs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the history to a string in the configured format and mode.
    pub fn render(&self, history: &History, policy: &Policy) -> String {
        let entries = self.selected(history, policy);
        match self.format {
            ReportFormat::Html => self.render_html(history, &entries),
            ReportFormat::Text => render_text(&entries),
        }
    }

    /// Render and write the report, logging and swallowing any failure.
    pub fn write(&self, history: &History, policy: &Policy) {
        let text = self.render(history, policy);
        match fs::write(&self.path, text) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Report written"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to write report; will retry on next state change"
            ),
        }
    }

    /// The entries to display, newest first, bounded in tail mode.
    fn selected<'a>(&self, history: &'a History, policy: &Policy) -> Vec<&'a Observation> {
        let limit = match self.mode {
            ReportMode::Tail => policy.tail_limit,
            ReportMode::Full => usize::MAX,
        };
        history.entries().iter().rev().take(limit).collect()
    }

    fn render_html(&self, history: &History, entries: &[&Observation]) -> String {
        // Green until proven down; an empty history reads as healthy.
        let background = match history.last() {
            Some(last) if !last.online => "pink",
            _ => "palegreen",
        };
        let mut html = format!(
            "<html><meta http-equiv='refresh' content='{}'><body style='background-color:{}'><h1>\n",
            self.refresh_secs, background
        );
        for obs in entries {
            html.push_str(&format!("{obs}<br>\n"));
        }
        html.push_str("</h1></body></html>\n");
        html
    }
}

fn render_text(entries: &[&Observation]) -> String {
    let mut text = String::new();
    for obs in entries {
        text.push_str(&format!("{obs}\n"));
    }
    text
}
