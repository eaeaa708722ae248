use crate::step::Entry;
use crossterm::style::Stylize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pretty printing utilities for console output
pub struct Formatter;

impl Formatter {
    /// Format entries as `key => [values]` pairs on one line.
    pub fn format_entries(entries: &[Entry]) -> String {
        if entries.is_empty() {
            return "[]".to_string();
        }
        let pairs: Vec<String> = entries
            .iter()
            .map(|entry| {
                let values: Vec<String> = entry.values().iter().map(|v| v.to_string()).collect();
                format!("{} => [{}]", entry.key(), values.join(", "))
            })
            .collect();
        format!("[{}]", pairs.join("; "))
    }

    /// Console command reference.
    pub fn format_help() -> String {
        [
            "Playback commands:",
            "  start N        Select scenario N (1-based)",
            "  step [N]       Perform the next step",
            "  <enter>        Perform the next step of the running scenario",
            "  play [N]       Play to the end, selecting scenario N first if given",
            "  reset          Rewind the running scenario",
            "  stop           Drop the running scenario",
            "  list           Show the available scenarios",
            "",
            "Operations:",
            "  request <json> Subscribe, e.g. request {\"resource\": \"computed\"}",
            "  log <json>     Print a snapshot, e.g. log {\"resource\": \"computed\"}",
            "  write <json>   e.g. write [{\"collection\": \"cells\", \"entries\": [[\"A1\", [\"23\"]]]}]",
            "  delete <json>  e.g. delete [{\"collection\": \"cells\", \"keys\": [\"A1\"]}]",
            "",
            "  help           Show this help",
            "  exit           Quit",
        ]
        .join("\n")
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Info)
    }

    /// Format a success message in green.
    pub fn success(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Success)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Warning)
    }

    /// Format an error message in red.
    pub fn error(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Error)
    }

    /// Configure whether ANSI colors are enabled.
    pub fn configure_colors(enable: bool) {
        COLOR_ENABLED.store(enable, Ordering::Relaxed);
    }

    /// Auto-configure color output based on environment.
    pub fn configure_colors_from_env() {
        let no_color = std::env::var("NO_COLOR")
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        Self::configure_colors(!no_color);
    }

    fn apply_color(message: &str, kind: ColorKind) -> String {
        if !COLOR_ENABLED.load(Ordering::Relaxed) {
            return message.to_string();
        }

        match kind {
            ColorKind::Info => format!("{}", message.blue()),
            ColorKind::Success => format!("{}", message.green()),
            ColorKind::Warning => format!("{}", message.yellow()),
            ColorKind::Error => format!("{}", message.red()),
        }
    }
}

#[derive(Copy, Clone)]
enum ColorKind {
    Info,
    Success,
    Warning,
    Error,
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
