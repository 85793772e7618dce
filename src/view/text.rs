//! Terminal rendering of a [`ScreenView`].

use super::{HistoryPanel, ResultPanel, ScreenView};
use std::fmt::Write as _;

const RULE: &str = "----------------------------------------";

pub fn render_text(view: &ScreenView) -> String {
    let mut out = String::new();

    if let Some(capture) = &view.capture {
        let _ = writeln!(out, "{}", capture.prompt);
    }

    if let Some(preview) = &view.preview {
        let mime = preview
            .image_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("image");
        let _ = writeln!(out, "Image loaded ({})", mime);
        if preview.busy {
            let _ = writeln!(out, "[{}]", preview.recognize_label);
        }
    }

    if let Some(error) = &view.error_banner {
        let _ = writeln!(out, "Error: {}", error);
    }

    if let Some(result) = &view.result {
        render_result(&mut out, result);
    }

    if let Some(history) = &view.history {
        render_history(&mut out, history);
    }

    out
}

fn render_result(out: &mut String, result: &ResultPanel) {
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  PLATE  {}", result.plate_number);
    let _ = writeln!(out, "  Region {}   Confidence {}", result.region, result.confidence);
    let width = result
        .details
        .iter()
        .map(|d| d.label.len())
        .max()
        .unwrap_or(0);
    for row in &result.details {
        let _ = writeln!(out, "  {:<width$}  {}", row.label, row.value, width = width);
    }
    let _ = writeln!(out, "{}", RULE);
}

/// Just the history list, for the `history` command
pub fn render_history_text(view: &ScreenView) -> String {
    let mut out = String::new();
    match &view.history {
        Some(history) => render_history(&mut out, history),
        None => out.push_str("No scans yet.\n"),
    }
    out
}

fn render_history(out: &mut String, history: &HistoryPanel) {
    let _ = writeln!(out, "Recent scans ({})", history.entries.len());
    for entry in &history.entries {
        let _ = writeln!(
            out,
            "  {:<12} {:<18} {:<24} id={}",
            entry.plate_number, entry.date, entry.vehicle_summary, entry.id
        );
    }
}
