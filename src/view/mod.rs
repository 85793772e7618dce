//! Presentation layer: a view model derived from the controller snapshot.
//!
//! Nothing here holds state. Front ends call [`render`] after every intent
//! and draw the returned [`ScreenView`]; user actions go back to the
//! controller.

pub mod text;

use crate::models::scan_record::ScanRecord;
use crate::services::controller::ControllerSnapshot;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

pub const RECOGNIZE_LABEL: &str = "Identify Plate";
pub const PROCESSING_LABEL: &str = "Processing...";
pub const DISCARD_LABEL: &str = "Discard";
pub const CLEAR_ALL_LABEL: &str = "Clear All";
pub const CLEAR_CONFIRM_PROMPT: &str = "Are you sure you want to clear all history?";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub capture: Option<CapturePanel>,
    pub preview: Option<PreviewPanel>,
    pub error_banner: Option<String>,
    pub result: Option<ResultPanel>,
    pub history: Option<HistoryPanel>,
}

/// Upload / camera affordance
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapturePanel {
    pub prompt: String,
    pub accept: String,
    /// Camera hint for devices that can capture directly
    pub capture: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPanel {
    pub image_url: String,
    pub busy: bool,
    pub recognize_label: String,
    pub recognize_enabled: bool,
    pub discard_label: String,
    pub discard_enabled: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultPanel {
    pub plate_number: String,
    pub region: String,
    pub confidence: String,
    pub details: Vec<DetailRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    pub id: String,
    pub thumbnail_url: String,
    pub date: String,
    pub plate_number: String,
    pub vehicle_summary: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPanel {
    pub entries: Vec<HistoryEntryView>,
    pub clear_label: String,
    pub clear_confirm_prompt: String,
}

/// Derive the screen from controller state, formatting dates in local time.
pub fn render(snapshot: &ControllerSnapshot) -> ScreenView {
    render_in(snapshot, &Local)
}

pub fn render_in<Tz: TimeZone>(snapshot: &ControllerSnapshot, tz: &Tz) -> ScreenView
where
    Tz::Offset: std::fmt::Display,
{
    let capture = match snapshot.image {
        None => Some(CapturePanel {
            prompt: "Upload or take a photo of a vehicle".to_string(),
            accept: "image/*".to_string(),
            capture: "environment".to_string(),
        }),
        Some(_) => None,
    };

    let preview = snapshot.image.as_ref().map(|image| PreviewPanel {
        image_url: image.data_url(),
        busy: snapshot.processing,
        recognize_label: if snapshot.processing {
            PROCESSING_LABEL
        } else {
            RECOGNIZE_LABEL
        }
        .to_string(),
        recognize_enabled: !snapshot.processing,
        discard_label: DISCARD_LABEL.to_string(),
        discard_enabled: !snapshot.processing,
    });

    let history = if snapshot.history.is_empty() {
        None
    } else {
        Some(HistoryPanel {
            entries: snapshot
                .history
                .iter()
                .map(|record| history_entry(record, tz))
                .collect(),
            clear_label: CLEAR_ALL_LABEL.to_string(),
            clear_confirm_prompt: CLEAR_CONFIRM_PROMPT.to_string(),
        })
    };

    ScreenView {
        capture,
        preview,
        error_banner: snapshot.error.clone(),
        result: snapshot.result.as_ref().map(result_panel),
        history,
    }
}

fn result_panel(record: &ScanRecord) -> ResultPanel {
    let row = |label: &str, value: &str| DetailRow {
        label: label.to_string(),
        value: value.to_string(),
    };

    ResultPanel {
        plate_number: record.plate_number.clone(),
        region: record.region.clone(),
        confidence: record.confidence.clone(),
        details: vec![
            row("Make", &record.vehicle.make),
            row("Model", &record.vehicle.model),
            row("Color", &record.vehicle.color),
            row("Type", &record.vehicle.vehicle_type),
        ],
    }
}

fn history_entry<Tz: TimeZone>(record: &ScanRecord, tz: &Tz) -> HistoryEntryView
where
    Tz::Offset: std::fmt::Display,
{
    HistoryEntryView {
        id: record.id.clone(),
        thumbnail_url: record.image_url.clone(),
        date: format_timestamp(record.timestamp, tz),
        plate_number: record.plate_number.clone(),
        vehicle_summary: record.vehicle.summary(),
    }
}

/// "Mar 5, 2024 14:07" for a Unix millisecond timestamp
pub fn format_timestamp<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format("%b %-d, %Y %H:%M").to_string(),
        None => "Unknown date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::SelectedImage;
    use crate::models::scan_record::VehicleDetails;

    fn record(id: &str, timestamp: i64) -> ScanRecord {
        ScanRecord {
            id: id.to_string(),
            timestamp,
            image_url: "data:image/png;base64,AAAA".to_string(),
            plate_number: "ABC123".to_string(),
            region: "CA".to_string(),
            vehicle: VehicleDetails {
                make: "Toyota".to_string(),
                model: "Camry".to_string(),
                color: "Blue".to_string(),
                vehicle_type: "Sedan".to_string(),
            },
            confidence: "High".to_string(),
        }
    }

    fn empty() -> ControllerSnapshot {
        ControllerSnapshot {
            image: None,
            processing: false,
            result: None,
            error: None,
            history: Vec::new(),
        }
    }

    fn image() -> SelectedImage {
        SelectedImage {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        }
    }

    #[test]
    fn test_empty_screen_shows_capture_only() {
        let view = render_in(&empty(), &Utc);

        let capture = view.capture.expect("capture panel");
        assert_eq!(capture.accept, "image/*");
        assert_eq!(capture.capture, "environment");
        assert!(view.preview.is_none());
        assert!(view.error_banner.is_none());
        assert!(view.result.is_none());
        assert!(view.history.is_none());
    }

    #[test]
    fn test_selected_image_shows_preview_actions() {
        let snapshot = ControllerSnapshot {
            image: Some(image()),
            ..empty()
        };
        let view = render_in(&snapshot, &Utc);

        assert!(view.capture.is_none());
        let preview = view.preview.expect("preview panel");
        assert_eq!(preview.image_url, "data:image/png;base64,AAAA");
        assert_eq!(preview.recognize_label, RECOGNIZE_LABEL);
        assert!(preview.recognize_enabled);
        assert!(preview.discard_enabled);
        assert!(!preview.busy);
    }

    #[test]
    fn test_processing_disables_actions() {
        let snapshot = ControllerSnapshot {
            image: Some(image()),
            processing: true,
            ..empty()
        };
        let preview = render_in(&snapshot, &Utc).preview.unwrap();

        assert!(preview.busy);
        assert_eq!(preview.recognize_label, PROCESSING_LABEL);
        assert!(!preview.recognize_enabled);
        assert!(!preview.discard_enabled);
    }

    #[test]
    fn test_result_and_error_panels() {
        let snapshot = ControllerSnapshot {
            image: Some(image()),
            result: Some(record("1", 0)),
            error: Some("boom".to_string()),
            ..empty()
        };
        let view = render_in(&snapshot, &Utc);

        assert_eq!(view.error_banner.as_deref(), Some("boom"));
        let result = view.result.unwrap();
        assert_eq!(result.plate_number, "ABC123");
        assert_eq!(result.confidence, "High");
        let labels: Vec<&str> = result.details.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Make", "Model", "Color", "Type"]);
        assert_eq!(result.details[3].value, "Sedan");
    }

    #[test]
    fn test_history_panel_entries() {
        let snapshot = ControllerSnapshot {
            history: vec![record("2", 1_700_000_060_000), record("1", 1_700_000_000_000)],
            ..empty()
        };
        let history = render_in(&snapshot, &Utc).history.expect("history panel");

        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[0].id, "2");
        assert_eq!(history.entries[0].date, "Nov 14, 2023 22:14");
        assert_eq!(history.entries[0].vehicle_summary, "Blue Toyota Camry");
        assert_eq!(history.entries[0].thumbnail_url, "data:image/png;base64,AAAA");
        assert_eq!(history.clear_label, CLEAR_ALL_LABEL);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let snapshot = ControllerSnapshot {
            image: Some(image()),
            ..empty()
        };
        let json = serde_json::to_value(render_in(&snapshot, &Utc)).unwrap();

        assert_eq!(json["preview"]["recognizeLabel"], RECOGNIZE_LABEL);
        assert!(json["errorBanner"].is_null());
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX, &Utc), "Unknown date");
    }
}
