use crate::error::{ControllerError, RECOGNITION_FAILED_MESSAGE};
use crate::models::image::SelectedImage;
use crate::models::scan_record::ScanRecord;
use crate::services::history::HistoryStore;
use crate::services::recognition::PlateRecognizer;
use parking_lot::Mutex;
use std::sync::Arc;

/// Result of a recognition attempt that was allowed to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Recognized(ScanRecord),
    /// The user-facing message now shown as the error
    Failed(String),
}

/// Read-only copy of everything the presentation layer needs
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub image: Option<SelectedImage>,
    pub processing: bool,
    pub result: Option<ScanRecord>,
    pub error: Option<String>,
    pub history: Vec<ScanRecord>,
}

struct ControllerState {
    image: Option<SelectedImage>,
    processing: bool,
    result: Option<ScanRecord>,
    error: Option<String>,
    history: HistoryStore,
}

/// Scanner state machine: current image, in-flight flag, result, error and history.
///
/// The lock is never held across the recognizer call, so the state stays
/// readable (and the UI responsive) while a request is outstanding.
pub struct AppController {
    recognizer: Arc<dyn PlateRecognizer>,
    state: Mutex<ControllerState>,
}

/// Clears the processing flag if a recognition future is dropped before finishing.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("recognition abandoned before completion");
            self.state.lock().processing = false;
        }
    }
}

impl AppController {
    pub fn new(recognizer: Arc<dyn PlateRecognizer>, history: HistoryStore) -> Self {
        Self {
            recognizer,
            state: Mutex::new(ControllerState {
                image: None,
                processing: false,
                result: None,
                error: None,
                history,
            }),
        }
    }

    pub fn select_image(&self, image: SelectedImage) -> Result<(), ControllerError> {
        let mut state = self.state.lock();
        if state.processing {
            return Err(ControllerError::Busy);
        }

        tracing::info!(mime_type = %image.mime_type, "image selected");
        state.image = Some(image);
        state.result = None;
        state.error = None;
        Ok(())
    }

    pub fn clear_image(&self) -> Result<(), ControllerError> {
        let mut state = self.state.lock();
        if state.processing {
            return Err(ControllerError::Busy);
        }

        state.image = None;
        state.result = None;
        state.error = None;
        Ok(())
    }

    /// Run recognition on the selected image.
    ///
    /// Rejected with [`ControllerError::Busy`] while another request is in
    /// flight and with [`ControllerError::NoImage`] when nothing is selected.
    /// A provider failure is not an `Err`: it lands in the error field and is
    /// reported as [`RecognitionOutcome::Failed`].
    pub async fn recognize(&self) -> Result<RecognitionOutcome, ControllerError> {
        let image = {
            let mut state = self.state.lock();
            if state.processing {
                return Err(ControllerError::Busy);
            }
            let image = state.image.clone().ok_or(ControllerError::NoImage)?;
            state.processing = true;
            state.error = None;
            image
        };
        let mut in_flight = InFlight {
            state: &self.state,
            armed: true,
        };

        let started = std::time::Instant::now();
        let reply = self.recognizer.recognize(&image).await;

        let mut state = self.state.lock();
        in_flight.armed = false;
        state.processing = false;

        match reply {
            Ok(result) => {
                let timestamp = chrono::Utc::now().timestamp_millis();
                let id = unique_id(timestamp, &state.history);
                let record = ScanRecord::from_recognition(id, timestamp, image.data_url(), result);

                tracing::info!(
                    id = %record.id,
                    plate = %record.plate_number,
                    confidence = %record.confidence,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "plate recognized"
                );
                state.result = Some(record.clone());
                state.history.prepend(record.clone());
                Ok(RecognitionOutcome::Recognized(record))
            }
            Err(e) => {
                tracing::error!(error = %e, "plate recognition failed");
                state.error = Some(RECOGNITION_FAILED_MESSAGE.to_string());
                Ok(RecognitionOutcome::Failed(RECOGNITION_FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Delete one history entry. Returns whether it existed.
    pub fn delete_record(&self, id: &str) -> bool {
        let removed = self.state.lock().history.remove(id);
        if removed {
            tracing::info!(id, "scan deleted");
        }
        removed
    }

    /// Empty the history. Nothing happens unless `confirmed` is set.
    pub fn clear_history(&self, confirmed: bool) -> Result<(), ControllerError> {
        if !confirmed {
            return Err(ControllerError::ConfirmationRequired);
        }

        let mut state = self.state.lock();
        let count = state.history.len();
        state.history.clear();
        tracing::info!(count, "scan history cleared");
        Ok(())
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state.lock();
        ControllerSnapshot {
            image: state.image.clone(),
            processing: state.processing,
            result: state.result.clone(),
            error: state.error.clone(),
            history: state.history.records().to_vec(),
        }
    }
}

/// Time-derived id, bumped past any id already in the history.
fn unique_id(timestamp: i64, history: &HistoryStore) -> String {
    let mut candidate = timestamp;
    while history.contains(&candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
