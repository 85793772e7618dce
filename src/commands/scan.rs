use crate::models::image::SelectedImage;
use crate::services::controller::{AppController, RecognitionOutcome};
use crate::view::{self, ScreenView};
use std::sync::Arc;
use tauri::State;

/// State wrapper for the scanner controller (Arc so async commands can hold it across awaits)
pub type ControllerState = Arc<AppController>;

/// Current screen, derived from controller state
#[tauri::command]
pub fn get_view(state: State<'_, ControllerState>) -> ScreenView {
    view::render(&state.snapshot())
}

/// Load a photo picked or captured by the webview (`data:image/...;base64,...`)
#[tauri::command]
pub fn select_image(
    state: State<'_, ControllerState>,
    data_url: String,
) -> Result<ScreenView, String> {
    let image = SelectedImage::from_data_url(&data_url).map_err(|e| e.to_string())?;
    state.select_image(image).map_err(|e| e.to_string())?;
    Ok(view::render(&state.snapshot()))
}

#[tauri::command]
pub fn discard_image(state: State<'_, ControllerState>) -> Result<ScreenView, String> {
    state.clear_image().map_err(|e| e.to_string())?;
    Ok(view::render(&state.snapshot()))
}

/// Run recognition on the selected photo (async to keep the UI responsive)
#[tauri::command]
pub async fn recognize_plate(state: State<'_, ControllerState>) -> Result<ScreenView, String> {
    let controller = Arc::clone(state.inner());

    match controller.recognize().await.map_err(|e| e.to_string())? {
        RecognitionOutcome::Recognized(record) => {
            tracing::debug!(id = %record.id, "recognize_plate command finished");
        }
        RecognitionOutcome::Failed(_) => {
            tracing::debug!("recognize_plate command finished with error banner");
        }
    }

    Ok(view::render(&controller.snapshot()))
}
