use super::scan::ControllerState;
use crate::view::{self, ScreenView};
use tauri::State;

/// Delete a scan record by ID
#[tauri::command]
pub fn delete_scan(state: State<'_, ControllerState>, id: String) -> ScreenView {
    state.delete_record(&id);
    view::render(&state.snapshot())
}

/// Clear all scan records; the webview asks the user first and passes the answer
#[tauri::command]
pub fn clear_history(
    state: State<'_, ControllerState>,
    confirmed: bool,
) -> Result<ScreenView, String> {
    state.clear_history(confirmed).map_err(|e| e.to_string())?;
    Ok(view::render(&state.snapshot()))
}
