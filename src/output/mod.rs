//! Helpers for rendering save outcomes to the console

use crate::error::Error;
use crate::stash::StashOutcome;
use crate::storage::{FolderStatus, ResolvedFolder};
use serde_json::{Value, json};

/// Combined structured and human-readable representation of an outcome
#[derive(Debug, Clone)]
pub struct RenderedOutcome {
    /// Structured JSON representation suitable for scripts
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Render a successful save.
pub fn render_outcome(outcome: &StashOutcome) -> RenderedOutcome {
    let saved = &outcome.saved;
    let mut human = vec![format!("QR Code saved successfully at: {}", saved.path.display())];
    if let Some(warning) = &outcome.open_warning {
        human.push(format!("Could not open the folder: {warning}"));
    }

    let json = json!({
        "status": "saved",
        "path": saved.path,
        "folder": saved.folder,
        "folder_status": saved.folder_status,
        "width": saved.width,
        "height": saved.height,
        "bytes": saved.bytes,
        "version": saved.version,
        "open_warning": outcome.open_warning,
    });

    RenderedOutcome { json, human }
}

/// Message describing the state of the output folder before prompting.
pub fn folder_message(folder: &ResolvedFolder) -> String {
    let name = folder
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.path.display().to_string());
    let parent = folder
        .path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    match folder.status {
        FolderStatus::Created => format!("Folder '{name}' created successfully in {parent}."),
        FolderStatus::Existing => format!("Folder '{name}' already exists in {parent}."),
    }
}

/// Render a failure so it can be shown without a panic or backtrace.
pub fn render_error(err: &Error) -> RenderedOutcome {
    let (kind, message) = match err {
        Error::PermissionDenied { path } => (
            "permission_denied",
            format!(
                "Permission denied: Unable to create folder {}.",
                path.display()
            ),
        ),
        Error::FolderCreate { .. } => ("folder_create", format!("An error occurred: {err}")),
        Error::ImageSave { .. } => (
            "image_save",
            format!("An error occurred while saving the QR Code: {err}"),
        ),
        Error::EmptyPayload => ("empty_input", "Input cannot be empty.".to_string()),
        Error::InputClosed => ("input_closed", "No input received, nothing saved.".to_string()),
        other => ("error", format!("An error occurred: {other}")),
    };

    RenderedOutcome {
        json: json!({ "status": "error", "kind": kind, "error": message }),
        human: vec![message],
    }
}
