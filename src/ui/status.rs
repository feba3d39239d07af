//! Export status notifications shown at the bottom of the window.

use std::path::PathBuf;

use eframe::egui;

use crate::export::{ExportFormat, ExportOutcome};

/// A dismissable notification about the most recent export.
pub enum StatusMessage {
    Success {
        format: ExportFormat,
        path: PathBuf,
    },
    Failure {
        format: ExportFormat,
        message: String,
    },
}

impl StatusMessage {
    pub fn from_outcome(outcome: ExportOutcome) -> Self {
        match outcome.result {
            Ok(()) => Self::Success {
                format: outcome.format,
                path: outcome.path,
            },
            Err(e) => Self::Failure {
                format: outcome.format,
                message: e.to_string(),
            },
        }
    }
}

/// Status panel rendering the latest notification.
pub struct StatusPanel;

impl StatusPanel {
    /// Show the notification; returns false once the user dismisses it.
    pub fn show(ui: &mut egui::Ui, message: &StatusMessage) -> bool {
        let mut keep = true;
        ui.horizontal(|ui| {
            match message {
                StatusMessage::Success { format, path } => {
                    ui.label(format!(
                        "Exported {} to {}",
                        format.label(),
                        path.display()
                    ));
                    if ui.button("Open").clicked() {
                        if let Err(e) = open::that(path) {
                            tracing::warn!(error = %e, "could not open exported file");
                        }
                    }
                }
                StatusMessage::Failure { format, message } => {
                    let color = ui.visuals().error_fg_color;
                    ui.colored_label(
                        color,
                        format!("{} export failed, please retry: {message}", format.label()),
                    );
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Dismiss").clicked() {
                    keep = false;
                }
            });
        });
        keep
    }
}
