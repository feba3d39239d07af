//! Scriptum - a rich-text document editor
//!
//! A Rust-based word processor with a formatting toolbar and DOCX/PDF export.

mod app;
mod core;
mod export;
mod ui;

use app::ScriptumApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Scriptum...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Scriptum"),
        ..Default::default()
    };

    eframe::run_native(
        "Scriptum",
        native_options,
        Box::new(|cc| Ok(Box::new(ScriptumApp::new(cc)))),
    )
}
