//! Main application state and UI coordination

use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui;

use crate::core::command::{self, Command};
use crate::core::config::AppConfig;
use crate::core::document::FontStep;
use crate::core::editor::EditorState;
use crate::export::{self, ExportFormat, ExportOutcome, ExportRequest};
use crate::ui::status::{StatusMessage, StatusPanel};
use crate::ui::surface::SurfacePanel;
use crate::ui::toolbar::{ToolbarPanel, ToolbarState};

/// Title of a fresh document, also the default export filename stem.
const DEFAULT_TITLE: &str = "Untitled Document";

/// Main application state
pub struct ScriptumApp {
    /// Document title, used only as the export filename stem
    pub title: String,
    /// Editor state: document, selection, pending style
    pub editor: EditorState,
    /// Toolbar combo selections
    pub toolbar: ToolbarState,
    /// Application configuration
    pub config: AppConfig,
    /// Latest export notification
    pub status: Option<StatusMessage>,
    export_tx: Sender<ExportOutcome>,
    export_rx: Receiver<ExportOutcome>,
}

impl ScriptumApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load config or use defaults
        let config = AppConfig::load().unwrap_or_default();
        Self::apply_theme(&cc.egui_ctx, &config.ui.theme);

        let editor = EditorState::new(config.editor.default_style());
        let toolbar = ToolbarState {
            font: config.editor.font_family,
            size: FontStep::new(config.editor.font_size),
        };
        let (export_tx, export_rx) = mpsc::channel();

        Self {
            title: DEFAULT_TITLE.to_owned(),
            editor,
            toolbar,
            config,
            status: None,
            export_tx,
            export_rx,
        }
    }

    fn apply_theme(ctx: &egui::Context, theme: &str) {
        match theme {
            "dark" => ctx.set_visuals(egui::Visuals::dark()),
            _ => ctx.set_visuals(egui::Visuals::light()),
        }
    }

    /// Start over with an empty default document
    pub fn new_document(&mut self) {
        self.title = DEFAULT_TITLE.to_owned();
        self.editor.clear();
    }

    /// Ask for a destination and run an export on a worker thread.
    ///
    /// The dialog is seeded with `<title>.<ext>` verbatim; the document and
    /// title are snapshotted here, so later edits never affect a running
    /// export.
    pub fn begin_export(&mut self, ctx: &egui::Context, format: ExportFormat) {
        let mut dialog = rfd::FileDialog::new()
            .set_file_name(export::suggested_file_name(&self.title, format))
            .add_filter(format.label(), &[format.extension()]);
        if let Some(dir) = self.config.last_export_dir.clone() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        if let Some(parent) = path.parent() {
            self.config.last_export_dir = Some(parent.to_path_buf());
            if let Err(e) = self.config.save() {
                tracing::warn!(error = %e, "failed to save config");
            }
        }

        let request = ExportRequest {
            document: self.editor.document.clone(),
            format,
            path,
        };
        let repaint = ctx.clone();
        export::spawn(request, self.export_tx.clone(), move || {
            repaint.request_repaint();
        });
    }

    /// Drain finished exports into the status area.
    fn poll_exports(&mut self) {
        while let Ok(outcome) = self.export_rx.try_recv() {
            self.status = Some(StatusMessage::from_outcome(outcome));
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Document").clicked() {
                        self.new_document();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Export as DOCX...").clicked() {
                        self.begin_export(ctx, ExportFormat::Docx);
                        ui.close();
                    }
                    if ui.button("Export as PDF...").clicked() {
                        self.begin_export(ctx, ExportFormat::Pdf);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    for theme in ["light", "dark"] {
                        if ui
                            .selectable_label(self.config.ui.theme == theme, theme)
                            .clicked()
                        {
                            self.config.ui.theme = theme.to_string();
                            Self::apply_theme(ctx, theme);
                            if let Err(e) = self.config.save() {
                                tracing::warn!(error = %e, "failed to save config");
                            }
                            ui.close();
                        }
                    }
                });
            });
        });
    }

    /// Render the header: title field and export buttons
    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.title)
                        .font(egui::TextStyle::Heading)
                        .desired_width(320.0)
                        .frame(false),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Export PDF").clicked() {
                        self.begin_export(ctx, ExportFormat::Pdf);
                    }
                    if ui.button("Export DOCX").clicked() {
                        self.begin_export(ctx, ExportFormat::Docx);
                    }
                });
            });
            ui.add_space(4.0);
        });
    }
}

impl eframe::App for ScriptumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_exports();

        // Formatting shortcuts
        let mut shortcut = None;
        ctx.input(|i| {
            if i.modifiers.command && i.key_pressed(egui::Key::B) {
                shortcut = Some(Command::Bold);
            }
            if i.modifiers.command && i.key_pressed(egui::Key::I) {
                shortcut = Some(Command::Italic);
            }
            if i.modifiers.command && i.key_pressed(egui::Key::U) {
                shortcut = Some(Command::Underline);
            }
        });
        if let Some(cmd) = shortcut {
            command::dispatch(&mut self.editor, cmd);
        }

        self.render_menu_bar(ctx);
        self.render_header(ctx);

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(2.0);
            if let Some(cmd) = ToolbarPanel::show(ui, &mut self.toolbar) {
                command::dispatch(&mut self.editor, cmd);
            }
            ui.add_space(2.0);
        });

        // Export status
        if let Some(message) = &self.status {
            let mut keep = true;
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                keep = StatusPanel::show(ui, message);
            });
            if !keep {
                self.status = None;
            }
        }

        // Editing surface on a page-like sheet
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("surface_scroll")
                .show(ui, |ui| {
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        SurfacePanel::show(ui, &mut self.editor);
                    });
                    ui.add_space(16.0);
                });
        });
    }
}
