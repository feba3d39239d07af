//! Formatting toolbar: buttons and combo boxes mapped to commands.

use eframe::egui;

use crate::core::command::{Command, HeadingLevel};
use crate::core::document::{Alignment, FontFamilyChoice, FontStep};

/// Combo box selections that persist between frames.
pub struct ToolbarState {
    pub font: FontFamilyChoice,
    pub size: FontStep,
}

impl Default for ToolbarState {
    fn default() -> Self {
        Self {
            font: FontFamilyChoice::default(),
            size: FontStep::default(),
        }
    }
}

/// Formatting toolbar panel.
pub struct ToolbarPanel;

impl ToolbarPanel {
    /// Show the toolbar; returns the command for an activated action.
    pub fn show(ui: &mut egui::Ui, state: &mut ToolbarState) -> Option<Command> {
        let mut command = None;

        ui.horizontal(|ui| {
            if ui
                .button(egui::RichText::new("B").strong())
                .on_hover_text("Bold")
                .clicked()
            {
                command = Some(Command::Bold);
            }
            if ui
                .button(egui::RichText::new("I").italics())
                .on_hover_text("Italic")
                .clicked()
            {
                command = Some(Command::Italic);
            }
            if ui
                .button(egui::RichText::new("U").underline())
                .on_hover_text("Underline")
                .clicked()
            {
                command = Some(Command::Underline);
            }

            ui.separator();

            let alignments = [
                ("Left", "Align Left", Alignment::Left),
                ("Center", "Align Center", Alignment::Center),
                ("Right", "Align Right", Alignment::Right),
                ("Justify", "Justify", Alignment::Justify),
            ];
            for (label, hover, alignment) in alignments {
                if ui.button(label).on_hover_text(hover).clicked() {
                    command = Some(Command::Justify(alignment));
                }
            }

            ui.separator();

            if ui.button("H1").on_hover_text("Heading 1").clicked() {
                command = Some(Command::Heading(HeadingLevel::One));
            }
            if ui.button("H2").on_hover_text("Heading 2").clicked() {
                command = Some(Command::Heading(HeadingLevel::Two));
            }

            ui.separator();

            egui::ComboBox::from_id_salt("toolbar_font")
                .selected_text(state.font.family_name())
                .show_ui(ui, |ui| {
                    for font in FontFamilyChoice::all() {
                        if ui
                            .selectable_value(&mut state.font, font, font.family_name())
                            .changed()
                        {
                            command = Some(Command::FontName(font));
                        }
                    }
                });

            egui::ComboBox::from_id_salt("toolbar_size")
                .selected_text(state.size.get().to_string())
                .width(48.0)
                .show_ui(ui, |ui| {
                    for step in FontStep::MIN..=FontStep::MAX {
                        let size = FontStep::new(step);
                        if ui
                            .selectable_value(&mut state.size, size, step.to_string())
                            .changed()
                        {
                            command = Some(Command::FontSize(size));
                        }
                    }
                });
        });

        command
    }
}
