//! Launcher screen - entry point into the translator

use egui::RichText;

use crate::ui::theme::{primary_button, ThemeColors};

/// Render the launcher; returns true when the user opens the translator
pub fn render_launcher_view(ui: &mut egui::Ui) -> bool {
    let mut open = false;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading(RichText::new("Image Translator").size(30.0).strong());
        ui.add_space(8.0);
        ui.label(
            RichText::new("Recognize text in a photo and translate it")
                .size(14.0)
                .color(ThemeColors::TEXT_SECONDARY),
        );
        ui.add_space(28.0);

        if ui.add(primary_button("Open translator")).clicked() {
            open = true;
        }
    });

    open
}
