//! Permission consent prompt

use egui::{Align2, RichText};

use crate::permissions::ConsentGate;
use crate::ui::theme::{primary_button, ThemeColors};

/// Render the pending consent prompt, if any, and forward the answer to the gate
pub fn show_consent_dialog(ctx: &egui::Context, gate: &ConsentGate) {
    let Some(permissions) = gate.pending_request() else {
        return;
    };

    let names: Vec<&str> = permissions.iter().map(|p| p.display_name()).collect();
    let mut open = true;
    let mut answer = None;

    egui::Window::new("Permission required")
        .order(egui::Order::Foreground)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(
                RichText::new(format!("Image Translator needs access to: {}", names.join(", ")))
                    .color(ThemeColors::TEXT_PRIMARY),
            );
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.add(primary_button("Allow")).clicked() {
                    answer = Some(true);
                }
                if ui.button("Deny").clicked() {
                    answer = Some(false);
                }
            });
        });

    match answer {
        Some(allow) => gate.answer(allow),
        None if !open => gate.dismiss(),
        None => {}
    }
}
