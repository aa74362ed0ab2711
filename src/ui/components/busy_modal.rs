//! Blocking "please wait" dialog

use egui::{Align2, RichText, Sense};

use crate::ui::theme::{color_with_alpha, ThemeColors};
use crate::workflow::BusyIndicator;

/// Dim the screen, swallow input and show the busy message
pub fn show_busy_modal(ctx: &egui::Context, busy: &BusyIndicator) {
    let screen = ctx.screen_rect();

    egui::Area::new(egui::Id::new("busy_backdrop"))
        .order(egui::Order::Middle)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.allocate_rect(screen, Sense::click_and_drag());
            ui.painter()
                .rect_filled(screen, 0.0, color_with_alpha(ThemeColors::BG_DARK, 180));
        });

    egui::Window::new(busy.title)
        .order(egui::Order::Foreground)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .title_bar(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.add_space(8.0);
                ui.label(RichText::new(busy.message).color(ThemeColors::TEXT_PRIMARY));
            });
            let waited = busy.since.elapsed().as_secs();
            if waited >= 5 {
                ui.label(
                    RichText::new(format!("{}s", waited))
                        .size(12.0)
                        .color(ThemeColors::TEXT_MUTED),
                );
            }
        });
}
