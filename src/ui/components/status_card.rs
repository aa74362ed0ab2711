//! Status card component for the workflow summary row

use egui::{Color32, RichText, Rounding, Vec2};

use crate::ui::theme::ThemeColors;

/// A card showing one piece of session state
pub struct StatusCard {
    pub title: String,
    pub value: String,
    pub status: CardStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Ready,
    Empty,
    Working,
}

impl CardStatus {
    pub fn color(&self) -> Color32 {
        match self {
            CardStatus::Ready => ThemeColors::ACCENT_SUCCESS,
            CardStatus::Empty => ThemeColors::TEXT_MUTED,
            CardStatus::Working => ThemeColors::ACCENT_WARNING,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardStatus::Ready => "Ready",
            CardStatus::Empty => "Empty",
            CardStatus::Working => "Working",
        }
    }
}

impl StatusCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, status: CardStatus) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            status,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(Rounding::same(8.0))
            .inner_margin(14.0)
            .show(ui, |ui| {
                ui.set_min_width(170.0);

                ui.horizontal(|ui| {
                    let dot = ui.cursor().left_top() + Vec2::new(6.0, 10.0);
                    ui.painter().circle_filled(dot, 4.0, self.status.color());
                    ui.add_space(16.0);

                    ui.vertical(|ui| {
                        ui.label(RichText::new(&self.title).size(12.0).color(ThemeColors::TEXT_MUTED));
                        ui.add(
                            egui::Label::new(
                                RichText::new(&self.value)
                                    .size(16.0)
                                    .color(ThemeColors::TEXT_PRIMARY)
                                    .strong(),
                            )
                            .truncate(),
                        );
                        ui.label(RichText::new(self.status.label()).size(11.0).color(self.status.color()));
                    });
                });
            });
    }
}
