//! Transient notices shown at the bottom of the window

use egui::{Align2, RichText, Rounding};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::ui::theme::{color_with_alpha, ThemeColors};
use crate::workflow::{Notice, NoticeLevel};

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_millis(2500);

const MAX_VISIBLE: usize = 3;

#[derive(Default)]
pub struct Toasts {
    items: VecDeque<Notice>,
}

impl Toasts {
    pub fn push(&mut self, notice: Notice) {
        self.items.push_back(notice);
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop notices older than the TTL
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < NOTICE_TTL);
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.expire(Instant::now());
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .order(egui::Order::Tooltip)
            .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .interactable(false)
            .show(ctx, |ui| {
                for notice in &self.items {
                    let accent = match notice.level {
                        NoticeLevel::Info => ThemeColors::ACCENT_PRIMARY,
                        NoticeLevel::Error => ThemeColors::ACCENT_ERROR,
                    };
                    egui::Frame::none()
                        .fill(ThemeColors::BG_LIGHT)
                        .stroke(egui::Stroke::new(1.0, color_with_alpha(accent, 160)))
                        .rounding(Rounding::same(18.0))
                        .inner_margin(egui::Margin::symmetric(16.0, 8.0))
                        .show(ui, |ui| {
                            ui.label(RichText::new(&notice.message).color(ThemeColors::TEXT_PRIMARY));
                        });
                    ui.add_space(6.0);
                }
            });

        // Keep redrawing until the last notice expires
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}
