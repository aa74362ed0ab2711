//! UI theme and styling
//!
//! Dark palette with a calm blue accent.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub struct ThemeColors;

impl ThemeColors {
    // Backgrounds
    pub const BG_DARK: Color32 = Color32::from_rgb(20, 22, 28);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(30, 33, 41);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(41, 45, 56);
    pub const BG_HOVER: Color32 = Color32::from_rgb(52, 57, 70);

    // Accents
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(86, 156, 245);
    pub const ACCENT_SUCCESS: Color32 = Color32::from_rgb(72, 199, 142);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(244, 191, 80);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(229, 83, 75);

    // Text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(236, 238, 243);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(165, 170, 184);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(110, 115, 130);

    pub const BORDER: Color32 = Color32::from_rgb(58, 63, 78);
}

/// Apply the theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_MEDIUM;
    visuals.panel_fill = ThemeColors::BG_DARK;
    visuals.faint_bg_color = ThemeColors::BG_LIGHT;
    visuals.extreme_bg_color = ThemeColors::BG_MEDIUM;

    let rounding = Rounding::same(6.0);
    for (widget, fill, text) in [
        (&mut visuals.widgets.noninteractive, ThemeColors::BG_MEDIUM, ThemeColors::TEXT_SECONDARY),
        (&mut visuals.widgets.inactive, ThemeColors::BG_LIGHT, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.hovered, ThemeColors::BG_HOVER, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.active, ThemeColors::ACCENT_PRIMARY, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.open, ThemeColors::BG_HOVER, ThemeColors::TEXT_PRIMARY),
    ] {
        widget.bg_fill = fill;
        widget.fg_stroke = Stroke::new(1.0, text);
        widget.rounding = rounding;
    }

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    visuals.hyperlink_color = ThemeColors::ACCENT_PRIMARY;

    visuals.window_rounding = Rounding::same(10.0);
    visuals.window_shadow.blur = 12.0;
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);
    visuals.popup_shadow.blur = 4.0;
    visuals.menu_rounding = rounding;

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 7.0);
    style.spacing.window_margin = egui::Margin::same(18.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(24.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Filled button used for the main action of a section
pub fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(Color32::WHITE))
        .fill(ThemeColors::ACCENT_PRIMARY)
        .min_size(egui::vec2(140.0, 36.0))
}
