//! Workflow screen - pick an image, recognize its text, translate it

use egui::{RichText, Rounding};
use tracing::debug;

use crate::capture::ImageSource;
use crate::languages::LanguageOption;
use crate::ui::components::{CardStatus, StatusCard};
use crate::ui::theme::{color_with_alpha, primary_button, ThemeColors};
use crate::workflow::{LanguageSlot, Operation, Phase, WorkflowController};

/// What the screen asks the app to do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowViewAction {
    None,
    Close,
}

/// Render the workflow screen
pub fn render_workflow_view(ui: &mut egui::Ui, controller: &mut WorkflowController) -> WorkflowViewAction {
    let mut action = WorkflowViewAction::None;

    ui.horizontal(|ui| {
        if ui.button("< Back").clicked() {
            action = WorkflowViewAction::Close;
        }
        ui.add_space(8.0);
        ui.heading(RichText::new("Translate an image").strong());
    });
    ui.add_space(12.0);

    render_summary(ui, controller);
    ui.add_space(16.0);

    handle_dropped_files(ui, controller);

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        render_image_section(ui, controller);
        ui.add_space(20.0);
        render_recognition_section(ui, controller);
        ui.add_space(20.0);
        render_translation_section(ui, controller);
    });

    action
}

fn render_summary(ui: &mut egui::Ui, controller: &WorkflowController) {
    let session = controller.session();
    let phase = controller.phase();

    ui.horizontal(|ui| {
        let (image, image_status) = match &session.image {
            Some(image) => (
                image
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| image.to_string()),
                CardStatus::Ready,
            ),
            None => ("None".to_string(), CardStatus::Empty),
        };
        StatusCard::new("Image", image, image_status).show(ui);

        let recognized = session.text_to_translate();
        let recognized_status = if phase == Phase::Busy(Operation::Recognition) {
            CardStatus::Working
        } else if recognized.is_empty() {
            CardStatus::Empty
        } else {
            CardStatus::Ready
        };
        StatusCard::new("Recognized", format!("{} chars", recognized.chars().count()), recognized_status)
            .show(ui);

        let pair = format!("{} -> {}", session.source_language.code, session.target_language.code);
        let translation_status = if phase == Phase::Busy(Operation::Translation) {
            CardStatus::Working
        } else if session.translated_text.is_empty() {
            CardStatus::Empty
        } else {
            CardStatus::Ready
        };
        StatusCard::new("Translation", pair, translation_status).show(ui);
    });
}

fn handle_dropped_files(ui: &mut egui::Ui, controller: &mut WorkflowController) {
    let dropped = ui.ctx().input(|i| {
        i.raw
            .dropped_files
            .iter()
            .find_map(|f| f.path.clone())
    });
    if let Some(path) = dropped {
        if !controller.phase().is_busy() {
            // Rejections surface as a notice
            let _ = controller.adopt_file(path);
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str) {
    ui.label(RichText::new(title).size(18.0).color(ThemeColors::TEXT_PRIMARY));
    ui.add_space(6.0);
}

fn render_image_section(ui: &mut egui::Ui, controller: &mut WorkflowController) {
    section(ui, "Image");

    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let frame_fill = if hovering {
        color_with_alpha(ThemeColors::ACCENT_PRIMARY, 40)
    } else {
        ThemeColors::BG_MEDIUM
    };

    egui::Frame::none()
        .fill(frame_fill)
        .rounding(Rounding::same(8.0))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_height(180.0);
            ui.set_width(ui.available_width());
            match &controller.session().image {
                Some(image) => {
                    ui.add(
                        egui::Image::new(image.uri())
                            .max_height(280.0)
                            .maintain_aspect_ratio(true)
                            .rounding(6.0),
                    );
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new("No image selected. Choose one or drop a file here.")
                                .color(ThemeColors::TEXT_MUTED),
                        );
                    });
                }
            }
        });

    ui.add_space(8.0);
    ui.menu_button("Choose Image", |ui| {
        for source in [ImageSource::Camera, ImageSource::Gallery] {
            if ui.button(source.label()).clicked() {
                controller.choose_image(source);
                ui.close_menu();
            }
        }
    });
}

fn render_recognition_section(ui: &mut egui::Ui, controller: &mut WorkflowController) {
    section(ui, "Recognized text");

    if ui.add(primary_button("Recognize Text")).clicked() {
        if let Err(e) = controller.recognize() {
            debug!("Recognition not started: {}", e);
        }
    }
    ui.add_space(6.0);

    ui.add(
        egui::TextEdit::multiline(controller.recognized_text_mut())
            .desired_rows(6)
            .desired_width(f32::INFINITY)
            .hint_text("Recognized text appears here and can be edited"),
    );
}

fn render_translation_section(ui: &mut egui::Ui, controller: &mut WorkflowController) {
    section(ui, "Translation");

    ui.horizontal(|ui| {
        language_menu(ui, controller, LanguageSlot::Source);
        ui.label(RichText::new("->").color(ThemeColors::TEXT_MUTED));
        language_menu(ui, controller, LanguageSlot::Target);
    });
    ui.add_space(6.0);

    if ui.add(primary_button("Translate")).clicked() {
        if let Err(e) = controller.translate() {
            debug!("Translation not started: {}", e);
        }
    }
    ui.add_space(6.0);

    ui.add(
        egui::TextEdit::multiline(controller.translated_text_mut())
            .desired_rows(6)
            .desired_width(f32::INFINITY)
            .hint_text("Translation"),
    );
}

/// Menu listing every catalog entry for one language slot
fn language_menu(ui: &mut egui::Ui, controller: &mut WorkflowController, slot: LanguageSlot) {
    let current: &LanguageOption = match slot {
        LanguageSlot::Source => &controller.session().source_language,
        LanguageSlot::Target => &controller.session().target_language,
    };
    let label = match slot {
        LanguageSlot::Source => format!("From: {}", current.title),
        LanguageSlot::Target => format!("To: {}", current.title),
    };
    let current_code = current.code.clone();

    let mut chosen = None;
    ui.menu_button(label, |ui| {
        egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
            for (index, option) in controller.catalog().iter().enumerate() {
                if ui.selectable_label(option.code == current_code, &option.title).clicked() {
                    chosen = Some(index);
                    ui.close_menu();
                }
            }
        });
    });

    if let Some(index) = chosen {
        if let Err(e) = controller.select_language(slot, index) {
            debug!("Language selection ignored: {}", e);
        }
    }
}
