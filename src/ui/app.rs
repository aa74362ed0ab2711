//! Translator application entry point

use eframe::egui;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

use crate::app::AppServices;
use crate::ui::components::{show_busy_modal, show_consent_dialog, Toasts};
use crate::ui::theme;
use crate::ui::views::{render_launcher_view, render_workflow_view, WorkflowViewAction};
use crate::workflow::{RepaintHook, WorkflowController};

/// Screen currently on display
enum Screen {
    Launcher,
    /// The controller lives exactly as long as the screen
    Workflow(Box<WorkflowController>),
}

pub struct TranslatorApp {
    services: Arc<AppServices>,
    runtime: Handle,
    repaint: RepaintHook,
    screen: Screen,
    toasts: Toasts,
}

impl TranslatorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, services: Arc<AppServices>, runtime: Handle) -> Self {
        theme::apply_theme(&cc.egui_ctx);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let ctx = cc.egui_ctx.clone();
        let repaint: RepaintHook = Arc::new(move || ctx.request_repaint());
        services.consent().set_repaint_hook(repaint.clone());

        Self {
            services,
            runtime,
            repaint,
            screen: Screen::Launcher,
            toasts: Toasts::default(),
        }
    }

    fn open_workflow(&mut self) {
        info!("Opening workflow screen");
        let controller = self
            .services
            .new_controller(self.runtime.clone(), Some(self.repaint.clone()));
        self.screen = Screen::Workflow(Box::new(controller));
    }

    fn close_workflow(&mut self) {
        info!("Closing workflow screen");
        // Dropping the controller cancels its tasks
        self.screen = Screen::Launcher;
        self.services.consent().dismiss();
    }

    /// Create eframe options for the main window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([760.0, 860.0])
                .with_min_inner_size([520.0, 600.0])
                .with_drag_and_drop(true)
                .with_title("Image Translator"),
            ..Default::default()
        }
    }
}

/// Screen change requested during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Navigation {
    Stay,
    OpenWorkflow,
    CloseWorkflow,
}

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut navigation = Navigation::Stay;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(24.0).show(ui, |ui| match &mut self.screen {
                Screen::Launcher => {
                    if render_launcher_view(ui) {
                        navigation = Navigation::OpenWorkflow;
                    }
                }
                Screen::Workflow(controller) => {
                    controller.pump();
                    if render_workflow_view(ui, controller) == WorkflowViewAction::Close {
                        navigation = Navigation::CloseWorkflow;
                    }
                }
            });
        });

        if let Screen::Workflow(controller) = &mut self.screen {
            for notice in controller.take_notices() {
                self.toasts.push(notice);
            }
            if let Some(busy) = controller.busy() {
                show_busy_modal(ctx, busy);
            }
            show_consent_dialog(ctx, self.services.consent());
        }
        self.toasts.show(ctx);

        match navigation {
            Navigation::Stay => {}
            Navigation::OpenWorkflow => self.open_workflow(),
            Navigation::CloseWorkflow => self.close_workflow(),
        }
    }
}

/// Run the desktop application
pub fn run_app(services: Arc<AppServices>, runtime: Handle) -> Result<(), eframe::Error> {
    eframe::run_native(
        "Image Translator",
        TranslatorApp::options(),
        Box::new(move |cc| Ok(Box::new(TranslatorApp::new(cc, services, runtime)))),
    )
}
