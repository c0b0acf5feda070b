use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{has_accepted_extension, SelectedDocument, ACCEPTED_EXTENSIONS};
use tracing::{debug, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::clipboard::{copy_notification, ClipboardService, SystemClipboard};
use crate::config::StartupConfig;
use crate::controller::{Notification, Severity, UiEvent, WorkflowController};
use crate::document;
use crate::view::{project, InputDraft, PanelContent, ViewModel};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 4;
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const IDLE_REPAINT_INTERVAL: Duration = Duration::from_secs(1);

pub const SAMPLE_QUESTIONS: [&str; 6] = [
    "What is the punishment under IPC 302?",
    "What are the essentials of defamation (IPC 499)?",
    "When is bail likely for theft under CrPC?",
    "Steps to file an FIR for assault?",
    "Rights of accused under Article 21",
    "Procedure for filing a civil suit",
];

struct Toast {
    notification: Notification,
    expires_at: Instant,
}

pub struct ConsultantApp {
    workflow: WorkflowController<Sender<BackendCommand>>,
    ui_rx: Receiver<UiEvent>,
    clipboard: ClipboardService<SystemClipboard>,
    query: String,
    selected: Option<SelectedDocument>,
    toasts: Vec<Toast>,
    backend_url: String,
}

impl ConsultantApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, startup: StartupConfig) -> Self {
        Self {
            workflow: WorkflowController::new(cmd_tx),
            ui_rx,
            clipboard: ClipboardService::new(SystemClipboard::default()),
            query: String::new(),
            selected: None,
            toasts: Vec::new(),
            backend_url: startup.backend_url().to_string(),
        }
    }

    fn process_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.workflow.apply(event);
        }
    }

    fn collect_notifications(&mut self, now: Instant) {
        for notification in self.workflow.drain_notifications() {
            self.push_toast(notification, now);
        }
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    fn push_toast(&mut self, notification: Notification, now: Instant) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.remove(0);
        }
        self.toasts.push(Toast {
            notification,
            expires_at: now + TOAST_TTL,
        });
    }

    fn select_document(&mut self, path: &std::path::Path, now: Instant) {
        if !has_accepted_extension(path) {
            self.push_toast(
                Notification::new(
                    "Unsupported File",
                    format!("Only {} files can be analyzed.", ACCEPTED_EXTENSIONS.join(", ")),
                    Severity::Info,
                ),
                now,
            );
            return;
        }
        match document::inspect(path) {
            Ok(selected) => {
                debug!(file_name = %selected.file_name, size_bytes = selected.size_bytes, "document selected");
                self.selected = Some(selected);
            }
            Err(err) => {
                warn!(path = %path.display(), "failed to inspect document: {err}");
                self.push_toast(Notification::error("File Unavailable", err.to_string()), now);
            }
        }
    }

    fn clear_all(&mut self) {
        if self.workflow.clear().is_ok() {
            self.query.clear();
            self.selected = None;
            self.clipboard.reset();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context, now: Instant, inputs_disabled: bool) {
        let dropped: Vec<_> = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if inputs_disabled {
            return;
        }
        if let Some(path) = dropped.last() {
            self.select_document(path, now);
        }
    }

    fn show_question_section(&mut self, ui: &mut egui::Ui, view: &ViewModel) {
        ui.label(egui::RichText::new("Ask a legal question").strong().size(16.0));
        ui.add_space(4.0);

        ui.horizontal_wrapped(|ui| {
            ui.small(egui::RichText::new("Try:").weak());
            for sample in SAMPLE_QUESTIONS {
                if ui
                    .add_enabled(!view.inputs_disabled, egui::Button::new(sample).small())
                    .clicked()
                {
                    self.query = sample.to_string();
                }
            }
        });
        ui.add_space(6.0);

        ui.add_enabled(
            !view.inputs_disabled,
            egui::TextEdit::multiline(&mut self.query)
                .hint_text("e.g. What is the punishment under IPC 302?")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!view.ask_disabled, egui::Button::new(view.ask_label))
                .clicked()
            {
                let _ = self.workflow.start_query(&self.query);
            }
            if ui
                .add_enabled(!view.clear_disabled, egui::Button::new("Clear All"))
                .clicked()
            {
                self.clear_all();
            }
        });
    }

    fn show_upload_section(&mut self, ui: &mut egui::Ui, view: &ViewModel, now: Instant) {
        ui.label(egui::RichText::new("Analyze a document").strong().size(16.0));
        ui.small(
            egui::RichText::new("PDF, DOCX, or TXT up to 15 MB. Drop a file onto the window or browse.")
                .weak(),
        );
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!view.inputs_disabled, egui::Button::new("Browse..."))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Documents", ACCEPTED_EXTENSIONS)
                    .pick_file()
                {
                    self.select_document(&path, now);
                }
            }
            if ui
                .add_enabled(!view.upload_disabled, egui::Button::new(view.upload_label.as_str()))
                .clicked()
            {
                let _ = self.workflow.start_upload(self.selected.as_ref());
            }
        });

        if let Some(selection) = &view.selection_text {
            ui.label(selection);
        }
    }

    fn show_result_panel(&mut self, ui: &mut egui::Ui, view: &ViewModel, now: Instant) {
        if let Some(progress) = &view.progress_text {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(progress);
            });
        }

        let (heading, color) = match &view.panel {
            PanelContent::Empty => return,
            PanelContent::Answer { .. } => ("Response", ui.visuals().text_color()),
            PanelContent::Error { .. } => ("Error", ui.visuals().error_fg_color),
        };

        egui::Frame::group(ui.style())
            .corner_radius(8.0)
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(heading).strong().color(color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(text) = &view.copy_text {
                            if ui.button(view.copy_label).clicked() {
                                let outcome = self.clipboard.copy(text, now);
                                self.push_toast(copy_notification(&outcome), now);
                            }
                        }
                    });
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 24.0)
                    .auto_shrink([false, true])
                    .show(ui, |ui| match &view.panel {
                        PanelContent::Answer { text, references } => {
                            ui.label(text);
                            if !references.is_empty() {
                                ui.add_space(8.0);
                                ui.label(egui::RichText::new("References").strong());
                                for reference in references {
                                    ui.label(format!("• {reference}"));
                                }
                            }
                        }
                        PanelContent::Error { message } => {
                            ui.label(egui::RichText::new(message).color(color));
                        }
                        PanelContent::Empty => {}
                    });
            });
    }

    /// Backend events arrive off-thread, so poll while work or toasts are live;
    /// otherwise wake only for the copy acknowledgement to expire.
    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.workflow.state().is_running() || !self.toasts.is_empty() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        } else if let Some(remaining) = self.clipboard.time_remaining(now) {
            ctx.request_repaint_after(remaining);
        } else {
            ctx.request_repaint_after(IDLE_REPAINT_INTERVAL);
        }
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("consultant_toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -36.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let fill = match toast.notification.severity {
                        Severity::Success => egui::Color32::from_rgb(38, 92, 60),
                        Severity::Error => egui::Color32::from_rgb(111, 53, 53),
                        Severity::Info => egui::Color32::from_rgb(48, 64, 96),
                    };
                    egui::Frame::NONE
                        .fill(fill)
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(
                                egui::RichText::new(&toast.notification.title)
                                    .strong()
                                    .color(egui::Color32::WHITE),
                            );
                            ui.label(
                                egui::RichText::new(&toast.notification.description)
                                    .color(egui::Color32::WHITE),
                            );
                        });
                    ui.add_space(6.0);
                }
            });
    }
}

impl eframe::App for ConsultantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_backend_events();
        self.collect_notifications(now);

        let copy_acknowledged = self.clipboard.is_acknowledged(now);
        let view = project(
            self.workflow.state(),
            &InputDraft {
                query: &self.query,
                document: self.selected.as_ref(),
            },
            copy_acknowledged,
        );
        self.handle_dropped_files(ctx, now, view.inputs_disabled);

        egui::TopBottomPanel::top("consultant_header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Legal AI Consultant");
            ui.small(
                egui::RichText::new("Answers are informational and are not a substitute for legal advice.")
                    .weak(),
            );
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("consultant_footer").show(ctx, |ui| {
            ui.small(egui::RichText::new(format!("Backend: {}", self.backend_url)).weak());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_question_section(ui, &view);
            ui.add_space(10.0);
            ui.separator();
            self.show_upload_section(ui, &view, now);
            ui.add_space(10.0);
            ui.separator();
            self.show_result_panel(ui, &view, now);
        });

        self.show_toasts(ctx);
        self.schedule_repaint(ctx, now);
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
