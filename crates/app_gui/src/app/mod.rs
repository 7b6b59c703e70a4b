//! Window that hosts the upload controller.

mod preview;
mod results;

use classify_core::{
    BackendReply, ClassifyError, Disposition, DragEvent, FileCandidate, HttpBackend,
    UploadController,
};
use eframe::{App, Frame, egui};
use rfd::FileDialog;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Results from worker threads, drained once per frame.
enum WorkerEvent {
    Preview {
        generation: u64,
        image: egui::ColorImage,
    },
    PreviewFailed {
        generation: u64,
        reason: String,
    },
    Reply(Result<BackendReply, ClassifyError>),
}

pub struct UiApp {
    controller: UploadController,
    backend: HttpBackend,
    preview: Option<egui::TextureHandle>,
    was_hovering: bool,
    events_tx: Sender<WorkerEvent>,
    events_rx: Receiver<WorkerEvent>,
}

impl UiApp {
    pub fn new(backend: HttpBackend) -> Self {
        let (events_tx, events_rx) = channel();
        Self {
            controller: UploadController::new(),
            backend,
            preview: None,
            was_hovering: false,
            events_tx,
            events_rx,
        }
    }

    fn process_worker_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                WorkerEvent::Preview { generation, image } => {
                    if self.controller.set_preview(generation, true) {
                        self.preview =
                            Some(ctx.load_texture("preview", image, egui::TextureOptions::LINEAR));
                    }
                }
                WorkerEvent::PreviewFailed { generation, reason } => {
                    tracing::warn!("preview unavailable: {reason}");
                    if self.controller.set_preview(generation, false) {
                        self.preview = None;
                    }
                }
                WorkerEvent::Reply(outcome) => self.controller.complete_classification(outcome),
            }
        }
    }

    fn pick_file(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        // failures are shown in the banner
        let _ = self.controller.acquire_path(&path);
    }

    fn handle_file_drag(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().cloned(),
            )
        });

        if hovering {
            let event = if self.was_hovering {
                DragEvent::Over
            } else {
                DragEvent::Enter
            };
            if self.controller.handle_drag(event) == Disposition::Consumed {
                ctx.input_mut(|i| i.raw.hovered_files.clear());
            }
        } else if self.was_hovering && dropped.is_none() {
            self.controller.handle_drag(DragEvent::Leave);
        }
        self.was_hovering = hovering;

        if let Some(file) = dropped {
            // other widgets must not see a drop the upload area took
            if self.controller.handle_drag(drop_event(file)) == Disposition::Consumed {
                ctx.input_mut(|i| i.raw.dropped_files.clear());
            }
        }
    }

    fn start_preview(&mut self, ctx: &egui::Context) {
        if let Some(request) = self.controller.take_preview_request() {
            preview::spawn_decode(request, self.events_tx.clone(), ctx.clone());
        }
    }

    fn start_classification(&mut self, ctx: &egui::Context) {
        let Some(request) = self.controller.begin_classification() else {
            return;
        };
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = request.send(&backend);
            let _ = tx.send(WorkerEvent::Reply(outcome));
            ctx.request_repaint();
        });
    }

    fn render_upload_area(&self, ui: &mut egui::Ui) {
        let screen = self.controller.screen();
        let stroke = if screen.drag_active() {
            egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
        } else {
            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY)
        };
        egui::Frame::group(ui.style())
            .stroke(stroke)
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(360.0, 280.0));
                ui.vertical_centered(|ui| {
                    match &self.preview {
                        Some(texture) => {
                            ui.add(egui::Image::new(texture).max_size(egui::vec2(
                                preview::PREVIEW_SIZE as f32,
                                preview::PREVIEW_SIZE as f32,
                            )));
                        }
                        None => {
                            ui.add_space(100.0);
                            ui.label("Drop a ship image here or use \"Choose image...\"");
                        }
                    }
                    if let Some(file) = self.controller.selected() {
                        ui.small(format!("{} ({} KiB)", file.name(), file.size().div_ceil(1024)));
                    }
                });
            });
    }
}

fn drop_event(file: egui::DroppedFile) -> DragEvent {
    match (file.bytes, file.path) {
        (Some(bytes), _) => {
            DragEvent::Drop(Some(FileCandidate::from_bytes(file.name, &file.mime, bytes)))
        }
        (None, Some(path)) => DragEvent::DropPath(path),
        (None, None) => DragEvent::Drop(None),
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.process_worker_events(ctx);
        self.handle_file_drag(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Choose image...").clicked() {
                    self.pick_file();
                }

                let screen = self.controller.screen();
                if ui
                    .add_enabled(screen.classify_enabled(), egui::Button::new("Classify"))
                    .clicked()
                {
                    self.start_classification(ctx);
                }

                if self.controller.screen().is_loading() {
                    ui.spinner();
                    ui.label("Analyzing image...");
                }
            });
            if let Some(message) = self.controller.screen().error_text() {
                ui.colored_label(egui::Color32::from_rgb(200, 40, 40), message);
            }
        });
        self.start_preview(ctx);

        egui::SidePanel::right("results")
            .min_width(320.0)
            .show(ctx, |ui| {
                results::render_result_panel(ui, self.controller.screen().result());
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_upload_area(ui);
        });
    }
}
