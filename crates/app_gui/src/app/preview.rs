//! Off-thread decoding of the selected image into a preview texture.

use super::WorkerEvent;
use anyhow::{Context, Result};
use classify_core::PreviewRequest;
use eframe::egui;
use std::sync::mpsc::Sender;
use std::thread;

/// Longest edge of the preview, in pixels.
pub const PREVIEW_SIZE: u32 = 320;

/// Read and decode in the background. The result is tagged with the
/// request's generation so a superseded decode can be ignored.
pub fn spawn_decode(request: PreviewRequest, tx: Sender<WorkerEvent>, ctx: egui::Context) {
    thread::spawn(move || {
        let generation = request.generation;
        let event = match decode(&request) {
            Ok(image) => WorkerEvent::Preview { generation, image },
            Err(e) => WorkerEvent::PreviewFailed {
                generation,
                reason: format!("{e:#}"),
            },
        };
        let _ = tx.send(event);
        ctx.request_repaint();
    });
}

fn decode(request: &PreviewRequest) -> Result<egui::ColorImage> {
    let bytes = request.load()?;
    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("cannot decode {}", request.file.name()))?;
    let thumb = image::imageops::thumbnail(&img, PREVIEW_SIZE, PREVIEW_SIZE);
    let (w, h) = thumb.dimensions();
    let size = [w as usize, h as usize];
    let pixels = thumb.into_raw();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &pixels))
}
