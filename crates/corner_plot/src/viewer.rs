//! Native window showing the rendered plot

use crate::error::{CornerPlotError, Result};

use eframe::egui;
use image::RgbImage;
use log::info;

/// Opens a window with the plot and blocks until it is closed
pub fn show_plot(image: &RgbImage, title: &str) -> Result<()> {
    let (width, height) = image.dimensions();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_title(title),
        ..Default::default()
    };

    let plot = to_color_image(image);
    info!("Showing plot, close the window to exit");

    eframe::run_native(
        title,
        options,
        Box::new(|cc| Ok(Box::new(PlotViewer::new(cc, plot)))),
    )
    .map_err(|e| CornerPlotError::Viewer(e.to_string()))
}

fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    let (width, height) = image.dimensions();
    egui::ColorImage::from_rgb([width as usize, height as usize], image.as_raw())
}

struct PlotViewer {
    texture: egui::TextureHandle,
}

impl PlotViewer {
    fn new(cc: &eframe::CreationContext<'_>, plot: egui::ColorImage) -> Self {
        let texture = cc
            .egui_ctx
            .load_texture("corner_plot", plot, egui::TextureOptions::LINEAR);
        Self { texture }
    }
}

impl eframe::App for PlotViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(&self.texture).shrink_to_fit());
                });
            });
    }
}
