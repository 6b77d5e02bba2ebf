use crate::{
    config::RenderConfig,
    error::{CornerPlotError, Result},
    palette::TimestampSet,
    plot::{Bounds, PlotPoint},
};

use ab_glyph::{FontVec, PxScale};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use imageproc::{
    drawing::{
        draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut,
        draw_line_segment_mut, draw_text_mut,
    },
    rect::Rect,
};
use log::{debug, warn};
use std::path::Path;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const LIGHT_GRAY: Rgb<u8> = Rgb([200, 200, 200]);
pub const DARK_GRAY: Rgb<u8> = Rgb([96, 96, 96]);

// drawing offsets stay far from i32 overflow inside imageproc
const MAX_PIXEL_OFFSET: f64 = 1.0e6;

/// Maps plot units to pixels with the same scale on both axes.
/// The y axis points up, the data is centered in the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub scale: f64,
    pub left: f64,
    pub top: f64,
}

impl Viewport {
    pub fn fit(bounds: Bounds, cfg: &RenderConfig) -> Self {
        let area_w = cfg.plot_width();
        let area_h = cfg.plot_height();
        let scale = (area_w / bounds.width()).min(area_h / bounds.height());

        let left = cfg.margin + (area_w - bounds.width() * scale) / 2.0;
        let top = cfg.margin + (area_h - bounds.height() * scale) / 2.0;

        Self {
            bounds,
            scale,
            left,
            top,
        }
    }

    pub fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        let px = self.left + (x - self.bounds.min_x) * self.scale;
        let py = self.top + (self.bounds.max_y - y) * self.scale;
        (px, py)
    }

    /// Pixel position, or `None` when it cannot be drawn (inf/nan input)
    pub fn pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (px, py) = self.to_px(x, y);
        let drawable = |v: f64| v.is_finite() && v.abs() < MAX_PIXEL_OFFSET;
        (drawable(px) && drawable(py)).then_some((px, py))
    }

    pub fn right(&self) -> f64 {
        self.left + self.bounds.width() * self.scale
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.bounds.height() * self.scale
    }
}

/// Canvas plus the font used for text (text is skipped without a font)
pub struct Renderer {
    pub image: RgbImage,
    font: Option<FontVec>,
}

impl Renderer {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, WHITE),
            font,
        }
    }

    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        let rect = Rect::at(x as i32, y as i32).of_size(width.max(1.0) as u32, height.max(1.0) as u32);
        draw_filled_rect_mut(&mut self.image, rect, color);
    }

    pub fn draw_rect_outline(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        let rect = Rect::at(x as i32, y as i32).of_size(width.max(1.0) as u32, height.max(1.0) as u32);
        draw_hollow_rect_mut(&mut self.image, rect, color);
    }

    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
        draw_line_segment_mut(
            &mut self.image,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            color,
        );
    }

    pub fn draw_dot(&mut self, x: f64, y: f64, radius: i32, color: Rgb<u8>) {
        draw_filled_circle_mut(&mut self.image, (x.round() as i32, y.round() as i32), radius, color);
    }

    pub fn draw_text(&mut self, x: f64, y: f64, text: &str, font_size: f64, color: Rgb<u8>) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(font_size as f32);
        draw_text_mut(&mut self.image, color, x as i32, y as i32, scale, font, text);
    }
}

/// Writes PNG regardless of the file extension
pub fn save_png<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Looks up a sans-serif system font
pub fn load_system_font() -> Result<FontVec> {
    let source = SystemSource::new();

    let font_families = [
        FamilyName::Title("DejaVu Sans".to_string()),
        FamilyName::Title("Arial".to_string()),
        FamilyName::Title("Helvetica".to_string()),
        FamilyName::SansSerif,
    ];

    for family in font_families {
        if let Ok(handle) = source.select_best_match(&[family], &Properties::new())
            && let Ok(font_kit_font) = handle.load()
            && let Some(font_bytes) = font_kit_font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(font_bytes.to_vec())
        {
            return Ok(font);
        }
    }

    Err(CornerPlotError::Font("no usable system font found".to_string()))
}

/// Renders the labeled scatter plot into a new image
pub fn render_scatter(points: &[PlotPoint], times: &TimestampSet, cfg: &RenderConfig) -> RgbImage {
    let needs_text = cfg.draw_labels || cfg.draw_legend;
    let font = if needs_text {
        match load_system_font() {
            Ok(font) => Some(font),
            Err(e) => {
                warn!("{}; labels and legend text are skipped", e);
                None
            }
        }
    } else {
        None
    };

    let mut renderer = Renderer::new(cfg.width, cfg.height, font);
    draw_scatter(&mut renderer, points, times, cfg);
    renderer.image
}

/// Draws onto an existing renderer
pub fn draw_scatter(
    renderer: &mut Renderer,
    points: &[PlotPoint],
    times: &TimestampSet,
    cfg: &RenderConfig,
) {
    let viewport = Viewport::fit(Bounds::from_points(points), cfg);
    debug!("Viewport: {:?}", viewport);

    // 1. frame and zero axes
    renderer.draw_rect_outline(
        viewport.left,
        viewport.top,
        viewport.right() - viewport.left,
        viewport.bottom() - viewport.top,
        DARK_GRAY,
    );
    if cfg.draw_axes {
        draw_axes(renderer, &viewport);
    }

    // 2. points
    let mut skipped = 0;
    for p in points {
        match viewport.pixel(p.x, p.y) {
            Some((px, py)) => renderer.draw_dot(px, py, cfg.point_radius, p.color.rgb()),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("Skipped {} corners with non-finite coordinates", skipped);
    }

    // 3. labels at the anchors
    if cfg.draw_labels {
        for p in points {
            if let Some((ax, ay)) = viewport.pixel(p.anchor.0, p.anchor.1) {
                renderer.draw_text(ax + 2.0, ay - cfg.label_font_size, &p.label, cfg.label_font_size, BLACK);
            }
        }
    }

    // 4. title and legend
    let title = format!("tag corners ({} points)", points.len());
    renderer.draw_text(cfg.margin, cfg.margin / 4.0, &title, cfg.font_size, BLACK);

    if cfg.draw_legend {
        let legend_x = cfg.width as f64 - cfg.margin - cfg.legend_width;
        draw_legend(renderer, times, cfg, legend_x, cfg.margin);
    }
}

fn draw_axes(renderer: &mut Renderer, viewport: &Viewport) {
    let b = viewport.bounds;
    if b.contains_y(0.0) {
        let (x0, y) = viewport.to_px(b.min_x, 0.0);
        let (x1, _) = viewport.to_px(b.max_x, 0.0);
        renderer.draw_line((x0, y), (x1, y), LIGHT_GRAY);
    }
    if b.contains_x(0.0) {
        let (x, y0) = viewport.to_px(0.0, b.max_y);
        let (_, y1) = viewport.to_px(0.0, b.min_y);
        renderer.draw_line((x, y0), (x, y1), LIGHT_GRAY);
    }
}

fn draw_legend(renderer: &mut Renderer, times: &TimestampSet, cfg: &RenderConfig, x: f64, y: f64) {
    let line_height = cfg.font_size * 1.5;
    let swatch = cfg.font_size;
    let mut current_y = y;

    renderer.draw_text(x, current_y, "Timestamps:", cfg.font_size, BLACK);
    current_y += line_height;

    for entry in times.entries() {
        renderer.draw_rect(x + 4.0, current_y, swatch, swatch, entry.color.rgb());
        renderer.draw_text(x + swatch + 10.0, current_y, &entry.raw, cfg.font_size * 0.85, BLACK);
        current_y += line_height;
    }
}
