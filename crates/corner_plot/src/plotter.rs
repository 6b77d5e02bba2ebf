use crate::{
    config::Config,
    constants::{OUTPUT_PREFIX, WINDOW_TITLE},
    corners::{CornerRecord, read_corner_file},
    error::Result,
    palette::{PlotColor, TimestampSet},
    plot::{PlotPoint, build_plot_points},
    render::{render_scatter, save_png},
    viewer::show_plot,
};

use chrono::Local;
use image::RgbImage;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Selected corners for one timestamp value
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampCount {
    pub value: f64,
    /// every requested spelling of the value
    pub raw: Vec<String>,
    pub corners: usize,
    pub color: PlotColor,
}

/// Load, transform, render and show one set of corners
pub struct CornerPlotter {
    config: Config,
    times: TimestampSet,
}

impl CornerPlotter {
    /// Validates the requested timestamps before any file is touched
    pub fn new(config: Config) -> Result<Self> {
        let times = TimestampSet::new(&config.times)?;
        if config.principal.cy != 0.0 {
            warn!(
                "cy = {} is accepted but unused: the vertical flip is relative to cx",
                config.principal.cy
            );
        }
        Ok(Self { config, times })
    }

    pub fn times(&self) -> &TimestampSet {
        &self.times
    }

    pub fn load(&self) -> Result<Vec<CornerRecord>> {
        info!("Reading corners from {}", self.config.file.display());
        let records = read_corner_file(&self.config.file, &self.times)?;

        for count in self.counts(&records) {
            let raw = count.raw.join(", ");
            if count.corners == 0 {
                warn!("No corners found for timestamp {}", raw);
            } else {
                info!("{}: {} corners ({})", raw, count.corners, count.color);
            }
        }
        Ok(records)
    }

    /// Corners per distinct timestamp value, in request order
    pub fn counts(&self, records: &[CornerRecord]) -> Vec<TimestampCount> {
        let entries = self.times.entries();
        let mut counts: Vec<TimestampCount> = Vec::new();

        for entry in entries {
            if counts.iter().any(|c| c.value == entry.value) {
                continue;
            }
            let Some(color) = self.times.color_for(entry.value) else {
                continue;
            };
            counts.push(TimestampCount {
                value: entry.value,
                raw: entries
                    .iter()
                    .filter(|e| e.value == entry.value)
                    .map(|e| e.raw.clone())
                    .collect(),
                corners: records.iter().filter(|r| r.timestamp == entry.value).count(),
                color,
            });
        }
        counts
    }

    pub fn points(&self, records: &[CornerRecord]) -> Result<Vec<PlotPoint>> {
        build_plot_points(records, &self.config.principal, &self.times)
    }

    pub fn render(&self, points: &[PlotPoint]) -> RgbImage {
        render_scatter(points, &self.times, &self.config.render)
    }

    /// Saves to `--output` if given and returns the written path
    pub fn save(&self, image: &RgbImage) -> Result<Option<PathBuf>> {
        let Some(output) = &self.config.output else {
            return Ok(None);
        };
        let path = resolve_output_path(output);
        save_png(image, &path)?;
        info!("Plot saved to: {}", path.display());
        Ok(Some(path))
    }

    /// Full pipeline; blocks on the window unless it is disabled
    pub fn run(&self) -> Result<usize> {
        let records = self.load()?;
        let points = self.points(&records)?;
        let image = self.render(&points);
        self.save(&image)?;

        if self.config.show {
            show_plot(&image, WINDOW_TITLE)?;
        }
        Ok(points.len())
    }
}

/// A directory gets a timestamped file name, anything else is used as is
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(output_file_name())
    } else {
        output.to_path_buf()
    }
}

fn output_file_name() -> String {
    format!("{}_{}.png", OUTPUT_PREFIX, Local::now().format("%Y%m%d_%H%M%S"))
}
