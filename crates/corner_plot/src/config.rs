use crate::{
    constants::{
        DEFAULT_CORNER_FILE, DEFAULT_HEIGHT, DEFAULT_WIDTH, FONT_SIZE, LABEL_FONT_SIZE,
        LEGEND_WIDTH, MARGIN, POINT_RADIUS,
    },
    error::{CornerPlotError, Result},
    plot::PrincipalPoint,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

#[derive(Debug, Parser)]
#[command(name = "plot_corners", author, version, about = "Plot tag corners", long_about = None)]
pub struct Cli {
    /// Timestamps to plot, matched exactly against the first column
    #[arg(short = 't', long = "times", required = true, num_args = 1..)]
    pub times: Vec<String>,

    /// Principal point u coordinate
    #[arg(short = 'x', long = "cx", default_value_t = 0.0, allow_negative_numbers = true)]
    pub cx: f64,

    /// Principal point v coordinate
    #[arg(short = 'y', long = "cy", default_value_t = 0.0, allow_negative_numbers = true)]
    pub cy: f64,

    /// File with corners [default: ~/.ros/tag_corners.txt]
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Save the plot as PNG (file, or existing directory for a generated name)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Do not open the plot window
    #[arg(long = "no-show")]
    pub no_show: bool,

    /// TOML file with a [render] table
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

/// Resolved run settings
#[derive(Debug, Clone)]
pub struct Config {
    pub times: Vec<String>,
    pub principal: PrincipalPoint,
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub show: bool,
    pub render: RenderConfig,
}

/// Plot appearance, optionally loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub margin: f64,
    pub legend_width: f64,
    pub point_radius: i32,
    pub font_size: f64,
    pub label_font_size: f64,
    pub draw_labels: bool,
    pub draw_legend: bool,
    pub draw_axes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margin: MARGIN,
            legend_width: LEGEND_WIDTH,
            point_radius: POINT_RADIUS,
            font_size: FONT_SIZE,
            label_font_size: LABEL_FONT_SIZE,
            draw_labels: true,
            draw_legend: true,
            draw_axes: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    render: RenderConfig,
}

impl RenderConfig {
    /// Width left for the data area
    pub fn plot_width(&self) -> f64 {
        let legend = if self.draw_legend { self.legend_width + self.margin } else { 0.0 };
        self.width as f64 - self.margin * 2.0 - legend
    }

    pub fn plot_height(&self) -> f64 {
        self.height as f64 - self.margin * 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CornerPlotError::Config(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.margin < 0.0 || self.legend_width < 0.0 {
            return Err(CornerPlotError::Config(
                "margin and legend_width must not be negative".to_string(),
            ));
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(CornerPlotError::Config(format!(
                "no room left for the plot in a {}x{} image",
                self.width, self.height
            )));
        }
        if self.point_radius < 1 {
            return Err(CornerPlotError::Config(format!(
                "point_radius must be at least 1, got {}",
                self.point_radius
            )));
        }
        if self.font_size <= 0.0 || self.label_font_size <= 0.0 {
            return Err(CornerPlotError::Config(
                "font sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let render = match &cli.config {
            Some(path) => Self::load_render_config(path)?,
            None => RenderConfig::default(),
        };
        let file = match cli.file {
            Some(file) => file,
            None => default_corner_file(),
        };

        Ok(Self {
            times: cli.times,
            principal: PrincipalPoint::new(cli.cx, cli.cy),
            file,
            output: cli.output,
            show: !cli.no_show,
            render,
        })
    }

    /// Reads the `[render]` table of a TOML file
    pub fn load_render_config(path: &Path) -> Result<RenderConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CornerPlotError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            CornerPlotError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        file.render.validate()?;
        Ok(file.render)
    }
}

/// `~/.ros/tag_corners.txt`, or relative to the working directory without HOME
pub fn default_corner_file() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(DEFAULT_CORNER_FILE),
        _ => PathBuf::from(DEFAULT_CORNER_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_cli() {
        let cli = Cli::try_parse_from([
            "plot_corners",
            "-t",
            "1541778008.167207032",
            "1541778008.217120032",
            "-x",
            "320.5",
            "--cy",
            "-12",
            "-f",
            "corners.txt",
            "--no-show",
        ])
        .unwrap();

        assert_eq!(cli.times, ["1541778008.167207032", "1541778008.217120032"]);
        assert_eq!(cli.cx, 320.5);
        assert_eq!(cli.cy, -12.0);
        assert_eq!(cli.file, Some(PathBuf::from("corners.txt")));
        assert!(cli.no_show);

        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.principal, PrincipalPoint::new(320.5, -12.0));
        assert_eq!(config.file, PathBuf::from("corners.txt"));
        assert!(!config.show);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_times_required() {
        let result = Cli::try_parse_from(["plot_corners", "-x", "1.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_cx_rejected() {
        let result = Cli::try_parse_from(["plot_corners", "-t", "1.0", "--cx", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["plot_corners", "--times", "1.0"]).unwrap();
        assert_eq!(cli.cx, 0.0);
        assert_eq!(cli.cy, 0.0);
        assert!(cli.file.is_none());

        let config = Config::from_cli(cli).unwrap();
        assert!(config.file.ends_with(".ros/tag_corners.txt"));
        assert!(config.show);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_load_render_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nwidth = 640\nheight = 480\ndraw_legend = false").unwrap();

        let render = Config::load_render_config(file.path()).unwrap();
        assert_eq!(render.width, 640);
        assert_eq!(render.height, 480);
        assert!(!render.draw_legend);
        assert_eq!(render.point_radius, POINT_RADIUS);
    }

    #[test]
    fn test_bundled_render_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/render.toml");
        let render = Config::load_render_config(&path).unwrap();
        assert_eq!(render, RenderConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        let render = Config::load_render_config(file.path()).unwrap();
        assert_eq!(render, RenderConfig::default());
    }

    #[test]
    fn test_invalid_render_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nwidth = 100\nheight = 60").unwrap();

        let err = Config::load_render_config(file.path()).unwrap_err();
        assert!(matches!(err, CornerPlotError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render\nwidth = ").unwrap();

        let err = Config::load_render_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::load_render_config(Path::new("nonexistent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
