pub mod config;
pub mod constants;
pub mod corners;
pub mod error;
pub mod palette;
pub mod plot;
pub mod plotter;
pub mod render;
pub mod viewer;

pub use config::{Cli, Config, RenderConfig};
pub use corners::{CornerRecord, read_corner_file, read_corners_from_reader};
pub use error::{CornerPlotError, Result};
pub use palette::{PALETTE, PlotColor, TimestampSet};
pub use plot::{PlotPoint, PrincipalPoint, build_plot_points};
pub use plotter::{CornerPlotter, TimestampCount};
pub use render::{render_scatter, save_png};
