/// Input file, relative to the home directory
pub const DEFAULT_CORNER_FILE: &str = ".ros/tag_corners.txt";

/// Corner row layout: timestamp id_a id_b id_c u v
pub const CORNER_FIELDS: usize = 6;
pub const FIELD_DELIMITER: u8 = b' ';

/// Image settings (px)
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 800;
pub const MARGIN: f64 = 40.0;
pub const LEGEND_WIDTH: f64 = 220.0;
pub const POINT_RADIUS: i32 = 4;
pub const FONT_SIZE: f64 = 14.0;
pub const LABEL_FONT_SIZE: f64 = 11.0;

/// Fraction of the data span added on each side of the plot
pub const BOUNDS_PADDING: f64 = 0.05;

/// Output file prefix for generated names
pub const OUTPUT_PREFIX: &str = "corners";

pub const WINDOW_TITLE: &str = "tag corners";
