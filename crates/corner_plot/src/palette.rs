use crate::error::{CornerPlotError, Result};

use image::Rgb;
use std::fmt;

/// Point colors, assigned to timestamps in request order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotColor {
    Red,
    Blue,
    Green,
    Black,
    Purple,
}

pub const PALETTE: [PlotColor; 5] = [
    PlotColor::Red,
    PlotColor::Blue,
    PlotColor::Green,
    PlotColor::Black,
    PlotColor::Purple,
];

impl PlotColor {
    pub fn rgb(self) -> Rgb<u8> {
        use PlotColor::*;
        match self {
            Red => Rgb([255, 0, 0]),
            Blue => Rgb([0, 0, 255]),
            Green => Rgb([0, 128, 0]),
            Black => Rgb([0, 0, 0]),
            Purple => Rgb([128, 0, 128]),
        }
    }

    pub fn name(self) -> &'static str {
        use PlotColor::*;
        match self {
            Red => "red",
            Blue => "blue",
            Green => "green",
            Black => "black",
            Purple => "purple",
        }
    }
}

impl fmt::Display for PlotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested timestamp with its assigned color
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampEntry {
    /// string as given on the command line, used for row selection
    pub raw: String,
    /// parsed value, used for color lookup
    pub value: f64,
    pub color: PlotColor,
}

/// Requested timestamps in request order.
///
/// Rows are selected by exact match on the raw string, while colors are looked
/// up by the parsed value. Every request consumes one palette slot, so a
/// duplicated timestamp takes the color of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimestampSet {
    entries: Vec<TimestampEntry>,
}

impl TimestampSet {
    /// Parses the requested timestamps and assigns palette colors
    ///
    /// # Errors
    /// Returns error if the list is empty, a timestamp is not a float, or more
    /// timestamps are requested than the palette has colors
    pub fn new<S: AsRef<str>>(times: &[S]) -> Result<Self> {
        if times.is_empty() {
            return Err(CornerPlotError::NoTimes);
        }
        if times.len() > PALETTE.len() {
            return Err(CornerPlotError::PaletteExhausted {
                requested: times.len(),
                available: PALETTE.len(),
            });
        }

        let entries = times
            .iter()
            .zip(PALETTE)
            .map(|(raw, color)| {
                let raw = raw.as_ref();
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|source| CornerPlotError::InvalidTime {
                        value: raw.to_string(),
                        source,
                    })?;
                Ok(TimestampEntry {
                    raw: raw.to_string(),
                    value,
                    color,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// True if `field` is exactly one of the requested strings
    pub fn selects(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e.raw == field)
    }

    /// Color of a parsed timestamp (last request wins)
    pub fn color_for(&self, timestamp: f64) -> Option<PlotColor> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.value == timestamp)
            .map(|e| e.color)
    }

    pub fn entries(&self) -> &[TimestampEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
