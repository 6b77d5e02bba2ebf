use crate::constants::BOUNDS_PADDING;
use crate::corners::CornerRecord;
use crate::error::{CornerPlotError, Result};
use crate::palette::{PlotColor, TimestampSet};

/// Camera principal point (pixel units)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrincipalPoint {
    pub cx: f64,
    pub cy: f64,
}

impl PrincipalPoint {
    pub fn new(cx: f64, cy: f64) -> Self {
        Self { cx, cy }
    }

    /// Re-centers a corner and flips the vertical axis.
    ///
    /// The flip subtracts from `cx`, not `cy`. `cy` does not enter the transform.
    pub fn apply(&self, u: f64, v: f64) -> (f64, f64) {
        (u - self.cx, self.cx - v)
    }
}

/// A corner ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub color: PlotColor,
    /// label position `(u, -v)`, independent of the principal point
    pub anchor: (f64, f64),
}

impl PlotPoint {
    pub fn from_record(
        record: &CornerRecord,
        principal: &PrincipalPoint,
        times: &TimestampSet,
    ) -> Result<Self> {
        let color = times
            .color_for(record.timestamp)
            .ok_or(CornerPlotError::UnrequestedTimestamp(record.timestamp))?;
        let (x, y) = principal.apply(record.u, record.v);

        Ok(Self {
            x,
            y,
            label: record.label(),
            color,
            anchor: (record.u, -record.v),
        })
    }
}

pub fn build_plot_points(
    records: &[CornerRecord],
    principal: &PrincipalPoint,
    times: &TimestampSet,
) -> Result<Vec<PlotPoint>> {
    records
        .iter()
        .map(|r| PlotPoint::from_record(r, principal, times))
        .collect()
}

/// Data extent in plot units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
        }
    }
}

impl Bounds {
    /// Extent covering every point and its label anchor, padded on each side.
    /// Falls back to the unit square when there is nothing to draw.
    pub fn from_points(points: &[PlotPoint]) -> Self {
        let coords = points
            .iter()
            .flat_map(|p| [(p.x, p.y), p.anchor])
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut bounds: Option<Bounds> = None;
        for (x, y) in coords {
            let b = bounds.get_or_insert(Bounds {
                min_x: x,
                max_x: x,
                min_y: y,
                max_y: y,
            });
            b.min_x = b.min_x.min(x);
            b.max_x = b.max_x.max(x);
            b.min_y = b.min_y.min(y);
            b.max_y = b.max_y.max(y);
        }

        bounds.map(Bounds::padded).unwrap_or_default()
    }

    fn padded(self) -> Self {
        let pad_x = pad_for(self.width());
        let pad_y = pad_for(self.height());
        Self {
            min_x: self.min_x - pad_x,
            max_x: self.max_x + pad_x,
            min_y: self.min_y - pad_y,
            max_y: self.max_y + pad_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains_x(&self, x: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x)
    }

    pub fn contains_y(&self, y: f64) -> bool {
        (self.min_y..=self.max_y).contains(&y)
    }
}

// zero-width spans get one unit of room
fn pad_for(span: f64) -> f64 {
    if span > 0.0 { span * BOUNDS_PADDING } else { 1.0 }
}
