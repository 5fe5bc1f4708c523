//! Heatmap Intensity
//!
//! Normalizes digital-twin scores into display intensities. The scores
//! themselves are computed server-side.

use wastewise_client::models::DigitalTwinCell;

pub const LEVELS: u8 = 5;

/// `value / max` clamped to `[0, 1]`; zero when there is no positive max
pub fn intensity(value: f64, max: f64) -> f64 {
    if !(max > 0.0) || !value.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// Discrete shade `0..LEVELS`; 0 is reserved for "nothing here"
pub fn bucket(intensity: f64) -> u8 {
    if intensity <= 0.0 {
        0
    } else {
        ((intensity * f64::from(LEVELS - 1)).ceil() as u8).clamp(1, LEVELS - 1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeatCell {
    pub row: u32,
    pub col: u32,
    pub intensity: f64,
    pub level: u8,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct HeatGrid {
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<HeatCell>,
}

impl HeatGrid {
    pub fn cell(&self, row: u32, col: u32) -> Option<&HeatCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }
}

/// Normalize against the hottest cell and order row-major
pub fn build_grid(cells: &[DigitalTwinCell]) -> HeatGrid {
    let max = cells
        .iter()
        .map(|c| c.score)
        .filter(|s| s.is_finite())
        .fold(0.0_f64, f64::max);

    let mut out: Vec<HeatCell> = cells
        .iter()
        .map(|c| {
            let intensity = intensity(c.score, max);
            HeatCell {
                row: c.row,
                col: c.col,
                intensity,
                level: bucket(intensity),
                label: c
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("R{}C{}", c.row + 1, c.col + 1)),
            }
        })
        .collect();
    out.sort_by_key(|c| (c.row, c.col));

    HeatGrid {
        rows: out.iter().map(|c| c.row + 1).max().unwrap_or(0),
        cols: out.iter().map(|c| c.col + 1).max().unwrap_or(0),
        cells: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: u32, col: u32, score: f64) -> DigitalTwinCell {
        DigitalTwinCell { row, col, score, label: None }
    }

    #[test]
    fn test_intensity_edges() {
        assert_eq!(intensity(5.0, 10.0), 0.5);
        assert_eq!(intensity(5.0, 0.0), 0.0);
        assert_eq!(intensity(-3.0, 10.0), 0.0);
        assert_eq!(intensity(30.0, 10.0), 1.0);
        assert_eq!(intensity(f64::NAN, 10.0), 0.0);
        assert_eq!(intensity(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_bucket() {
        assert_eq!(bucket(0.0), 0);
        assert_eq!(bucket(0.01), 1);
        assert_eq!(bucket(0.5), 2);
        assert_eq!(bucket(0.51), 3);
        assert_eq!(bucket(1.0), 4);
    }

    #[test]
    fn test_build_grid_normalizes_and_sorts() {
        let grid = build_grid(&[cell(1, 0, 2.0), cell(0, 1, 8.0), cell(0, 0, 0.0)]);
        assert_eq!((grid.rows, grid.cols), (2, 2));
        assert_eq!(grid.cells[0].row, 0);
        assert_eq!(grid.cells[0].col, 0);
        assert_eq!(grid.cell(0, 1).unwrap().intensity, 1.0);
        assert_eq!(grid.cell(1, 0).unwrap().intensity, 0.25);
        assert_eq!(grid.cell(0, 0).unwrap().level, 0);
        assert_eq!(grid.cell(1, 0).unwrap().label, "R2C1");
        assert!(grid.cell(1, 1).is_none());
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(build_grid(&[]), HeatGrid::default());
    }
}
