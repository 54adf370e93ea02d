//! Discretized top-surface height map over the cargo floor.

use nalgebra::DMatrix;
use u_loading_core::EPS;

/// A 2D grid over the cargo floor recording the current top-surface
/// height at each cell, used for O(cells) support detection.
///
/// The grid has `ceil(L / precision) x ceil(W / precision)` cells. A
/// footprint covers every cell it touches: the start corner snaps down
/// to the cell floor and the opposite corner snaps up.
#[derive(Debug, Clone)]
pub struct HeightMap {
    grid: DMatrix<f64>,
    precision: f64,
    support_ratio: f64,
    gx: usize,
    gy: usize,
}

impl HeightMap {
    /// Creates a flat height map for a cargo floor of `length x width`.
    pub fn new(length: f64, width: f64, precision: f64, support_ratio: f64) -> Self {
        let gx = ((length / precision).ceil() as usize).max(1);
        let gy = ((width / precision).ceil() as usize).max(1);
        Self {
            grid: DMatrix::zeros(gx, gy),
            precision,
            support_ratio,
            gx,
            gy,
        }
    }

    /// Returns the grid dimensions `(gx, gy)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.gx, self.gy)
    }

    /// Cell range `[ix, ix_end) x [iy, iy_end)` covered by a footprint.
    fn cell_range(&self, x: f64, y: f64, l: f64, w: f64) -> (usize, usize, usize, usize) {
        let p = self.precision;
        let ix = (x / p).floor() as usize;
        let iy = (y / p).floor() as usize;
        let ix_end = ((x + l) / p).ceil() as usize;
        let iy_end = ((y + w) / p).ceil() as usize;
        (ix, iy, ix_end, iy_end)
    }

    /// Overwrites the cells under footprint `(x, y, l, w)` with `z_top`.
    pub fn update(&mut self, x: f64, y: f64, l: f64, w: f64, z_top: f64) {
        let (ix, iy, ix_end, iy_end) = self.cell_range(x, y, l, w);
        let ix_end = ix_end.min(self.gx);
        let iy_end = iy_end.min(self.gy);
        if ix >= ix_end || iy >= iy_end {
            return;
        }
        self.grid
            .view_mut((ix, iy), (ix_end - ix, iy_end - iy))
            .fill(z_top);
    }

    /// Returns whether a footprint placed at height `z_base` is supported.
    ///
    /// The floor (`z_base` ~ 0) always supports. Above the floor, the
    /// strict mode (`support_ratio >= 0.99`) requires every covered cell
    /// to sit within `EPS` of `z_base`; the ratio mode requires the
    /// configured fraction of cells plus all four footprint corners.
    /// The four corners are probed first to reject most candidates
    /// before the full region scan.
    pub fn check_support(&self, x: f64, y: f64, l: f64, w: f64, z_base: f64) -> bool {
        let (ix, iy, ix_end, iy_end) = self.cell_range(x, y, l, w);
        if ix_end > self.gx || iy_end > self.gy {
            return false;
        }
        if z_base < EPS {
            return true;
        }
        if ix >= ix_end || iy >= iy_end {
            return false;
        }

        // Corner pre-check: a corner lower than z_base means overhang.
        let corners = [
            (ix, iy),
            (ix, iy_end - 1),
            (ix_end - 1, iy),
            (ix_end - 1, iy_end - 1),
        ];
        for &(cx, cy) in &corners {
            if self.grid[(cx, cy)] < z_base - EPS {
                return false;
            }
        }

        let region = self.grid.view((ix, iy), (ix_end - ix, iy_end - iy));

        if self.support_ratio >= 0.99 {
            // Full support: min too low means a hole, max too high means
            // the surface is uneven (or the box would embed).
            if region.min() < z_base - EPS {
                return false;
            }
            if region.max() > z_base + EPS {
                return false;
            }
            true
        } else {
            let total = region.len();
            let supported = region.iter().filter(|&&h| (h - z_base).abs() < EPS).count();
            if (supported as f64) < self.support_ratio * total as f64 {
                return false;
            }
            // Partial support still demands all four corners to rest.
            corners
                .iter()
                .all(|&(cx, cy)| (self.grid[(cx, cy)] - z_base).abs() < EPS)
        }
    }

    /// Returns the maximum surface height under a footprint, for fast
    /// vertical pruning. Out-of-bounds footprints report `+inf`.
    pub fn max_height(&self, x: f64, y: f64, l: f64, w: f64) -> f64 {
        let (ix, iy, ix_end, iy_end) = self.cell_range(x, y, l, w);
        if ix_end > self.gx || iy_end > self.gy {
            return f64::INFINITY;
        }
        if ix >= ix_end || iy >= iy_end {
            return 0.0;
        }
        self.grid
            .view((ix, iy), (ix_end - ix, iy_end - iy))
            .max()
    }
}
