//! Log-odds occupancy grid over a fixed axis-aligned region.

use crate::core::math::log_odds_to_probability;
use crate::error::{Result, SlamError};

/// Configuration for the occupancy grid.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct OccupancyGridConfig {
    /// Grid width in cells.
    pub width: usize,

    /// Grid height in cells.
    pub height: usize,

    /// Cell size in meters. Typical: 0.05-0.2.
    pub resolution: f32,

    /// World X coordinate of the grid's lower-left corner.
    pub origin_x: f32,

    /// World Y coordinate of the grid's lower-left corner.
    pub origin_y: f32,

    /// Log-odds increment applied to a cell observed occupied.
    pub log_odds_occupied: f32,

    /// Log-odds increment applied to a cell observed free (negative).
    pub log_odds_free: f32,

    /// Lower clamp bound for cell log-odds.
    pub log_odds_min: f32,

    /// Upper clamp bound for cell log-odds. Clamping keeps saturated
    /// cells responsive to future contradicting evidence.
    pub log_odds_max: f32,
}

impl Default for OccupancyGridConfig {
    fn default() -> Self {
        // 20 m x 20 m centered on the origin at 10 cm resolution.
        Self {
            width: 200,
            height: 200,
            resolution: 0.1,
            origin_x: -10.0,
            origin_y: -10.0,
            log_odds_occupied: 0.9,
            log_odds_free: -0.7,
            log_odds_min: -10.0,
            log_odds_max: 10.0,
        }
    }
}

/// Coarse classification of a cell's occupancy belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Occupancy probability below the free threshold.
    Free,
    /// Not enough evidence either way.
    Unknown,
    /// Occupancy probability above the occupied threshold.
    Occupied,
}

/// 2D log-odds occupancy grid.
///
/// Cells start at 0 log-odds (probability 0.5, unknown) and accumulate
/// evidence through [`update_cell_signed`](OccupancyGrid::update_cell_signed).
/// Cells are never removed; the grid is monotone-accumulating for the
/// lifetime of the run. Updates addressed outside the extent are silently
/// dropped.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    config: OccupancyGridConfig,
    cells: Vec<f32>,
}

impl OccupancyGrid {
    /// Create a grid with all cells unknown.
    ///
    /// Fails fast on an empty extent or non-positive resolution.
    pub fn new(config: OccupancyGridConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(SlamError::Config("grid extent must be positive".into()));
        }
        if config.resolution <= 0.0 || !config.resolution.is_finite() {
            return Err(SlamError::Config("grid resolution must be positive".into()));
        }
        if config.log_odds_min >= config.log_odds_max {
            return Err(SlamError::Config(
                "log-odds clamp bounds must be ordered".into(),
            ));
        }
        let cells = vec![0.0; config.width * config.height];
        Ok(Self { config, cells })
    }

    /// Get the configuration.
    pub fn config(&self) -> &OccupancyGridConfig {
        &self.config
    }

    /// Grid dimensions in cells (width, height).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.config.width, self.config.height)
    }

    /// Cell size in meters.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.config.resolution
    }

    /// World coordinates of the lower-left corner.
    #[inline]
    pub fn origin(&self) -> (f32, f32) {
        (self.config.origin_x, self.config.origin_y)
    }

    /// Convert world coordinates to signed cell indices.
    ///
    /// Signed so that ray traversal can walk through out-of-extent cells
    /// and skip them individually.
    #[inline]
    pub fn world_to_cell_signed(&self, x: f32, y: f32) -> (i32, i32) {
        (
            ((x - self.config.origin_x) / self.config.resolution).floor() as i32,
            ((y - self.config.origin_y) / self.config.resolution).floor() as i32,
        )
    }

    /// Convert cell indices to the world coordinates of the cell center.
    #[inline]
    pub fn cell_to_world(&self, cx: usize, cy: usize) -> (f32, f32) {
        (
            self.config.origin_x + (cx as f32 + 0.5) * self.config.resolution,
            self.config.origin_y + (cy as f32 + 0.5) * self.config.resolution,
        )
    }

    #[inline]
    fn index(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 || cx as usize >= self.config.width || cy as usize >= self.config.height
        {
            return None;
        }
        Some(cy as usize * self.config.width + cx as usize)
    }

    /// Log-odds value of a cell, or `None` outside the extent.
    #[inline]
    pub fn log_odds(&self, cx: i32, cy: i32) -> Option<f32> {
        self.index(cx, cy).map(|i| self.cells[i])
    }

    /// Apply one occupied/free observation to a cell, clamping the result.
    ///
    /// Out-of-extent cells are silently skipped.
    pub fn update_cell_signed(&mut self, cx: i32, cy: i32, occupied: bool) {
        let Some(i) = self.index(cx, cy) else {
            return;
        };
        let delta = if occupied {
            self.config.log_odds_occupied
        } else {
            self.config.log_odds_free
        };
        self.cells[i] =
            (self.cells[i] + delta).clamp(self.config.log_odds_min, self.config.log_odds_max);
    }

    /// Occupancy probability of a cell, or `None` outside the extent.
    #[inline]
    pub fn occupancy_probability(&self, cx: i32, cy: i32) -> Option<f32> {
        self.log_odds(cx, cy).map(log_odds_to_probability)
    }

    /// Classify a cell's belief; out-of-extent cells read as unknown.
    pub fn cell_state(&self, cx: i32, cy: i32) -> CellState {
        match self.occupancy_probability(cx, cy) {
            Some(p) if p < 0.3 => CellState::Free,
            Some(p) if p > 0.7 => CellState::Occupied,
            _ => CellState::Unknown,
        }
    }

    /// Count cells in each state (free, unknown, occupied).
    pub fn count_cells(&self) -> (usize, usize, usize) {
        let mut free = 0;
        let mut unknown = 0;
        let mut occupied = 0;
        for &lo in &self.cells {
            let p = log_odds_to_probability(lo);
            if p < 0.3 {
                free += 1;
            } else if p > 0.7 {
                occupied += 1;
            } else {
                unknown += 1;
            }
        }
        (free, unknown, occupied)
    }

    /// Raw log-odds cells in row-major order.
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }
}
