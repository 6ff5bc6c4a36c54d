//! Grid rasterizer
//!
//! Maps a boundary onto the fixed logical grid by sampling each cell's
//! center. A cell is covered iff its center is inside the shape; no partial
//! coverage is computed. Rows are sampled in parallel with Rayon and
//! concatenated in row order, so the result is ascending and duplicate-free.

use super::types::{Boundary, Point};
use rayon::prelude::*;
use serde::Serialize;

/// Row-major partition of the canvas into `cols x rows` equal cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Grid {
    pub cols: u32,
    pub rows: u32,
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
}

impl Grid {
    pub fn new(cols: u32, rows: u32, width: f64, height: f64) -> Self {
        Self { cols, rows, width, height }
    }

    pub fn cell_width(&self) -> f64 {
        self.width / self.cols as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.height / self.rows as f64
    }

    pub fn cell_count(&self) -> u32 {
        self.cols * self.rows
    }

    pub fn index(&self, col: u32, row: u32) -> u32 {
        row * self.cols + col
    }

    pub fn cell_center(&self, col: u32, row: u32) -> Point {
        Point::new(
            (col as f64 + 0.5) * self.cell_width(),
            (row as f64 + 0.5) * self.cell_height(),
        )
    }

    /// Indices of every cell whose center falls inside `boundary`, ascending.
    pub fn rasterize(&self, boundary: &Boundary) -> Vec<u32> {
        if self.cols == 0 || self.rows == 0 {
            return Vec::new();
        }

        let rows: Vec<Vec<u32>> = (0..self.rows)
            .into_par_iter()
            .map(|row| {
                (0..self.cols)
                    .filter(|&col| boundary.contains(self.cell_center(col, row)))
                    .map(|col| self.index(col, row))
                    .collect()
            })
            .collect();

        rows.concat()
    }
}
