//! Grid partition of the simulated area into Nestene cells.
//!
//! `count` cells are laid out as a `cols × rows` grid with
//! `cols * rows == count`.  Among all factor pairs, the one whose cells are
//! closest to square for the given area is chosen, so 4 cells over 600×400
//! become 2×2 and 6 cells become 3×2.
//!
//! Cell edges are computed once and shared by neighbours, so a point on an
//! interior edge belongs to exactly one cell: cells are half-open
//! `[min, max)` and only the outer row/column close their far edge.

use auton_core::{Position, Rect};

use crate::{SimError, SimResult};

/// Largest Nestene count a partition accepts.
pub const MAX_NESTENES: u32 = 65_536;

#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    cols:    usize,
    rows:    usize,
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    cells:   Vec<Rect>,
}

impl Partition {
    /// Partition `width × height` into `count` cells.
    pub fn new(width: f64, height: f64, count: u32) -> SimResult<Self> {
        if count == 0 {
            return Err(SimError::Config("at least one Nestene is required".into()));
        }
        if count > MAX_NESTENES {
            return Err(SimError::Config(format!(
                "{count} Nestenes requested, at most {MAX_NESTENES} allowed"
            )));
        }
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(SimError::Config(format!(
                "cannot partition a {width}×{height} area"
            )));
        }

        let (cols, rows) = grid_shape(count, width, height);
        let x_edges = edges(width, cols);
        let y_edges = edges(height, rows);

        let mut cells = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            for c in 0..cols {
                let mut cell =
                    Rect::half_open(x_edges[c], y_edges[r], x_edges[c + 1], y_edges[r + 1]);
                cell.closed_max_x = c + 1 == cols;
                cell.closed_max_y = r + 1 == rows;
                cells.push(cell);
            }
        }

        Ok(Self { cols, rows, x_edges, y_edges, cells })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell bounds in row-major order (row 0 first).
    pub fn cells(&self) -> &[Rect] {
        &self.cells
    }

    /// Index of the cell containing `p`, or `None` outside the area.
    pub fn locate(&self, p: Position) -> Option<usize> {
        let col = axis_index(&self.x_edges, p.x)?;
        let row = axis_index(&self.y_edges, p.y)?;
        Some(row * self.cols + col)
    }
}

/// `(cols, rows)` for `count` cells over a `width × height` area.
pub fn grid_shape(count: u32, width: f64, height: f64) -> (usize, usize) {
    let n = count.max(1) as usize;
    let target = (width / height).ln();
    let mut best = (n, 1);
    let mut best_err = f64::INFINITY;
    for cols in (1..=n).filter(|c| n % c == 0) {
        let rows = n / cols;
        let err = ((cols as f64 / rows as f64).ln() - target).abs();
        if err < best_err {
            best = (cols, rows);
            best_err = err;
        }
    }
    best
}

fn edges(extent: f64, parts: usize) -> Vec<f64> {
    let mut e: Vec<f64> = (0..=parts).map(|i| extent * i as f64 / parts as f64).collect();
    // Pin the far edge so float division never shrinks the area.
    e[parts] = extent;
    e
}

fn axis_index(edges: &[f64], v: f64) -> Option<usize> {
    let last = edges.len() - 1;
    if !(v >= edges[0] && v <= edges[last]) {
        return None;
    }
    // Number of interior edges at or below v.
    Some(edges[1..last].partition_point(|&e| e <= v))
}
