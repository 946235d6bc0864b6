//! Neighbor search for the density and pair-force passes.
//!
//! The reference behavior is an all-pairs scan. The default is a uniform
//! grid with cells one smoothing radius wide, built each step with a
//! counting sort: count particles per cell, prefix-sum the counts into cell
//! offsets, then scatter particle indices in ascending order. Any pair
//! closer than the smoothing radius lies in the same or an adjacent cell, so
//! a 3x3 block of cells holds every candidate.
//!
//! Both strategies report candidates in a fixed order for a given particle
//! layout, so sums are reproducible run to run. They differ from each other
//! only in summation order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Upper bound on grid cells along either axis. Smoothing radii smaller
/// than `extent / MAX_CELLS_PER_AXIS` get coarser cells instead of an
/// unbounded cell table.
pub const MAX_CELLS_PER_AXIS: usize = 256;

/// Strategy used to find interaction candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborSearch {
    /// Scan every particle for every particle. O(n²).
    BruteForce,
    /// Uniform grid with cells one smoothing radius wide.
    #[default]
    Grid,
}

/// Neighbor index rebuilt once per step.
#[derive(Clone, Debug, Default)]
pub struct SpatialGrid {
    search: NeighborSearch,
    count: usize,
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// `cell_start[c]..cell_start[c + 1]` indexes `sorted` for cell `c`.
    cell_start: Vec<u32>,
    /// Particle indices ordered by cell.
    sorted: Vec<u32>,
    /// Scatter cursor per cell, reused between rebuilds.
    cursor: Vec<u32>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy the index was last built with.
    #[inline]
    pub fn search(&self) -> NeighborSearch {
        self.search
    }

    /// Grid dimensions in cells (zero for brute force).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Rebuild the index for the current particle positions.
    pub fn rebuild(
        &mut self,
        particles: &[Particle],
        search: NeighborSearch,
        cell_size: f32,
        width: f32,
        height: f32,
    ) {
        self.search = search;
        self.count = particles.len();
        if search == NeighborSearch::BruteForce {
            self.cols = 0;
            self.rows = 0;
            return;
        }

        // Cells may be wider than requested but never narrower, so the 3x3
        // walk still covers every pair closer than `cell_size`.
        let extent = width.max(height);
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size.max(extent / MAX_CELLS_PER_AXIS as f32)
        } else {
            extent.max(1.0)
        };
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };

        self.cell_size = cell_size;
        self.cols = ((width / cell_size).ceil().max(1.0) as usize).min(MAX_CELLS_PER_AXIS);
        self.rows = ((height / cell_size).ceil().max(1.0) as usize).min(MAX_CELLS_PER_AXIS);
        let cells = self.cols * self.rows;

        self.cell_start.clear();
        self.cell_start.resize(cells + 1, 0);
        for p in particles {
            let c = self.cell_index(p.position);
            self.cell_start[c + 1] += 1;
        }
        for c in 0..cells {
            self.cell_start[c + 1] += self.cell_start[c];
        }

        self.cursor.clear();
        self.cursor.extend_from_slice(&self.cell_start[..cells]);
        self.sorted.clear();
        self.sorted.resize(particles.len(), 0);
        for (i, p) in particles.iter().enumerate() {
            let c = self.cell_index(p.position);
            let slot = self.cursor[c] as usize;
            self.sorted[slot] = i as u32;
            self.cursor[c] += 1;
        }
    }

    /// Call `f` with the index of every particle that may lie within one
    /// cell of `position`, including the particle at `position` itself.
    pub fn for_each_candidate<F: FnMut(usize)>(&self, position: Vec2, mut f: F) {
        match self.search {
            NeighborSearch::BruteForce => (0..self.count).for_each(f),
            NeighborSearch::Grid => {
                if self.cols == 0 || self.rows == 0 {
                    return;
                }
                let (cx, cy) = self.cell_coords(position);
                let x0 = cx.saturating_sub(1);
                let y0 = cy.saturating_sub(1);
                let x1 = (cx + 1).min(self.cols - 1);
                let y1 = (cy + 1).min(self.rows - 1);
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let c = y * self.cols + x;
                        let start = self.cell_start[c] as usize;
                        let end = self.cell_start[c + 1] as usize;
                        for &j in &self.sorted[start..end] {
                            f(j as usize);
                        }
                    }
                }
            }
        }
    }

    /// Cell coordinates of a position, clamped into the grid.
    fn cell_coords(&self, position: Vec2) -> (usize, usize) {
        let cx = (position.x / self.cell_size).floor();
        let cy = (position.y / self.cell_size).floor();
        // `as usize` saturates negatives and NaN to 0
        let cx = (cx.max(0.0) as usize).min(self.cols - 1);
        let cy = (cy.max(0.0) as usize).min(self.rows - 1);
        (cx, cy)
    }

    fn cell_index(&self, position: Vec2) -> usize {
        let (cx, cy) = self.cell_coords(position);
        cy * self.cols + cx
    }
}

/// Evaluate `f` for every index in `0..count`, in parallel when the
/// `parallel` feature is enabled. Each result depends only on its own
/// index, so both paths produce identical output.
pub(crate) fn map_indices<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..count).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}
