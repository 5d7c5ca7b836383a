//! The double-buffered trail field.
//!
//! Layout is row-major: cell `(x, y)` lives at index `y * width + x`, with
//! `x` in `0..width` and `y` in `0..height`.
//!
//! # Buffer roles
//!
//! ```text
//! raw:      deposited into by movement, sensed, evaporated, blurred from
//! diffused: written by diffusion only, copied back into raw by feedback
//! deposits: per-cell u32 counters filled during movement, folded into raw
//! ```
//!
//! Every accessor that hands out a writable slice hands out the matching
//! source as a shared slice of a *different* buffer, so a stage that takes
//! one of the split borrows can never alias its input with its output.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;
use slime_core::{resolve_axis, BoundaryPolicy, ConfigError};

use crate::alloc::try_alloc_with;
use crate::view::{FieldView, RenderSource};

/// Two equally-sized scalar grids plus a deposit accumulator.
#[derive(Debug)]
pub struct TrailField {
    width: usize,
    height: usize,
    raw: Vec<f32>,
    diffused: Vec<f32>,
    deposits: Vec<AtomicU32>,
}

impl TrailField {
    /// Allocate a zeroed `width × height` field.
    ///
    /// Returns `Err(ConfigError::EmptyField)` for a zero dimension and
    /// `Err(ConfigError::AllocationFailed)` if any buffer cannot be
    /// reserved.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyField { width, height });
        }
        let cells = width
            .checked_mul(height)
            .ok_or(ConfigError::CellCountOverflow { width, height })?;

        let raw = try_alloc_with(cells, "raw trail buffer", || 0.0f32)?;
        let diffused = try_alloc_with(cells, "diffused trail buffer", || 0.0f32)?;
        let deposits = try_alloc_with(cells, "deposit accumulator", || AtomicU32::new(0))?;

        tracing::debug!(width, height, cells, "allocated trail field");
        Ok(Self {
            width,
            height,
            raw,
            diffused,
            deposits,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `width * height`.
    pub fn cell_count(&self) -> usize {
        self.raw.len()
    }

    /// Flat index of the in-bounds cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the field.
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} field",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Flat index of the possibly out-of-range cell `(x, y)` under `policy`.
    ///
    /// Returns `None` only for [`BoundaryPolicy::Discard`].
    pub fn resolve(&self, x: i64, y: i64, policy: BoundaryPolicy) -> Option<usize> {
        let rx = resolve_axis(x, self.width, policy)?;
        let ry = resolve_axis(y, self.height, policy)?;
        Some(ry * self.width + rx)
    }

    /// Sum of raw over the `(2r+1) × (2r+1)` window centred on `(cx, cy)`.
    ///
    /// Cells are resolved through `policy`: under `Discard` out-of-range
    /// cells contribute nothing, under `Clamp` edge cells may count more
    /// than once. Centres far outside the field are fine; offsets saturate.
    pub fn window_sum(&self, cx: i64, cy: i64, radius: usize, policy: BoundaryPolicy) -> f32 {
        let r = i64::try_from(radius).unwrap_or(i64::MAX);
        let mut sum = 0.0f32;
        for dy in -r..=r {
            let Some(y) = resolve_axis(cy.saturating_add(dy), self.height, policy) else {
                continue;
            };
            let row = &self.raw[y * self.width..(y + 1) * self.width];
            for dx in -r..=r {
                if let Some(x) = resolve_axis(cx.saturating_add(dx), self.width, policy) {
                    sum += row[x];
                }
            }
        }
        sum
    }

    /// Raw trail value at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.raw[self.index(x, y)]
    }

    /// Overwrite the raw trail value at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.index(x, y);
        self.raw[i] = value;
    }

    /// Diffused value at `(x, y)`.
    pub fn get_diffused(&self, x: usize, y: usize) -> f32 {
        self.diffused[self.index(x, y)]
    }

    /// The raw buffer.
    pub fn raw(&self) -> &[f32] {
        &self.raw
    }

    /// The diffused buffer.
    pub fn diffused(&self) -> &[f32] {
        &self.diffused
    }

    /// Mutable raw buffer, for stages that update it in place cell-by-cell
    /// with no cross-cell reads (evaporation).
    pub fn raw_mut(&mut self) -> &mut [f32] {
        &mut self.raw
    }

    /// Split borrow for diffusion: read raw, write diffused.
    pub fn diffusion_buffers(&mut self) -> (&[f32], &mut [f32]) {
        (&self.raw, &mut self.diffused)
    }

    /// Split borrow for feedback: read diffused, write raw.
    pub fn feedback_buffers(&mut self) -> (&[f32], &mut [f32]) {
        (&self.diffused, &mut self.raw)
    }

    /// Record one deposit at flat index `cell`.
    ///
    /// Safe to call concurrently from any number of threads; the counter
    /// is a relaxed atomic increment, which commutes exactly.
    pub fn record_deposit(&self, cell: usize) {
        self.deposits[cell].fetch_add(1, Ordering::Relaxed);
    }

    /// Pending deposit count at flat index `cell`.
    pub fn pending_deposits(&self, cell: usize) -> u32 {
        self.deposits[cell].load(Ordering::Relaxed)
    }

    /// Split borrow for folding deposits: write raw, drain counters.
    pub fn deposit_buffers(&mut self) -> (&mut [f32], &mut [AtomicU32]) {
        (&mut self.raw, &mut self.deposits)
    }

    /// Read-only view of one buffer for a renderer.
    pub fn view(&self, source: RenderSource) -> FieldView<'_> {
        let data = match source {
            RenderSource::Raw => &self.raw[..],
            RenderSource::Diffused => &self.diffused[..],
        };
        FieldView::new(self.width, self.height, source, data)
    }

    /// Call `f(x, y, raw_value)` for every cell, in parallel and in no
    /// particular order.
    pub fn for_each_cell<F>(&self, f: F)
    where
        F: Fn(usize, usize, f32) + Sync + Send,
    {
        let width = self.width;
        self.raw
            .par_chunks(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, &v) in row.iter().enumerate() {
                    f(x, y, v);
                }
            });
    }

    /// Sum of all raw values.
    pub fn total_raw(&self) -> f64 {
        self.raw.iter().map(|&v| v as f64).sum()
    }

    /// Largest raw value, or `0.0` for an all-zero field.
    pub fn max_raw(&self) -> f32 {
        self.raw.iter().copied().fold(0.0, f32::max)
    }

    /// Zero both buffers and the deposit accumulator.
    pub fn clear(&mut self) {
        self.raw.fill(0.0);
        self.diffused.fill(0.0);
        for c in &mut self.deposits {
            *c.get_mut() = 0;
        }
    }
}
