//! Data-parallel batch dispatch.
//!
//! A stage over `n` units (agents or cells) is split into
//! `ceil(n / width)` groups, where `width` is the device's preferred batch
//! width for that stage. Groups run in no particular order; the call
//! returns only after every group has finished, which is the barrier the
//! scheduler relies on between stages.

use rayon::prelude::*;
use slime_core::{BatchProfile, ExecutionMode, StageKind};

/// Number of groups needed to cover `units` at `width` units per group.
///
/// # Panics
///
/// Panics if `width` is zero. [`SimConfig::validate`](slime_core::SimConfig::validate)
/// rejects zero widths.
pub fn group_count(units: usize, width: usize) -> usize {
    assert!(width > 0, "batch width must be non-zero");
    units.div_ceil(width)
}

/// Batch executor combining an [`ExecutionMode`] with a [`BatchProfile`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    mode: ExecutionMode,
    profile: BatchProfile,
}

impl Dispatch {
    /// Create a dispatcher.
    pub fn new(mode: ExecutionMode, profile: BatchProfile) -> Self {
        Self { mode, profile }
    }

    /// Single-threaded dispatcher with the given profile.
    pub fn serial(profile: BatchProfile) -> Self {
        Self::new(ExecutionMode::Serial, profile)
    }

    /// Execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Batch profile.
    pub fn profile(&self) -> &BatchProfile {
        &self.profile
    }

    /// Preferred batch width for `stage`.
    pub fn width(&self, stage: StageKind) -> usize {
        self.profile.width_for(stage)
    }

    /// Groups `stage` dispatches over `units` units.
    pub fn groups(&self, stage: StageKind, units: usize) -> usize {
        group_count(units, self.width(stage))
    }

    /// Run `f(offset, chunk)` over `data` split into `width`-unit chunks.
    ///
    /// `offset` is the index of `chunk[0]` within `data`. Returns the
    /// number of groups dispatched.
    pub fn for_each_mut<T, F>(&self, width: usize, data: &mut [T], f: F) -> usize
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        let groups = group_count(data.len(), width);
        match self.mode {
            ExecutionMode::Serial => {
                for (g, chunk) in data.chunks_mut(width).enumerate() {
                    f(g * width, chunk);
                }
            }
            ExecutionMode::Parallel => {
                data.par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(g, chunk)| f(g * width, chunk));
            }
        }
        groups
    }

    /// Like [`for_each_mut`](Self::for_each_mut), but each group also
    /// returns a count that is summed across groups.
    ///
    /// Returns `(groups, total)`.
    pub fn sum_mut<T, F>(&self, width: usize, data: &mut [T], f: F) -> (usize, usize)
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> usize + Sync + Send,
    {
        let groups = group_count(data.len(), width);
        let total = match self.mode {
            ExecutionMode::Serial => data
                .chunks_mut(width)
                .enumerate()
                .map(|(g, chunk)| f(g * width, chunk))
                .sum(),
            ExecutionMode::Parallel => data
                .par_chunks_mut(width)
                .enumerate()
                .map(|(g, chunk)| f(g * width, chunk))
                .sum(),
        };
        (groups, total)
    }

    /// Run `f(dst_chunk, src_chunk)` over two equal-length buffers split
    /// into matching `width`-unit chunks.
    ///
    /// # Panics
    ///
    /// Panics if the buffers differ in length.
    pub fn zip_mut<T, U, F>(&self, width: usize, dst: &mut [T], src: &[U], f: F) -> usize
    where
        T: Send,
        U: Sync,
        F: Fn(&mut [T], &[U]) + Sync + Send,
    {
        assert_eq!(dst.len(), src.len(), "zip_mut buffers differ in length");
        let groups = group_count(dst.len(), width);
        match self.mode {
            ExecutionMode::Serial => {
                for (d, s) in dst.chunks_mut(width).zip(src.chunks(width)) {
                    f(d, s);
                }
            }
            ExecutionMode::Parallel => {
                dst.par_chunks_mut(width)
                    .zip(src.par_chunks(width))
                    .for_each(|(d, s)| f(d, s));
            }
        }
        groups
    }
}
