//! Read-only field views for rendering collaborators.

/// Which trail buffer a renderer samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderSource {
    /// The smoothed buffer written by diffusion.
    #[default]
    Diffused,
    /// The buffer agents deposit into and sense.
    Raw,
}

/// A borrowed, immutable view of one trail buffer.
///
/// Holding a `FieldView` keeps the owning simulation borrowed, so the
/// frame driver cannot tick while a renderer is reading.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    width: usize,
    height: usize,
    source: RenderSource,
    data: &'a [f32],
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(width: usize, height: usize, source: RenderSource, data: &'a [f32]) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            source,
            data,
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The buffer this view reads.
    pub fn source(&self) -> RenderSource {
        self.source
    }

    /// Row-major cell values.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Value at `(x, y)`, or `None` outside the field.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Iterate rows from `y = 0` upwards.
    pub fn rows(&self) -> impl Iterator<Item = &'a [f32]> {
        self.data.chunks(self.width)
    }

    /// Largest value in the view, or `0.0` when all cells are zero.
    ///
    /// Renderers typically divide by this to normalise intensities.
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}
