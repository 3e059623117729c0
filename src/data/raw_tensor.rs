//! Borrowed views over the inference engine's output buffers.

use ndarray::ArrayViewD;
use crate::error::PostprocessError;

/// Declared shape of a model input or output. Negative dimensions are dynamic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorShape {
    dims: Vec<i64>,
    len: Option<usize>,
}

impl TensorShape {
    /// Builds a shape descriptor. Fails only when a fully static shape
    /// overflows `usize` when its dimensions are multiplied out.
    pub fn new(dims: &[i64]) -> Result<Self, PostprocessError> {
        let len = if dims.iter().any(|&d| d < 0) {
            None
        } else {
            Some(Self::size_for_shape(dims)?)
        };

        Ok(Self {
            dims: dims.to_vec(),
            len,
        })
    }

    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    pub fn is_dynamic(&self) -> bool {
        self.len.is_none()
    }

    /// Total element count, `None` for dynamic shapes.
    pub fn element_count(&self) -> Option<usize> {
        self.len
    }

    fn size_for_shape(dims: &[i64]) -> Result<usize, PostprocessError> {
        dims.iter().try_fold(1usize, |product, &d| {
            let d = usize::try_from(d).map_err(|_| PostprocessError::NegativeDimension(d))?;
            product
                .checked_mul(d)
                .ok_or_else(|| PostprocessError::ShapeOverflow(dims.to_vec()))
        })
    }
}

/// Model I/O shapes as declared by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIoShapes {
    pub input0: TensorShape,
    pub output0: TensorShape,
    /// Present on segmentation heads; detection ignores it.
    pub output1: Option<TensorShape>,
}

impl SessionIoShapes {
    pub fn new(input0: &[i64], output0: &[i64], output1: Option<&[i64]>) -> Result<Self, PostprocessError> {
        Ok(Self {
            input0: TensorShape::new(input0)?,
            output0: TensorShape::new(output0)?,
            output1: output1.map(TensorShape::new).transpose()?,
        })
    }
}

/// Immutable view over a raw float output: buffer, shape and element strides.
#[derive(Debug, Clone, Copy)]
pub struct RawOutputTensor<'a> {
    data: &'a [f32],
    shape: &'a [usize],
    strides: &'a [usize],
}

impl<'a> RawOutputTensor<'a> {
    /// Wraps a buffer, checking that every index the shape can address
    /// through `strides` lies inside `data`.
    pub fn new(data: &'a [f32], shape: &'a [usize], strides: &'a [usize]) -> Result<Self, PostprocessError> {
        if shape.len() != strides.len() {
            return Err(PostprocessError::StrideMismatch {
                shape: shape.len(),
                strides: strides.len(),
            });
        }

        let overflow = || PostprocessError::ShapeOverflow(shape.iter().map(|&d| d as i64).collect());

        // Highest reachable offset + 1; an empty dimension addresses nothing.
        let required = if shape.iter().any(|&d| d == 0) {
            0
        } else {
            shape
                .iter()
                .zip(strides)
                .try_fold(0usize, |acc, (&d, &s)| {
                    (d - 1).checked_mul(s).and_then(|x| acc.checked_add(x))
                })
                .and_then(|x| x.checked_add(1))
                .ok_or_else(overflow)?
        };

        if required > data.len() {
            return Err(PostprocessError::BufferTooSmall {
                required,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Row-major (C order) strides for `shape`.
    pub fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
        let mut strides = vec![1usize; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1].saturating_mul(shape[i + 1]);
        }
        strides
    }

    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Element at `[0, row, col]` of a rank 3 tensor.
    ///
    /// Callers validate rank and bounds beforehand.
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.strides[1] + col * self.strides[2]]
    }
}

/// Strides and shape pulled out of an `ndarray` view, kept alive by the caller
/// for as long as the `RawOutputTensor` borrowing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLayout {
    pub shape: Vec<usize>,
    pub strides: Vec<usize>,
}

impl ViewLayout {
    /// Reads the layout of a view whose memory is one contiguous block with
    /// non-negative strides, which is what inference runtimes hand back.
    pub fn of(view: &ArrayViewD<'_, f32>) -> Result<Self, PostprocessError> {
        if view.as_slice_memory_order().is_none() {
            return Err(PostprocessError::NonContiguous);
        }

        let strides = view
            .strides()
            .iter()
            .map(|&s| usize::try_from(s).map_err(|_| PostprocessError::NonContiguous))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            shape: view.shape().to_vec(),
            strides,
        })
    }
}

impl<'a> RawOutputTensor<'a> {
    /// Borrows an `ndarray` view together with the layout read from it by
    /// [`ViewLayout::of`].
    pub fn from_view(view: &'a ArrayViewD<'a, f32>, layout: &'a ViewLayout) -> Result<Self, PostprocessError> {
        let data = view.as_slice_memory_order().ok_or(PostprocessError::NonContiguous)?;
        Self::new(data, &layout.shape, &layout.strides)
    }
}
