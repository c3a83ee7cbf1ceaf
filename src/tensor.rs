//! Minimal dense tensor types: a read-only strided view for inputs,
//! and an owned contiguous array for outputs.
//!
//! ```rust
//! use hatspline::{DenseArray, Layout, TensorView};
//!
//! // 2x3 values stored column-major
//! let data = [1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0];
//! let v = TensorView::new(&data, &[2, 3], Layout::ColumnMajor).unwrap();
//! assert_eq!(v.get(&[1, 0]), Some(4.0));
//! assert_eq!(v.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//!
//! // Outputs follow the layout class of the view they are shaped like
//! let out = DenseArray::<f64>::zeros_like(&v).unwrap();
//! assert_eq!(out.layout(), Layout::ColumnMajor);
//! ```
use num_traits::Zero;

use crate::InterpError;

/// Memory order of a contiguous tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// C order; the last axis varies fastest
    #[default]
    RowMajor,
    /// Fortran order; the first axis varies fastest
    ColumnMajor,
}

impl Layout {
    /// Element strides of a contiguous tensor of this shape in this order.
    /// Strides saturate at `usize::MAX` for shapes too large to address.
    pub fn strides(self, shape: &[usize]) -> Vec<usize> {
        let mut strides = vec![1_usize; shape.len()];
        let mut acc: usize = 1;
        match self {
            Layout::RowMajor => {
                for k in (0..shape.len()).rev() {
                    strides[k] = acc;
                    acc = acc.saturating_mul(shape[k]);
                }
            }
            Layout::ColumnMajor => {
                for k in 0..shape.len() {
                    strides[k] = acc;
                    acc = acc.saturating_mul(shape[k]);
                }
            }
        }
        strides
    }

    /// Multi-index of the element at position `flat` in this memory order
    #[inline]
    pub(crate) fn unravel(self, mut flat: usize, shape: &[usize], idx: &mut [usize]) {
        match self {
            Layout::RowMajor => {
                for k in (0..shape.len()).rev() {
                    idx[k] = flat % shape[k];
                    flat /= shape[k];
                }
            }
            Layout::ColumnMajor => {
                for k in 0..shape.len() {
                    idx[k] = flat % shape[k];
                    flat /= shape[k];
                }
            }
        }
    }
}

/// Total number of elements, failing on overflow
pub(crate) fn element_count(shape: &[usize]) -> Result<usize, InterpError> {
    shape
        .iter()
        .try_fold(1_usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| InterpError::invalid(format!("element count of shape {shape:?} overflows")))
}

/// A read-only, possibly strided, view of an N-dimensional array.
#[derive(Debug, Clone)]
pub struct TensorView<'a, T> {
    shape: Vec<usize>,

    /// Element (not byte) stride of each axis
    strides: Vec<usize>,

    data: &'a [T],
}

impl<'a, T: Copy> TensorView<'a, T> {
    /// View a contiguous buffer holding exactly `prod(shape)` elements.
    ///
    /// # Errors
    /// * If the buffer length does not match the shape
    pub fn new(data: &'a [T], shape: &[usize], layout: Layout) -> Result<Self, InterpError> {
        let n = element_count(shape)?;
        if data.len() != n {
            return Err(InterpError::invalid(format!(
                "buffer of {} elements cannot be viewed with shape {shape:?}",
                data.len()
            )));
        }

        Ok(Self {
            shape: shape.to_vec(),
            strides: layout.strides(shape),
            data,
        })
    }

    /// View a slice as a one-dimensional tensor
    pub fn from_slice(data: &'a [T]) -> Self {
        Self {
            shape: vec![data.len()],
            strides: vec![1],
            data,
        }
    }

    /// View a buffer with explicit per-axis element strides.
    /// Zero strides are allowed and repeat an element along that axis.
    ///
    /// # Errors
    /// * If `shape` and `strides` have different lengths
    /// * If any addressable element would fall outside `data`
    pub fn with_strides(
        data: &'a [T],
        shape: &[usize],
        strides: &[usize],
    ) -> Result<Self, InterpError> {
        if shape.len() != strides.len() {
            return Err(InterpError::invalid(
                "shape and strides have different lengths",
            ));
        }
        let n = element_count(shape)?;
        if n > 0 {
            let last = shape
                .iter()
                .zip(strides)
                .try_fold(0_usize, |acc, (&s, &st)| {
                    (s - 1).checked_mul(st).and_then(|off| acc.checked_add(off))
                });
            match last {
                Some(last) if last < data.len() => {}
                _ => {
                    return Err(InterpError::invalid(format!(
                        "strides {strides:?} with shape {shape:?} address past a buffer of {} elements",
                        data.len()
                    )))
                }
            }
        }

        Ok(Self {
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contiguous order of this view, if it has one.
    /// Views that are contiguous in both orders report [`Layout::RowMajor`].
    pub fn layout(&self) -> Option<Layout> {
        if self.data.len() != self.len() {
            return None;
        }
        [Layout::RowMajor, Layout::ColumnMajor]
            .into_iter()
            .find(|layout| {
                let expected = layout.strides(&self.shape);
                // Strides of unit-length axes never affect addressing
                (0..self.ndim()).all(|k| self.shape[k] < 2 || self.strides[k] == expected[k])
            })
    }

    /// Element at a multi-index, or `None` if the index is out of bounds
    pub fn get(&self, idx: &[usize]) -> Option<T> {
        if idx.len() != self.ndim() || idx.iter().zip(&self.shape).any(|(&i, &n)| i >= n) {
            return None;
        }
        Some(self.at(self.offset(idx)))
    }

    /// Buffer offset of an in-bounds multi-index
    #[inline(always)]
    pub(crate) fn offset(&self, idx: &[usize]) -> usize {
        let mut off = 0;
        for k in 0..idx.len() {
            off += idx[k] * self.strides[k];
        }
        off
    }

    #[inline(always)]
    pub(crate) fn at(&self, offset: usize) -> T {
        self.data[offset]
    }

    /// View of the `k`-th slice along the first axis, or `None` if there is no such slice
    pub fn subview(&self, k: usize) -> Option<TensorView<'a, T>> {
        let (&n, shape) = self.shape.split_first()?;
        if k >= n {
            return None;
        }
        let strides = &self.strides[1..];
        let start = k * self.strides[0];
        let span = if shape.iter().any(|&s| s == 0) {
            0
        } else {
            1 + shape
                .iter()
                .zip(strides)
                .map(|(&s, &st)| (s - 1) * st)
                .sum::<usize>()
        };

        Some(TensorView {
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            data: self.data.get(start..start + span)?,
        })
    }

    /// Iterate over elements in logical row-major order,
    /// regardless of the underlying memory order
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter {
            view: self,
            idx: vec![0; self.ndim()],
            remaining: self.len(),
        }
    }
}

/// Row-major element iterator over a [`TensorView`]
pub struct Iter<'v, 'a, T> {
    view: &'v TensorView<'a, T>,
    idx: Vec<usize>,
    remaining: usize,
}

impl<T: Copy> Iterator for Iter<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let v = self.view.at(self.view.offset(&self.idx));
        self.remaining -= 1;

        // Odometer increment, last axis fastest
        for k in (0..self.idx.len()).rev() {
            self.idx[k] += 1;
            if self.idx[k] < self.view.shape[k] {
                break;
            }
            self.idx[k] = 0;
        }

        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Copy> ExactSizeIterator for Iter<'_, '_, T> {}

/// Allocate `n` copies of `fill`, reporting allocation failure instead of aborting
fn try_alloc<T: Copy>(n: usize, fill: T) -> Result<Vec<T>, InterpError> {
    let addressable = n
        .checked_mul(core::mem::size_of::<T>())
        .is_some_and(|bytes| bytes <= isize::MAX as usize);
    if !addressable {
        return Err(InterpError::ResourceExhaustion(format!(
            "array of {n} elements exceeds the addressable size"
        )));
    }

    let mut data = Vec::new();
    data.try_reserve_exact(n)
        .map_err(|_| InterpError::OutOfMemory { elements: n })?;
    data.resize(n, fill);
    Ok(data)
}

/// An owned, contiguous N-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray<T> {
    shape: Vec<usize>,
    layout: Layout,
    data: Vec<T>,
}

impl<T: Copy> DenseArray<T> {
    /// Wrap a buffer holding exactly `prod(shape)` elements in the given order.
    ///
    /// # Errors
    /// * If the buffer length does not match the shape
    pub fn from_vec(data: Vec<T>, shape: &[usize], layout: Layout) -> Result<Self, InterpError> {
        let n = element_count(shape)?;
        if data.len() != n {
            return Err(InterpError::invalid(format!(
                "buffer of {} elements does not match shape {shape:?}",
                data.len()
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
            layout,
            data,
        })
    }

    /// A new array with the shape of `like`, filled with `fill`.
    /// The layout follows `like` when it is contiguous, and is row-major otherwise.
    ///
    /// # Errors
    /// * `ResourceExhaustion` if the array could not be addressed at all
    /// * `OutOfMemory` if the allocation fails
    pub fn full_like<U: Copy>(like: &TensorView<'_, U>, fill: T) -> Result<Self, InterpError> {
        let n = element_count(like.shape())?;
        let data = try_alloc(n, fill)?;
        Ok(Self {
            shape: like.shape().to_vec(),
            layout: like.layout().unwrap_or_default(),
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements in memory order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at a multi-index, or `None` if the index is out of bounds
    pub fn get(&self, idx: &[usize]) -> Option<T> {
        self.view().get(idx)
    }

    pub fn view(&self) -> TensorView<'_, T> {
        TensorView {
            shape: self.shape.clone(),
            strides: self.layout.strides(&self.shape),
            data: &self.data,
        }
    }
}

impl<T: Copy + Zero> DenseArray<T> {
    /// A zero-filled array shaped like `like`; see [`DenseArray::full_like`]
    pub fn zeros_like<U: Copy>(like: &TensorView<'_, U>) -> Result<Self, InterpError> {
        Self::full_like(like, T::zero())
    }
}

#[cfg(feature = "ndarray")]
impl<'a, T: Copy> TensorView<'a, T> {
    /// Borrow a row-major or column-major contiguous `ndarray` view without copying.
    ///
    /// # Errors
    /// * If the view is not contiguous in either order (e.g. sliced with a step,
    ///   or with negative strides)
    pub fn from_ndarray<D: ndarray::Dimension>(
        view: ndarray::ArrayView<'a, T, D>,
    ) -> Result<Self, InterpError> {
        let shape = view.shape().to_vec();
        if let Some(data) = view.to_slice() {
            return Self::new(data, &shape, Layout::RowMajor);
        }
        if let Some(data) = view.reversed_axes().to_slice() {
            return Self::new(data, &shape, Layout::ColumnMajor);
        }
        Err(InterpError::invalid(
            "ndarray view is neither row-major nor column-major contiguous",
        ))
    }
}

#[cfg(feature = "ndarray")]
impl<T: Copy> DenseArray<T> {
    /// Convert into a dynamic-dimensional `ndarray` array, keeping the memory order.
    pub fn into_ndarray(self) -> Result<ndarray::ArrayD<T>, InterpError> {
        use ndarray::ShapeBuilder;

        let shape = ndarray::IxDyn(&self.shape);
        let arr = match self.layout {
            Layout::RowMajor => ndarray::ArrayD::from_shape_vec(shape, self.data),
            Layout::ColumnMajor => ndarray::ArrayD::from_shape_vec(shape.f(), self.data),
        };
        arr.map_err(|e| InterpError::invalid(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strides() {
        assert_eq!(Layout::RowMajor.strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(Layout::ColumnMajor.strides(&[2, 3, 4]), vec![1, 2, 6]);
        assert!(Layout::RowMajor.strides(&[]).is_empty());

        // Shapes too large to address saturate instead of overflowing
        assert_eq!(Layout::RowMajor.strides(&[usize::MAX, 2, 3]), vec![6, 3, 1]);
        assert_eq!(
            Layout::ColumnMajor.strides(&[3, usize::MAX, 2]),
            vec![1, 3, usize::MAX]
        );
    }

    #[test]
    fn test_subview() {
        let c = [1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let vc = TensorView::new(&c, &[2, 3], Layout::RowMajor).unwrap();
        let row = vc.subview(1).unwrap();
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.layout(), Some(Layout::RowMajor));
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
        assert!(vc.subview(2).is_none());

        // Slices of a column-major tensor are strided
        let f = [1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0];
        let vf = TensorView::new(&f, &[2, 3], Layout::ColumnMajor).unwrap();
        let row = vf.subview(1).unwrap();
        assert_eq!(row.strides(), &[2]);
        assert_eq!(row.layout(), None);
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);

        let empty: [f64; 0] = [];
        let ve = TensorView::new(&empty, &[2, 0], Layout::RowMajor).unwrap();
        assert!(ve.subview(1).unwrap().is_empty());
        assert!(TensorView::from_slice(&c).subview(0).unwrap().shape().is_empty());
    }

    #[test]
    fn test_unravel_matches_strides() {
        let shape = [3, 2, 4];
        let mut idx = [0; 3];
        for layout in [Layout::RowMajor, Layout::ColumnMajor] {
            let strides = layout.strides(&shape);
            for flat in 0..24 {
                layout.unravel(flat, &shape, &mut idx);
                let back: usize = idx.iter().zip(&strides).map(|(i, s)| i * s).sum();
                assert_eq!(back, flat);
            }
        }
    }

    #[test]
    fn test_view_layouts_agree_logically() {
        let c = [1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let f = [1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0];
        let vc = TensorView::new(&c, &[2, 3], Layout::RowMajor).unwrap();
        let vf = TensorView::new(&f, &[2, 3], Layout::ColumnMajor).unwrap();

        assert_eq!(vc.layout(), Some(Layout::RowMajor));
        assert_eq!(vf.layout(), Some(Layout::ColumnMajor));
        assert_eq!(vc.iter().collect::<Vec<_>>(), vf.iter().collect::<Vec<_>>());
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(vc.get(&[i, j]), vf.get(&[i, j]));
            }
        }
        assert_eq!(vc.get(&[2, 0]), None);
        assert_eq!(vc.get(&[0]), None);
    }

    #[test]
    fn test_view_length_mismatch() {
        let c = [1.0_f64, 2.0, 3.0];
        assert!(matches!(
            TensorView::new(&c, &[2, 2], Layout::RowMajor),
            Err(InterpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_strided_views() {
        // Every other element of a buffer
        let buf = [0.0_f64, -1.0, 1.0, -1.0, 2.0, -1.0];
        let v = TensorView::with_strides(&buf, &[3], &[2]).unwrap();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
        assert_eq!(v.layout(), None);

        // Broadcast a single value
        let b = TensorView::with_strides(&buf[..1], &[2, 2], &[0, 0]).unwrap();
        assert_eq!(b.len(), 4);
        assert!(b.iter().all(|x| x == 0.0));

        // Addressing past the end
        assert!(TensorView::with_strides(&buf, &[4], &[2]).is_err());
        assert!(TensorView::with_strides(&buf, &[3], &[2, 1]).is_err());
    }

    #[test]
    fn test_full_like_follows_layout() {
        let f = [1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0];
        let vf = TensorView::new(&f, &[2, 3], Layout::ColumnMajor).unwrap();
        let out = DenseArray::<f64>::zeros_like(&vf).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.layout(), Layout::ColumnMajor);
        assert_eq!(out.len(), 6);

        let strided = TensorView::with_strides(&f, &[3], &[2]).unwrap();
        let out = DenseArray::full_like(&strided, 7.0_f64).unwrap();
        assert_eq!(out.layout(), Layout::RowMajor);
        assert_eq!(out.as_slice(), &[7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_oversized_output() {
        let one = [0.0_f64];
        let huge = TensorView::with_strides(&one, &[usize::MAX / 2], &[0]).unwrap();
        assert!(matches!(
            DenseArray::<f64>::zeros_like(&huge),
            Err(InterpError::ResourceExhaustion(_))
        ));

        assert!(matches!(
            TensorView::with_strides(&one, &[usize::MAX, 2], &[0, 0]),
            Err(InterpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_dense_array_roundtrip_view() {
        let a = DenseArray::from_vec(vec![1.0_f64, 2.0, 3.0, 4.0], &[2, 2], Layout::ColumnMajor)
            .unwrap();
        assert_eq!(a.get(&[0, 1]), Some(3.0));
        assert_eq!(a.view().iter().collect::<Vec<_>>(), vec![1.0, 3.0, 2.0, 4.0]);
        assert_eq!(a.clone().into_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(DenseArray::from_vec(vec![1.0_f64], &[2], Layout::RowMajor).is_err());
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_interop() {
        use ndarray::{array, ShapeBuilder};

        let c = array![[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let vc = TensorView::from_ndarray(c.view()).unwrap();
        assert_eq!(vc.layout(), Some(Layout::RowMajor));
        assert_eq!(vc.get(&[1, 2]), Some(6.0));

        let f = ndarray::Array2::from_shape_vec(
            (2, 3).f(),
            vec![1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0],
        )
        .unwrap();
        let vf = TensorView::from_ndarray(f.view()).unwrap();
        assert_eq!(vf.layout(), Some(Layout::ColumnMajor));
        assert_eq!(vf.iter().collect::<Vec<_>>(), vc.iter().collect::<Vec<_>>());

        // Every other column
        let stepped = c.slice_each_axis(|ax| {
            let step = if ax.axis.index() == 1 { 2 } else { 1 };
            ndarray::Slice::new(0, None, step)
        });
        assert!(TensorView::from_ndarray(stepped).is_err());

        let out = DenseArray::from_vec(
            vec![1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0],
            &[2, 3],
            Layout::ColumnMajor,
        )
        .unwrap()
        .into_ndarray()
        .unwrap();
        assert_eq!(out, c.into_dyn());
    }
}
