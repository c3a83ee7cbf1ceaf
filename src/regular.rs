//! Hat-basis B-spline interpolation on a uniform grid.
//!
//! The interpolant at `x` is the tensor-product sum over grid nodes
//! `sum(coef[i1, ..., iN] * hat(u1 - i1) * ... * hat(uN - iN))`,
//! where `uk` is `x` mapped onto the index space of axis `k`.
//! It reproduces the coefficients exactly at grid nodes, is multilinear
//! between them, and is zero outside the grid.
//!
//! ```rust
//! use hatspline::regular;
//!
//! // 3x2 grid spanning [0, 2] x [0, 1]
//! let dims = [3, 2];
//! let limits = [(0.0_f64, 2.0), (0.0, 1.0)];
//!
//! // Coefficients in C order (z(x0, y0), z(x0, y1), z(x1, y0), ...)
//! let z = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! // Observation points
//! let xobs = [1.0_f64, 0.5, 7.0];
//! let yobs = [1.0_f64, 0.5, 0.0];
//! let obs = [&xobs[..], &yobs[..]];
//!
//! let out = regular::interpn_alloc(&dims, &limits, &z, &obs).unwrap();
//! assert_eq!(out, vec![3.0, 1.5, 0.0]);
//! ```
use num_traits::{Float, NumCast};

use crate::basis::{grid_coordinate, hat};
use crate::utils::to_float;
use crate::{DenseArray, Footprint, InterpError, InterpOptions, Layout, Scalar, TensorView};

/// Evaluate hat-spline interpolation on a uniform grid in 1 to 3 dimensions,
/// with default [`InterpOptions`].
/// Assumes C-style ordering of vals (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...).
///
/// # Errors
/// * If the number of limits or observation axes does not match `dims`
/// * If `vals` does not hold `prod(dims)` values
/// * If observation axes and `out` differ in length
/// * If there are zero or more than 3 dimensions; use [`HatSplineRegular`] directly
///   for higher dimensions
pub fn interpn<T: Scalar>(
    dims: &[usize],
    limits: &[(T, T)],
    vals: &[T],
    obs: &[&[T]],
    out: &mut [T],
) -> Result<(), InterpError> {
    let ndims = dims.len();
    if limits.len() != ndims || obs.len() != ndims {
        return Err(InterpError::invalid("Dimension mismatch"));
    }
    let vals = TensorView::new(vals, dims, Layout::RowMajor)?;

    match ndims {
        1 => interpn_fixed::<T, 1>(vals, limits, obs, out),
        2 => interpn_fixed::<T, 2>(vals, limits, obs, out),
        3 => interpn_fixed::<T, 3>(vals, limits, obs, out),
        _ => Err(InterpError::invalid(format!(
            "{ndims} dimensions given; convenience methods cover 1 to 3"
        ))),
    }
}

fn interpn_fixed<T: Scalar, const N: usize>(
    vals: TensorView<'_, T>,
    limits: &[(T, T)],
    obs: &[&[T]],
    out: &mut [T],
) -> Result<(), InterpError> {
    let limits: [(T, T); N] = limits
        .try_into()
        .map_err(|_| InterpError::invalid("Dimension mismatch"))?;
    let obs: &[&[T]; N] = obs
        .try_into()
        .map_err(|_| InterpError::invalid("Dimension mismatch"))?;
    HatSplineRegular::new(vals, limits)?.interp(obs, out)
}

/// Evaluate interpolant, allocating a new Vec for the output.
///
/// For best results, use the `interpn` function with preallocated output.
pub fn interpn_alloc<T: Scalar>(
    dims: &[usize],
    limits: &[(T, T)],
    vals: &[T],
    obs: &[&[T]],
) -> Result<Vec<T>, InterpError> {
    let n = obs
        .first()
        .ok_or_else(|| InterpError::invalid("No observation axes"))?
        .len();
    let mut out = vec![T::zero(); n];
    interpn(dims, limits, vals, obs, &mut out)?;
    Ok(out)
}

/// Check whether a list of observation points are inside the coordinate range
/// of each axis within some absolute tolerance. Points outside evaluate to zero.
///
/// A point is a violation when it lies outside `[a, b]` by strictly more than `atol`,
/// so the endpoints themselves are in bounds even with `atol = 0`.
///
/// Output slice entry `i` is set to `false` if no points on that dimension are out of bounds,
/// and set to `true` if there is a bounds violation on that axis.
///
/// # Errors
/// * If the number of limits does not match the number of observation axes
/// * If the output slice length does not match the number of observation axes
pub fn check_bounds<T: Float>(
    limits: &[(T, T)],
    obs: &[&[T]],
    atol: T,
    out: &mut [bool],
) -> Result<(), InterpError> {
    let n = limits.len();
    if !(obs.len() == n && out.len() == n) {
        return Err(InterpError::invalid("Dimension mismatch"));
    }

    for i in 0..n {
        let (a, b) = limits[i];
        let lo = a.min(b);
        let hi = a.max(b);

        out[i] = obs[i].iter().any(|&x| x < lo - atol || x > hi + atol);
    }
    Ok(())
}

/// Per-thread evaluation storage
struct Scratch<T, const N: usize> {
    /// Basis weight of every node on each axis, for the dense footprint
    weights: [Vec<T>; N],

    /// Multi-index into the observation arrays
    idx: Vec<usize>,
}

/// Visit every multi-index below `counts` in C order
#[inline]
fn for_each_index<const N: usize>(counts: [usize; N], mut f: impl FnMut(&[usize; N])) {
    if counts.iter().any(|&c| c == 0) {
        return;
    }
    let mut idx = [0_usize; N];
    loop {
        f(&idx);

        // Odometer increment, last axis fastest
        let mut k = N;
        loop {
            if k == 0 {
                return;
            }
            k -= 1;
            idx[k] += 1;
            if idx[k] < counts[k] {
                break;
            }
            idx[k] = 0;
        }
    }
}

/// An N-dimensional hat-basis B-spline interpolator on a uniform grid.
///
/// Node `i` of axis `k` sits at `a + i * (b - a) / (dims[k] - 1)` for
/// `limits[k] = (a, b)`, and its coefficient is weighted by `hat(u - i)`
/// where `u` is the observation mapped onto that axis' index space.
///
/// Operation Complexity
/// * O(prod(dims)) per point with [`Footprint::Dense`]
/// * O(2^N) per point with [`Footprint::Compact`]
///
/// Memory Complexity
/// * O(sum(dims)) scratch per evaluating thread for the dense footprint, O(N) otherwise
pub struct HatSplineRegular<'a, T: Float, const N: usize> {
    /// Size of each dimension
    dims: [usize; N],

    /// Coordinate range spanned by each dimension
    limits: [(T, T); N],

    /// Index of the last node of each dimension
    last: [T; N],

    /// Coefficient at each node, size prod(dims)
    vals: TensorView<'a, T>,

    options: InterpOptions,
}

impl<'a, T: Scalar, const N: usize> HatSplineRegular<'a, T, N> {
    /// Build a new interpolator with default options.
    ///
    /// Axes of any size are accepted. A single-node axis maps every observation to
    /// index 0; an empty axis makes the interpolant identically zero.
    ///
    /// # Errors
    /// * If the coefficient tensor does not have N dimensions
    pub fn new(vals: TensorView<'a, T>, limits: [(T, T); N]) -> Result<Self, InterpError> {
        Self::new_with(vals, limits, &InterpOptions::default())
    }

    /// Build a new interpolator with the given options.
    ///
    /// # Errors
    /// * If the coefficient tensor does not have N dimensions
    /// * If a coordinate range is degenerate under [`DomainPolicy::Strict`](crate::DomainPolicy::Strict)
    pub fn new_with(
        vals: TensorView<'a, T>,
        limits: [(T, T); N],
        options: &InterpOptions,
    ) -> Result<Self, InterpError> {
        const { assert!(N > 0, "Interpolation needs at least one dimension") };

        let dims: [usize; N] = vals.shape().try_into().map_err(|_| {
            InterpError::invalid(format!(
                "Expected a {N}-dimensional coefficient grid, got shape {:?}",
                vals.shape()
            ))
        })?;
        options.domain.check(&limits)?;

        let last = core::array::from_fn(|k| to_float(dims[k].saturating_sub(1)));

        Ok(Self {
            dims,
            limits,
            last,
            vals,
            options: *options,
        })
    }

    /// Build an interpolator from the node coordinates of each axis, as they run
    /// along the axes of an `ij`-indexed meshgrid, with default options.
    ///
    /// Each axis spans the smallest to the largest of its nodes. Only the extent and
    /// count of the nodes are used, so they are taken to be evenly spaced.
    ///
    /// ```rust
    /// use hatspline::{HatSplineRegular, Layout, TensorView};
    ///
    /// let x = [0.0_f64, 0.5, 1.0];
    /// let y = [2.0_f64, 4.0];
    /// let z = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    /// let vals = TensorView::new(&z, &[3, 2], Layout::RowMajor).unwrap();
    ///
    /// let interp = HatSplineRegular::<f64, 2>::from_grid(vals, &[&x[..], &y[..]]).unwrap();
    /// assert_eq!(interp.limits(), &[(0.0, 1.0), (2.0, 4.0)]);
    /// assert_eq!(interp.interp_one([0.5, 4.0]), 3.0);
    /// ```
    ///
    /// # Errors
    /// * If the number of node axes is not N
    /// * If the coefficient tensor does not have N dimensions
    /// * If an axis has no nodes, or a different number of nodes than `vals` has along it
    pub fn from_grid(vals: TensorView<'a, T>, grids: &[&[T]]) -> Result<Self, InterpError> {
        Self::from_grid_with(vals, grids, &InterpOptions::default())
    }

    /// Build an interpolator from per-axis node coordinates with the given options.
    /// See [`HatSplineRegular::from_grid`].
    pub fn from_grid_with(
        vals: TensorView<'a, T>,
        grids: &[&[T]],
        options: &InterpOptions,
    ) -> Result<Self, InterpError> {
        let grids: &[&[T]; N] = grids.try_into().map_err(|_| {
            InterpError::invalid(format!("Expected {N} grid axes, got {}", grids.len()))
        })?;
        if vals.ndim() != N {
            return Err(InterpError::invalid(format!(
                "Expected a {N}-dimensional coefficient grid, got shape {:?}",
                vals.shape()
            )));
        }

        let mut limits = [(T::zero(), T::zero()); N];
        for k in 0..N {
            let nodes = grids[k];
            if nodes.is_empty() || nodes.len() != vals.shape()[k] {
                return Err(InterpError::invalid(format!(
                    "Grid axis {k} has {} nodes, coefficient grid has shape {:?}",
                    nodes.len(),
                    vals.shape()
                )));
            }
            let lo = nodes.iter().fold(T::infinity(), |acc, &x| acc.min(x));
            let hi = nodes.iter().fold(T::neg_infinity(), |acc, &x| acc.max(x));
            limits[k] = (lo, hi);
        }

        Self::new_with(vals, limits, options)
    }

    pub fn dims(&self) -> &[usize; N] {
        &self.dims
    }

    pub fn limits(&self) -> &[(T, T); N] {
        &self.limits
    }

    /// Interpolate on a contiguous list of observation points,
    /// one slice of coordinates per dimension.
    ///
    /// # Errors
    ///   * If the observation slices and the output differ in length
    ///   * If a dedicated thread pool cannot be built (`rayon` feature)
    pub fn interp(&self, x: &[&[T]; N], out: &mut [T]) -> Result<(), InterpError> {
        let size_matches = x.iter().all(|&xx| xx.len() == out.len());
        if !size_matches {
            return Err(InterpError::invalid("Dimension mismatch"));
        }

        self.log_call(out.len());
        self.fill(out, 0, |i, _| core::array::from_fn(|k| x[k][i]))
    }

    /// Interpolate at observation points given as N same-shaped tensors of coordinates,
    /// allocating the output.
    ///
    /// The output has the shape of `x[0]`, and its layout follows `x[0]`
    /// (row-major when `x[0]` is not contiguous).
    ///
    /// # Errors
    ///   * If any coordinate tensor differs in shape from the first
    ///   * If the output cannot be allocated
    ///   * If a dedicated thread pool cannot be built (`rayon` feature)
    pub fn interp_tensor(&self, x: [&TensorView<'_, T>; N]) -> Result<DenseArray<T>, InterpError> {
        let shape = x[0].shape();
        if let Some(k) = (1..N).find(|&k| x[k].shape() != shape) {
            return Err(InterpError::invalid(format!(
                "Coordinate array {k} has shape {:?}, expected {shape:?}",
                x[k].shape()
            )));
        }

        let mut out = DenseArray::<T>::zeros_like(x[0])?;
        let layout = out.layout();
        self.log_call(out.len());

        self.fill(out.as_mut_slice(), shape.len(), |p, idx| {
            // Output is walked in its own memory order
            layout.unravel(p, shape, idx);
            let idx: &[usize] = idx;
            core::array::from_fn(|k| x[k].at(x[k].offset(idx)))
        })?;

        Ok(out)
    }

    /// Interpolate at points stacked along a leading axis of length N, so that
    /// `x[k, ...]` holds the coordinates on axis `k`.
    ///
    /// The output has the shape of `x` without its leading axis.
    ///
    /// # Errors
    ///   * If the leading axis of `x` is not of length N
    ///   * If the output cannot be allocated
    ///   * If a dedicated thread pool cannot be built (`rayon` feature)
    pub fn interp_stacked(&self, x: &TensorView<'_, T>) -> Result<DenseArray<T>, InterpError> {
        if x.shape().first() != Some(&N) {
            return Err(InterpError::invalid(format!(
                "Expected coordinates stacked along a leading axis of length {N}, got shape {:?}",
                x.shape()
            )));
        }
        let axes = (0..N)
            .map(|k| {
                x.subview(k)
                    .ok_or_else(|| InterpError::invalid("Dimension mismatch"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.interp_tensor(core::array::from_fn(|k| &axes[k]))
    }

    /// Interpolate the value at a point.
    ///
    /// Points that map outside the grid evaluate to zero.
    #[inline]
    pub fn interp_one(&self, x: [T; N]) -> T {
        let mut scratch = self.scratch(0);
        self.eval(x, &mut scratch)
    }

    fn log_call(&self, points: usize) {
        tracing::debug!(
            ndims = N,
            grid = ?self.dims,
            points,
            footprint = ?self.options.footprint,
            "evaluating hat-spline interpolant"
        );
    }

    fn scratch(&self, rank: usize) -> Scratch<T, N> {
        let weights = core::array::from_fn(|k| match self.options.footprint {
            Footprint::Dense => vec![T::zero(); self.dims[k]],
            Footprint::Compact => Vec::new(),
        });
        Scratch {
            weights,
            idx: vec![0; rank],
        }
    }

    /// Evaluate every output element, reading the coordinates of element `p`
    /// from `point(p, idx)` where `idx` is storage for a multi-index of length `rank`.
    #[cfg(not(feature = "rayon"))]
    fn fill<F>(&self, out: &mut [T], rank: usize, point: F) -> Result<(), InterpError>
    where
        F: Fn(usize, &mut [usize]) -> [T; N] + Sync,
    {
        let mut scratch = self.scratch(rank);
        for p in 0..out.len() {
            let x = point(p, &mut scratch.idx[..]);
            out[p] = self.eval(x, &mut scratch);
        }
        Ok(())
    }

    /// Evaluate every output element across the rayon pool,
    /// reading the coordinates of element `p` from `point(p, idx)`.
    #[cfg(feature = "rayon")]
    fn fill<F>(&self, out: &mut [T], rank: usize, point: F) -> Result<(), InterpError>
    where
        F: Fn(usize, &mut [usize]) -> [T; N] + Sync,
    {
        use rayon::prelude::*;

        let point = &point;
        let mut run = move || {
            out.par_iter_mut().enumerate().for_each_init(
                || self.scratch(rank),
                |scratch, (p, o)| {
                    let x = point(p, &mut scratch.idx[..]);
                    *o = self.eval(x, scratch);
                },
            )
        };

        match self.options.threads {
            None => run(),
            Some(threads) => {
                tracing::trace!(threads, "building dedicated thread pool");
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| InterpError::ResourceExhaustion(e.to_string()))?
                    .install(run)
            }
        }
        Ok(())
    }

    #[inline]
    fn eval(&self, x: [T; N], scratch: &mut Scratch<T, N>) -> T {
        match self.options.footprint {
            Footprint::Dense => self.eval_dense(x, &mut scratch.weights),
            Footprint::Compact => self.eval_compact(x),
        }
    }

    /// Sum over every node of the grid
    fn eval_dense(&self, x: [T; N], weights: &mut [Vec<T>; N]) -> T {
        for k in 0..N {
            let u = grid_coordinate(x[k], self.last[k], self.limits[k]);
            for (i, w) in weights[k].iter_mut().enumerate() {
                *w = hat(u - to_float(i));
            }
        }

        let weights = &*weights;
        let mut interped = T::zero();
        for_each_index(self.dims, |idx| {
            let mut term = self.vals.at(self.vals.offset(idx));
            for k in 0..N {
                term = term * weights[k][idx[k]];
            }
            interped = interped + term;
        });

        interped
    }

    /// Sum over the (at most two per axis) nodes with nonzero weight
    fn eval_compact(&self, x: [T; N]) -> T {
        let mut nodes = [[0_usize; 2]; N];
        let mut ws = [[T::zero(); 2]; N];
        let mut counts = [0_usize; N];

        for k in 0..N {
            let u = grid_coordinate(x[k], self.last[k], self.limits[k]);
            // NaN, infinite, or so far off the grid that no node carries weight
            let Some(base) = <isize as NumCast>::from(u.floor()) else {
                return T::zero();
            };

            for i in base..=base.saturating_add(1) {
                if i < 0 || i as usize >= self.dims[k] {
                    continue;
                }
                let w = hat(u - to_float(i as usize));
                if w != T::zero() {
                    nodes[k][counts[k]] = i as usize;
                    ws[k][counts[k]] = w;
                    counts[k] += 1;
                }
            }
        }

        let mut loc = [0_usize; N];
        let mut interped = T::zero();
        for_each_index(counts, |j| {
            for k in 0..N {
                loc[k] = nodes[k][j[k]];
            }
            let mut term = self.vals.at(self.vals.offset(&loc));
            for k in 0..N {
                term = term * ws[k][j[k]];
            }
            interped = interped + term;
        });

        interped
    }
}
